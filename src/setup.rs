use crate::api::{Error, LoginFailCode, Portal};
use crate::catalog::Catalog;
use crate::model::{Credentials, Device, DeviceType, DeviceTypeTag, AUTO_PLANT_ID};
use crate::probe::Probe;
use crate::sensor::Sensor;
use crate::settings::Settings;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Log in, resolve the plant and create one sensor per (device, catalog entry).
///
/// The plant's aggregate sensors are always included. Devices of an unsupported type are
/// skipped. Only a failed login or a failed discovery call stops the setup.
pub async fn setup<P: Portal>(
    portal: Arc<P>,
    settings: &Settings,
    catalog: &Catalog,
) -> Result<Vec<Sensor<P>>, Error> {
    let login = portal.login(&settings.username, &settings.password).await?;

    if !login.success {
        let code = login.error_code.unwrap_or_default();
        return Err(match LoginFailCode::parse(&code) {
            Some(LoginFailCode::WrongCredentials) => {
                log::error!("Username or Password may be incorrect!");
                Error::AuthenticationFailure(format!("error code {}", code))
            }
            None => Error::LoginError(format!("error code {:?}", code)),
        });
    }

    let plant_id = if settings.plant_id == AUTO_PLANT_ID {
        let user_id = login
            .user_id
            .ok_or_else(|| Error::LoginError(String::from("no userId in login response")))?;
        let plant = portal
            .plant_list(&user_id)
            .await?
            .into_iter()
            .next()
            .ok_or(Error::NoPlants)?;
        log::info!(
            "Using plant {} ({})",
            plant.id,
            plant.name.as_deref().unwrap_or("unnamed")
        );
        plant.id
    } else {
        settings.plant_id.to_owned()
    };

    let devices = portal.plant_info(&plant_id).await?.devices;
    log::info!("Plant {} has {} devices", plant_id, devices.len());

    let credentials = settings.credentials();
    let interval = settings.interval();

    let total = Device {
        id: plant_id.to_owned(),
        device_type: DeviceType::Total,
        plant_id: plant_id.to_owned(),
    };
    let mut sensors = device_sensors(
        &portal,
        &credentials,
        interval,
        catalog,
        total,
        &format!("{} Total", settings.name),
    );

    for entry in devices {
        let device_type = match entry.type_tag {
            DeviceTypeTag::Supported(device_type) => device_type,
            DeviceTypeTag::Unsupported(tag) => {
                log::debug!(
                    "Device type {} was found but is not supported right now.",
                    tag
                );
                continue;
            }
        };

        let name = match entry.alias {
            Some(alias) => alias,
            None => entry.serial.clone(),
        };
        let device = Device {
            id: entry.serial,
            device_type,
            plant_id: plant_id.to_owned(),
        };
        sensors.extend(device_sensors(
            &portal,
            &credentials,
            interval,
            catalog,
            device,
            &name,
        ));
    }

    log::info!("Created {} sensors for plant {}", sensors.len(), plant_id);
    Ok(sensors)
}

/// Sensors of one device, all sharing a single probe.
fn device_sensors<P: Portal>(
    portal: &Arc<P>,
    credentials: &Credentials,
    interval: Duration,
    catalog: &Catalog,
    device: Device,
    device_name: &str,
) -> Vec<Sensor<P>> {
    let definitions = catalog.sensors(device.device_type);
    if definitions.is_empty() {
        return Vec::new();
    }

    let id = device.id.to_owned();
    let probe = Arc::new(Mutex::new(Probe::new(
        portal.clone(),
        credentials.clone(),
        device,
        interval,
    )));

    definitions
        .iter()
        .map(|definition| {
            Sensor::new(
                probe.clone(),
                *definition,
                device_name,
                format!("{}-{}", id, definition.key),
            )
        })
        .collect()
}
