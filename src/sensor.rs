use crate::api::Portal;
use crate::catalog::SensorDefinition;
use crate::model::Reading;
use crate::probe::{Probe, Refresh};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

pub const ICON: &str = "mdi:solar-power";

/// Probe shared by all sensors of one device. The lock keeps refreshes of one device from
/// overlapping when the host serves requests concurrently.
pub type SharedProbe<P> = Arc<Mutex<Probe<P>>>;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Metadata {
    pub unique_id: String,
    pub name: String,
    pub unit: &'static str,
    pub category: Option<&'static str>,
    pub icon: &'static str,
}

/// One catalog entry of one device, as presented to the host.
pub struct Sensor<P> {
    probe: SharedProbe<P>,
    definition: SensorDefinition,
    name: String,
    unique_id: String,
}

impl<P: Portal> Sensor<P> {
    pub fn new(
        probe: SharedProbe<P>,
        definition: SensorDefinition,
        device_name: &str,
        unique_id: String,
    ) -> Self {
        Sensor {
            probe,
            definition,
            name: format!("{} {}", device_name, definition.name),
            unique_id,
        }
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> Metadata {
        Metadata {
            unique_id: self.unique_id.clone(),
            name: self.name.clone(),
            unit: self.definition.unit,
            category: self.definition.class.map(|class| class.as_str()),
            icon: ICON,
        }
    }

    /// Current value, rounded when the catalog entry asks for it.
    pub async fn value(&self) -> Reading {
        let reading = self.probe.lock().await.read_field(self.definition.field);

        match self.definition.round {
            Some(precision) => reading.round(precision),
            None => reading,
        }
    }

    /// Refreshes the underlying probe; sensors sharing a probe share its throttle.
    pub async fn refresh(&self, now: Instant) -> Refresh {
        self.probe.lock().await.refresh(now).await
    }

    pub fn shares_probe_with(&self, other: &Sensor<P>) -> bool {
        Arc::ptr_eq(&self.probe, &other.probe)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::catalog::{DeviceClass, POWER_WATT, VOLT};
    use crate::model::{Credentials, Device, DeviceType};
    use crate::probe::SCAN_INTERVAL;
    use crate::testing::FakePortal;
    use serde_json::json;

    fn shared_probe(portal: &Arc<FakePortal>) -> SharedProbe<FakePortal> {
        let device = Device {
            id: "AH12345678".to_string(),
            device_type: DeviceType::Inverter,
            plant_id: "107658".to_string(),
        };
        let credentials = Credentials {
            username: "user".to_string(),
            password: "secret".to_string(),
        };
        Arc::new(Mutex::new(Probe::new(
            portal.clone(),
            credentials,
            device,
            SCAN_INTERVAL,
        )))
    }

    fn sensor(probe: &SharedProbe<FakePortal>, definition: SensorDefinition) -> Sensor<FakePortal> {
        Sensor::new(
            probe.clone(),
            definition,
            "Garage inverter",
            format!("AH12345678-{}", definition.key),
        )
    }

    #[tokio::test]
    async fn rounds_numbers() {
        let portal = Arc::new(FakePortal::new());
        portal.set_detail("inverter_detail", json!({"vacr": 12.345, "status": "normal"}));
        let probe = shared_probe(&portal);

        let rounded = sensor(&probe, SensorDefinition::new("rounded", "Rounded", VOLT, "vacr").round(1));
        let raw = sensor(&probe, SensorDefinition::new("raw", "Raw", VOLT, "vacr"));
        let text = sensor(&probe, SensorDefinition::new("text", "Text", "", "status").round(1));

        rounded.refresh(Instant::now()).await;

        assert_eq!(Reading::Number(12.3), rounded.value().await);
        assert_eq!(Reading::Number(12.345), raw.value().await);
        assert_eq!(Reading::Text("normal".to_string()), text.value().await);
    }

    #[tokio::test]
    async fn missing_field_is_unknown() {
        let portal = Arc::new(FakePortal::new());
        portal.set_detail("inverter_detail", json!({"pac": 1.0}));
        let probe = shared_probe(&portal);
        let missing = sensor(&probe, SensorDefinition::new("gone", "Gone", POWER_WATT, "ppv9").round(1));

        assert_eq!(Reading::Unknown, missing.value().await);
        missing.refresh(Instant::now()).await;
        assert_eq!(Reading::Unknown, missing.value().await);
    }

    #[tokio::test]
    async fn sensors_sharing_a_probe_fetch_once() {
        let portal = Arc::new(FakePortal::new());
        portal.set_detail("inverter_detail", json!({"pac": 1876.34, "fac": 50.02}));
        let probe = shared_probe(&portal);
        let power = sensor(&probe, SensorDefinition::new("power", "Output power", POWER_WATT, "pac"));
        let frequency = sensor(&probe, SensorDefinition::new("frequency", "AC frequency", "Hz", "fac"));
        let now = Instant::now();

        assert_eq!(Refresh::Updated, power.refresh(now).await);
        assert_eq!(Refresh::Throttled, frequency.refresh(now).await);

        assert_eq!(1, portal.calls("inverter_detail"));
        assert!(power.shares_probe_with(&frequency));
        assert_eq!(Reading::Number(50.02), frequency.value().await);
    }

    #[test]
    fn metadata() {
        let portal = Arc::new(FakePortal::new());
        let probe = shared_probe(&portal);
        let power = sensor(
            &probe,
            SensorDefinition::new("inverter_current_wattage", "Output power", POWER_WATT, "pac")
                .class(DeviceClass::Power),
        );

        assert_eq!(
            Metadata {
                unique_id: "AH12345678-inverter_current_wattage".to_string(),
                name: "Garage inverter Output power".to_string(),
                unit: "W",
                category: Some("power"),
                icon: ICON,
            },
            power.metadata()
        );
    }
}
