use crate::api::{Error, Portal};
use crate::model::{Credentials, Device, DeviceType, Reading, Snapshot};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default minimum time between two fetches of one device.
pub const SCAN_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Aggregate fields arriving as currency text such as `3.1/€`.
const MONEY_FIELDS: &[&str] = &["plantMoneyText"];

lazy_static! {
    static ref NOT_A_NUMBER: Regex = Regex::new(r"[^\d.,]").expect("valid regex");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Interval not yet elapsed, nothing fetched.
    Throttled,
    Updated,
    /// Fetch attempted and failed; the previous snapshot is kept.
    Stale,
}

/// Keeps the latest snapshot of one device and refreshes it at most once per interval.
pub struct Probe<P> {
    portal: Arc<P>,
    credentials: Credentials,
    device: Device,
    interval: Duration,
    last_attempt: Option<Instant>,
    snapshot: Snapshot,
}

/// Strip everything but digits and separators from a currency text.
pub fn sanitize_money(text: &str) -> String {
    NOT_A_NUMBER.replace_all(text, "").into_owned()
}

impl<P: Portal> Probe<P> {
    pub fn new(portal: Arc<P>, credentials: Credentials, device: Device, interval: Duration) -> Self {
        Probe {
            portal,
            credentials,
            device,
            interval,
            last_attempt: None,
            snapshot: Snapshot::default(),
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Checks whether `interval` elapsed at `now` since the last attempted refresh
    fn interval_elapsed(&self, now: Instant) -> bool {
        match self.last_attempt {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            /* Never refreshed, always refresh */
            None => true,
        }
    }

    pub async fn refresh(&mut self, now: Instant) -> Refresh {
        if !self.interval_elapsed(now) {
            log::debug!(
                "interval not yet elapsed for {} {}; keeping cached data",
                self.device.device_type,
                self.device.id
            );
            return Refresh::Throttled;
        }
        self.last_attempt = Some(now);

        /* The server drops sessions silently, so log in again on every refresh */
        match self
            .portal
            .login(&self.credentials.username, &self.credentials.password)
            .await
        {
            Ok(login) if login.success => {}
            Ok(login) => {
                log::warn!(
                    "Login rejected while updating {} (error code {:?})",
                    self.device.id,
                    login.error_code
                );
                return Refresh::Stale;
            }
            Err(e) => {
                log::warn!("Login failed while updating {}: {}", self.device.id, e);
                return Refresh::Stale;
            }
        }

        log::debug!(
            "Updating {} data for {}",
            self.device.device_type,
            self.device.id
        );

        match self.fetch().await {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                Refresh::Updated
            }
            Err(e) if e.is_malformed() => {
                log::error!(
                    "Unable to fetch data from Growatt server for {}: {}",
                    self.device.id,
                    e
                );
                Refresh::Stale
            }
            Err(e) => {
                log::error!("Request for {} failed: {}", self.device.id, e);
                Refresh::Stale
            }
        }
    }

    async fn fetch(&self) -> Result<Snapshot, Error> {
        let id = self.device.id.as_str();

        let fields = match self.device.device_type {
            DeviceType::Total => {
                let info = self.portal.plant_info(id).await?;
                sanitize_money_fields(info.fields)
            }
            DeviceType::Inverter => self.portal.inverter_detail(id).await?,
            DeviceType::Mix => self.portal.mix_detail(id, &self.device.plant_id).await?,
            DeviceType::Storage => {
                let mut detail = self.portal.storage_detail(id).await?;
                let overview = self
                    .portal
                    .storage_energy_overview(&self.device.plant_id, id)
                    .await?;
                detail.extend(overview);
                detail
            }
            DeviceType::Tlx => self.portal.tlx_detail(id).await?,
        };

        log::trace!("{} {}: {:?}", self.device.device_type, id, fields);
        Ok(Snapshot::from_json(fields))
    }

    pub fn read_field(&self, name: &str) -> Reading {
        let reading = self.snapshot.get(name);
        log::debug!("The value for {} is: {:?}", name, reading);
        reading
    }
}

fn sanitize_money_fields(mut fields: Map<String, Value>) -> Map<String, Value> {
    for name in MONEY_FIELDS {
        if let Some(Value::String(text)) = fields.get_mut(*name) {
            *text = sanitize_money(text);
        }
    }
    fields
}
