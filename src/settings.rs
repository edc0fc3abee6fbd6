use crate::api::API_URL;
use crate::model::{Credentials, AUTO_PLANT_ID};
use crate::probe::SCAN_INTERVAL;
use config::{Config, ConfigError, Environment, File};
use std::time::Duration;

pub const DEFAULT_NAME: &str = "Growatt";

#[derive(Clone, serde::Deserialize)]
pub struct Settings {
    pub name: String,
    pub plant_id: String,
    pub username: String,
    pub password: String,
    pub api_url: String,
    /// Minimum seconds between two refreshes of one device.
    pub interval: u64,
}

impl Settings {
    /// Reads `growatt.toml` (optional) overridden by `GROWATT_*` environment variables.
    pub fn read() -> Result<Settings, ConfigError> {
        let mut settings = Config::default();
        settings
            .set_default("name", DEFAULT_NAME)?
            .set_default("plant_id", AUTO_PLANT_ID)?
            .set_default("api_url", API_URL)?
            .set_default("interval", SCAN_INTERVAL.as_secs() as i64)?
            .merge(File::with_name("growatt").required(false))?
            .merge(Environment::with_prefix("GROWATT"))?;

        settings.try_into()
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.to_owned(),
            password: self.password.to_owned(),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }
}
