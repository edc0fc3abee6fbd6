use crate::api::{Error, Portal};
use crate::model::{LoginResult, Plant, PlantInfo};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Mutex;

pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("not a JSON object: {}", other),
    }
}

/// In-memory `Portal` recording every call.
pub struct FakePortal {
    pub login: Mutex<Result<LoginResult, Error>>,
    pub plants: Mutex<Result<Vec<Plant>, Error>>,
    pub plant_info: Mutex<Result<PlantInfo, Error>>,
    details: Mutex<HashMap<&'static str, Result<Map<String, Value>, Error>>>,
    calls: Mutex<Vec<(&'static str, Vec<String>)>>,
}

impl FakePortal {
    pub fn new() -> FakePortal {
        FakePortal {
            login: Mutex::new(Ok(LoginResult {
                success: true,
                user_id: Some("1234567".to_string()),
                error_code: None,
            })),
            plants: Mutex::new(Ok(vec![Plant {
                id: "107658".to_string(),
                name: Some("Home".to_string()),
            }])),
            plant_info: Mutex::new(Ok(PlantInfo {
                devices: Vec::new(),
                fields: Map::new(),
            })),
            details: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_detail(&self, operation: &'static str, value: Value) {
        self.details
            .lock()
            .unwrap()
            .insert(operation, Ok(object(value)));
    }

    pub fn fail_detail(&self, operation: &'static str, error: Error) {
        self.details.lock().unwrap().insert(operation, Err(error));
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(op, _)| *op == operation)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_args(&self, operation: &str) -> Option<Vec<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(op, _)| *op == operation)
            .map(|(_, args)| args.clone())
    }

    fn record(&self, operation: &'static str, args: &[&str]) {
        self.calls.lock().unwrap().push((
            operation,
            args.iter().map(|arg| arg.to_string()).collect(),
        ));
    }

    fn detail(&self, operation: &'static str, args: &[&str]) -> Result<Map<String, Value>, Error> {
        self.record(operation, args);
        self.details
            .lock()
            .unwrap()
            .get(operation)
            .cloned()
            .unwrap_or_else(|| Err(Error::UnexpectedApiResponse(format!("no {}", operation))))
    }
}

#[async_trait]
impl Portal for FakePortal {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, Error> {
        self.record("login", &[username, password]);
        self.login.lock().unwrap().clone()
    }

    async fn plant_list(&self, user_id: &str) -> Result<Vec<Plant>, Error> {
        self.record("plant_list", &[user_id]);
        self.plants.lock().unwrap().clone()
    }

    async fn plant_info(&self, plant_id: &str) -> Result<PlantInfo, Error> {
        self.record("plant_info", &[plant_id]);
        self.plant_info.lock().unwrap().clone()
    }

    async fn inverter_detail(&self, inverter_id: &str) -> Result<Map<String, Value>, Error> {
        self.detail("inverter_detail", &[inverter_id])
    }

    async fn mix_detail(&self, mix_id: &str, plant_id: &str) -> Result<Map<String, Value>, Error> {
        self.detail("mix_detail", &[mix_id, plant_id])
    }

    async fn storage_detail(&self, storage_id: &str) -> Result<Map<String, Value>, Error> {
        self.detail("storage_detail", &[storage_id])
    }

    async fn storage_energy_overview(
        &self,
        plant_id: &str,
        storage_id: &str,
    ) -> Result<Map<String, Value>, Error> {
        self.detail("storage_energy_overview", &[plant_id, storage_id])
    }

    async fn tlx_detail(&self, tlx_id: &str) -> Result<Map<String, Value>, Error> {
        self.detail("tlx_detail", &[tlx_id])
    }
}
