#[macro_use]
extern crate rocket;

use growatt_rs::catalog::Catalog;
use growatt_rs::metrics;
use growatt_rs::sensor::Sensor;
use growatt_rs::settings::Settings;
use growatt_rs::{Error, GrowattApi};
use rocket::http::ContentType;
use rocket::State;
use std::process;
use std::sync::Arc;

/// Structure containing state for API handlers.
pub struct StateData {
    sensors: Vec<Sensor<GrowattApi>>,
}

#[get("/metrics")]
async fn metrics_route(state: &State<StateData>) -> Result<String, Error> {
    metrics::collect(&state.sensors).await;
    metrics::read()
}

#[get("/sensors")]
async fn sensors_route(state: &State<StateData>) -> Result<(ContentType, String), Error> {
    let states = metrics::states(&state.sensors).await;

    serde_json::to_string_pretty(&states)
        .map(|json| (ContentType::JSON, json))
        .or(Err(Error::FormatError))
}

#[rocket::main]
async fn main() {
    env_logger::init();

    let settings = Settings::read().unwrap_or_else(|e| {
        log::error!("Configuration error: {}", e);
        process::exit(1)
    });

    let api = GrowattApi::new(&settings.api_url).unwrap_or_else(|e| {
        log::error!("{}", e);
        process::exit(1)
    });

    let sensors = growatt_rs::setup(Arc::new(api), &settings, &Catalog::growatt())
        .await
        .unwrap_or_else(|e| {
            log::error!("Setup failed, no sensors created: {}", e);
            process::exit(1)
        });

    let result = rocket::build()
        .manage(StateData { sensors })
        .mount("/", routes![metrics_route, sensors_route])
        .launch()
        .await;

    if let Err(e) = result {
        log::error!("Server stopped: {}", e.kind());
    }
}
