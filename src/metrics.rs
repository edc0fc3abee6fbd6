use crate::api::{Error, Portal};
use crate::model::Reading;
use crate::sensor::{Metadata, Sensor};
use prometheus::{Encoder, GaugeVec, TextEncoder};
use std::time::Instant;

lazy_static! {
    static ref SENSOR_GAUGE: GaugeVec = register_gauge_vec!(
        opts!("growatt_sensor", "latest numeric value reported by a Growatt sensor",),
        &["unique_id", "name", "unit", "category"],
    )
    .unwrap();
}

/// Sensor state as shown by `/sensors`.
#[derive(serde::Serialize)]
pub struct SensorState {
    #[serde(flatten)]
    pub metadata: Metadata,
    pub value: Reading,
}

/// Refresh every sensor and read its value. Probes skip fetching until their interval elapsed.
async fn refresh_all<P: Portal>(sensors: &[Sensor<P>]) -> Vec<(Metadata, Reading)> {
    let mut readings = Vec::with_capacity(sensors.len());

    for sensor in sensors {
        sensor.refresh(Instant::now()).await;
        readings.push((sensor.metadata(), sensor.value().await));
    }

    readings
}

/// Feed the current value of every sensor to the Prometheus registry. Unknown and
/// non-numeric values are not published.
pub async fn collect<P: Portal>(sensors: &[Sensor<P>]) {
    for (metadata, reading) in refresh_all(sensors).await {
        let labels = [
            metadata.unique_id.as_str(),
            metadata.name.as_str(),
            metadata.unit,
            metadata.category.unwrap_or(""),
        ];

        match reading.as_f64() {
            Some(value) => SENSOR_GAUGE.with_label_values(&labels).set(value),
            None => {
                log::debug!("{} has no numeric value: {:?}", metadata.unique_id, reading);
                let _ = SENSOR_GAUGE.remove_label_values(&labels);
            }
        }
    }
}

pub async fn states<P: Portal>(sensors: &[Sensor<P>]) -> Vec<SensorState> {
    refresh_all(sensors)
        .await
        .into_iter()
        .map(|(metadata, value)| SensorState { metadata, value })
        .collect()
}

/// Read metrics from Prometheus exporter registry.
pub fn read() -> Result<String, Error> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    encoder
        .encode(&metric_families, &mut buffer)
        .or(Err(Error::FormatError))?;
    String::from_utf8(buffer).or(Err(Error::FormatError))
}
