use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Plant id meaning "use the first plant of the account".
pub const AUTO_PLANT_ID: &str = "0";

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    /// Whole-plant aggregate, fetched from the plant info call.
    Total,
    Inverter,
    Mix,
    Storage,
    Tlx,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Total => "total",
            DeviceType::Inverter => "inverter",
            DeviceType::Mix => "mix",
            DeviceType::Storage => "storage",
            DeviceType::Tlx => "tlx",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "total" => Ok(DeviceType::Total),
            "inverter" => Ok(DeviceType::Inverter),
            "mix" => Ok(DeviceType::Mix),
            "storage" => Ok(DeviceType::Storage),
            "tlx" => Ok(DeviceType::Tlx),
            other => Err(other.to_owned()),
        }
    }
}

/// Device type tag as reported in a plant's device list. `total` never appears there, and
/// a tag that is not a string is kept verbatim as unsupported.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeviceTypeTag {
    Supported(DeviceType),
    Unsupported(String),
}

impl<'de> serde::Deserialize<'de> for DeviceTypeTag {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let tag = match Value::deserialize(d)? {
            Value::String(tag) => tag,
            other => return Ok(DeviceTypeTag::Unsupported(other.to_string())),
        };

        Ok(match tag.parse::<DeviceType>() {
            Ok(DeviceType::Total) | Err(_) => DeviceTypeTag::Unsupported(tag),
            Ok(device_type) => DeviceTypeTag::Supported(device_type),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Plant {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginResult {
    pub success: bool,
    pub user_id: Option<String>,
    pub error_code: Option<String>,
}

/// Device entry of a plant's device list.
#[derive(Debug, Clone)]
pub struct DeviceEntry {
    pub serial: String,
    pub type_tag: DeviceTypeTag,
    pub alias: Option<String>,
}

/// Aggregate plant metrics together with the plant's device inventory.
#[derive(Debug, Clone)]
pub struct PlantInfo {
    pub devices: Vec<DeviceEntry>,
    pub fields: Map<String, Value>,
}

/// Identity of one polled device. The plant id is always known, since every device is
/// discovered through its plant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Device {
    pub id: String,
    pub device_type: DeviceType,
    pub plant_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

/// Value of a field as seen by a sensor.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Number(f64),
    Text(String),
    Unknown,
}

impl Reading {
    /// Rounds numbers to `precision` decimal places; text and unknown pass through.
    pub fn round(self, precision: u32) -> Reading {
        match self {
            Reading::Number(v) => {
                let factor = 10f64.powi(precision as i32);
                Reading::Number((v * factor).round() / factor)
            }
            other => other,
        }
    }

    /// Numeric view of the reading, parsing numeric text such as `"3.1"`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Reading::Number(v) => Some(*v),
            Reading::Text(s) => s.trim().parse().ok(),
            Reading::Unknown => None,
        }
    }
}

impl From<&Scalar> for Reading {
    fn from(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Number(v) => Reading::Number(*v),
            Scalar::Text(s) => Reading::Text(s.clone()),
        }
    }
}

impl serde::Serialize for Reading {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Reading::Number(v) => s.serialize_f64(*v),
            Reading::Text(t) => s.serialize_str(t),
            Reading::Unknown => s.serialize_none(),
        }
    }
}

/// Flat field-name to scalar mapping of one device.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    fields: HashMap<String, Scalar>,
}

impl Snapshot {
    /// Flattens a JSON object. Nested values and nulls are not scalars and are dropped.
    pub fn from_json(object: Map<String, Value>) -> Snapshot {
        let fields = object
            .into_iter()
            .filter_map(|(name, value)| {
                let scalar = match value {
                    Value::Number(n) => Scalar::Number(n.as_f64()?),
                    Value::String(s) => Scalar::Text(s),
                    Value::Bool(b) => Scalar::Text(b.to_string()),
                    Value::Null | Value::Array(_) | Value::Object(_) => return None,
                };
                Some((name, scalar))
            })
            .collect();

        Snapshot { fields }
    }

    pub fn get(&self, name: &str) -> Reading {
        self.fields
            .get(name)
            .map(Reading::from)
            .unwrap_or(Reading::Unknown)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn snapshot_keeps_scalars_only() {
        let snapshot = Snapshot::from_json(object(json!({
            "pac": 1234.5,
            "status": "normal",
            "online": true,
            "missing": null,
            "nested": {"a": 1},
            "list": [1, 2],
        })));

        assert_eq!(3, snapshot.len());
        assert_eq!(Reading::Number(1234.5), snapshot.get("pac"));
        assert_eq!(Reading::Text("normal".to_string()), snapshot.get("status"));
        assert_eq!(Reading::Text("true".to_string()), snapshot.get("online"));
        assert_eq!(Reading::Unknown, snapshot.get("nested"));
        assert_eq!(Reading::Unknown, snapshot.get("nonexistent"));
    }

    #[test]
    fn rounding() {
        assert_eq!(Reading::Number(12.3), Reading::Number(12.345).round(1));
        assert_eq!(Reading::Number(12.35), Reading::Number(12.3456).round(2));
        assert_eq!(
            Reading::Text("12.345".to_string()),
            Reading::Text("12.345".to_string()).round(1)
        );
        assert_eq!(Reading::Unknown, Reading::Unknown.round(1));
    }

    #[test]
    fn numeric_view() {
        assert_eq!(Some(3.1), Reading::Text("3.1".to_string()).as_f64());
        assert_eq!(None, Reading::Text("3,1".to_string()).as_f64());
        assert_eq!(None, Reading::Unknown.as_f64());
    }

    #[test]
    fn device_type_tag() {
        let tags: Vec<DeviceTypeTag> =
            serde_json::from_value(json!(["inverter", "tlx", "max", "total"])).unwrap();
        assert_eq!(
            vec![
                DeviceTypeTag::Supported(DeviceType::Inverter),
                DeviceTypeTag::Supported(DeviceType::Tlx),
                DeviceTypeTag::Unsupported("max".to_string()),
                DeviceTypeTag::Unsupported("total".to_string()),
            ],
            tags
        );
    }

    #[test]
    fn device_type_tag_not_a_string() {
        let tags: Vec<DeviceTypeTag> = serde_json::from_value(json!([5, null])).unwrap();
        assert_eq!(
            vec![
                DeviceTypeTag::Unsupported("5".to_string()),
                DeviceTypeTag::Unsupported("null".to_string()),
            ],
            tags
        );
    }
}
