use crate::api::Error;
use crate::model::DeviceTypeTag;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/* Ids arrive either as JSON strings or as JSON numbers depending on the endpoint */
fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

fn optional_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

pub mod login {
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Back {
        pub success: bool,
        #[serde(default, deserialize_with = "super::optional_id")]
        pub user_id: Option<String>,
        #[serde(default, deserialize_with = "super::optional_id")]
        pub err_code: Option<String>,
    }

    #[derive(Deserialize)]
    pub struct Login {
        pub back: Back,
    }
}

pub mod plant_list {
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Data {
        #[serde(deserialize_with = "super::id")]
        pub plant_id: String,
        pub plant_name: Option<String>,
    }

    #[derive(Deserialize)]
    pub struct Back {
        #[serde(default)]
        pub data: Vec<Data>,
    }

    #[derive(Deserialize)]
    pub struct PlantList {
        pub back: Back,
    }
}

pub mod plant_info {
    use super::DeviceTypeTag;
    use serde::Deserialize;
    use serde_json::{Map, Value};

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Device {
        #[serde(deserialize_with = "super::id")]
        pub device_sn: String,
        pub device_type: DeviceTypeTag,
        /* sic */
        #[serde(default)]
        pub device_ailas: Option<String>,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PlantInfo {
        #[serde(default)]
        pub device_list: Vec<Device>,
        /* Everything else is aggregate plant data */
        #[serde(flatten)]
        pub fields: Map<String, Value>,
    }
}

/// Takes the JSON object stored under `key` out of `value`.
pub fn object_at(value: Value, key: &str) -> Result<Map<String, Value>, Error> {
    match value {
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Object(object)) => Ok(object),
            _ => Err(Error::UnexpectedApiResponse(format!(
                "no `{}` object in response",
                key
            ))),
        },
        _ => Err(Error::UnexpectedApiResponse(String::from(
            "response is not a JSON object",
        ))),
    }
}

/// The whole response as a JSON object.
pub fn object(value: Value) -> Result<Map<String, Value>, Error> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::UnexpectedApiResponse(String::from(
            "response is not a JSON object",
        ))),
    }
}

#[cfg(test)]
mod test {
    use crate::model::{DeviceType, DeviceTypeTag};
    use serde_json::Value;
    use std::fs;
    use std::path::PathBuf;

    fn read_resource(filename: &str) -> String {
        let mut d = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        d.push(format!("resources/test/{}", filename));
        fs::read_to_string(d.as_path()).unwrap()
    }

    #[test]
    fn login_success() {
        let input = read_resource("login.json");
        let output: super::login::Login = serde_json::from_str(&input).unwrap();
        assert!(output.back.success);
        assert_eq!(Some("1234567".to_string()), output.back.user_id);
        assert_eq!(None, output.back.err_code);
    }

    #[test]
    fn login_failure() {
        let input = read_resource("login_failure.json");
        let output: super::login::Login = serde_json::from_str(&input).unwrap();
        assert!(!output.back.success);
        assert_eq!(None, output.back.user_id);
        assert_eq!(Some("102".to_string()), output.back.err_code);
    }

    #[test]
    fn plant_list() {
        let input = read_resource("plantList.json");
        let output: super::plant_list::PlantList = serde_json::from_str(&input).unwrap();
        assert_eq!("107658", output.back.data[0].plant_id);
        assert_eq!(Some("Home".to_string()), output.back.data[0].plant_name);
        assert_eq!("107659", output.back.data[1].plant_id);
    }

    #[test]
    fn plant_info() {
        let input = read_resource("plantInfo.json");
        let output: super::plant_info::PlantInfo = serde_json::from_str(&input).unwrap();

        assert_eq!(4, output.device_list.len());
        assert_eq!("AH12345678", output.device_list[0].device_sn);
        assert_eq!(
            DeviceTypeTag::Supported(DeviceType::Inverter),
            output.device_list[0].device_type
        );
        assert_eq!(
            Some("Garage inverter".to_string()),
            output.device_list[0].device_ailas
        );
        assert_eq!(
            DeviceTypeTag::Unsupported("max".to_string()),
            output.device_list[3].device_type
        );

        assert!(!output.fields.contains_key("deviceList"));
        assert_eq!(
            Some(&Value::String("3.1/€".to_string())),
            output.fields.get("plantMoneyText")
        );
    }

    #[test]
    fn object_at() {
        let input = read_resource("tlxDetail.json");
        let value: Value = serde_json::from_str(&input).unwrap();
        let data = super::object_at(value.clone(), "data").unwrap();
        assert_eq!(Some(&Value::from(38.5)), data.get("temp1"));

        let missing = super::object_at(value, "obj");
        assert!(missing.unwrap_err().is_malformed());
    }

    #[test]
    #[should_panic]
    fn invalid_json() {
        let input = read_resource("invalid_json.json");
        let _output: Value = serde_json::from_str(&input).unwrap();
    }
}
