pub mod endpoint;
pub mod error;
mod password;
pub mod response;

use crate::model;
use async_trait::async_trait;
pub use error::Error;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
pub use password::hash_password;
use reqwest::cookie::Jar;
use reqwest::redirect::Policy;
use reqwest::{ClientBuilder, RequestBuilder, Response};
use response::login::Login;
use response::plant_info::PlantInfo;
use response::plant_list::PlantList;
use serde_json::{Map, Value};
use std::sync::Arc;

pub const API_URL: &str = "http://server.growatt.com/";

/// Login `errCode` values with a known meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum LoginFailCode {
    WrongCredentials = 102,
}

impl LoginFailCode {
    pub fn parse(code: &str) -> Option<LoginFailCode> {
        code.trim().parse::<u64>().ok().and_then(LoginFailCode::from_u64)
    }
}

/// Operations of the vendor API. One session is shared by every caller.
#[async_trait]
pub trait Portal: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<model::LoginResult, Error>;

    async fn plant_list(&self, user_id: &str) -> Result<Vec<model::Plant>, Error>;

    async fn plant_info(&self, plant_id: &str) -> Result<model::PlantInfo, Error>;

    async fn inverter_detail(&self, inverter_id: &str) -> Result<Map<String, Value>, Error>;

    async fn mix_detail(&self, mix_id: &str, plant_id: &str) -> Result<Map<String, Value>, Error>;

    async fn storage_detail(&self, storage_id: &str) -> Result<Map<String, Value>, Error>;

    async fn storage_energy_overview(
        &self,
        plant_id: &str,
        storage_id: &str,
    ) -> Result<Map<String, Value>, Error>;

    async fn tlx_detail(&self, tlx_id: &str) -> Result<Map<String, Value>, Error>;
}

/// Client of the vendor's HTTP API. The session cookie set by `login` lives in a cookie jar
/// shared by both clients and accompanies every later call.
#[derive(Debug)]
pub struct GrowattApi {
    api_url: String,
    client: reqwest::Client,
    /* Plant list answers a lost session with a redirect to the login page */
    no_redirect_client: reqwest::Client,
}

/// Map a failure to send or read a request to Error
fn map_api_err(error: reqwest::Error) -> Error {
    Error::TransportError(error.to_string())
}

impl GrowattApi {
    pub fn new(api_url: &str) -> Result<GrowattApi, Error> {
        let jar = Arc::new(Jar::default());
        let client = ClientBuilder::new()
            .cookie_provider(jar.clone())
            .build()
            .map_err(|e| Error::InternalError(e.to_string()))?;
        let no_redirect_client = ClientBuilder::new()
            .cookie_provider(jar)
            .redirect(Policy::none())
            .build()
            .map_err(|e| Error::InternalError(e.to_string()))?;

        let mut api_url = api_url.to_owned();
        if !api_url.ends_with('/') {
            api_url.push('/');
        }

        Ok(GrowattApi {
            api_url,
            client,
            no_redirect_client,
        })
    }

    fn url(&self, endpoint: &endpoint::Endpoint) -> String {
        format!("{}{}", self.api_url, endpoint)
    }

    async fn text(response: Response) -> Result<String, Error> {
        response
            .text()
            .await
            .map_err(|e| Error::TransportError(format!("Error reading API response: {}", e)))
    }

    /// Send `request` and parse the body as JSON, whatever the status.
    async fn call(
        &self,
        endpoint: &endpoint::Endpoint,
        request: RequestBuilder,
    ) -> Result<Value, Error> {
        let response = request.send().await.map_err(map_api_err)?;
        let status = response.status();
        let text = Self::text(response).await?;

        log::trace!(
            "endpoint: {}, status: {}, response_text: {}",
            endpoint,
            status,
            text
        );

        serde_json::from_str::<Value>(&text).map_err(|e| Error::InvalidResponse(text, e.to_string()))
    }
}

#[async_trait]
impl Portal for GrowattApi {
    async fn login(&self, username: &str, password: &str) -> Result<model::LoginResult, Error> {
        let password = hash_password(password);
        let form = [("userName", username), ("password", password.as_str())];

        let request = self.client.post(self.url(endpoint::LOGIN)).form(&form);
        let value = self.call(endpoint::LOGIN, request).await?;

        serde_json::from_value::<Login>(value)
            .map_err(|e| Error::UnexpectedApiResponse(e.to_string()))
            .map(|response| model::LoginResult {
                success: response.back.success,
                user_id: response.back.user_id,
                error_code: response.back.err_code,
            })
    }

    async fn plant_list(&self, user_id: &str) -> Result<Vec<model::Plant>, Error> {
        let response = self
            .no_redirect_client
            .get(self.url(endpoint::PLANTS))
            .query(&[("userId", user_id)])
            .send()
            .await
            .map_err(map_api_err)?;

        /* The only call whose status is checked explicitly */
        if response.status() != http::StatusCode::OK {
            return Err(Error::TransportError(format!(
                "Request failed: server responded {}",
                response.status()
            )));
        }

        let text = Self::text(response).await?;
        log::trace!("endpoint: {}, response_text: {}", endpoint::PLANTS, text);

        serde_json::from_str::<PlantList>(&text)
            .map_err(|e| Error::InvalidResponse(text.clone(), e.to_string()))
            .map(|response| {
                response
                    .back
                    .data
                    .into_iter()
                    .map(|plant| model::Plant {
                        id: plant.plant_id,
                        name: plant.plant_name,
                    })
                    .collect()
            })
    }

    async fn plant_info(&self, plant_id: &str) -> Result<model::PlantInfo, Error> {
        let request = self.client.get(self.url(endpoint::PLANT_INFO)).query(&[
            ("op", endpoint::OP_ALL_DEVICES),
            ("plantId", plant_id),
            ("pageNum", "1"),
            ("pageSize", "1"),
        ]);
        let value = self.call(endpoint::PLANT_INFO, request).await?;

        serde_json::from_value::<PlantInfo>(value)
            .map_err(|e| Error::UnexpectedApiResponse(e.to_string()))
            .map(|response| model::PlantInfo {
                devices: response
                    .device_list
                    .into_iter()
                    .map(|device| model::DeviceEntry {
                        serial: device.device_sn,
                        type_tag: device.device_type,
                        alias: device.device_ailas.filter(|alias| !alias.is_empty()),
                    })
                    .collect(),
                fields: response.fields,
            })
    }

    async fn inverter_detail(&self, inverter_id: &str) -> Result<Map<String, Value>, Error> {
        let request = self.client.get(self.url(endpoint::INVERTER)).query(&[
            ("op", endpoint::OP_INVERTER_DETAIL),
            ("inverterId", inverter_id),
        ]);

        self.call(endpoint::INVERTER, request)
            .await
            .and_then(response::object)
    }

    async fn mix_detail(&self, mix_id: &str, plant_id: &str) -> Result<Map<String, Value>, Error> {
        let request = self
            .client
            .post(self.url(endpoint::MIX))
            .query(&[("op", endpoint::OP_MIX_STATUS)])
            .form(&[("mixId", mix_id), ("plantId", plant_id)]);

        self.call(endpoint::MIX, request)
            .await
            .and_then(|value| response::object_at(value, "obj"))
    }

    async fn storage_detail(&self, storage_id: &str) -> Result<Map<String, Value>, Error> {
        let request = self.client.get(self.url(endpoint::STORAGE)).query(&[
            ("op", endpoint::OP_STORAGE_PARAMS),
            ("storageId", storage_id),
        ]);

        self.call(endpoint::STORAGE, request)
            .await
            .and_then(|value| response::object_at(value, "storageDetailBean"))
    }

    async fn storage_energy_overview(
        &self,
        plant_id: &str,
        storage_id: &str,
    ) -> Result<Map<String, Value>, Error> {
        let request = self
            .client
            .post(self.url(endpoint::STORAGE_ENERGY_OVERVIEW))
            .query(&[("plantId", plant_id), ("storageSn", storage_id)]);

        self.call(endpoint::STORAGE_ENERGY_OVERVIEW, request)
            .await
            .and_then(|value| response::object_at(value, "obj"))
    }

    async fn tlx_detail(&self, tlx_id: &str) -> Result<Map<String, Value>, Error> {
        let request = self
            .client
            .get(self.url(endpoint::TLX))
            .query(&[("op", endpoint::OP_TLX_DETAIL), ("id", tlx_id)]);

        self.call(endpoint::TLX, request)
            .await
            .and_then(|value| response::object_at(value, "data"))
    }
}
