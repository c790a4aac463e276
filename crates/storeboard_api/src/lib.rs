pub mod analytics;
pub mod error;
pub mod method;
pub mod orders;
pub mod records;

pub use error::ApiError;
pub use records::Records;

use bon::Builder;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct ClientConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    #[builder(default = Duration::from_secs(15))]
    pub timeout: Duration,
}

pub struct StoreboardClient {
    reqwest: Client,
    base_url: String,
    timeout: Duration,
}

impl StoreboardClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::InvalidConfig("base URL is empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.api_token {
            let value = HeaderValue::from_str(format!("Bearer {token}").as_str())
                .map_err(|e| ApiError::InvalidConfig(format!("bad API token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let reqwest = ClientBuilder::new()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            reqwest,
            base_url,
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn get<T: DeserializeOwned, P: Serialize + ?Sized>(
        &self,
        path: &str,
        params: &P,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        let response = self
            .reqwest
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str::<T>(&body)?)
    }

    pub async fn call<M: method::Method>(&self, params: M::Params) -> Result<M::Response, ApiError> {
        self.get(M::PATH, &params).await
    }

    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.timeout)
        } else {
            ApiError::Request(err)
        }
    }
}
