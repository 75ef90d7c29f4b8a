use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::models::hotel::{Hotel, HotelPage, HotelPayload};

/// Parameters of one listing request as the list view sees them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ListParams {
    pub search_text: String,
    pub page: u32,
}

impl ListParams {
    pub fn new(search_text: impl Into<String>, page: u32) -> Self {
        Self {
            search_text: search_text.into(),
            page,
        }
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string())];
        if !self.search_text.is_empty() {
            pairs.push(("name", self.search_text.clone()));
        }
        pairs
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message} (status {status})")]
    Status { status: u16, message: String },
}

/// The hotel endpoints as seen from the browser side.
#[async_trait]
pub trait HotelApi: Send + Sync + 'static {
    async fn list(&self, params: &ListParams) -> Result<HotelPage, ApiError>;
    async fn create(&self, payload: &HotelPayload) -> Result<Hotel, ApiError>;
    async fn update(&self, payload: &HotelPayload) -> Result<Hotel, ApiError>;
}

pub struct HttpHotelApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpHotelApi {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn hotels_url(&self) -> String {
        format!("{}/api/hotels", self.base_url)
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| status.to_string());

    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl HotelApi for HttpHotelApi {
    async fn list(&self, params: &ListParams) -> Result<HotelPage, ApiError> {
        let response = self
            .client
            .get(self.hotels_url())
            .query(&params.query_pairs())
            .send()
            .await?;
        decode(response).await
    }

    async fn create(&self, payload: &HotelPayload) -> Result<Hotel, ApiError> {
        let response = self
            .client
            .post(self.hotels_url())
            .json(payload)
            .send()
            .await?;
        decode(response).await
    }

    async fn update(&self, payload: &HotelPayload) -> Result<Hotel, ApiError> {
        let response = self
            .client
            .put(self.hotels_url())
            .json(payload)
            .send()
            .await?;
        decode(response).await
    }
}
