//! Shared HTTP client for the backend REST API.

use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::{DocdeskError, Result};

/// Header carrying the device id on every request.
pub const DEVICE_ID_HEADER: &str = "x-device-id";

/// HTTP client bound to one backend, device and (optional) login token.
///
/// Service adapters borrow this client; it holds no per-request state.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    device_id: String,
    token: Option<String>,
    upload_timeout: Duration,
}

impl ApiClient {
    /// Build a client from the API configuration.
    pub fn new(config: &ApiConfig, device_id: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            device_id: device_id.into(),
            token: None,
            upload_timeout: config.upload_timeout(),
        })
    }

    /// Attach a bearer token.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Replace the bearer token.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/api/folders/listar`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, self.url(path))
            .header(DEVICE_ID_HEADER, &self.device_id);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// GET and decode JSON.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> Result<T> {
        let response = send(self.request(Method::GET, path), fallback).await?;
        decode(response).await
    }

    /// GET with query parameters and decode JSON.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        fallback: &str,
    ) -> Result<T> {
        let response = send(self.request(Method::GET, path).query(query), fallback).await?;
        decode(response).await
    }

    /// GET the raw response body.
    pub async fn get_bytes(&self, path: &str, fallback: &str) -> Result<Vec<u8>> {
        let response = send(self.request(Method::GET, path), fallback).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// POST a JSON body and decode JSON.
    pub async fn post<B, T>(&self, path: &str, body: &B, fallback: &str) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = send(self.request(Method::POST, path).json(body), fallback).await?;
        decode(response).await
    }

    /// POST without a body and decode JSON.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> Result<T> {
        let response = send(self.request(Method::POST, path), fallback).await?;
        decode(response).await
    }

    /// POST a multipart form using the upload timeout.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
        fallback: &str,
    ) -> Result<T> {
        let builder = self
            .request(Method::POST, path)
            .timeout(self.upload_timeout)
            .multipart(form);
        let response = send(builder, fallback).await?;
        decode(response).await
    }

    /// PUT a JSON body and decode JSON.
    pub async fn put<B, T>(&self, path: &str, body: &B, fallback: &str) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = send(self.request(Method::PUT, path).json(body), fallback).await?;
        decode(response).await
    }

    /// DELETE and decode JSON.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> Result<T> {
        let response = send(self.request(Method::DELETE, path), fallback).await?;
        decode(response).await
    }
}

/// Encode one path segment (ids come from the backend but are not trusted).
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

async fn send(builder: RequestBuilder, fallback: &str) -> Result<Response> {
    let response = builder.send().await?;
    let status = response.status();
    debug!(status = status.as_u16(), url = %response.url(), "Response received");

    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        warn!("Backend rejected the session token");
        return Err(DocdeskError::Unauthorized);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| fallback.to_string());
    Err(DocdeskError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    if body.trim().is_empty() {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_str(&body)?)
}

/// Pull the backend's error message out of an error body.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["mensaje", "message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Extract a list from a response that is either a bare array or an object
/// wrapping the array under one of `keys`. Anything else yields an empty list.
pub(crate) fn extract_list<T: DeserializeOwned>(value: Value, keys: &[&str]) -> Result<Vec<T>> {
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(mut map) => {
            for key in keys {
                if let Some(inner @ Value::Array(_)) = map.remove(*key) {
                    return Ok(serde_json::from_value(inner)?);
                }
            }
            Ok(Vec::new())
        }
        _ => Ok(Vec::new()),
    }
}

/// Extract one entity from a response that is either the entity itself or an
/// object wrapping it under `key`.
pub(crate) fn extract_entity<T: DeserializeOwned>(value: Value, key: &str) -> Result<T> {
    match value {
        Value::Object(mut map) if map.get(key).is_some_and(Value::is_object) => {
            let inner = map.remove(key).unwrap_or(Value::Null);
            Ok(serde_json::from_value(inner)?)
        }
        other => Ok(serde_json::from_value(other)?),
    }
}
