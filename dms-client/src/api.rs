//! REST seam between flows and the server
//!
//! Flows only see [`Api`]: a request goes in, a `{status, data}` response or
//! an [`ApiError`] comes out. [`HttpApi`] is the reqwest implementation; tests
//! substitute a scripted one.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::token::TokenStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One call against the server; `path` is relative to the base URL
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }

    pub fn post<B: Serialize + ?Sized>(path: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        Self::with_body(Method::Post, path, body)
    }

    pub fn put<B: Serialize + ?Sized>(path: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        Self::with_body(Method::Put, path, body)
    }

    fn with_body<B: Serialize + ?Sized>(
        method: Method,
        path: impl Into<String>,
        body: &B,
    ) -> Result<Self, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        Ok(Self {
            method,
            path: path.into(),
            body: Some(body),
        })
    }
}

/// A response the server resolved with
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub data: Value,
}

impl ApiResponse {
    pub fn new(status: u16, data: Value) -> Self {
        Self { status, data }
    }

    /// A `200` response
    pub fn ok(data: Value) -> Self {
        Self::new(200, data)
    }

    /// Flows only treat exactly `200` as success
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// The server's `msg` field, falling back to a generic description
    pub fn message(&self) -> String {
        match self.data.get("msg").and_then(Value::as_str) {
            Some(msg) => msg.to_string(),
            None => format!("Request failed with status {}", self.status),
        }
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        T::deserialize(&self.data).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// The REST client flows talk to
#[async_trait]
pub trait Api: Send + Sync {
    /// Resolve `request` to a 2xx response, or fail.
    ///
    /// Non-2xx answers are `Err(ApiError::Status(..))` carrying the response.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// reqwest-backed [`Api`]
///
/// Every request carries the stored token (if any) in both the
/// `Authorization` and `x-access-token` headers.
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, tokens)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn token(&self) -> Option<String> {
        match self.tokens.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored token, sending request without it");
                None
            }
        }
    }
}

#[async_trait]
impl Api for HttpApi {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.url(&request.path);
        tracing::debug!(method = %request.method, %url, "API request");

        let mut builder = self.client.request(request.method.into(), &url);
        if let Some(token) = self.token() {
            builder = builder
                .header(reqwest::header::AUTHORIZATION, token.as_str())
                .header("x-access-token", token.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        // Error pages are not always JSON; keep them as text
        let data = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        let response = ApiResponse::new(status.as_u16(), data);

        tracing::debug!(method = %request.method, %url, status = response.status, "API response");
        if status.is_success() {
            Ok(response)
        } else {
            Err(ApiError::Status(response))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_prefers_server_msg() {
        let response = ApiResponse::new(201, json!({ "msg": "Email already exists" }));
        assert_eq!(response.message(), "Email already exists");

        let response = ApiResponse::new(202, json!({}));
        assert_eq!(response.message(), "Request failed with status 202");
    }

    #[test]
    fn test_success_is_exactly_200() {
        assert!(ApiResponse::ok(Value::Null).is_success());
        assert!(!ApiResponse::new(201, Value::Null).is_success());
    }

    #[test]
    fn test_post_serializes_body() {
        let request = ApiRequest::post("/roles", &json!({ "title": "editor" })).unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.body, Some(json!({ "title": "editor" })));
    }

    #[test]
    fn test_decode_reports_shape_errors() {
        let response = ApiResponse::ok(json!({ "id": "nope" }));
        let result: Result<crate::model::Role, _> = response.decode();
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }
}
