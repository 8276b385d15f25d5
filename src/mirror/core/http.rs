use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::types::MirrorError;

/// A single request against the drive server API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub json: bool,
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            json: false,
            timeout: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Ask for JSON replies. The server picks JSON or plain text based on
    /// the request's content type.
    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Append the fields of a flat query struct, in declaration order.
    pub fn query<Q: Serialize>(mut self, query: &Q) -> Self {
        if let Ok(Value::Object(map)) = serde_json::to_value(query) {
            for (key, value) in map {
                let value = match value {
                    Value::Null => continue,
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                self.query.push((key, value));
            }
        }
        self
    }

    /// Path plus query string, e.g. `/drive/2/unload?force=true`.
    pub fn uri(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let pairs: Vec<String> = self
            .query
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        format!("{}?{}", self.path, pairs.join("&"))
    }
}

/// Status and raw body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, MirrorError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Turn a non-2xx reply into [`MirrorError::Server`] carrying the server's message.
    pub fn into_success(self, path: &str) -> Result<Self, MirrorError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(self.error(path))
        }
    }

    pub fn error(&self, path: &str) -> MirrorError {
        let message = self.text().trim().to_string();
        MirrorError::Server {
            path: path.to_string(),
            status: self.status,
            message: if message.is_empty() {
                "API call failed, no further details".to_string()
            } else {
                message
            },
        }
    }
}

/// Carries requests to the drive server. Non-2xx replies are returned as
/// responses, only transport failures are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, MirrorError>;
}

/// [`Transport`] over HTTP.
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: String,
}

impl HttpTransport {
    /// No client-wide timeout is set since `/watch` blocks until the server
    /// has something to report.
    pub fn new(base_url: impl Into<String>) -> Result<Self, MirrorError> {
        let http = Client::builder().build().map_err(MirrorError::Http)?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, MirrorError> {
        Self::new(config.base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, MirrorError> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            request.path.trim_start_matches('/')
        );

        let mut builder = self.http.request(request.method, url).query(&request.query);
        builder = if request.json {
            builder
                .header("Content-Type", "application/json")
                .header("Accept", "application/json")
        } else {
            builder.header("Accept", "text/plain")
        };
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(MirrorError::Http)?;
        let status = response.status();
        let body = response.bytes().await.map_err(MirrorError::Http)?;

        Ok(ApiResponse::new(status, body.to_vec()))
    }
}
