//! HTTP seam shared by the REST-backed providers.
//!
//! Providers describe calls as [`ApiRequest`]s relative to their base API
//! URL; the transport owns the HTTP client, the authentication header, and
//! the request timeout. Tests substitute a scripted transport so request
//! shaping stays observable without a network.

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use url::Url;

/// HTTP verbs used by the hosting backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    Get,
    Post,
    Patch,
    Delete,
}

/// One REST call, relative to the provider's base API URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: ApiMethod,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: ApiMethod::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: ApiMethod::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    /// POST with no payload (GitLab archive/unarchive endpoints).
    pub fn post_empty(path: impl Into<String>) -> Self {
        Self {
            method: ApiMethod::Post,
            path: path.into(),
            body: None,
        }
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: ApiMethod::Patch,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: ApiMethod::Delete,
            path: path.into(),
            body: None,
        }
    }
}

/// Raw response: status code plus unparsed body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Best-effort human message from a REST error body.
    ///
    /// GitHub and Gitea use `{"message": ...}`; GitLab uses `"message"` or
    /// `"error"`. Falls back to the raw body, then to the bare status code.
    pub fn error_text(&self) -> String {
        if let Ok(value) = serde_json::from_str::<Value>(&self.body) {
            for key in ["message", "error"] {
                match value.get(key) {
                    Some(Value::String(text)) if !text.is_empty() => return text.clone(),
                    Some(Value::Null) | None => {}
                    Some(other) => return other.to_string(),
                }
            }
        }
        let trimmed = self.body.trim();
        if trimmed.is_empty() {
            format!("HTTP {}", self.status)
        } else {
            trimmed.to_string()
        }
    }
}

/// How the PAT is presented to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStyle {
    /// `Authorization: token <pat>` (GitHub, Gitea).
    TokenHeader,
    /// `PRIVATE-TOKEN: <pat>` (GitLab).
    PrivateToken,
}

/// Executes one REST call. Implementations must be shareable across
/// concurrent operations.
pub trait HttpTransport: Send + Sync {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// Transport backed by a blocking reqwest client.
pub struct RestTransport {
    base_url: Url,
    client: reqwest::blocking::Client,
    auth: Option<(AuthStyle, String)>,
}

impl RestTransport {
    /// `base_url` must end with `/`: relative paths resolve against it, and
    /// a missing trailing slash would silently swallow the last path
    /// segment of every request.
    pub fn new(base_url: Url, auth: Option<(AuthStyle, String)>) -> Result<Self> {
        anyhow::ensure!(
            base_url.as_str().ends_with('/'),
            "Base API URL '{}' must end with '/'",
            base_url
        );
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("ckli-hosting/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            base_url,
            client,
            auth,
        })
    }
}

impl HttpTransport for RestTransport {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self
            .base_url
            .join(&request.path)
            .with_context(|| format!("Invalid API path: {}", request.path))?;

        let mut builder = match request.method {
            ApiMethod::Get => self.client.get(url),
            ApiMethod::Post => self.client.post(url),
            ApiMethod::Patch => self.client.patch(url),
            ApiMethod::Delete => self.client.delete(url),
        };

        if let Some((style, token)) = &self.auth {
            builder = match style {
                AuthStyle::TokenHeader => {
                    builder.header("Authorization", format!("token {}", token))
                }
                AuthStyle::PrivateToken => builder.header("PRIVATE-TOKEN", token.as_str()),
            };
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().context("HTTP request failed")?;
        let status = response.status().as_u16();
        let body = response.text().context("Failed to read response body")?;
        Ok(ApiResponse { status, body })
    }
}
