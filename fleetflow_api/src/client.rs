//! HTTP client for the FleetFlow back-office REST API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::session::{LogNavigator, MemoryTokenStore, Navigator, TokenStore, LOGIN_ROUTE};
use crate::Error;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

enum Payload {
    Empty,
    Json(Vec<u8>),
    Form(Form),
}

/// HTTP client for the FleetFlow REST API.
///
/// Every request carries `Accept: application/json` and, when the token
/// store holds one, `Authorization: Bearer <token>`. Responses are returned
/// as raw JSON; deciding which envelope the server used is left to
/// [`crate::normalize`].
pub struct Client {
    /// Origin plus API prefix, without a trailing slash.
    base_api_url: String,
    http: reqwest::Client,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl Client {
    /// Creates a client for `base_url` with the default timeout, an
    /// in-memory token store and a logging navigator.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client for `base_url` with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let trimmed = base_url.trim_end_matches('/');
        Url::parse(trimmed).map_err(|e| {
            tracing::error!("Invalid base URL {}: {}", base_url, e);
            Error::InvalidUrl(format!("{}: {}", base_url, e))
        })?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Transport(e.to_string())
            })?;
        Ok(Self {
            base_api_url: trimmed.to_string(),
            http,
            tokens: Arc::new(MemoryTokenStore::new()),
            navigator: Arc::new(LogNavigator),
        })
    }

    /// Replaces the token store. The store is shared, not copied.
    pub fn with_token_store(mut self, tokens: Arc<dyn TokenStore>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Replaces the navigator that receives the login redirect on session expiry.
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Turns a link the server handed out into something [`Client::get`]
    /// accepts.
    ///
    /// Relative references pass through untouched. Absolute URLs under this
    /// client's base URL lose the base; any other absolute URL keeps only its
    /// path and query. Either way the base URL is never doubled up.
    pub fn relative_reference(&self, url: &str) -> String {
        if let Some(rest) = url.strip_prefix(&self.base_api_url) {
            if rest.is_empty() || rest.starts_with('/') || rest.starts_with('?') {
                return rest.to_string();
            }
        }
        match Url::parse(url) {
            Ok(parsed) if parsed.has_host() => {
                let mut relative = parsed.path().to_string();
                if let Some(query) = parsed.query() {
                    relative.push('?');
                    relative.push_str(query);
                }
                relative
            }
            Ok(_) => url.to_string(),
            // Not absolute: a path such as `/customers?page=2`.
            Err(url::ParseError::RelativeUrlWithoutBase) => url.to_string(),
            Err(e) => {
                tracing::error!("Invalid pagination URL {}: {}", url, e);
                url.to_string()
            }
        }
    }

    fn url(&self, path: &str) -> Result<Url, Error> {
        Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed for {}: {}", path, e);
            Error::InvalidUrl(format!("{}: {}", path, e))
        })
    }

    /// Sends a GET request and returns the parsed body.
    pub async fn get(&self, path: &str) -> Result<Value, Error> {
        self.request(Method::GET, path, Payload::Empty).await
    }

    /// Sends a POST request with a JSON body.
    pub async fn post<B>(&self, path: &str, body: &B) -> Result<Value, Error>
    where
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Payload::Json(encode(body)?))
            .await
    }

    /// Sends a PUT request with a JSON body.
    pub async fn put<B>(&self, path: &str, body: &B) -> Result<Value, Error>
    where
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Payload::Json(encode(body)?))
            .await
    }

    /// Sends a DELETE request.
    pub async fn del(&self, path: &str) -> Result<Value, Error> {
        self.request(Method::DELETE, path, Payload::Empty).await
    }

    /// Sends a multipart POST. The transport picks the content type so the
    /// boundary parameter is set correctly.
    pub async fn post_form(&self, path: &str, form: Form) -> Result<Value, Error> {
        self.request(Method::POST, path, Payload::Form(form)).await
    }

    async fn request(&self, method: Method, path: &str, payload: Payload) -> Result<Value, Error> {
        let url = self.url(path)?;
        let mut request = self
            .http
            .request(method.clone(), url)
            .header(ACCEPT, "application/json");
        request = match payload {
            Payload::Form(form) => request.multipart(form),
            Payload::Json(body) => request.header(CONTENT_TYPE, "application/json").body(body),
            Payload::Empty => request.header(CONTENT_TYPE, "application/json"),
        };
        if let Some(token) = self.tokens.load() {
            request = request.bearer_auth(token);
        }

        tracing::debug!("{} {}", method, path);
        let resp = request.send().await.map_err(|e| {
            tracing::error!("{} {} failed: {}", method, path, e);
            Error::Transport(e.to_string())
        })?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            self.expire_session();
            return Err(Error::SessionExpired);
        }

        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::Transport(e.to_string())
        })?;

        if body.is_empty() {
            if !status.is_success() {
                tracing::warn!("{} {} returned {} with an empty body", method, path, status);
                return Err(Error::HttpStatus {
                    status: status.as_u16(),
                    message: status_message(status),
                });
            }
            return Ok(Value::Object(Map::new()));
        }

        let parsed: Value = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                "Failed to parse response: {} | body: {}",
                e,
                truncate_body(&body)
            );
            Error::Protocol(format!("{} (status {})", e, status.as_u16()))
        })?;

        if !status.is_success() {
            let message = parsed
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| status_message(status));
            tracing::warn!("{} {} returned {}: {}", method, path, status, message);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        Ok(parsed)
    }

    /// Token eviction and redirect run before the caller sees the error.
    fn expire_session(&self) {
        if let Err(e) = self.tokens.clear() {
            tracing::error!("Failed to clear session token: {}", e);
        }
        self.navigator.navigate(LOGIN_ROUTE);
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Vec<u8>, Error> {
    serde_json::to_vec(body).map_err(|e| {
        tracing::error!("Failed to encode request body: {}", e);
        Error::Protocol(format!("failed to encode request body: {}", e))
    })
}

fn status_message(status: StatusCode) -> String {
    format!("HTTP error! status: {}", status.as_u16())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> Client {
        Client::with_base_url(base).unwrap()
    }

    #[test]
    fn relative_reference_passes_paths_through() {
        let c = client("https://api.example.com");
        assert_eq!(c.relative_reference("/customers?page=2"), "/customers?page=2");
        assert_eq!(c.relative_reference("/customers"), "/customers");
    }

    #[test]
    fn relative_reference_strips_foreign_origin() {
        let c = client("https://api.example.com");
        assert_eq!(
            c.relative_reference("https://api.example.com/customers?page=3"),
            "/customers?page=3"
        );
        assert_eq!(
            c.relative_reference("http://other.example.com/drivers"),
            "/drivers"
        );
    }

    #[test]
    fn relative_reference_strips_base_with_prefix() {
        let c = client("http://localhost:8000/api/");
        assert_eq!(c.base_url(), "http://localhost:8000/api");
        assert_eq!(
            c.relative_reference("http://localhost:8000/api/customers?page=2"),
            "/customers?page=2"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            Client::with_base_url("not a url"),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn truncate_long_body() {
        let body = "x".repeat(2500);
        let out = truncate_body(&body);
        assert!(out.ends_with("...[truncated]"));
        assert_eq!(out.len(), 2000 + "...[truncated]".len());
    }
}
