//! api
//!
//! HTTP client for the Nginx Proxy Manager REST API.
//!
//! # Pipeline
//!
//! Every call goes through [`ApiClient::request`], a single attempt with
//! no retries:
//!
//! 1. Build headers. A call that needs auth fails with
//!    [`NpmError::MissingToken`] before any network I/O if no token is set.
//! 2. Log method, URL and the redacted request body.
//! 3. Send with a 180 second timeout. Transport failures become
//!    [`NpmError::Transport`].
//! 4. Parse the body as JSON, falling back to the raw text.
//! 5. Log status, `x-request-id` and the redacted response body.
//! 6. Status >= 400 becomes [`NpmError::Api`]; anything else returns the body.
//!
//! # Example
//!
//! ```ignore
//! use npmctl::api::{ApiClient, ProxyHost};
//!
//! let client = ApiClient::new("http://npm.local:81/api", Some(token), log)?;
//! let host = client
//!     .create_proxy_host(&ProxyHost::new(vec!["app.example.com".into()], "10.0.0.5", 8080))
//!     .await?;
//! ```

mod failure;
mod models;
mod payloads;

pub use failure::{error_message, ApiFailure, FailureDetail, DEBUG_HINT};
pub use models::{CreatedResource, TokenGrant};
pub use payloads::{
    token_request, CloudflareCertificate, ForwardScheme, KeyType, ProxyHost,
    DEFAULT_PROPAGATION_SECONDS,
};

use std::fmt;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use crate::credentials::ResolvedCredentials;
use crate::debug::{preview, DebugLog, DEFAULT_PREVIEW_LIMIT};
use crate::error::{NpmError, Result};
use crate::redact::redact;

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Response header carrying the server's correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Client bound to one base URL and optional token.
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
    log: DebugLog,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_token", &self.token.is_some())
            .field("debug", &self.log.is_enabled())
            .finish()
    }
}

impl ApiClient {
    /// Create a client. Trailing slashes are stripped from `base_url`.
    pub fn new(base_url: impl Into<String>, token: Option<String>, log: DebugLog) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(NpmError::HttpClient)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
            log,
        })
    }

    /// Create a client from resolved credentials.
    pub fn from_credentials(credentials: ResolvedCredentials, log: DebugLog) -> Result<Self> {
        Self::new(credentials.base_url, credentials.token, log)
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange credentials for a token. Needs no existing token.
    pub async fn request_token(&self, identity: &str, secret: &str, scope: &str) -> Result<Value> {
        let body = token_request(identity, secret, scope);
        self.request(Method::POST, "/tokens", Some(&body), false).await
    }

    /// Issue a certificate through a Cloudflare DNS challenge.
    pub async fn create_cloudflare_certificate(
        &self,
        certificate: &CloudflareCertificate,
    ) -> Result<Value> {
        let body = certificate.to_payload();
        self.request(Method::POST, "/nginx/certificates", Some(&body), true)
            .await
    }

    /// Create a proxy host.
    pub async fn create_proxy_host(&self, host: &ProxyHost) -> Result<Value> {
        let body = host.to_payload();
        self.request(Method::POST, "/nginx/proxy-hosts", Some(&body), true)
            .await
    }

    /// Perform one API call.
    ///
    /// # Errors
    ///
    /// - [`NpmError::MissingToken`] if `auth_required` and no token is set
    /// - [`NpmError::Transport`] if no response was received
    /// - [`NpmError::Api`] for status >= 400
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        auth_required: bool,
    ) -> Result<Value> {
        if auth_required && self.token.is_none() {
            return Err(NpmError::MissingToken);
        }

        let url = format!("{}{}", self.base_url, path);
        self.log_request(&method, &url, body);

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let transport = |source| NpmError::Transport {
            method: method.to_string(),
            url: url.clone(),
            source,
        };

        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        let text = response.text().await.map_err(transport)?;
        let payload = parse_payload(text);

        self.log_response(status, request_id.as_deref(), &payload);

        if status.as_u16() >= 400 {
            return Err(ApiFailure::from_response(
                status.as_u16(),
                method.as_str(),
                path,
                &payload,
                request_id,
                body,
                self.log.is_enabled(),
            )
            .into());
        }
        Ok(payload)
    }

    fn log_request(&self, method: &Method, url: &str, body: Option<&Value>) {
        if !self.log.is_enabled() {
            return;
        }
        self.log.log(format!("Request: {} {}", method, url));
        if let Some(body) = body {
            let body = preview(&redact(body, "json_body"), DEFAULT_PREVIEW_LIMIT);
            self.log.log(format!("Request payload:\n{}", body));
        }
    }

    fn log_response(&self, status: StatusCode, request_id: Option<&str>, payload: &Value) {
        if !self.log.is_enabled() {
            return;
        }
        self.log.log(format!("Response status: {}", status.as_u16()));
        if let Some(id) = request_id {
            self.log.log(format!("Response request id: {}", id));
        }
        let body = preview(&redact(payload, "payload"), DEFAULT_PREVIEW_LIMIT);
        self.log.log(format!("Response payload:\n{}", body));
    }
}

/// Decode a response body, keeping non-JSON text verbatim.
fn parse_payload(text: String) -> Value {
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}
