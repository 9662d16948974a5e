//! HTTP transport seam for token requests
//!
//! The token executor only needs one capability: POST a form with an optional
//! `Authorization` header and get back a status code and the raw body. The
//! `Transport` trait captures exactly that so the executor can be driven by
//! reqwest in production and by a scripted transport in tests.
//!
//! Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility
//! (`Arc<dyn Transport>`).

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use common::Secret;
use reqwest::header::AUTHORIZATION;

/// A form-encoded POST to the token endpoint.
#[derive(Clone)]
pub struct FormRequest {
    pub url: String,
    /// Full `Authorization` header value, if the request carries one
    pub authorization: Option<Secret<String>>,
    /// Form fields in the order they are sent
    pub form: Vec<(&'static str, String)>,
}

impl FormRequest {
    /// Value of a form field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

// Form values carry codes, verifiers and refresh tokens; only names are shown.
impl fmt::Debug for FormRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.form.iter().map(|(key, _)| *key).collect();
        f.debug_struct("FormRequest")
            .field("url", &self.url)
            .field("authorization", &self.authorization)
            .field("fields", &fields)
            .finish()
    }
}

/// Status and raw body of a delivered response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    /// Empty when the server sent no payload
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The request never produced a complete response: connect failure, timeout,
/// or a broken body stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Sends token requests.
pub trait Transport: Send + Sync {
    /// POST `request.form` as `application/x-www-form-urlencoded`.
    fn post_form<'a>(
        &'a self,
        request: &'a FormRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + Send + 'a>>;
}

/// Production transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wrap an existing client (connection pool, proxy settings, timeouts).
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a client whose requests time out after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::new(format!("building HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        request: &'a FormRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + Send + 'a>> {
        Box::pin(async move {
            let mut builder = self.client.post(&request.url).form(&request.form);
            if let Some(authorization) = &request.authorization {
                builder = builder.header(AUTHORIZATION, authorization.expose().as_str());
            }

            let response = builder
                .send()
                .await
                .map_err(|e| TransportError::new(format!("token request failed: {e}")))?;

            let status = response.status().as_u16();
            let body = response
                .bytes()
                .await
                .map_err(|e| TransportError::new(format!("reading token response body: {e}")))?;

            Ok(TransportResponse {
                status,
                body: body.to_vec(),
            })
        })
    }
}
