//! HTTP transport for GraphQL operations.

use std::time::Duration;

use futures_util::future::BoxFuture;
use reqwest::header::HeaderMap;
use tracing::debug;

use crate::error::GqlClientError;

/// Default request timeout applied by the transport.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Credential forwarding mode for cross-origin requests.
///
/// Carried configuration for transports that distinguish browser credential
/// modes; the native HTTP transport records it without further interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialsMode {
    /// Send credentials for same-origin requests only.
    #[default]
    SameOrigin,
    /// Always send credentials.
    Include,
    /// Never send credentials.
    Omit,
}

/// Transport configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Target endpoint URL.
    pub endpoint: String,
    /// Credential forwarding mode.
    pub credentials: CredentialsMode,
    /// Whether the endpoint accepts binary upload payloads.
    ///
    /// Upload encoding itself is an external collaborator's concern; the flag
    /// is carried so chain builders can mark upload-capable endpoints.
    pub supports_upload: bool,
    /// Request timeout.
    pub timeout: Duration,
}

impl TransportConfig {
    /// Create a configuration for `endpoint` with defaults.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            credentials: CredentialsMode::default(),
            supports_upload: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the credential forwarding mode.
    ///
    /// `HttpTransport` records the mode without acting on it; the distinction
    /// only takes effect in transports that run under a browser cookie policy.
    #[must_use]
    pub const fn with_credentials(mut self, credentials: CredentialsMode) -> Self {
        self.credentials = credentials;
        self
    }

    /// Mark the endpoint as upload-capable.
    #[must_use]
    pub const fn with_upload(mut self, enabled: bool) -> Self {
        self.supports_upload = enabled;
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Outgoing request as seen by chain stages.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Headers accumulated by upstream stages.
    pub headers: HeaderMap,
    /// JSON request body.
    pub body: serde_json::Value,
}

impl TransportRequest {
    /// Create a request with an empty header set.
    #[must_use]
    pub fn new(body: serde_json::Value) -> Self {
        Self {
            headers: HeaderMap::new(),
            body,
        }
    }
}

/// Future returned by transports and chain stages.
pub type TransportFuture<'a> = BoxFuture<'a, Result<Vec<u8>, GqlClientError>>;

/// Request-execution seam consumed by the chain.
///
/// Dropping the returned future aborts the in-flight request.
pub trait Transport: Send + Sync {
    /// Send a request and return the raw response body.
    fn send(&self, request: TransportRequest) -> TransportFuture<'_>;
}

/// reqwest-backed transport posting JSON bodies to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    config: TransportConfig,
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport.
    ///
    /// Never fails: if the configured client cannot be built, a default
    /// reqwest client is used and failures surface when requests execute.
    #[must_use]
    pub fn new(config: TransportConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { config, http }
    }

    /// Target endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Transport configuration.
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: TransportRequest) -> TransportFuture<'_> {
        Box::pin(async move {
            debug!(endpoint = %self.config.endpoint, "dispatching GraphQL request");
            let response = self
                .http
                .post(&self.config.endpoint)
                .headers(request.headers)
                .json(&request.body)
                .send()
                .await?;

            let status = response.status();
            let bytes = response.bytes().await?;

            if !status.is_success() {
                return Err(GqlClientError::HttpStatus {
                    status,
                    body: truncate_body(&bytes),
                });
            }

            Ok(bytes.to_vec())
        })
    }
}

fn truncate_body(bytes: &[u8]) -> String {
    const MAX_LEN: usize = 4096;
    let mut body = String::from_utf8_lossy(bytes).to_string();
    if body.len() > MAX_LEN {
        // Back off to a char boundary so multi-byte characters straddling
        // the limit cannot panic the truncation.
        let mut cut = MAX_LEN;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = TransportConfig::new("https://a/api/pub");
        assert_eq!(config.endpoint, "https://a/api/pub");
        assert_eq!(config.credentials, CredentialsMode::SameOrigin);
        assert!(!config.supports_upload);
    }

    #[test]
    fn upload_flag_is_carried() {
        let config = TransportConfig::new("https://a/api/webApp").with_upload(true);
        let transport = HttpTransport::new(config);
        assert!(transport.config().supports_upload);
        assert_eq!(transport.endpoint(), "https://a/api/webApp");
    }

    #[test]
    fn truncate_body_caps_length() {
        let long = vec![b'x'; 10_000];
        let body = truncate_body(&long);
        assert!(body.len() <= 4096 + '…'.len_utf8());
        assert!(body.ends_with('…'));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        // A multi-byte character straddling the truncation limit must not
        // panic; the cut backs off to the preceding boundary.
        let mut long = vec![b'x'; 4095];
        long.extend_from_slice("€".as_bytes());
        let body = truncate_body(&long);
        assert!(body.ends_with('…'));
        assert_eq!(&body[..4095], "x".repeat(4095));
    }
}
