//! Client handles bound to a composed request chain.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::classify::ErrorClassifier;
use crate::config::GatewayConfig;
use crate::error::GqlClientError;
use crate::link::{AuthLink, Chain, ErrorLink, Link};
use crate::operation::{GraphqlResponse, Operation};
use crate::transport::{HttpTransport, TransportConfig, TransportRequest};

/// Per-client request counters.
#[derive(Debug, Default)]
pub struct ClientMetrics {
    requests_total: AtomicU64,
    requests_success: AtomicU64,
    requests_error: AtomicU64,
}

impl ClientMetrics {
    /// Snapshot current metrics.
    #[must_use]
    pub fn snapshot(&self) -> ClientMetricsSnapshot {
        ClientMetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_success: self.requests_success.load(Ordering::Relaxed),
            requests_error: self.requests_error.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientMetricsSnapshot {
    /// Total requests.
    pub requests_total: u64,
    /// Requests whose envelope carried no GraphQL errors.
    pub requests_success: u64,
    /// Failed requests (transport or GraphQL-level).
    pub requests_error: u64,
}

struct ClientInner {
    chain: Chain,
    endpoint: String,
    metrics: ClientMetrics,
}

/// Handle over a built request chain.
///
/// Cheap to clone: clones share the same chain. `same_instance` compares
/// handle identity, which is what pinning relies on.
#[derive(Clone)]
pub struct GqlClient {
    inner: Arc<ClientInner>,
}

impl fmt::Debug for GqlClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GqlClient")
            .field("endpoint", &self.inner.endpoint)
            .field("chain", &self.inner.chain)
            .finish()
    }
}

impl GqlClient {
    /// Build an unauthenticated client against the public endpoint.
    ///
    /// The chain is `[error interception] -> transport`; no auth stage, so the
    /// `Authorization` header is never attached regardless of token state.
    #[must_use]
    pub fn public(config: &GatewayConfig, classifier: ErrorClassifier) -> Self {
        let endpoint = config.public_endpoint();
        let transport = HttpTransport::new(TransportConfig::new(endpoint.clone()));
        let links: Vec<Arc<dyn Link>> = vec![Arc::new(ErrorLink::new(classifier))];
        Self::from_chain(Chain::new(links, Arc::new(transport)), endpoint)
    }

    /// Build an authenticated client for `scope`.
    ///
    /// The chain is `[error interception, auth injection] -> transport`, with
    /// the transport marked upload-capable.
    #[must_use]
    pub fn private(config: &GatewayConfig, classifier: ErrorClassifier, scope: &str) -> Self {
        let endpoint = config.private_endpoint(scope);
        let transport = HttpTransport::new(TransportConfig::new(endpoint.clone()).with_upload(true));
        let links: Vec<Arc<dyn Link>> = vec![
            Arc::new(ErrorLink::new(classifier)),
            Arc::new(AuthLink::new(config.clone())),
        ];
        Self::from_chain(Chain::new(links, Arc::new(transport)), endpoint)
    }

    /// Build a client over an arbitrary chain.
    #[must_use]
    pub fn from_chain(chain: Chain, endpoint: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                chain,
                endpoint: endpoint.into(),
                metrics: ClientMetrics::default(),
            }),
        }
    }

    /// Target endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Return a metrics snapshot.
    #[must_use]
    pub fn metrics(&self) -> ClientMetricsSnapshot {
        self.inner.metrics.snapshot()
    }

    /// Returns `true` if both handles refer to the same built chain.
    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Execute an operation and return the full response envelope.
    ///
    /// GraphQL-level errors are delivered untouched inside the envelope;
    /// transport failures are re-raised after classification.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        operation: &Operation,
    ) -> Result<GraphqlResponse<T>, GqlClientError> {
        let metrics = &self.inner.metrics;
        metrics.requests_total.fetch_add(1, Ordering::Relaxed);

        let request = TransportRequest::new(operation.to_body());
        let bytes = match self.inner.chain.execute(request).await {
            Ok(bytes) => bytes,
            Err(err) => {
                metrics.requests_error.fetch_add(1, Ordering::Relaxed);
                return Err(err);
            }
        };

        let response: GraphqlResponse<T> = match serde_json::from_slice(&bytes) {
            Ok(response) => response,
            Err(err) => {
                metrics.requests_error.fetch_add(1, Ordering::Relaxed);
                return Err(err.into());
            }
        };

        if response.errors.is_empty() {
            metrics.requests_success.fetch_add(1, Ordering::Relaxed);
        } else {
            metrics.requests_error.fetch_add(1, Ordering::Relaxed);
        }

        Ok(response)
    }

    /// Execute an operation and return data only (error on GraphQL errors).
    pub async fn execute_strict<T: DeserializeOwned>(
        &self,
        operation: &Operation,
    ) -> Result<T, GqlClientError> {
        let response = self.execute::<T>(operation).await?;
        if !response.errors.is_empty() {
            return Err(GqlClientError::GraphqlErrors {
                errors: response.errors,
            });
        }
        response.data.ok_or_else(|| GqlClientError::Protocol {
            message: "missing GraphQL data".to_string(),
        })
    }
}
