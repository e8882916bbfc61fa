//! Request chain composition.
//!
//! A chain is a fixed, ordered list of stages terminating at a transport.
//! Each stage has the uniform signature `(request, next) -> response`; one
//! stage is active on a given request at a time, and dropping the returned
//! future tears the pipeline down without invoking further stages.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use tracing::debug;

use crate::classify::ErrorClassifier;
use crate::config::GatewayConfig;
use crate::error::GqlClientError;
use crate::transport::{Transport, TransportFuture, TransportRequest};

/// A single processing stage in the request chain.
pub trait Link: Send + Sync {
    /// Process `request`, forwarding to the remaining stages via `next`.
    fn handle<'a>(&'a self, request: TransportRequest, next: Next<'a>) -> TransportFuture<'a>;
}

/// Remainder of the chain after the current stage.
pub struct Next<'a> {
    links: &'a [Arc<dyn Link>],
    transport: &'a dyn Transport,
}

impl<'a> Next<'a> {
    /// Forward the request down the chain, terminating at the transport.
    pub fn run(self, request: TransportRequest) -> TransportFuture<'a> {
        match self.links.split_first() {
            Some((head, rest)) => head.handle(
                request,
                Next {
                    links: rest,
                    transport: self.transport,
                },
            ),
            None => self.transport.send(request),
        }
    }
}

/// Ordered composition of stages in front of a transport.
pub struct Chain {
    links: Vec<Arc<dyn Link>>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("stages", &self.links.len())
            .finish()
    }
}

impl Chain {
    /// Create a chain from ordered stages and a terminal transport.
    #[must_use]
    pub fn new(links: Vec<Arc<dyn Link>>, transport: Arc<dyn Transport>) -> Self {
        Self { links, transport }
    }

    /// Run a request through every stage and the transport.
    pub async fn execute(&self, request: TransportRequest) -> Result<Vec<u8>, GqlClientError> {
        Next {
            links: &self.links,
            transport: self.transport.as_ref(),
        }
        .run(request)
        .await
    }
}

/// Outermost stage: observes failures from every downstream stage.
///
/// Failures are handed to the classifier for out-of-band notification and
/// re-raised unchanged.
pub struct ErrorLink {
    classifier: ErrorClassifier,
}

impl ErrorLink {
    /// Create the error-interception stage.
    #[must_use]
    pub const fn new(classifier: ErrorClassifier) -> Self {
        Self { classifier }
    }
}

impl Link for ErrorLink {
    fn handle<'a>(&'a self, request: TransportRequest, next: Next<'a>) -> TransportFuture<'a> {
        Box::pin(async move {
            let result = next.run(request).await;
            if let Err(error) = &result {
                self.classifier.classify(error);
            }
            result
        })
    }
}

/// Sets the `Authorization` header before the transport consumes the request.
///
/// The header is always present: `Bearer <token>` when a token is set, the
/// empty string otherwise (clearing any prior value rather than omitting the
/// key). The token is read at handling time, so a rotation applies to requests
/// that have not yet entered this stage. This stage never fails.
pub struct AuthLink {
    config: GatewayConfig,
}

impl AuthLink {
    /// Create the auth-injection stage reading from `config`.
    #[must_use]
    pub const fn new(config: GatewayConfig) -> Self {
        Self { config }
    }
}

impl Link for AuthLink {
    fn handle<'a>(&'a self, mut request: TransportRequest, next: Next<'a>) -> TransportFuture<'a> {
        Box::pin(async move {
            let header = match self.config.token() {
                Some(token) => {
                    debug!("attaching bearer token");
                    HeaderValue::from_str(&format!("Bearer {token}"))
                        .unwrap_or_else(|_| HeaderValue::from_static(""))
                }
                None => HeaderValue::from_static(""),
            };
            request.headers.insert(AUTHORIZATION, header);
            next.run(request).await
        })
    }
}
