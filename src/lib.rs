//! GraphQL client-access layer.
//!
//! This crate provides:
//! - Unified construction of public (unauthenticated) and private
//!   (authenticated) GraphQL clients.
//! - A middleware chain composing error interception, bearer-token
//!   injection, and an HTTP transport into a single request pipeline.
//! - A service façade with per-scope client resolution, a pinned-client
//!   slot, and `query`/`mutate` entry points.
//! - Centralized classification of network failures with a session
//!   invalidation hook for 403 responses.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]

mod classify;
mod client;
mod config;
mod error;
mod link;
mod operation;
mod service;
mod transport;

pub use classify::{ErrorClassifier, SessionHook};
pub use client::{ClientMetrics, ClientMetricsSnapshot, GqlClient};
pub use config::{GatewayConfig, InitData};
pub use error::{
    GqlClientError, GraphqlError, GraphqlErrorLocation, GraphqlPathSegment, HttpErrorInfo,
};
pub use link::{AuthLink, Chain, ErrorLink, Link, Next};
pub use operation::{GraphqlResponse, Operation, OperationKind};
pub use service::{GraphqlService, DEFAULT_SCOPE};
pub use transport::{
    CredentialsMode, HttpTransport, Transport, TransportConfig, TransportFuture, TransportRequest,
};
