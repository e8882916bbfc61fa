//! Service façade: configuration, client reuse, and request dispatch.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::classify::{ErrorClassifier, SessionHook};
use crate::client::GqlClient;
use crate::config::{GatewayConfig, InitData};
use crate::error::GqlClientError;
use crate::operation::{GraphqlResponse, Operation};

/// Scope used when a caller has no more specific sub-route.
pub const DEFAULT_SCOPE: &str = "websiteBackend";

/// GraphQL access façade.
///
/// Owns the shared configuration, the failure classifier, and a single
/// pinned-client slot. Remains usable after any request failure.
#[derive(Default)]
pub struct GraphqlService {
    config: GatewayConfig,
    classifier: ErrorClassifier,
    pinned: RwLock<Option<GqlClient>>,
}

impl fmt::Debug for GraphqlService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphqlService")
            .field("config", &self.config)
            .field("pinned", &self.pinned.read().is_some())
            .finish()
    }
}

impl GraphqlService {
    /// Create a service with empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared configuration handle.
    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Set all endpoint fields atomically.
    pub fn init(&self, data: InitData) {
        self.config.init(data);
    }

    /// Current bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.config.token()
    }

    /// Set or clear the bearer token.
    pub fn set_token(&self, token: Option<String>) {
        self.config.set_token(token);
    }

    /// Register the session-invalidation hook invoked on 403 responses.
    ///
    /// Applies to every chain built by this service, including ones built
    /// before registration.
    pub fn set_session_hook(&self, hook: Arc<dyn SessionHook>) {
        self.classifier.set_session_hook(hook);
    }

    /// Pin a client handle; subsequent `client_for` calls return it as-is.
    pub fn pin_client(&self, client: GqlClient) {
        *self.pinned.write() = Some(client);
    }

    /// Remove and return the pinned handle, if any.
    pub fn unpin_client(&self) -> Option<GqlClient> {
        self.pinned.write().take()
    }

    /// Currently pinned handle, if any.
    #[must_use]
    pub fn pinned_client(&self) -> Option<GqlClient> {
        self.pinned.read().clone()
    }

    /// Resolve a client for `scope`.
    ///
    /// A pinned handle is returned unconditionally, regardless of the
    /// requested scope. Otherwise a fresh private client is built per call and
    /// not cached. Construction never fails; failures surface when operations
    /// execute.
    #[must_use]
    pub fn client_for(&self, scope: &str) -> GqlClient {
        if let Some(client) = self.pinned.read().clone() {
            return client;
        }
        GqlClient::private(&self.config, self.classifier.clone(), scope)
    }

    /// Build a fresh public client.
    #[must_use]
    pub fn public_client(&self) -> GqlClient {
        GqlClient::public(&self.config, self.classifier.clone())
    }

    /// Execute an operation against the client resolved for `scope`.
    pub async fn execute(
        &self,
        scope: &str,
        operation: &Operation,
    ) -> Result<GraphqlResponse<Value>, GqlClientError> {
        self.client_for(scope).execute(operation).await
    }

    /// Execute a query document against the client resolved for `scope`.
    pub async fn query(
        &self,
        scope: &str,
        document: impl Into<String>,
        variables: Value,
    ) -> Result<GraphqlResponse<Value>, GqlClientError> {
        self.execute(scope, &Operation::query(document, variables))
            .await
    }

    /// Execute a mutation document against the client resolved for `scope`.
    pub async fn mutate(
        &self,
        scope: &str,
        document: impl Into<String>,
        variables: Value,
    ) -> Result<GraphqlResponse<Value>, GqlClientError> {
        self.execute(scope, &Operation::mutation(document, variables))
            .await
    }

    /// Execute an operation against a freshly built public client.
    pub async fn public_execute(
        &self,
        operation: &Operation,
    ) -> Result<GraphqlResponse<Value>, GqlClientError> {
        self.public_client().execute(operation).await
    }

    /// Execute a query document against the public client.
    pub async fn public_query(
        &self,
        document: impl Into<String>,
        variables: Value,
    ) -> Result<GraphqlResponse<Value>, GqlClientError> {
        self.public_execute(&Operation::query(document, variables))
            .await
    }

    /// Execute a mutation document against the public client.
    pub async fn public_mutate(
        &self,
        document: impl Into<String>,
        variables: Value,
    ) -> Result<GraphqlResponse<Value>, GqlClientError> {
        self.public_execute(&Operation::mutation(document, variables))
            .await
    }
}
