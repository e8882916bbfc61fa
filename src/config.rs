//! Shared endpoint and token configuration.

use std::sync::Arc;

use parking_lot::RwLock;

/// Initial endpoint layout.
#[derive(Debug, Clone, Default)]
pub struct InitData {
    /// Endpoint base URL, e.g. `https://myapi.com`.
    pub api_base: String,
    /// Relative path segment for private APIs, e.g. `/api/`.
    pub relative_path: String,
    /// Relative path segment for the public API, e.g. `publicApi`.
    pub public_relative_path: String,
}

#[derive(Debug, Default)]
struct ConfigState {
    api_base: String,
    relative_path: String,
    public_relative_path: String,
    token: Option<String>,
}

/// Shared configuration handle.
///
/// Clones share the same underlying state; a token set through one handle is
/// visible to every chain holding another. Values are not validated here;
/// malformed endpoints surface as transport connection failures.
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    inner: Arc<RwLock<ConfigState>>,
}

impl GatewayConfig {
    /// Create an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set all endpoint fields atomically (single write-lock section).
    pub fn init(&self, data: InitData) {
        let mut state = self.inner.write();
        state.api_base = data.api_base;
        state.relative_path = data.relative_path;
        state.public_relative_path = data.public_relative_path;
    }

    /// Endpoint base URL.
    #[must_use]
    pub fn api_base(&self) -> String {
        self.inner.read().api_base.clone()
    }

    /// Set the endpoint base URL.
    pub fn set_api_base(&self, api_base: impl Into<String>) {
        self.inner.write().api_base = api_base.into();
    }

    /// Relative path segment for private APIs.
    #[must_use]
    pub fn relative_path(&self) -> String {
        self.inner.read().relative_path.clone()
    }

    /// Set the relative path segment for private APIs.
    pub fn set_relative_path(&self, relative_path: impl Into<String>) {
        self.inner.write().relative_path = relative_path.into();
    }

    /// Relative path segment for the public API.
    #[must_use]
    pub fn public_relative_path(&self) -> String {
        self.inner.read().public_relative_path.clone()
    }

    /// Set the relative path segment for the public API.
    pub fn set_public_relative_path(&self, public_relative_path: impl Into<String>) {
        self.inner.write().public_relative_path = public_relative_path.into();
    }

    /// Current bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner.read().token.clone()
    }

    /// Set or clear the bearer token.
    ///
    /// Applies to requests that have not yet entered the auth stage.
    pub fn set_token(&self, token: Option<String>) {
        self.inner.write().token = token;
    }

    /// Effective endpoint for the public chain.
    #[must_use]
    pub fn public_endpoint(&self) -> String {
        let state = self.inner.read();
        format!(
            "{}{}{}",
            state.api_base, state.relative_path, state.public_relative_path
        )
    }

    /// Effective endpoint for a private chain bound to `scope`.
    #[must_use]
    pub fn private_endpoint(&self, scope: &str) -> String {
        let state = self.inner.read();
        format!("{}{}{scope}", state.api_base, state.relative_path)
    }
}
