//! Centralized classification of network failures.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::error::GqlClientError;

/// Extension point for session invalidation.
///
/// Supplied by the external authentication provider and invoked when the
/// backend rejects the session (403). The default is a no-op; typical
/// implementations log the user out and redirect to a login flow.
pub trait SessionHook: Send + Sync {
    /// Called with the rejecting status code.
    fn on_forbidden(&self, status: u16);
}

/// Side-effecting observer of network failures.
///
/// Classification never suppresses, converts, or retries the failure; it only
/// performs out-of-band notification. Clones share the registered hook, so a
/// hook installed after clients were built still applies to their chains.
#[derive(Clone, Default)]
pub struct ErrorClassifier {
    hook: Arc<RwLock<Option<Arc<dyn SessionHook>>>>,
}

impl fmt::Debug for ErrorClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorClassifier")
            .field("hook", &self.hook.read().is_some())
            .finish()
    }
}

impl ErrorClassifier {
    /// Create a classifier with no session hook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the session-invalidation hook.
    pub fn set_session_hook(&self, hook: Arc<dyn SessionHook>) {
        *self.hook.write() = Some(hook);
    }

    /// Observe a failure and dispatch its handling policy.
    ///
    /// - 500: the server is unreachable; log and move on.
    /// - 403: invoke the session hook, if registered.
    /// - anything else (including failures with no status): generic advisory.
    pub fn classify(&self, error: &GqlClientError) {
        match error.status_code() {
            Some(500) => warn!("cannot connect to server"),
            Some(403) => {
                let hook = self.hook.read().clone();
                if let Some(hook) = hook {
                    hook.on_forbidden(403);
                }
            }
            _ => info!("please wait, at this moment cannot connect to the server"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};

    use reqwest::StatusCode;

    use super::*;

    struct RecordingHook {
        calls: AtomicUsize,
        last_status: AtomicU16,
    }

    impl RecordingHook {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_status: AtomicU16::new(0),
            })
        }
    }

    impl SessionHook for RecordingHook {
        fn on_forbidden(&self, status: u16) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.last_status.store(status, Ordering::SeqCst);
        }
    }

    fn status_error(status: StatusCode) -> GqlClientError {
        GqlClientError::HttpStatus {
            status,
            body: String::new(),
        }
    }

    #[test]
    fn classify_is_total_over_error_shapes() {
        let classifier = ErrorClassifier::new();
        classifier.classify(&status_error(StatusCode::INTERNAL_SERVER_ERROR));
        classifier.classify(&status_error(StatusCode::FORBIDDEN));
        classifier.classify(&status_error(StatusCode::BAD_GATEWAY));
        classifier.classify(&GqlClientError::Json("bad".to_string()));
        classifier.classify(&GqlClientError::Protocol {
            message: "odd".to_string(),
        });
    }

    #[test]
    fn forbidden_fires_session_hook() {
        let classifier = ErrorClassifier::new();
        let hook = RecordingHook::new();
        classifier.set_session_hook(hook.clone());

        classifier.classify(&status_error(StatusCode::FORBIDDEN));
        assert_eq!(hook.calls.load(Ordering::SeqCst), 1);
        assert_eq!(hook.last_status.load(Ordering::SeqCst), 403);
    }

    #[test]
    fn non_forbidden_statuses_skip_the_hook() {
        let classifier = ErrorClassifier::new();
        let hook = RecordingHook::new();
        classifier.set_session_hook(hook.clone());

        classifier.classify(&status_error(StatusCode::INTERNAL_SERVER_ERROR));
        classifier.classify(&GqlClientError::Json("bad".to_string()));
        assert_eq!(hook.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn hook_applies_to_previously_made_clones() {
        let classifier = ErrorClassifier::new();
        let earlier_clone = classifier.clone();
        let hook = RecordingHook::new();
        classifier.set_session_hook(hook.clone());

        earlier_clone.classify(&status_error(StatusCode::FORBIDDEN));
        assert_eq!(hook.calls.load(Ordering::SeqCst), 1);
    }
}
