//! HTTP API for the live checklist session
//!
//! JSON endpoints for the front-end, an SSE stream of views, and the
//! WebSocket the browser bridge attaches to.

mod bridge;
mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::runtime::{BridgeHub, SessionHandle};
use axum::http::HeaderValue;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionHandle>,
    pub bridge: Arc<BridgeHub>,
    pub origins: Arc<OriginPolicy>,
}

impl AppState {
    pub fn new(session: SessionHandle, bridge: Arc<BridgeHub>, origins: OriginPolicy) -> Self {
        Self {
            session: Arc::new(session),
            bridge,
            origins: Arc::new(origins),
        }
    }
}

/// Browser origins trusted with the live endpoint and the bridge.
///
/// The setup response carries the API key, so routes that expose it check
/// the `Origin` header. Requests without one (same-origin GETs, non-browser
/// clients) pass.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

impl OriginPolicy {
    pub fn new(allowed: Vec<String>) -> Self {
        Self { allowed }
    }

    pub fn permits(&self, origin: Option<&HeaderValue>) -> bool {
        let Some(origin) = origin else {
            return true;
        };
        origin
            .to_str()
            .is_ok_and(|origin| self.allowed.iter().any(|allowed| allowed == origin))
    }

    /// Header values for the CORS allow-list; unparseable entries are skipped
    pub fn header_values(&self) -> Vec<HeaderValue> {
        self.allowed
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(%origin, error = %e, "Ignoring invalid allowed origin");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_policy() {
        let policy = OriginPolicy::new(vec!["http://localhost:8000".to_string()]);

        assert!(policy.permits(None));
        assert!(policy.permits(Some(&HeaderValue::from_static("http://localhost:8000"))));
        assert!(!policy.permits(Some(&HeaderValue::from_static("https://evil.example"))));
        assert!(!policy.permits(Some(&HeaderValue::from_static("null"))));
        assert_eq!(policy.header_values().len(), 1);
    }
}
