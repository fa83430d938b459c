//! CORS gating middleware built on the origin matcher.
//!
//! Two middleware flavors sit on top of the matching engine:
//!
//! - **Block mode**: the request is rejected iff its origin is a member of
//!   the configured block-list.
//! - **Allow mode**: the request is rejected iff its origin is NOT a member
//!   of the configured allow-list.
//!
//! Both surface rejection as [`Error::NotAllowed`] with the fixed
//! `"<candidate> Not Allowed Access"` message, and acceptance as a
//! [`CorsDecision`] signaling that the origin should be reflected.
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::Router;
//! use origin_gate::blocklist_layer;
//!
//! let app: Router = Router::new().layer(blocklist_layer("evil.com|10.66.0.0/16"));
//! ```

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::header::HeaderName;
use http::{HeaderMap, Method, StatusCode};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::extract::extract_candidates;
use crate::list::ListSpec;
use crate::matcher::OriginMatcher;

/// Methods advertised by the unconditional-allow helper layer.
pub const ALLOWED_METHODS: [Method; 4] =
    [Method::GET, Method::PUT, Method::POST, Method::DELETE];

/// Headers advertised by the unconditional-allow helper layer.
pub const ALLOWED_HEADERS: [HeaderName; 1] = [http::header::CONTENT_TYPE];

/// Whether a configured list names origins to reject or origins to admit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateMode {
    /// Reject requests whose origin is in the list.
    Block,
    /// Reject requests whose origin is not in the list.
    Allow,
}

/// Acceptance value handed to the downstream CORS header-writing step.
///
/// `origin: true` instructs it to reflect the request's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorsDecision {
    /// Reflect the request origin in `Access-Control-Allow-Origin`.
    pub origin: bool,
}

/// An origin gate: a parsed list plus a block or allow policy.
///
/// Constructed once at middleware setup; immutable and safe for unlimited
/// concurrent use afterwards.
#[derive(Debug, Clone)]
pub struct OriginGate {
    matcher: OriginMatcher,
    mode: GateMode,
}

impl OriginGate {
    /// Gate that rejects any origin in the given block-list.
    pub fn block(spec: impl Into<ListSpec>) -> Self {
        Self {
            matcher: OriginMatcher::new(spec),
            mode: GateMode::Block,
        }
    }

    /// Gate that rejects any origin not in the given allow-list.
    pub fn allow(spec: impl Into<ListSpec>) -> Self {
        Self {
            matcher: OriginMatcher::new(spec),
            mode: GateMode::Allow,
        }
    }

    /// The policy this gate applies.
    pub fn mode(&self) -> GateMode {
        self.mode
    }

    /// The underlying membership matcher.
    pub fn matcher(&self) -> &OriginMatcher {
        &self.matcher
    }

    /// Applies the gate to a request's metadata.
    ///
    /// Extracts candidates once, evaluates membership, and applies the
    /// block/allow policy. Rejection carries the first extracted candidate
    /// (or an empty string when the request yielded none).
    pub fn check(&self, headers: &HeaderMap, remote_addr: Option<IpAddr>) -> Result<CorsDecision> {
        let candidates = extract_candidates(headers, remote_addr);
        let matched = candidates.iter().any(|c| self.matcher.is_member(c));
        let rejected = match self.mode {
            GateMode::Block => matched,
            GateMode::Allow => !matched,
        };

        if rejected {
            let candidate = candidates.into_iter().next().unwrap_or_default();
            warn!(%candidate, mode = ?self.mode, "rejecting origin");
            counter!("origin_gate_denied_total").increment(1);
            return Err(Error::not_allowed(candidate));
        }

        debug!(mode = ?self.mode, "accepting origin");
        counter!("origin_gate_allowed_total").increment(1);
        Ok(CorsDecision { origin: true })
    }
}

/// CORS layer that refuses to reflect origins matching the block-list.
///
/// Built on [`AllowOrigin::predicate`]; the predicate re-runs candidate
/// extraction over the request headers on each preflight. The transport
/// remote address is not visible at this layer — use [`enforce`] when it
/// should participate.
pub fn blocklist_layer(spec: impl Into<ListSpec>) -> CorsLayer {
    gate_layer(OriginGate::block(spec))
}

/// CORS layer that reflects only origins matching the allow-list.
pub fn allowlist_layer(spec: impl Into<ListSpec>) -> CorsLayer {
    gate_layer(OriginGate::allow(spec))
}

/// Wraps an already-built gate in a CORS layer.
pub fn gate_layer(gate: OriginGate) -> CorsLayer {
    let gate = Arc::new(gate);
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |_origin, parts| {
            gate.check(&parts.headers, None).is_ok()
        }))
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(ALLOWED_HEADERS)
}

/// The unconditional-allow escape hatch: `Access-Control-Allow-Origin: *`
/// with fixed methods and headers, no matching logic.
///
/// Only for local development or deployments where the upstream network
/// already guarantees the source is trusted.
pub fn permissive_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(ALLOWED_HEADERS)
}

/// Axum middleware that hard-rejects gated requests with `403 Forbidden`.
///
/// Unlike the CORS layers, this path sees the connection's remote address
/// (when the router is served with
/// `into_make_service_with_connect_info::<SocketAddr>()`) and returns the
/// rejection message as the response body.
pub async fn enforce(
    State(gate): State<Arc<OriginGate>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let remote_addr = connect_info.map(|ConnectInfo(addr)| addr.ip());
    match gate.check(request.headers(), remote_addr) {
        Ok(_) => next.run(request).await,
        Err(err) => (StatusCode::FORBIDDEN, err.to_string()).into_response(),
    }
}
