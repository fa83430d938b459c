//! Origin Gate - CORS Allow/Block-List Matching for Axum Services
//!
//! This crate decides, per inbound HTTP request, whether the request's
//! origin is a member of a configured allow-list or block-list of hosts.
//! List entries may be bare IP addresses, CIDR ranges, bare hostnames, or
//! full URLs, and the common "localhost" spellings are recognized as
//! equivalent.
//!
//! # Architecture
//!
//! ```text
//! "10.0.0.0/8|example.com|localhost"          Request
//!              │                                 │
//!              ▼                                 ▼
//!        ┌───────────┐                    ┌─────────────┐
//!        │ ListSpec   │                   │  Extractor  │ Host, Origin,
//!        │ parse_list │                   │             │ X-Forwarded-For,
//!        └─────┬──────┘                   └──────┬──────┘ remote address
//!              │ Range | Ip | Domain             │ shape-filtered
//!              ▼                                 ▼
//!        ┌──────────────────────────────────────────┐
//!        │       OriginMatcher::is_member           │
//!        └─────────────────────┬────────────────────┘
//!                              ▼
//!                  OriginGate (block / allow)
//!                              │
//!                              ▼
//!              Ok(CorsDecision) | Err(NotAllowed)
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use origin_gate::OriginGate;
//! use http::HeaderMap;
//!
//! let gate = OriginGate::block("evil.com|10.66.0.0/16");
//!
//! let mut headers = HeaderMap::new();
//! headers.insert("origin", "https://evil.com".parse().unwrap());
//! assert!(gate.check(&headers, None).is_err());
//! ```
//!
//! The matcher is constructed once at middleware setup and is safe for
//! unlimited concurrent use; every matching call is pure computation over
//! in-memory strings with no I/O.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod classify;
pub mod config;
pub mod cors;
pub mod error;
pub mod extract;
pub mod list;
pub mod matcher;

// Re-exports for convenience
pub use cors::{
    allowlist_layer, blocklist_layer, gate_layer, permissive_layer, CorsDecision, GateMode,
    OriginGate,
};
pub use error::{Error, Result};
pub use extract::extract_candidates;
pub use list::{parse_list, EntryKind, ListSpec, MatchEntry};
pub use matcher::{compare_uris, OriginMatcher};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
