//! List membership: URL equivalence rules and the origin matcher.
//!
//! The matcher combines a parsed entry list with request-derived candidates.
//! IP-literal candidates are tested against range and IP entries (plus an
//! unconditional loopback allowance); localhost-alias and URL-shaped
//! candidates are tested against domain entries via [`compare_uris`].
//!
//! # Directionality
//!
//! [`compare_uris`] is deliberately asymmetric: the left operand is always
//! the configured list entry, whose scheme may be elided, and the right
//! operand is always the request-derived candidate. Swapping the operands
//! changes the verdict.

use std::net::IpAddr;

use http::HeaderMap;
use url::Url;

use crate::classify::{is_localhost_alias, is_loopback_ip, is_url_shaped, is_valid_ip, parse_as_url};
use crate::extract::extract_candidates;
use crate::list::{parse_list, EntryKind, ListSpec, MatchEntry};

/// Parses the entry side of a URI comparison.
///
/// Entries are written by an operator, not a browser, so the scheme is
/// optional: `evil.com` and `localhost:3000` are valid entries. Returns the
/// parsed URL plus whether the scheme had to be supplied.
fn parse_entry_uri(entry: &str) -> Option<(Url, bool)> {
    if entry.contains("://") {
        Url::parse(entry).ok().map(|url| (url, false))
    } else {
        Url::parse(&format!("http://{entry}")).ok().map(|url| (url, true))
    }
}

/// Compares a configured list entry against a request-derived candidate for
/// URL equivalence.
///
/// Two parses are equivalent under either rule:
///
/// - **Structural equality**: scheme, port, and hostname all pairwise equal.
/// - **Protocol-less shorthand**: the entry was written without a scheme,
///   hostnames are equal, and the entry either names no port or names the
///   candidate's port. This lets entry `localhost` match a `Host` header of
///   `localhost:3000`, and entry `evil.com` match an `Origin` of
///   `https://evil.com`, while `localhost:3000` still pins the port.
///
/// Either side failing to parse yields `false`.
///
/// # Example
///
/// ```rust
/// use origin_gate::compare_uris;
///
/// assert!(compare_uris("localhost", "localhost:3000"));
/// assert!(!compare_uris("localhost:3000", "localhost"));
/// assert!(!compare_uris("https://example.com", "http://example.com"));
/// ```
pub fn compare_uris(entry: &str, candidate: &str) -> bool {
    let Some((entry_url, scheme_elided)) = parse_entry_uri(entry) else {
        return false;
    };
    let Some(cand) = parse_as_url(candidate) else {
        return false;
    };

    let host_eq = entry_url.host_str().is_some() && entry_url.host_str() == cand.host_str();

    if host_eq && entry_url.scheme() == cand.scheme() && entry_url.port() == cand.port() {
        return true;
    }

    scheme_elided && host_eq && (entry_url.port().is_none() || entry_url.port() == cand.port())
}

/// An immutable origin membership matcher.
///
/// Parses the list specification once at construction; the resulting value
/// is `Send + Sync` and safe for unlimited concurrent use, since every
/// matching call is pure computation over the frozen entry list.
///
/// # Example
///
/// ```rust
/// use origin_gate::OriginMatcher;
///
/// let matcher = OriginMatcher::new("10.0.0.0/8|example.com|192.168.1.1");
/// assert!(matcher.is_member("10.4.4.4"));
/// assert!(matcher.is_member("https://example.com"));
/// assert!(!matcher.is_member("https://other.org"));
/// ```
#[derive(Debug, Clone)]
pub struct OriginMatcher {
    entries: Vec<MatchEntry>,
}

impl OriginMatcher {
    /// Parses a list specification into a reusable matcher.
    pub fn new(spec: impl Into<ListSpec>) -> Self {
        Self {
            entries: parse_list(spec),
        }
    }

    /// The parsed entries, in configuration order.
    pub fn entries(&self) -> &[MatchEntry] {
        &self.entries
    }

    /// Whether the configured list produced no usable entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn any_ip_entry_matches(&self, candidate: &str) -> bool {
        self.entries
            .iter()
            .filter(|e| e.is_ip_like())
            .any(|e| e.matches(candidate))
    }

    fn any_domain_entry_matches(&self, candidate: &str) -> bool {
        self.entries
            .iter()
            .filter(|e| e.kind() == &EntryKind::Domain)
            .any(|e| e.matches(candidate))
    }

    /// Decides whether a single candidate is a member of the configured list.
    ///
    /// IP-literal candidates match when they are loopback or when any range
    /// or IP entry contains/equals them; localhost-alias and URL-shaped
    /// candidates match when any domain entry is URL-equivalent. Candidates
    /// of no recognizable shape never match.
    pub fn is_member(&self, candidate: &str) -> bool {
        if is_valid_ip(candidate) {
            return is_loopback_ip(candidate) || self.any_ip_entry_matches(candidate);
        }
        (is_localhost_alias(candidate) || is_url_shaped(candidate))
            && self.any_domain_entry_matches(candidate)
    }

    /// Decides whether any candidate extracted from the request is a member.
    ///
    /// Short-circuits on the first match; evaluation order cannot affect the
    /// verdict since entry comparisons are pure.
    pub fn matches_request(&self, headers: &HeaderMap, remote_addr: Option<IpAddr>) -> bool {
        extract_candidates(headers, remote_addr)
            .iter()
            .any(|candidate| self.is_member(candidate))
    }
}
