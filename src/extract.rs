//! Candidate extraction from request metadata.
//!
//! A request identifies its origin through several channels of decreasing
//! trustworthiness: the `Host` header, the `Origin` header, the
//! `X-Forwarded-For` chain, and the transport-level remote address. All of
//! them are read in that fixed order, then filtered down to the shapes the
//! classifier recognizes — anything else (the literal string `null`, garbage
//! header values, spoofed junk) cannot possibly match a list entry and is
//! discarded before matching.

use std::net::IpAddr;

use http::header::{HeaderMap, HOST, ORIGIN};

use crate::classify::{is_localhost_alias, is_url_shaped, is_valid_ip};

/// The forwarded-chain header; `http::header` has no named constant for it.
const X_FORWARDED_FOR: &str = "x-forwarded-for";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Reads the raw candidate values in fixed order, dropping absent ones.
///
/// `X-Forwarded-For` may carry a comma-separated proxy chain; the first hop
/// is the client, so only it becomes a candidate.
fn raw_candidates(headers: &HeaderMap, remote_addr: Option<IpAddr>) -> Vec<String> {
    let mut raw = Vec::with_capacity(4);
    if let Some(host) = header_str(headers, HOST.as_str()) {
        raw.push(host.to_string());
    }
    if let Some(origin) = header_str(headers, ORIGIN.as_str()) {
        raw.push(origin.to_string());
    }
    if let Some(forwarded) = header_str(headers, X_FORWARDED_FOR) {
        if let Some(first_hop) = forwarded.split(',').next() {
            raw.push(first_hop.trim().to_string());
        }
    }
    if let Some(addr) = remote_addr {
        raw.push(addr.to_string());
    }
    raw
}

/// Extracts the ordered candidate identifiers to test against a list.
///
/// Reads `Host`, `Origin`, `X-Forwarded-For` (first hop), and the
/// transport-level remote address when the caller supplies one, then keeps
/// only the candidates that are IP-literal-valid, localhost-alias, or
/// URL-shaped.
pub fn extract_candidates(headers: &HeaderMap, remote_addr: Option<IpAddr>) -> Vec<String> {
    let mut candidates = raw_candidates(headers, remote_addr);
    candidates.retain(|c| is_valid_ip(c) || is_localhost_alias(c) || is_url_shaped(c));
    candidates
}
