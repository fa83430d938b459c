//! Identifier classification for origin matching.
//!
//! Every function in this module is a pure shape check over a single string:
//! no DNS resolution, no network I/O, no allocation beyond what parsing
//! requires. Classifiers are total — any input, including attacker-controlled
//! header values, yields `false`/`None` rather than an error or panic.
//!
//! # Classification Shapes
//!
//! - **IP literal**: a syntactically valid IPv4 or IPv6 address
//! - **CIDR range**: an address plus prefix length (`10.0.0.0/8`)
//! - **Localhost alias**: `localhost`, `127.0.0.1`, or `::1` in their common
//!   spellings, with or without an `http://` prefix
//! - **URL shape**: anything the WHATWG parser accepts that is not a bare IP

use std::net::IpAddr;
use std::sync::OnceLock;

use regex::Regex;
use url::Url;

/// The IPv4 loopback address in its canonical spelling.
pub const LOOPBACK_V4: &str = "127.0.0.1";

/// The IPv6 loopback address in its canonical spelling.
pub const LOOPBACK_V6: &str = "::1";

fn localhost_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:http://)?localhost(?::\d+)?(?:/.*)?$").expect("valid regex literal")
    })
}

fn loopback_v4_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:http://)?127\.0\.0\.1$").expect("valid regex literal")
    })
}

/// Checks whether a value is one of the common localhost spellings.
///
/// Accepts `::1`, `127.0.0.1` (optionally `http://`-prefixed), and
/// `localhost` (optionally `http://`-prefixed, optionally followed by a port
/// or path segment). Matching is case-insensitive and anchored, so
/// look-alike hosts such as `localhost.evil.com` do not qualify.
pub fn is_localhost_alias(s: &str) -> bool {
    s == LOOPBACK_V6 || loopback_v4_pattern().is_match(s) || localhost_pattern().is_match(s)
}

/// Checks whether a value is a syntactically valid IPv4 or IPv6 address.
pub fn is_valid_ip(s: &str) -> bool {
    s.parse::<IpAddr>().is_ok()
}

/// Checks whether a value is a syntactically valid CIDR range expression.
///
/// A bare address without a prefix length is not a CIDR.
pub fn is_cidr(s: &str) -> bool {
    s.parse::<ipnet::IpNet>().is_ok()
}

/// Reduces an IPv4-mapped IPv6 address to its IPv4 form.
///
/// `::ffff:127.0.0.1` and `127.0.0.1` denote the same host and must compare
/// equal everywhere addresses are compared.
pub(crate) fn canonical_ip(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map_or(IpAddr::V6(v6), IpAddr::V4),
        v4 => v4,
    }
}

/// Parses a string as an IP address and canonicalizes mapped forms.
pub(crate) fn parse_canonical_ip(s: &str) -> Option<IpAddr> {
    s.parse::<IpAddr>().ok().map(canonical_ip)
}

/// Compares two strings as IP addresses, normalizing IPv4-mapped IPv6 forms.
///
/// Returns `false` (never an error) if either side fails to parse.
pub fn ip_equals(a: &str, b: &str) -> bool {
    match (parse_canonical_ip(a), parse_canonical_ip(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Checks whether a value IP-equals the IPv4 or IPv6 loopback address.
///
/// Exactly `127.0.0.1` and `::1` (plus textual variants normalizing to
/// them, such as `::ffff:127.0.0.1`). Other addresses inside the loopback
/// range, like `127.0.0.2`, do not qualify.
pub fn is_loopback_ip(s: &str) -> bool {
    ip_equals(LOOPBACK_V4, s) || ip_equals(LOOPBACK_V6, s)
}

fn has_localhost_prefix(s: &str) -> bool {
    let prefix = b"localhost";
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Attempts to parse a value as a URL.
///
/// A value beginning with `localhost` (case-insensitive) that carries no
/// scheme gets `http://` prepended first, so bare `localhost:3000` parses as
/// host `localhost`, port `3000` rather than as a URL with scheme
/// `localhost:`. Returns `None` on failure; this runs on attacker-controlled
/// input and must never fault.
pub fn parse_as_url(s: &str) -> Option<Url> {
    if has_localhost_prefix(s) && !s.contains("://") {
        return Url::parse(&format!("http://{s}")).ok();
    }
    Url::parse(s).ok()
}

/// Checks whether a value is URL-shaped but not itself an IP literal.
///
/// Pure IPs are excluded here so they flow exclusively through the IP
/// matching path.
pub fn is_url_shaped(s: &str) -> bool {
    parse_as_url(s).is_some() && !is_valid_ip(s)
}
