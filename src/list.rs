//! List specification parsing into typed match entries.
//!
//! A configured allow/block list arrives either as an explicit sequence of
//! strings or as a single `|`-delimited string (with `"` quoting stripped).
//! Each raw entry is classified once, at configuration time, into a typed
//! [`MatchEntry`] carrying its comparison rule. Malformed configuration is
//! silently dropped; it never produces an error and never matches anything.

use std::net::IpAddr;

use ipnet::IpNet;

use crate::classify::{canonical_ip, parse_canonical_ip};
use crate::matcher::compare_uris;

/// A raw allow/block list specification.
///
/// Accepted as either an ordered sequence of strings or a single
/// delimiter-joined string.
///
/// # Example
///
/// ```rust
/// use origin_gate::ListSpec;
///
/// let from_str: ListSpec = "10.0.0.0/8|example.com".into();
/// let from_vec: ListSpec = vec!["10.0.0.0/8".to_string(), "example.com".to_string()].into();
/// assert_eq!(from_str.raw_entries(), from_vec.raw_entries());
/// ```
#[derive(Debug, Clone)]
pub enum ListSpec {
    /// An explicit ordered sequence of entries.
    Items(Vec<String>),
    /// A single `|`-delimited string, possibly `"`-quoted.
    Delimited(String),
}

impl ListSpec {
    /// Normalizes the specification into an ordered sequence of raw entry
    /// strings. Quotes are stripped from delimited input, whitespace is
    /// trimmed, and empty entries are discarded.
    pub fn raw_entries(&self) -> Vec<String> {
        match self {
            ListSpec::Items(items) => items
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            ListSpec::Delimited(raw) => raw
                .replace('"', "")
                .split('|')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

impl From<&str> for ListSpec {
    fn from(raw: &str) -> Self {
        ListSpec::Delimited(raw.to_string())
    }
}

impl From<String> for ListSpec {
    fn from(raw: String) -> Self {
        ListSpec::Delimited(raw)
    }
}

impl From<Vec<String>> for ListSpec {
    fn from(items: Vec<String>) -> Self {
        ListSpec::Items(items)
    }
}

impl From<&[&str]> for ListSpec {
    fn from(items: &[&str]) -> Self {
        ListSpec::Items(items.iter().map(|s| s.to_string()).collect())
    }
}

/// The matching rule attached to a parsed list entry.
///
/// Classification priority is CIDR range, then IP literal, then domain;
/// first match wins, so kinds are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// A CIDR range; candidates match by family-aware containment.
    Range(IpNet),
    /// A single IP address, stored canonicalized; candidates match by
    /// normalized equality.
    Ip(IpAddr),
    /// A domain or URL; candidates match by URL equivalence.
    Domain,
}

/// A parsed, typed unit of a configured allow/block list.
///
/// Immutable once constructed; built once at middleware setup and reused
/// across all requests.
#[derive(Debug, Clone)]
pub struct MatchEntry {
    host: String,
    kind: EntryKind,
}

impl MatchEntry {
    /// Classifies a raw entry string, or `None` for an empty string.
    pub fn classify(host: &str) -> Option<MatchEntry> {
        if host.is_empty() {
            return None;
        }
        let kind = if let Ok(net) = host.parse::<IpNet>() {
            EntryKind::Range(net)
        } else if let Ok(ip) = host.parse::<IpAddr>() {
            EntryKind::Ip(canonical_ip(ip))
        } else {
            EntryKind::Domain
        };
        Some(MatchEntry {
            host: host.to_string(),
            kind,
        })
    }

    /// The raw entry string as configured.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The matching rule this entry was classified into.
    pub fn kind(&self) -> &EntryKind {
        &self.kind
    }

    /// Whether this entry matches IP-literal candidates (range or single IP).
    pub fn is_ip_like(&self) -> bool {
        matches!(self.kind, EntryKind::Range(_) | EntryKind::Ip(_))
    }

    /// Tests a request-derived candidate against this entry's rule.
    ///
    /// An IPv4 candidate never matches an IPv6 range and vice versa;
    /// IPv4-mapped IPv6 candidates are canonicalized first so
    /// `::ffff:10.1.2.3` is contained in `10.0.0.0/8`.
    pub fn matches(&self, candidate: &str) -> bool {
        match &self.kind {
            EntryKind::Range(net) => {
                parse_canonical_ip(candidate).is_some_and(|ip| net.contains(&ip))
            }
            EntryKind::Ip(ip) => parse_canonical_ip(candidate).is_some_and(|c| c == *ip),
            EntryKind::Domain => compare_uris(&self.host, candidate),
        }
    }
}

/// Parses a list specification into typed match entries.
///
/// Order-preserving, though order has no semantic effect on the final
/// verdict: matching is a set membership test, not a priority list.
pub fn parse_list(spec: impl Into<ListSpec>) -> Vec<MatchEntry> {
    spec.into()
        .raw_entries()
        .iter()
        .filter_map(|host| MatchEntry::classify(host))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    #[test]
    fn mixed_list_classifies_in_priority_order() {
        let entries = parse_list("10.0.0.0/8|example.com|192.168.1.1");
        assert_eq!(entries.len(), 3, "three entries expected");
        assert!(matches!(entries[0].kind(), EntryKind::Range(_)));
        assert_eq!(entries[1].kind(), &EntryKind::Domain);
        assert!(matches!(entries[2].kind(), EntryKind::Ip(_)));
        assert_eq!(entries[0].host(), "10.0.0.0/8");
        assert_eq!(entries[1].host(), "example.com");
        assert_eq!(entries[2].host(), "192.168.1.1");
    }

    #[test]
    fn cidr_wins_over_ip_classification() {
        // A range expression must never be misread as an address entry.
        let entries = parse_list("192.168.1.0/24");
        assert!(matches!(entries[0].kind(), EntryKind::Range(_)));
    }

    #[test]
    fn quotes_are_stripped_from_delimited_input() {
        let entries = parse_list("\"evil.com\"|\"10.0.0.1\"");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].host(), "evil.com");
        assert_eq!(
            entries[1].kind(),
            &EntryKind::Ip(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)))
        );
    }

    #[test]
    fn empty_segments_are_discarded() {
        assert!(parse_list("").is_empty());
        assert!(parse_list("||").is_empty());
        assert_eq!(parse_list("a.com| |b.com").len(), 2);
    }

    #[test]
    fn sequence_input_filters_empty_items() {
        let entries = parse_list(vec![
            "example.com".to_string(),
            String::new(),
            "  ".to_string(),
            "::1".to_string(),
        ]);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind(), &EntryKind::Domain);
        assert!(matches!(entries[1].kind(), EntryKind::Ip(_)));
    }

    #[test]
    fn ip_entry_matches_normalized_variants() {
        let entry = MatchEntry::classify("192.168.1.1").expect("entry");
        assert!(entry.matches("192.168.1.1"));
        assert!(entry.matches("::ffff:192.168.1.1"));
        assert!(!entry.matches("192.168.1.2"));
        assert!(!entry.matches("garbage"));
    }

    #[test]
    fn range_entry_is_family_aware() {
        let entry = MatchEntry::classify("10.0.0.0/8").expect("entry");
        assert!(entry.matches("10.20.30.40"));
        assert!(entry.matches("::ffff:10.20.30.40"), "mapped form canonicalizes to v4");
        assert!(!entry.matches("11.0.0.1"));
        assert!(!entry.matches("fd00::1"), "v6 candidate never matches a v4 range");
    }

    #[test]
    fn v6_range_rejects_v4_candidates() {
        let entry = MatchEntry::classify("fd00::/8").expect("entry");
        assert!(entry.matches("fd12:3456::1"));
        assert!(!entry.matches("10.0.0.1"));
    }

    #[test]
    fn domain_entry_defers_to_uri_comparison() {
        let entry = MatchEntry::classify("example.com").expect("entry");
        assert_eq!(entry.kind(), &EntryKind::Domain);
        assert!(entry.matches("https://example.com"));
        assert!(!entry.matches("https://other.com"));
    }
}
