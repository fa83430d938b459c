//! Property-based tests for the origin matching engine.
//!
//! The engine runs on attacker-controlled header values, so the properties
//! that matter most are totality (no input panics) and determinism (the
//! same input always yields the same verdict).

use proptest::prelude::*;

use http::HeaderMap;
use origin_gate::classify::{
    ip_equals, is_cidr, is_localhost_alias, is_loopback_ip, is_url_shaped, is_valid_ip,
    parse_as_url,
};
use origin_gate::{compare_uris, extract_candidates, OriginGate, OriginMatcher};

proptest! {
    #[test]
    fn classifiers_are_total(s in ".{0,200}") {
        // None of these may panic, whatever the input.
        let _ = is_localhost_alias(&s);
        let _ = is_valid_ip(&s);
        let _ = is_cidr(&s);
        let _ = is_loopback_ip(&s);
        let _ = is_url_shaped(&s);
        let _ = parse_as_url(&s);
        let _ = ip_equals(&s, "127.0.0.1");
        let _ = ip_equals("::1", &s);
        let _ = compare_uris(&s, "https://example.com");
        let _ = compare_uris("example.com", &s);
    }

    #[test]
    fn list_parsing_is_total(s in ".{0,200}") {
        // Malformed configuration is dropped, never an error or panic.
        let matcher = OriginMatcher::new(s.as_str());
        let _ = matcher.is_member("https://example.com");
    }

    #[test]
    fn membership_is_idempotent(s in ".{0,120}") {
        let matcher = OriginMatcher::new("10.0.0.0/8|example.com|192.168.1.1|localhost");
        prop_assert_eq!(matcher.is_member(&s), matcher.is_member(&s));
    }

    #[test]
    fn gate_verdicts_are_deterministic(origin in "[ -~]{0,80}") {
        let gate = OriginGate::block("evil.com|10.0.0.0/8");
        let mut headers = HeaderMap::new();
        if let Ok(value) = origin.parse() {
            headers.insert("origin", value);
        }
        let first = gate.check(&headers, None).is_ok();
        let second = gate.check(&headers, None).is_ok();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn extraction_is_total_and_shape_filtered(
        host in "[ -~]{0,60}",
        origin in "[ -~]{0,60}",
        forwarded in "[ -~]{0,60}",
    ) {
        let mut headers = HeaderMap::new();
        if let Ok(value) = host.parse() {
            headers.insert("host", value);
        }
        if let Ok(value) = origin.parse() {
            headers.insert("origin", value);
        }
        if let Ok(value) = forwarded.parse() {
            headers.insert("x-forwarded-for", value);
        }
        for candidate in extract_candidates(&headers, None) {
            prop_assert!(
                is_valid_ip(&candidate)
                    || is_localhost_alias(&candidate)
                    || is_url_shaped(&candidate),
                "unrecognized shape survived the filter: {candidate:?}"
            );
        }
    }

    #[test]
    fn ip_entries_match_themselves(a: u8, b: u8, c: u8, d: u8) {
        let ip = format!("{a}.{b}.{c}.{d}");
        let matcher = OriginMatcher::new(ip.as_str());
        prop_assert!(matcher.is_member(&ip), "{ip} should match its own entry");
    }

    #[test]
    fn sixteen_bit_ranges_contain_their_hosts(a: u8, b: u8, x: u8, y: u8) {
        let matcher = OriginMatcher::new(format!("{a}.{b}.0.0/16"));
        let host = format!("{a}.{b}.{x}.{y}");
        prop_assert!(matcher.is_member(&host));
    }

    #[test]
    fn url_shape_and_ip_shape_are_disjoint(s in ".{0,120}") {
        prop_assert!(!(is_url_shaped(&s) && is_valid_ip(&s)));
    }

    #[test]
    fn loopback_implies_valid_ip(s in ".{0,120}") {
        if is_loopback_ip(&s) {
            prop_assert!(is_valid_ip(&s));
        }
    }
}
