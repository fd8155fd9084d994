//! Coordinate extraction from free text
//!
//! Pulls the first two signed decimal numbers out of a string and decides
//! which one is the latitude. The provider writes pairs as `lng,lat`, so when
//! neither number exceeds 90 in magnitude the first one is taken as the
//! longitude. That default can swap axes for points where both values are
//! small (near the equator and prime meridian); callers that need certainty
//! must send a pair where the longitude is outside [-90, 90].

use crate::geo::ResolvedLocation;
use regex::Regex;
use std::sync::LazyLock;

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("number pattern is valid"));

/// Full-width comma as typed by CJK input methods
const FULLWIDTH_COMMA: char = '\u{FF0C}';

/// Extract every signed decimal number in the text, in order
pub fn extract_numbers(text: &str) -> Vec<f64> {
    let normalized = text.replace(FULLWIDTH_COMMA, ",");
    NUMBER_RE
        .find_iter(&normalized)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

/// Order two numbers into `(lat, lng)`
///
/// - `|first| > 90`: first is the longitude
/// - `|second| > 90`: second is the longitude
/// - otherwise: first is the longitude (provider order)
pub fn disambiguate(first: f64, second: f64) -> (f64, f64) {
    if first.abs() > 90.0 {
        (second, first)
    } else if second.abs() > 90.0 {
        (first, second)
    } else {
        (second, first)
    }
}

/// Parse a coordinate pair out of free text
///
/// Returns `None` when fewer than two numbers are present or the ordered pair
/// is out of range. No admin code is ever attached here.
pub fn parse(text: &str) -> Option<ResolvedLocation> {
    let numbers = extract_numbers(text);
    let [first, second, ..] = numbers.as_slice() else {
        return None;
    };
    let (lat, lng) = disambiguate(*first, *second);
    ResolvedLocation::new(lat, lng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_extract_numbers() {
        assert_eq!(extract_numbers("87.6,43.7"), vec![87.6, 43.7]);
        assert_eq!(extract_numbers("-12.5 abc 7"), vec![-12.5, 7.0]);
        assert_eq!(extract_numbers("87.6\u{FF0C}43.7"), vec![87.6, 43.7]);
        assert!(extract_numbers("no digits here").is_empty());
    }

    #[test]
    fn test_provider_order_pairs() {
        let loc = parse("87.617733,43.792818").unwrap();
        // 87.6 does not exceed 90, so this goes through the default branch
        assert_abs_diff_eq!(loc.lat, 43.792818, epsilon = 1e-9);
        assert_abs_diff_eq!(loc.lng, 87.617733, epsilon = 1e-9);
        assert!(loc.admin_code.is_none());

        let loc = parse("116.407400,39.904200").unwrap();
        assert_abs_diff_eq!(loc.lat, 39.9042, epsilon = 1e-9);
        assert_abs_diff_eq!(loc.lng, 116.4074, epsilon = 1e-9);
    }

    #[test]
    fn test_second_exceeds_ninety_is_longitude() {
        let loc = parse("39.904200,116.407400").unwrap();
        assert_abs_diff_eq!(loc.lat, 39.9042, epsilon = 1e-9);
        assert_abs_diff_eq!(loc.lng, 116.4074, epsilon = 1e-9);

        let loc = parse("-33.8688, -151.2093").unwrap();
        assert_abs_diff_eq!(loc.lat, -33.8688, epsilon = 1e-9);
        assert_abs_diff_eq!(loc.lng, -151.2093, epsilon = 1e-9);
    }

    #[test]
    fn test_ambiguous_pair_defaults_to_longitude_first() {
        let loc = parse("30.5,31.2").unwrap();
        assert_abs_diff_eq!(loc.lat, 31.2, epsilon = 1e-9);
        assert_abs_diff_eq!(loc.lng, 30.5, epsilon = 1e-9);

        let loc = parse("43.792818,87.617733").unwrap();
        assert_abs_diff_eq!(loc.lat, 87.617733, epsilon = 1e-9);
        assert_abs_diff_eq!(loc.lng, 43.792818, epsilon = 1e-9);
    }

    #[test]
    fn test_fewer_than_two_numbers() {
        assert!(parse("").is_none());
        assert!(parse("Paris").is_none());
        assert!(parse("Route 66").is_none());
    }

    #[test]
    fn test_out_of_range_rejected() {
        // Both over 90 in magnitude: longitude first, latitude 120 is invalid
        assert!(parse("100.0,120.0").is_none());
        // Longitude beyond 180
        assert!(parse("200.0,10.0").is_none());
        assert!(parse("10.0,-181.0").is_none());
    }

    #[test]
    fn test_extra_text_and_numbers_ignored() {
        let loc = parse("121.473701,31.230416 上海 2024").unwrap();
        assert_abs_diff_eq!(loc.lat, 31.230416, epsilon = 1e-9);
        assert_abs_diff_eq!(loc.lng, 121.473701, epsilon = 1e-9);
    }

    #[test]
    fn test_parse_is_idempotent() {
        for text in ["87.6,43.7", "abc", "39.9,116.4 Beijing", "1,2,3", "-0.1\u{FF0C}-0.2"] {
            assert_eq!(parse(text), parse(text));
        }
    }

    #[test]
    fn test_outputs_always_in_range() {
        let samples = [
            "0,0", "90,180", "-90,-180", "91,45", "45,91", "180,90", "180,91", "-179.9,-89.9",
            "999,1", "1,999", "12.3456789,-98.7654321",
        ];
        for text in samples {
            if let Some(loc) = parse(text) {
                assert!((-90.0..=90.0).contains(&loc.lat), "{}: lat {}", text, loc.lat);
                assert!((-180.0..=180.0).contains(&loc.lng), "{}: lng {}", text, loc.lng);
            }
        }
    }

    #[test]
    fn test_canonical_round_trip() {
        let pairs = [(39.9042, 116.4074), (-33.8688, 151.2093), (64.1466, -121.9426)];
        for (lat, lng) in pairs {
            let canonical = ResolvedLocation::new(lat, lng).unwrap().canonical(Some("somewhere"));
            let parsed = parse(&canonical).unwrap();
            assert_abs_diff_eq!(parsed.lat, lat, epsilon = 1e-6);
            assert_abs_diff_eq!(parsed.lng, lng, epsilon = 1e-6);
        }
    }
}
