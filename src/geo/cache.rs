//! Geocode cache
//!
//! Two independent maps, both holding optional values:
//! - forward: raw location text -> `Option<ResolvedLocation>`
//! - reverse: 6-decimal `"lat,lng"` key -> `Option<admin_code>`
//!
//! A cached `None` means "the provider had nothing for this key" and is a
//! different state from a missing entry. Caches live for the process and are
//! unbounded unless a capacity is configured, in which case moka evicts the
//! least valuable entries once the bound is reached.
//!
//! Loads are not coalesced: two requests that miss on the same key at the
//! same time may both go to the network and both write the same value.

use crate::constants::geocoding::COORD_PRECISION;
use crate::geo::ResolvedLocation;
use moka::sync::Cache;
use tracing::trace;

/// Process-wide geocoding memo, cheap to clone and share between requests
#[derive(Clone)]
pub struct GeocodeCache {
    forward: Cache<String, Option<ResolvedLocation>>,
    reverse: Cache<String, Option<String>>,
}

impl GeocodeCache {
    /// Create an unbounded cache
    pub fn new() -> Self {
        Self::with_capacity(None)
    }

    /// Create a cache, bounded per map when `capacity` is set
    pub fn with_capacity(capacity: Option<u64>) -> Self {
        Self {
            forward: build(capacity),
            reverse: build(capacity),
        }
    }

    /// Look up a forward result; the outer `None` means "never looked up"
    pub fn forward_get(&self, text: &str) -> Option<Option<ResolvedLocation>> {
        let hit = self.forward.get(text);
        trace!(text, hit = hit.is_some(), "forward cache lookup");
        hit
    }

    /// Record a forward result, including negative ones
    pub fn forward_put(&self, text: &str, value: Option<ResolvedLocation>) {
        self.forward.insert(text.to_string(), value);
    }

    /// Look up a reverse result by rounded key
    pub fn reverse_get(&self, key: &str) -> Option<Option<String>> {
        let hit = self.reverse.get(key);
        trace!(key, hit = hit.is_some(), "reverse cache lookup");
        hit
    }

    /// Record a reverse result, including negative ones
    pub fn reverse_put(&self, key: &str, value: Option<String>) {
        self.reverse.insert(key.to_string(), value);
    }

    /// Number of forward entries
    pub fn forward_len(&self) -> u64 {
        self.forward.run_pending_tasks();
        self.forward.entry_count()
    }

    /// Number of reverse entries
    pub fn reverse_len(&self) -> u64 {
        self.reverse.run_pending_tasks();
        self.reverse.entry_count()
    }
}

impl Default for GeocodeCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GeocodeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodeCache")
            .field("forward_entries", &self.forward.entry_count())
            .field("reverse_entries", &self.reverse.entry_count())
            .finish()
    }
}

fn build<V: Clone + Send + Sync + 'static>(capacity: Option<u64>) -> Cache<String, V> {
    match capacity {
        Some(max) => Cache::new(max),
        None => Cache::builder().build(),
    }
}

/// Reverse cache key: both axes rounded to six decimals
pub fn reverse_key(lat: f64, lng: f64) -> String {
    format!("{:.prec$},{:.prec$}", lat, lng, prec = COORD_PRECISION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beijing() -> ResolvedLocation {
        ResolvedLocation::new(39.9042, 116.4074)
            .unwrap()
            .with_admin_code(Some("110000".to_string()))
    }

    #[test]
    fn test_forward_miss_then_hit() {
        let cache = GeocodeCache::new();
        assert_eq!(cache.forward_get("北京"), None);

        cache.forward_put("北京", Some(beijing()));
        assert_eq!(cache.forward_get("北京"), Some(Some(beijing())));
    }

    #[test]
    fn test_negative_result_is_distinct_from_missing() {
        let cache = GeocodeCache::new();
        cache.forward_put("nowhere at all", None);

        assert_eq!(cache.forward_get("nowhere at all"), Some(None));
        assert_eq!(cache.forward_get("somewhere else"), None);
    }

    #[test]
    fn test_reverse_entries() {
        let cache = GeocodeCache::new();
        let key = reverse_key(39.9042, 116.4074);

        assert_eq!(cache.reverse_get(&key), None);
        cache.reverse_put(&key, Some("110101".to_string()));
        assert_eq!(cache.reverse_get(&key), Some(Some("110101".to_string())));

        cache.reverse_put("0.000000,0.000000", None);
        assert_eq!(cache.reverse_get("0.000000,0.000000"), Some(None));
    }

    #[test]
    fn test_maps_are_independent() {
        let cache = GeocodeCache::new();
        cache.forward_put("39.904200,116.407400", Some(beijing()));
        assert_eq!(cache.reverse_get("39.904200,116.407400"), None);
    }

    #[test]
    fn test_reverse_key_rounds_to_six_decimals() {
        assert_eq!(reverse_key(39.90420049, 116.4074), "39.904200,116.407400");
        assert_eq!(reverse_key(-0.5, 10.0), "-0.500000,10.000000");
        assert_eq!(reverse_key(1.0000004, 2.0), reverse_key(1.0000001, 2.0));
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = GeocodeCache::new();
        let other = cache.clone();
        cache.forward_put("Paris", None);
        assert_eq!(other.forward_get("Paris"), Some(None));
        assert_eq!(other.forward_len(), 1);
    }

    #[test]
    fn test_bounded_cache_evicts() {
        let cache = GeocodeCache::with_capacity(Some(10));
        for i in 0..200 {
            cache.forward_put(&format!("place {}", i), None);
        }
        assert!(cache.forward_len() <= 10);
    }
}
