//! Location resolver
//!
//! Entry point for every entry, key date and photo write. Given the user's
//! free-text location and/or a raw coordinate string, produces the canonical
//! string the row stores verbatim:
//!
//! | coordinates | text | stored                      |
//! |-------------|------|-----------------------------|
//! | yes         | yes  | `"<lat>,<lng> <text>"`      |
//! | yes         | no   | `"<lat>,<lng>"`             |
//! | no          | yes  | `"<text>"`                  |
//! | no          | no   | nothing                     |
//!
//! Coordinates are printed with six decimals. Resolution is best effort and
//! never fails a write.

use crate::config::GeocodingConfig;
use crate::error::Result;
use crate::geo::cache::{reverse_key, GeocodeCache};
use crate::geo::{parser, AmapBackend, GeoBackend, ResolvedLocation};
use tracing::debug;

/// Resolves user-supplied locations through parsing, cache and provider
#[derive(Debug, Clone)]
pub struct LocationResolver<B = AmapBackend> {
    backend: B,
    cache: GeocodeCache,
}

impl<B: GeoBackend> LocationResolver<B> {
    /// Create a resolver owning its backend and cache
    pub fn new(backend: B, cache: GeocodeCache) -> Self {
        Self { backend, cache }
    }

    /// The cache this resolver reads and writes
    pub fn cache(&self) -> &GeocodeCache {
        &self.cache
    }

    /// Build the canonical stored location from the two optional inputs
    ///
    /// A raw coordinate string is only disambiguated, never geocoded. When it
    /// is absent or does not parse, the free text is resolved (which may hit
    /// the provider). Without coordinates the trimmed text is kept as is.
    pub async fn merge(&self, location_text: Option<&str>, coords_text: Option<&str>) -> Option<String> {
        let location_text = non_blank(location_text);
        let coords_text = non_blank(coords_text);

        let mut resolved = coords_text.and_then(parser::parse);
        if resolved.is_none() {
            if let Some(text) = location_text {
                resolved = self.resolve(text).await;
            }
        }

        match resolved {
            Some(loc) => Some(loc.canonical(location_text)),
            None => location_text.map(str::to_string),
        }
    }

    /// Resolve free text to a point with its admin code
    ///
    /// Text that already carries a coordinate pair skips forward geocoding
    /// and only back-fills the admin code through a (cached) reverse lookup.
    /// Anything else is forward geocoded, cache first.
    pub async fn resolve(&self, location_text: &str) -> Option<ResolvedLocation> {
        if let Some(loc) = parser::parse(location_text) {
            let admin_code = self.reverse_admin_code(loc.lat, loc.lng).await;
            return Some(loc.with_admin_code(admin_code));
        }
        self.forward(location_text).await
    }

    async fn forward(&self, text: &str) -> Option<ResolvedLocation> {
        if text.is_empty() {
            return None;
        }
        if let Some(cached) = self.cache.forward_get(text) {
            debug!(text, found = cached.is_some(), "forward geocode served from cache");
            return cached;
        }

        let result = self.backend.forward_geocode(text).await;
        self.cache.forward_put(text, result.clone());
        result
    }

    async fn reverse_admin_code(&self, lat: f64, lng: f64) -> Option<String> {
        let key = reverse_key(lat, lng);
        if let Some(cached) = self.cache.reverse_get(&key) {
            debug!(key = %key, "reverse geocode served from cache");
            return cached;
        }

        let result = self.backend.reverse_geocode(lat, lng).await;
        self.cache.reverse_put(&key, result.clone());
        result
    }
}

impl LocationResolver<AmapBackend> {
    /// Provider-backed resolver with a fresh cache sized from config
    pub fn from_config(config: &GeocodingConfig) -> Result<Self> {
        let backend = AmapBackend::from_config(config)?;
        Ok(Self::new(backend, GeocodeCache::with_capacity(config.capacity())))
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}
