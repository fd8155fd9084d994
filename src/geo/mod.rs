//! Location resolution
//!
//! Turns free-text locations and raw coordinate strings into the canonical
//! `"<lat>,<lng> <text>"` form that journal rows persist. Enrichment is best
//! effort: every lookup in this module answers with an `Option`, never an error.
//!
//! - [`parser`]: pure coordinate extraction with axis-order disambiguation
//! - [`cache`]: process-wide memoization of forward and reverse lookups
//! - [`amap`]: the remote geocoding provider client
//! - [`resolver`]: orchestration of the above for write paths

pub mod amap;
pub mod cache;
pub mod parser;
pub mod resolver;

use crate::constants::geocoding::COORD_PRECISION;
use serde::{Deserialize, Serialize};
use std::future::Future;

pub use amap::AmapBackend;
pub use cache::GeocodeCache;
pub use resolver::LocationResolver;

/// A resolved point, always range-valid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    /// Latitude in [-90, 90]
    pub lat: f64,
    /// Longitude in [-180, 180]
    pub lng: f64,
    /// Provider administrative region code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_code: Option<String>,
}

impl ResolvedLocation {
    /// Build a location if the pair is range-valid
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        is_valid_pair(lat, lng).then_some(Self {
            lat,
            lng,
            admin_code: None,
        })
    }

    /// Attach an admin code
    pub fn with_admin_code(mut self, admin_code: Option<String>) -> Self {
        self.admin_code = admin_code;
        self
    }

    /// The `"<lat>,<lng>"` prefix of the canonical string
    pub fn coords_string(&self) -> String {
        format!(
            "{:.prec$},{:.prec$}",
            self.lat,
            self.lng,
            prec = COORD_PRECISION
        )
    }

    /// Canonical stored form, with the user's text appended when present
    pub fn canonical(&self, text: Option<&str>) -> String {
        match text {
            Some(text) if !text.is_empty() => format!("{} {}", self.coords_string(), text),
            _ => self.coords_string(),
        }
    }
}

/// Check latitude in [-90, 90] and longitude in [-180, 180]
pub fn is_valid_pair(lat: f64, lng: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

/// Trait for geocoding backends
///
/// Both lookups swallow their own failures: `None` covers "not found",
/// timeouts, transport errors and malformed responses alike.
pub trait GeoBackend: Send + Sync {
    /// Forward geocode an address to a point with its admin code
    fn forward_geocode(&self, address: &str) -> impl Future<Output = Option<ResolvedLocation>> + Send;

    /// Reverse geocode a point to its admin code
    fn reverse_geocode(&self, lat: f64, lng: f64) -> impl Future<Output = Option<String>> + Send;
}
