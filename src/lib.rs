//! journal-geo: location resolution for a personal journal
//!
//! Journal entries, key dates and photos carry an optional free-text
//! location. This crate turns that text (and/or a raw coordinate string from
//! the device) into the canonical `"<lat>,<lng> <text>"` form that is stored
//! and later re-parsed for the map.
//!
//! ## Features
//!
//! - Coordinate extraction with latitude/longitude order disambiguation
//! - AMap forward and reverse geocoding that degrades to "no result"
//! - Process-wide geocode cache, including negative results
//! - Map marker extraction from stored rows
//! - Repair of rows with swapped coordinates
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use journal_geo::geo::parser;
//!
//! let loc = parser::parse("116.4074,39.9042 Tiananmen").unwrap();
//! assert_eq!(loc.coords_string(), "39.904200,116.407400");
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod geo;
pub mod map;
pub mod repair;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use geo::{GeoBackend, GeocodeCache, LocationResolver, ResolvedLocation};
pub use map::{MapMarker, MapRow, MarkerKind, MarkerQuery};
