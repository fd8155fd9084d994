//! Centralized constants for the journal-geo crate

/// External API endpoints
pub mod api {
    /// AMap web service REST API (v3)
    pub const AMAP_URL: &str = "https://restapi.amap.com/v3";

    /// Environment variable holding the AMap web service key
    pub const AMAP_KEY_ENV: &str = "AMAP_WEB_KEY";
}

/// Geocoding behaviour
pub mod geocoding {
    /// Per-request timeout for the geocoding provider
    pub const REQUEST_TIMEOUT_SECS: u64 = 5;

    /// Decimal digits used in canonical strings and reverse cache keys
    pub const COORD_PRECISION: usize = 6;

    /// Status value the provider uses for a successful forward lookup
    pub const STATUS_OK: &str = "1";
}

/// Map marker extraction
pub mod map {
    /// Maximum characters of entry text carried in a marker snippet
    pub const SNIPPET_MAX_CHARS: usize = 120;

    /// Markers returned when the caller gives no limit
    pub const DEFAULT_MARKER_LIMIT: usize = 800;

    /// Upper bound on markers per request
    pub const MAX_MARKER_LIMIT: usize = 2000;
}
