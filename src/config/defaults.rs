//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants::{api, geocoding};

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 8765;

/// Default geocoding endpoint
pub const DEFAULT_ENDPOINT: &str = api::AMAP_URL;

/// Default request timeout for geocoding calls
pub const DEFAULT_TIMEOUT_SECS: u64 = geocoding::REQUEST_TIMEOUT_SECS;

/// Default cache capacity per geocode cache (0 = unbounded)
pub const DEFAULT_CACHE_CAPACITY: u64 = 0;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "journal-geo";
