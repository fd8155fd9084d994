//! Server shared state
//!
//! One resolver, and so one geocode cache, per process.

use crate::config::Config;
use crate::error::Result;
use crate::geo::{AmapBackend, LocationResolver};
use std::time::Instant;

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration the server was started with
    pub config: Config,

    /// Location resolver shared by all requests
    pub resolver: LocationResolver<AmapBackend>,

    started: Instant,
}

impl AppState {
    /// Create application state, building the provider client from config
    pub fn new(config: Config) -> Result<Self> {
        let resolver = LocationResolver::from_config(&config.geocoding)?;

        Ok(Self {
            config,
            resolver,
            started: Instant::now(),
        })
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
