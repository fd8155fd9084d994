//! journal-geo CLI entry point
//!
//! Location resolution service - CLI + HTTP API

use journal_geo::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
