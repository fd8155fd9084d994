//! Parse, resolve and merge command handlers
//!
//! One-shot versions of what the server does for each journal write.

use crate::config::Config;
use crate::error::Result;
use crate::geo::{parser, LocationResolver, ResolvedLocation};
use clap::Args;

/// Parse command arguments
#[derive(Args)]
pub struct ParseArgs {
    /// Text containing a coordinate pair
    pub text: String,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Resolve command arguments
#[derive(Args)]
pub struct ResolveArgs {
    /// Free-text location (address, place name or coordinates)
    pub location: String,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Merge command arguments
#[derive(Args)]
pub struct MergeArgs {
    /// Free-text location typed by the user
    #[arg(long, short = 'l')]
    pub location: Option<String>,

    /// Raw coordinate string, e.g. "87.6,43.7"
    #[arg(long, short = 'c')]
    pub coords: Option<String>,
}

/// Run the parse command
pub fn parse(args: ParseArgs) -> Result<()> {
    print_resolved(parser::parse(&args.text).as_ref(), args.json)
}

/// Run the resolve command
pub async fn resolve(args: ResolveArgs) -> Result<()> {
    super::init_logging("warn");

    let config = Config::load()?;
    let resolver = LocationResolver::from_config(&config.geocoding)?;
    let resolved = resolver.resolve(args.location.trim()).await;

    print_resolved(resolved.as_ref(), args.json)
}

/// Run the merge command
pub async fn merge(args: MergeArgs) -> Result<()> {
    super::init_logging("warn");

    let config = Config::load()?;
    let resolver = LocationResolver::from_config(&config.geocoding)?;

    if let Some(location) = resolver
        .merge(args.location.as_deref(), args.coords.as_deref())
        .await
    {
        println!("{}", location);
    }

    Ok(())
}

fn print_resolved(resolved: Option<&ResolvedLocation>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    match resolved {
        Some(loc) => {
            println!("Latitude:   {:.6}", loc.lat);
            println!("Longitude:  {:.6}", loc.lng);
            if let Some(code) = &loc.admin_code {
                println!("Admin code: {}", code);
            }
        }
        None => eprintln!("No coordinates found"),
    }

    Ok(())
}
