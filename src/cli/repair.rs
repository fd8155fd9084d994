//! Repair command handler
//!
//! Scans an export of geocoded rows for swapped latitude/longitude and
//! optionally rewrites the file with the pairs swapped back.

use crate::error::Result;
use crate::repair::{self, Finding};
use clap::Args;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Repair command arguments
#[derive(Args)]
pub struct RepairArgs {
    /// JSON file of exported rows: [{"table", "id", "lat", "lng", "location"}]
    pub file: PathBuf,

    /// Rewrite the file with fixes applied (default only reports)
    #[arg(long)]
    pub fix: bool,

    /// Don't ask for confirmation before fixing
    #[arg(long)]
    pub force: bool,
}

/// Run the repair command
pub fn run(args: RepairArgs) -> Result<()> {
    let mut records = repair::load_records(&args.file)?;
    let report = repair::analyze(&records);

    println!("Mode: {}", if args.fix { "fix" } else { "dry run" });
    println!();

    for (table, summary) in &report.tables {
        println!(
            "{}: {}/{} records need fixing",
            table, summary.needs_swap, summary.checked
        );
    }
    if !report.flagged.is_empty() {
        println!();
    }

    for flagged in &report.flagged {
        let note = match flagged.finding {
            Finding::NeedsSwap => "latitude out of range, will swap",
            Finding::LatitudeOutOfRange => "latitude out of range, swap would not help",
            Finding::LongitudeOutOfRange => "longitude out of range, not fixed",
        };
        println!(
            "  {} #{}: lat={} lng={} ({})",
            flagged.table, flagged.id, flagged.lat, flagged.lng, note
        );
    }

    println!();
    println!("Checked: {}", report.checked());
    println!("Need fixing: {}", report.needs_swap());

    if report.needs_swap() == 0 {
        println!("No swapped coordinates found.");
        return Ok(());
    }

    if !args.fix {
        println!("Dry run only; rerun with --fix to rewrite {}", args.file.display());
        return Ok(());
    }

    if !args.force && !confirm(&format!("Rewrite {}? Type 'yes' to continue: ", args.file.display()))? {
        println!("Cancelled.");
        return Ok(());
    }

    let fixed = repair::apply(&mut records);
    repair::save_records(&args.file, &records)?;
    println!("Fixed: {}", fixed);

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}
