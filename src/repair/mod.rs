//! Swapped coordinate repair
//!
//! Rows written before the axis-order fix may hold the longitude in `lat`.
//! A record with `|lat| > 90` whose `lng` is a valid latitude is flagged and,
//! when fixing, has its two fields swapped. Records that stay out of range
//! after a swap, or with an out-of-range longitude but a valid latitude, are
//! reported only; there is no safe automatic fix for them.
//!
//! Records come from a JSON export of the geocoded rows of the entry, key date
//! and photo tables: `[{"table": "entry", "id": 1, "lat": .., "lng": .., "location": ..}]`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A geocoded row as exported from storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoRecord {
    pub table: String,
    pub id: i64,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Why a record was flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Finding {
    /// Latitude outside [-90, 90]; the fields are swapped
    NeedsSwap,
    /// Latitude outside [-90, 90] and swapping would not help; left untouched
    LatitudeOutOfRange,
    /// Longitude outside [-180, 180]; left untouched
    LongitudeOutOfRange,
}

/// A flagged record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedRecord {
    pub table: String,
    pub id: i64,
    pub lat: f64,
    pub lng: f64,
    pub finding: Finding,
}

/// Per-table counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    /// Records with both coordinates present
    pub checked: usize,
    /// Records needing a swap
    pub needs_swap: usize,
}

/// Result of scanning a set of records
#[derive(Debug, Clone, Default, Serialize)]
pub struct RepairReport {
    pub tables: BTreeMap<String, TableSummary>,
    pub flagged: Vec<FlaggedRecord>,
}

impl RepairReport {
    /// Records with both coordinates present
    pub fn checked(&self) -> usize {
        self.tables.values().map(|t| t.checked).sum()
    }

    /// Records that [`apply`] would swap
    pub fn needs_swap(&self) -> usize {
        self.tables.values().map(|t| t.needs_swap).sum()
    }

    /// Records reported but not fixable
    pub fn anomalies(&self) -> impl Iterator<Item = &FlaggedRecord> {
        self.flagged
            .iter()
            .filter(|f| f.finding != Finding::NeedsSwap)
    }
}

fn classify(lat: f64, lng: f64) -> Option<Finding> {
    if lat.abs() > 90.0 {
        if lng.abs() <= 90.0 && lat.abs() <= 180.0 {
            Some(Finding::NeedsSwap)
        } else {
            Some(Finding::LatitudeOutOfRange)
        }
    } else if lng.abs() > 180.0 {
        Some(Finding::LongitudeOutOfRange)
    } else {
        None
    }
}

/// Scan records without modifying them
pub fn analyze(records: &[GeoRecord]) -> RepairReport {
    let mut report = RepairReport::default();

    for record in records {
        let (Some(lat), Some(lng)) = (record.lat, record.lng) else {
            continue;
        };

        let summary = report.tables.entry(record.table.clone()).or_default();
        summary.checked += 1;

        if let Some(finding) = classify(lat, lng) {
            if finding == Finding::NeedsSwap {
                summary.needs_swap += 1;
            }
            report.flagged.push(FlaggedRecord {
                table: record.table.clone(),
                id: record.id,
                lat,
                lng,
                finding,
            });
        }
    }

    report
}

/// Swap lat/lng on every record flagged [`Finding::NeedsSwap`]; returns the number fixed
pub fn apply(records: &mut [GeoRecord]) -> usize {
    let mut fixed = 0;
    for record in records.iter_mut() {
        if let (Some(lat), Some(lng)) = (record.lat, record.lng) {
            if classify(lat, lng) == Some(Finding::NeedsSwap) {
                record.lat = Some(lng);
                record.lng = Some(lat);
                fixed += 1;
            }
        }
    }
    fixed
}

/// Read records from a JSON file
pub fn load_records(path: &Path) -> Result<Vec<GeoRecord>> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Repair(format!("Failed to read {}: {}", path.display(), e)))?;
    Ok(serde_json::from_str(&content)?)
}

/// Write records back as pretty JSON
pub fn save_records(path: &Path, records: &[GeoRecord]) -> Result<()> {
    let content = serde_json::to_string_pretty(records)?;
    fs::write(path, content)
        .map_err(|e| Error::Repair(format!("Failed to write {}: {}", path.display(), e)))
}
