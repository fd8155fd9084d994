//! Map markers
//!
//! The map view plots whatever the stored location strings yield when parsed
//! again with [`crate::geo::parser`]. Rows whose location is blank or does not
//! contain a valid pair are left off the map without error.

use crate::constants::map::{DEFAULT_MARKER_LIMIT, MAX_MARKER_LIMIT, SNIPPET_MAX_CHARS};
use crate::geo::parser;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Kind of journal row a marker comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// Text entry
    Entry,
    /// Anniversary / key date
    #[serde(rename = "keydate")]
    KeyDate,
    /// Uploaded photo
    Photo,
}

impl std::fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entry => write!(f, "entry"),
            Self::KeyDate => write!(f, "keydate"),
            Self::Photo => write!(f, "photo"),
        }
    }
}

/// Which kinds of rows to plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    #[default]
    All,
    Only(MarkerKind),
}

impl KindFilter {
    /// Whether rows of `kind` pass the filter
    pub fn accepts(&self, kind: MarkerKind) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => *only == kind,
        }
    }
}

impl std::str::FromStr for KindFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "entry" | "text" => Ok(Self::Only(MarkerKind::Entry)),
            "photo" | "img" | "image" => Ok(Self::Only(MarkerKind::Photo)),
            "keydate" | "date" | "anniversary" => Ok(Self::Only(MarkerKind::KeyDate)),
            _ => Err(format!("Unknown marker type: {}", s)),
        }
    }
}

/// A journal row as returned by the map query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapRow {
    pub id: i64,
    pub kind: MarkerKind,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Comma-separated tag list
    #[serde(default)]
    pub tags: Option<String>,
}

impl MapRow {
    /// Case-insensitive substring match over content, title, caption and location
    fn matches_search(&self, needle: &str) -> bool {
        [&self.content, &self.title, &self.caption, &self.location]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle))
    }

    /// Whether `tag` is one of the comma-separated tags, ignoring case
    fn has_tag(&self, tag: &str) -> bool {
        self.tags
            .as_deref()
            .is_some_and(|tags| tags.to_lowercase().split(',').any(|t| t == tag))
    }
}

/// Which rows to plot and how many
#[derive(Debug, Clone, Default)]
pub struct MarkerQuery {
    pub kind: KindFilter,
    /// Substring searched in content, title, caption and location
    pub search: Option<String>,
    /// Exact entry of the row's tag list
    pub tag: Option<String>,
    pub limit: Option<usize>,
}

impl MarkerQuery {
    /// Query for every kind with no text filters
    pub fn new(kind: KindFilter) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Trimmed, lowercased text filter; blank means no filter
fn normalized(text: Option<&str>) -> Option<String> {
    text.map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty())
}

/// A plottable point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub id: i64,
    pub kind: MarkerKind,
    pub lat: f64,
    pub lng: f64,
    /// The stored location string, trimmed
    pub label: String,
    /// ISO-8601 timestamp
    pub timestamp: String,
    pub snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl MapMarker {
    /// Build a marker from a row, or `None` if its location has no valid pair
    pub fn from_row(row: &MapRow) -> Option<Self> {
        let label = row.location.as_deref()?.trim();
        if label.is_empty() {
            return None;
        }
        // Pairs with both values within 90 parse longitude first, so a stored
        // "48.856600,2.352200" plots at lat 2.35. That is the parser's axis
        // rule, not a parse failure here.
        let coords = parser::parse(label)?;

        let snippet_source = [&row.content, &row.caption, &row.title]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .map(String::as_str)
            .unwrap_or("");

        Some(Self {
            id: row.id,
            kind: row.kind,
            lat: coords.lat,
            lng: coords.lng,
            label: label.to_string(),
            timestamp: row.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
            snippet: snippet_source.chars().take(SNIPPET_MAX_CHARS).collect(),
            image: row.image.clone(),
        })
    }
}

/// Clamp a requested marker limit into `1..=MAX_MARKER_LIMIT`
pub fn clamp_limit(limit: Option<usize>) -> usize {
    limit
        .unwrap_or(DEFAULT_MARKER_LIMIT)
        .clamp(1, MAX_MARKER_LIMIT)
}

/// Build markers, newest first
///
/// Rows are filtered by kind, search text and tag, then ordered by timestamp
/// before the limit is applied; rows without plottable coordinates are then
/// dropped, so fewer than `limit` markers may come back.
pub fn build_markers(rows: &[MapRow], query: &MarkerQuery) -> Vec<MapMarker> {
    let search = normalized(query.search.as_deref());
    let tag = normalized(query.tag.as_deref());

    let mut selected: Vec<&MapRow> = rows
        .iter()
        .filter(|row| query.kind.accepts(row.kind))
        .filter(|row| {
            row.location
                .as_deref()
                .is_some_and(|l| !l.trim().is_empty())
        })
        .filter(|row| search.as_deref().map_or(true, |s| row.matches_search(s)))
        .filter(|row| tag.as_deref().map_or(true, |t| row.has_tag(t)))
        .collect();

    selected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    selected.truncate(clamp_limit(query.limit));

    selected.into_iter().filter_map(MapMarker::from_row).collect()
}
