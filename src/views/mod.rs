//! What each dashboard page shows, computed from the stored grid and, for some
//! pages, the analytics service.

use serde::Serialize;

use crate::aggregate::Bucket;
use crate::process::date_parser::month_label;

pub mod dashboard;
pub mod distribution;
pub mod forecast;
pub mod overview;
pub mod recommendation;

/// Rows shown after an upload.
pub const PREVIEW_ROWS: usize = 6;

/// One point of a keyed series (a day, a month).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub key: String,
    /// Human label; `Jan 2024` for month keys, the key itself otherwise.
    pub label: String,
    pub units: f64,
}

pub(crate) fn series(bucket: &Bucket, months: bool) -> Vec<SeriesPoint> {
    bucket
        .iter()
        .map(|(key, &units)| SeriesPoint {
            key: key.clone(),
            label: display_label(key, months),
            units,
        })
        .collect()
}

pub(crate) fn display_label(key: &str, months: bool) -> String {
    if months {
        month_label(key).unwrap_or_else(|| key.to_string())
    } else {
        key.to_string()
    }
}
