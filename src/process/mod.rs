// src/process/mod.rs
use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::{error::DatasetError, grid::Grid};

pub mod date_parser;
pub mod utils;

use utils::clean_cell;

/// Field separator picked from the header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Tab,
    Comma,
    Semicolon,
    /// Runs of spaces and/or tabs.
    Whitespace,
}

impl Delimiter {
    /// Best-effort guess from the first non-empty line: tab, then comma, then
    /// semicolon, falling back to whitespace. A header whose names contain commas
    /// but which is really space-separated will be misread; nothing here checks that.
    pub fn detect(first_line: &str) -> Self {
        if first_line.contains('\t') {
            Delimiter::Tab
        } else if first_line.contains(',') {
            Delimiter::Comma
        } else if first_line.contains(';') {
            Delimiter::Semicolon
        } else {
            Delimiter::Whitespace
        }
    }

    fn as_byte(self) -> Option<u8> {
        match self {
            Delimiter::Tab => Some(b'\t'),
            Delimiter::Comma => Some(b','),
            Delimiter::Semicolon => Some(b';'),
            Delimiter::Whitespace => None,
        }
    }
}

/// Parse uploaded text into a `Grid`.
///
/// Line endings are normalized and blank lines dropped before the delimiter is
/// detected. Each cell loses a leading BOM, surrounding whitespace and one pair
/// of surrounding double quotes. Quotes do not protect embedded delimiters.
/// Rows may be ragged.
///
/// Fails with `EmptyOrInvalidInput` when fewer than two lines remain.
#[tracing::instrument(level = "debug", skip(raw), fields(bytes = raw.len()))]
pub fn parse_text(raw: &str) -> Result<Grid, DatasetError> {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized
        .split('\n')
        .filter(|l| !l.trim().is_empty())
        .collect();
    if lines.len() < 2 {
        return Err(DatasetError::EmptyOrInvalidInput);
    }

    let delimiter = Delimiter::detect(lines[0]);
    let rows = match delimiter.as_byte() {
        Some(byte) => split_delimited(&lines, byte),
        None => lines
            .iter()
            .map(|line| line.split_whitespace().map(clean_cell).collect())
            .collect(),
    };

    debug!(?delimiter, rows = rows.len(), "parsed dataset");
    Grid::new(rows).validated()
}

fn split_delimited(lines: &[&str], delimiter: u8) -> Vec<Vec<String>> {
    let joined = lines.join("\n");
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // ragged rows are fine, short cells read as missing later
        .quoting(false)
        .delimiter(delimiter)
        .from_reader(joined.as_bytes());

    let mut rows = Vec::with_capacity(lines.len());
    for (idx, result) in rdr.records().enumerate() {
        match result {
            Ok(record) => rows.push(record.iter().map(clean_cell).collect()),
            Err(e) => warn!(line = idx, error = %e, "skipping unreadable line"),
        }
    }
    rows
}
