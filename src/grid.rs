use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// A parsed dataset: row 0 is the header, the rest are data rows.
///
/// Serializes as a plain JSON array of arrays of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Fails with `EmptyOrInvalidInput` unless there is a header and at least one data row.
    pub fn validated(self) -> Result<Self, DatasetError> {
        if self.rows.len() < 2 {
            return Err(DatasetError::EmptyOrInvalidInput);
        }
        Ok(self)
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Number of data rows (header excluded).
    pub fn record_count(&self) -> usize {
        self.data_rows().len()
    }

    /// First `n` rows, header included.
    pub fn preview(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..n.min(self.rows.len())]
    }
}

/// Cell `idx` of `row`; rows shorter than the header read as missing.
pub fn cell(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx).map(String::as_str)
}
