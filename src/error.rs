//! Errors surfaced by parsing and column resolution.
//!
//! Numeric cells that fail to parse are not errors: they contribute zero to
//! every sum (see `aggregate::units_or_zero`).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DatasetError {
    /// Fewer than two usable lines: no header, or a header with no data rows.
    #[error("could not parse the dataset: expected a header row and at least one data row")]
    EmptyOrInvalidInput,

    #[error("'{0}' column not found in dataset")]
    MissingColumn(String),

    #[error("no dataset uploaded yet")]
    NoDataset,

    #[error("no appliance '(Units)' columns found")]
    NoApplianceColumns,
}
