// src/schema/types.rs

use serde::{Deserialize, Serialize};

/// A header column holding per-appliance energy units, e.g. `Fan(Units)` at index 3.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq, Hash)]
pub struct ApplianceColumn {
    /// Column name with the `(Units)` suffix (and anything after the first `(`) removed.
    pub label: String,
    pub index: usize,
}

impl ApplianceColumn {
    pub fn new(label: impl Into<String>, index: usize) -> Self {
        Self {
            label: label.into(),
            index,
        }
    }
}
