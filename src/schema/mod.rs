//! Locating the semantic columns of a dataset by header name.

use std::collections::HashMap;

use tracing::debug;

use crate::error::DatasetError;

pub mod types;

pub use types::ApplianceColumn;

pub const DATE: &str = "Date";
pub const UNITS: &str = "Units";
pub const MONTH: &str = "Month";

/// Substring that marks a per-appliance energy column.
pub const APPLIANCE_MARKER: &str = "(Units)";

/// Trimmed column name → zero-based index. Names are case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    map: HashMap<String, usize>,
}

impl HeaderMap {
    pub fn get(&self, name: &str) -> Option<usize> {
        self.map.get(name).copied()
    }

    /// Index of a column the caller cannot do without.
    pub fn require(&self, name: &str) -> Result<usize, DatasetError> {
        self.get(name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
    }
}

/// Build the name → index map. When a name repeats, the last occurrence wins.
pub fn resolve_header(header: &[String]) -> HeaderMap {
    let mut map = HashMap::with_capacity(header.len());
    for (idx, name) in header.iter().enumerate() {
        map.insert(name.trim().to_string(), idx);
    }
    HeaderMap { map }
}

/// Every column whose name contains `(Units)`, in header order.
pub fn resolve_appliances(header: &[String]) -> Vec<ApplianceColumn> {
    let appliances: Vec<ApplianceColumn> = header
        .iter()
        .enumerate()
        .filter(|(_, name)| name.contains(APPLIANCE_MARKER))
        .map(|(idx, name)| {
            let label = name.split('(').next().unwrap_or_default().trim();
            ApplianceColumn::new(label, idx)
        })
        .collect();
    debug!(count = appliances.len(), "resolved appliance columns");
    appliances
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn appliances_in_header_order() {
        let h = header(&["Date", "Fan(Units)", "Fridge(Units)", "Temp"]);
        assert_eq!(
            resolve_appliances(&h),
            vec![ApplianceColumn::new("Fan", 1), ApplianceColumn::new("Fridge", 2)]
        );
    }

    #[test]
    fn appliance_label_is_trimmed_prefix() {
        let h = header(&["Air Conditioner (Units)", "TV(Units) (kWh)", "Fan", "Fan(hours)"]);
        assert_eq!(
            resolve_appliances(&h),
            vec![
                ApplianceColumn::new("Air Conditioner", 0),
                ApplianceColumn::new("TV", 1),
            ]
        );
    }

    #[test]
    fn header_map_trims_and_last_duplicate_wins() {
        let map = resolve_header(&header(&[" Date ", "Units", "Units"]));
        assert_eq!(map.get("Date"), Some(0));
        assert_eq!(map.get("Units"), Some(2));
        assert_eq!(map.get("date"), None);
        assert_eq!(map.get(" Date "), None);
    }

    #[test]
    fn missing_required_column() {
        let map = resolve_header(&header(&["Date", "Fan(Units)"]));
        assert_eq!(map.require(DATE), Ok(0));
        assert_eq!(
            map.require(UNITS),
            Err(DatasetError::MissingColumn("Units".into()))
        );
        assert_eq!(
            map.require(MONTH).unwrap_err().to_string(),
            "'Month' column not found in dataset"
        );
    }
}
