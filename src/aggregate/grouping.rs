use crate::grid::cell;
use crate::process::date_parser::month_key;

/// How a data row is assigned to a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    /// The raw date string, verbatim. `05/01/2024` and `2024-01-05` are different days.
    Day(usize),
    /// `YYYY-MM` derived from the date column; unparseable dates drop the row.
    Month(usize),
    /// The raw value of a dedicated `Month` column.
    MonthColumn(usize),
}

impl GroupKey {
    /// Key for `row`, or `None` when the row belongs to no bucket.
    pub fn key_for(&self, row: &[String]) -> Option<String> {
        match *self {
            GroupKey::Day(idx) | GroupKey::MonthColumn(idx) => cell(row, idx)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            GroupKey::Month(idx) => cell(row, idx).and_then(month_key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn keys() {
        let r = row(&["05-01-2024", "3", " 1 "]);
        assert_eq!(GroupKey::Day(0).key_for(&r).as_deref(), Some("05-01-2024"));
        assert_eq!(GroupKey::Month(0).key_for(&r).as_deref(), Some("2024-01"));
        assert_eq!(GroupKey::MonthColumn(2).key_for(&r).as_deref(), Some("1"));
    }

    #[test]
    fn missing_or_blank_cells_have_no_key() {
        let r = row(&["", "3"]);
        assert_eq!(GroupKey::Day(0).key_for(&r), None);
        assert_eq!(GroupKey::Day(5).key_for(&r), None);
        assert_eq!(GroupKey::Month(1).key_for(&r), None);
        assert_eq!(GroupKey::MonthColumn(9).key_for(&r), None);
    }
}
