//! Sums over a `Grid`, grouped by day, month or appliance.
//!
//! Every function here is pure. Units cells that fail to parse count as zero and
//! are never reported as errors; a row that yields a grouping key always shows up
//! in the bucket, even if it adds nothing.

use std::{cmp::Ordering, collections::HashSet};

use crate::grid::{cell, Grid};
use crate::schema::ApplianceColumn;

pub mod bucket;
pub mod grouping;

pub use crate::process::utils::{parse_units, units_or_zero};
pub use bucket::{highest_and_lowest, Bucket, Extreme, Extremes, MonthApplianceMatrix};
pub use grouping::GroupKey;

/// Shared summation routine: group rows by `key`, add up column `value_idx`.
pub fn sum_grouped(grid: &Grid, key: GroupKey, value_idx: usize) -> Bucket {
    let mut bucket = Bucket::new();
    for row in grid.data_rows() {
        let Some(k) = key.key_for(row) else {
            continue;
        };
        *bucket.entry(k).or_insert(0.0) += units_or_zero(cell(row, value_idx));
    }
    bucket
}

/// Units per raw date string.
pub fn sum_by_day(grid: &Grid, date_idx: usize, units_idx: usize) -> Bucket {
    sum_grouped(grid, GroupKey::Day(date_idx), units_idx)
}

/// Units per `YYYY-MM`, skipping rows whose date does not parse.
pub fn sum_by_month(grid: &Grid, date_idx: usize, units_idx: usize) -> Bucket {
    sum_grouped(grid, GroupKey::Month(date_idx), units_idx)
}

/// Total of each appliance column over all data rows, in header order.
pub fn sum_by_appliance(grid: &Grid, appliances: &[ApplianceColumn]) -> Vec<(String, f64)> {
    appliances
        .iter()
        .map(|a| {
            let total = grid
                .data_rows()
                .iter()
                .map(|row| units_or_zero(cell(row, a.index)))
                .sum();
            (a.label.clone(), total)
        })
        .collect()
}

/// Month key → appliance → total, using the date column for month keys.
pub fn sum_by_month_and_appliance(
    grid: &Grid,
    date_idx: usize,
    appliances: &[ApplianceColumn],
) -> MonthApplianceMatrix {
    sum_by_group_and_appliance(grid, GroupKey::Month(date_idx), appliances)
}

/// Group rows by `key` and total each appliance within each group.
///
/// Every group carries every appliance label, zero when nothing parsed.
pub fn sum_by_group_and_appliance(
    grid: &Grid,
    key: GroupKey,
    appliances: &[ApplianceColumn],
) -> MonthApplianceMatrix {
    let mut matrix = MonthApplianceMatrix::new();
    for row in grid.data_rows() {
        let Some(k) = key.key_for(row) else {
            continue;
        };
        let per_appliance = matrix.entry(k).or_insert_with(|| {
            appliances
                .iter()
                .map(|a| (a.label.clone(), 0.0))
                .collect()
        });
        for a in appliances {
            *per_appliance.entry(a.label.clone()).or_insert(0.0) +=
                units_or_zero(cell(row, a.index));
        }
    }
    matrix
}

/// Sum of the units column over every data row.
pub fn total_units(grid: &Grid, units_idx: usize) -> f64 {
    grid.data_rows()
        .iter()
        .map(|row| units_or_zero(cell(row, units_idx)))
        .sum()
}

/// Number of distinct non-empty date strings.
pub fn distinct_days(grid: &Grid, date_idx: usize) -> usize {
    grid.data_rows()
        .iter()
        .filter_map(|row| GroupKey::Day(date_idx).key_for(row))
        .collect::<HashSet<_>>()
        .len()
}

/// Distinct non-empty values of a `Month` column. Numeric values sort by value
/// and come first, anything else follows in lexical order.
pub fn unique_months(grid: &Grid, month_idx: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut months: Vec<String> = grid
        .data_rows()
        .iter()
        .filter_map(|row| GroupKey::MonthColumn(month_idx).key_for(row))
        .filter(|m| seen.insert(m.clone()))
        .collect();
    months.sort_by(compare_months);
    months
}

fn compare_months(a: &String, b: &String) -> Ordering {
    let num = |s: &str| s.parse::<f64>().ok().filter(|v| v.is_finite());
    match (num(a), num(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Grid {
        Grid::new(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn appliances() -> Vec<ApplianceColumn> {
        vec![ApplianceColumn::new("Fan", 1), ApplianceColumn::new("Fridge", 2)]
    }

    #[test]
    fn appliance_totals_in_header_order() {
        let g = grid(&[
            &["Date", "Fan(Units)", "Fridge(Units)"],
            &["2024-01-01", "2", "3"],
            &["2024-01-02", "4", "1"],
        ]);
        assert_eq!(
            sum_by_appliance(&g, &appliances()),
            vec![("Fan".to_string(), 6.0), ("Fridge".to_string(), 4.0)]
        );
    }

    #[test]
    fn monthly_totals() {
        let g = grid(&[
            &["Date", "Units"],
            &["2024-01-05", "1"],
            &["2024-01-20", "2"],
            &["2024-02-01", "3"],
            &["not a date", "100"],
        ]);
        let by_month = sum_by_month(&g, 0, 1);
        assert_eq!(by_month.len(), 2);
        assert_eq!(by_month["2024-01"], 3.0);
        assert_eq!(by_month["2024-02"], 3.0);
        let keys: Vec<_> = by_month.keys().cloned().collect();
        assert_eq!(keys, vec!["2024-01", "2024-02"]);
    }

    #[test]
    fn daily_keys_are_raw_strings_but_months_collapse() {
        let g = grid(&[
            &["Date", "Units"],
            &["2024-01-05", "1"],
            &["05/01/2024", "2"],
            &["2024-01-05", "4"],
        ]);
        let by_day = sum_by_day(&g, 0, 1);
        assert_eq!(by_day.len(), 2);
        assert_eq!(by_day["2024-01-05"], 5.0);
        assert_eq!(by_day["05/01/2024"], 2.0);

        let by_month = sum_by_month(&g, 0, 1);
        assert_eq!(by_month.len(), 1);
        assert_eq!(by_month["2024-01"], 7.0);
    }

    #[test]
    fn non_numeric_cells_contribute_zero() {
        let g = grid(&[
            &["Date", "Units", "Fan(Units)", "Fridge(Units)"],
            &["2024-01-01", "N/A", "N/A", "1,000"],
            &["2024-01-02", "2"],
            &["2024-01-02", "3", "1", "x"],
        ]);
        let by_day = sum_by_day(&g, 0, 1);
        assert_eq!(by_day["2024-01-01"], 0.0);
        assert_eq!(by_day["2024-01-02"], 5.0);
        assert_eq!(total_units(&g, 1), 5.0);

        let cols = vec![ApplianceColumn::new("Fan", 2), ApplianceColumn::new("Fridge", 3)];
        assert_eq!(
            sum_by_appliance(&g, &cols),
            vec![("Fan".to_string(), 1.0), ("Fridge".to_string(), 1000.0)]
        );
    }

    #[test]
    fn units_with_trailing_text_keep_their_value() {
        let g = grid(&[
            &["Date", "Units"],
            &["2024-01-01", "3.5 kWh"],
            &["2024-01-02", "12kWh"],
            &["2024-01-02", "kWh 3"],
        ]);
        assert_eq!(total_units(&g, 1), 15.5);
        assert_eq!(sum_by_day(&g, 0, 1)["2024-01-02"], 12.0);
    }

    #[test]
    fn rows_without_date_are_skipped() {
        let g = grid(&[&["Date", "Units"], &["", "9"], &["2024-03-01", "1"]]);
        assert_eq!(sum_by_day(&g, 0, 1).len(), 1);
        assert_eq!(distinct_days(&g, 0), 1);
        // the total still counts every row
        assert_eq!(total_units(&g, 1), 10.0);
    }

    #[test]
    fn month_and_appliance_matrix_is_zero_filled() {
        let g = grid(&[
            &["Date", "Fan(Units)", "Fridge(Units)"],
            &["2024-01-01", "2", "3"],
            &["2024-01-15", "1", ""],
            &["2024-02-01", "", "5"],
            &["bad", "7", "7"],
        ]);
        let matrix = sum_by_month_and_appliance(&g, 0, &appliances());
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix["2024-01"]["Fan"], 3.0);
        assert_eq!(matrix["2024-01"]["Fridge"], 3.0);
        assert_eq!(matrix["2024-02"]["Fan"], 0.0);
        assert_eq!(matrix["2024-02"]["Fridge"], 5.0);
        let labels: Vec<_> = matrix["2024-02"].keys().cloned().collect();
        assert_eq!(labels, vec!["Fan", "Fridge"]);
    }

    #[test]
    fn grouping_by_month_column() {
        let g = grid(&[
            &["Month", "Fan(Units)", "Fridge(Units)"],
            &["2", "0.29", "1"],
            &["2", "0.3", "1"],
            &["3", "1", "2"],
        ]);
        let matrix = sum_by_group_and_appliance(&g, GroupKey::MonthColumn(0), &appliances());
        assert!((matrix["2"]["Fan"] - 0.59).abs() < 1e-9);
        assert_eq!(matrix["3"]["Fridge"], 2.0);
    }

    #[test]
    fn unique_months_sorted_numerically() {
        let g = grid(&[
            &["Month", "Units"],
            &["10", "1"],
            &["2", "1"],
            &["", "1"],
            &["2", "1"],
            &["Jan", "1"],
            &["11", "1"],
        ]);
        assert_eq!(unique_months(&g, 0), vec!["2", "10", "11", "Jan"]);
    }
}
