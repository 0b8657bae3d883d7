use serde::Serialize;

use super::{series, SeriesPoint};
use crate::aggregate::{self, Extreme};
use crate::error::DatasetError;
use crate::grid::Grid;
use crate::schema::{self, DATE, UNITS};

/// Summary cards plus daily and monthly trends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_energy: f64,
    /// Total divided by the number of distinct date strings.
    pub average_per_day: f64,
    pub total_records: usize,
    pub daily: Vec<SeriesPoint>,
    pub monthly: Vec<SeriesPoint>,
    pub highest_month: Option<Extreme>,
    pub lowest_month: Option<Extreme>,
}

pub fn build(grid: &Grid) -> Result<Overview, DatasetError> {
    let header = schema::resolve_header(grid.header());
    let date_idx = header.require(DATE)?;
    let units_idx = header.require(UNITS)?;

    let total_energy = aggregate::total_units(grid, units_idx);
    let days = aggregate::distinct_days(grid, date_idx);
    let by_day = aggregate::sum_by_day(grid, date_idx, units_idx);
    let by_month = aggregate::sum_by_month(grid, date_idx, units_idx);
    let extremes = aggregate::highest_and_lowest(&by_month);

    Ok(Overview {
        total_energy,
        average_per_day: if days > 0 {
            total_energy / days as f64
        } else {
            0.0
        },
        total_records: grid.record_count(),
        daily: series(&by_day, false),
        monthly: series(&by_month, true),
        highest_month: extremes.as_ref().map(|e| e.highest.clone()),
        lowest_month: extremes.map(|e| e.lowest),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testutil::grid;

    #[test]
    fn overview_cards() {
        let g = grid(&[
            &["Date", "Temperature", "Units"],
            &["2024-01-05", "20", "1"],
            &["2024-01-05", "21", "2"],
            &["2024-01-20", "19", "N/A"],
            &["2024-02-01", "18", "3"],
        ]);
        let ov = build(&g).unwrap();
        assert_eq!(ov.total_energy, 6.0);
        assert_eq!(ov.total_records, 4);
        assert_eq!(ov.average_per_day, 2.0);
        assert_eq!(ov.daily.len(), 3);
        assert_eq!(ov.daily[0].units, 3.0);
        assert_eq!(ov.daily[1].units, 0.0);

        assert_eq!(ov.monthly.len(), 2);
        assert_eq!(ov.monthly[0].label, "Jan 2024");
        let high = ov.highest_month.unwrap();
        assert_eq!((high.key.as_str(), high.total), ("2024-01", 3.0));
        assert_eq!(ov.lowest_month.unwrap().key, "2024-01");
    }

    #[test]
    fn names_the_missing_column() {
        let g = grid(&[&["Date", "kWh"], &["2024-01-05", "1"]]);
        let err = build(&g).unwrap_err();
        assert_eq!(err, DatasetError::MissingColumn("Units".into()));
        assert_eq!(err.to_string(), "'Units' column not found in dataset");
    }

    #[test]
    fn no_parseable_dates_means_no_months() {
        let g = grid(&[&["Date", "Units"], &["someday", "4"]]);
        let ov = build(&g).unwrap();
        assert!(ov.monthly.is_empty());
        assert_eq!(ov.highest_month, None);
        assert_eq!(ov.average_per_day, 4.0);
    }
}
