use serde::Serialize;

use super::{display_label, SeriesPoint};
use crate::aggregate::{self, GroupKey};
use crate::error::DatasetError;
use crate::grid::Grid;
use crate::schema::{self, ApplianceColumn, HeaderMap, APPLIANCE_MARKER, DATE, MONTH};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplianceTotal {
    pub label: String,
    pub total: f64,
}

/// Month-by-month usage of one appliance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplianceMonthly {
    pub appliance: String,
    pub points: Vec<SeriesPoint>,
}

/// Month × appliance totals, one series per appliance, aligned with `months`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedMonths {
    pub months: Vec<String>,
    pub labels: Vec<String>,
    pub series: Vec<StackedSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedSeries {
    pub appliance: String,
    pub values: Vec<f64>,
}

/// Total units per appliance column, header order.
pub fn appliance_totals(grid: &Grid) -> Result<Vec<ApplianceTotal>, DatasetError> {
    let appliances = appliances(grid)?;
    Ok(aggregate::sum_by_appliance(grid, &appliances)
        .into_iter()
        .map(|(label, total)| ApplianceTotal { label, total })
        .collect())
}

/// Drill-down for one appliance, chronological.
pub fn appliance_by_month(grid: &Grid, label: &str) -> Result<ApplianceMonthly, DatasetError> {
    let appliance = appliances(grid)?
        .into_iter()
        .find(|a| a.label == label)
        .ok_or_else(|| DatasetError::MissingColumn(format!("{}{}", label, APPLIANCE_MARKER)))?;
    let source = month_source(&schema::resolve_header(grid.header()))?;

    let bucket = aggregate::sum_grouped(grid, source, appliance.index);
    let mut months: Vec<&String> = bucket.keys().collect();
    sort_months(grid, source, &mut months);

    let points = months
        .into_iter()
        .map(|k| SeriesPoint {
            key: k.clone(),
            label: display_label(k, is_calendar(source)),
            units: bucket[k],
        })
        .collect();
    Ok(ApplianceMonthly {
        appliance: appliance.label,
        points,
    })
}

/// All appliances stacked per month, chronological.
pub fn stacked_by_month(grid: &Grid) -> Result<StackedMonths, DatasetError> {
    let appliances = appliances(grid)?;
    let source = month_source(&schema::resolve_header(grid.header()))?;
    let matrix = aggregate::sum_by_group_and_appliance(grid, source, &appliances);

    let mut months: Vec<&String> = matrix.keys().collect();
    sort_months(grid, source, &mut months);

    let series = appliances
        .iter()
        .map(|a| StackedSeries {
            appliance: a.label.clone(),
            values: months
                .iter()
                .map(|m| matrix[*m].get(&a.label).copied().unwrap_or(0.0))
                .collect(),
        })
        .collect();

    Ok(StackedMonths {
        labels: months
            .iter()
            .map(|m| display_label(m, is_calendar(source)))
            .collect(),
        months: months.into_iter().cloned().collect(),
        series,
    })
}

fn appliances(grid: &Grid) -> Result<Vec<ApplianceColumn>, DatasetError> {
    let appliances = schema::resolve_appliances(grid.header());
    if appliances.is_empty() {
        return Err(DatasetError::NoApplianceColumns);
    }
    Ok(appliances)
}

/// Months come from the `Date` column when there is one, else from a `Month` column.
fn month_source(header: &HeaderMap) -> Result<GroupKey, DatasetError> {
    match (header.get(DATE), header.get(MONTH)) {
        (Some(idx), _) => Ok(GroupKey::Month(idx)),
        (None, Some(idx)) => Ok(GroupKey::MonthColumn(idx)),
        (None, None) => Err(DatasetError::MissingColumn(DATE.to_string())),
    }
}

fn is_calendar(source: GroupKey) -> bool {
    matches!(source, GroupKey::Month(_))
}

fn sort_months(grid: &Grid, source: GroupKey, months: &mut [&String]) {
    match source {
        GroupKey::MonthColumn(idx) => {
            let order = aggregate::unique_months(grid, idx);
            months.sort_by_key(|m| order.iter().position(|o| o == *m));
        }
        // YYYY-MM keys sort chronologically as strings
        _ => months.sort(),
    }
}
