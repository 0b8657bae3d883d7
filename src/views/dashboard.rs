use serde::Serialize;
use tracing::warn;

use crate::aggregate::{self, Extreme};
use crate::error::DatasetError;
use crate::fetch::{AnalyticsClient, Forecast, Recommendation};
use crate::grid::Grid;
use crate::schema::{self, DATE, UNITS};

/// Recommendations shown on the dashboard.
pub const TOP_RECOMMENDATIONS: usize = 5;

/// Days requested from the service when the dashboard builds its forecast card.
pub const DEFAULT_FORECAST_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub total_energy: f64,
    /// Total divided by the number of months that have at least one dated row.
    pub average_per_month: f64,
    pub highest_month: Option<Extreme>,
    pub lowest_month: Option<Extreme>,
    pub forecast_days: usize,
    pub recommendations: Vec<Recommendation>,
}

/// Whatever the analytics service could provide. Failures are logged and
/// leave the corresponding part empty.
#[derive(Debug, Default)]
pub struct RemoteData {
    pub forecast: Option<Forecast>,
    pub recommendations: Vec<Recommendation>,
}

/// Fetch the forecast and recommendations concurrently.
pub async fn fetch_remote(client: &AnalyticsClient, days: u32) -> RemoteData {
    let (forecast, recommendations) = tokio::join!(client.forecast(days), client.recommendations());
    RemoteData {
        forecast: forecast
            .map_err(|e| warn!(error = %e, "forecast unavailable"))
            .ok(),
        recommendations: recommendations
            .map_err(|e| warn!(error = %e, "recommendations unavailable"))
            .unwrap_or_default(),
    }
}

pub fn build(grid: &Grid, remote: &RemoteData) -> Result<Dashboard, DatasetError> {
    let header = schema::resolve_header(grid.header());
    let date_idx = header.require(DATE)?;
    let units_idx = header.require(UNITS)?;

    let total_energy = aggregate::total_units(grid, units_idx);
    let by_month = aggregate::sum_by_month(grid, date_idx, units_idx);
    let extremes = aggregate::highest_and_lowest(&by_month);

    Ok(Dashboard {
        total_energy,
        average_per_month: if by_month.is_empty() {
            0.0
        } else {
            total_energy / by_month.len() as f64
        },
        highest_month: extremes.as_ref().map(|e| e.highest.clone()),
        lowest_month: extremes.map(|e| e.lowest),
        forecast_days: remote.forecast.as_ref().map_or(0, |f| f.forecast.len()),
        recommendations: remote
            .recommendations
            .iter()
            .take(TOP_RECOMMENDATIONS)
            .cloned()
            .collect(),
    })
}
