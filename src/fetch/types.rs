// src/fetch/types.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ForecastRequest {
    pub days: u32,
}

/// Error metrics of the forecast against held-out history. Empty when the
/// service had too little history to hold any out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(rename = "MAE", default, skip_serializing_if = "Option::is_none")]
    pub mae: Option<f64>,
    #[serde(rename = "RMSE", default, skip_serializing_if = "Option::is_none")]
    pub rmse: Option<f64>,
    #[serde(rename = "MAPE (%)", default, skip_serializing_if = "Option::is_none")]
    pub mape_pct: Option<f64>,
}

impl Metrics {
    pub fn is_empty(&self) -> bool {
        self.mae.is_none() && self.rmse.is_none() && self.mape_pct.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Recent actuals, date → units, in the order the service sent them.
    pub history: IndexMap<String, f64>,
    /// Predicted units per future date.
    pub forecast: IndexMap<String, f64>,
    #[serde(default)]
    pub metrics: Metrics,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub appliance: String,
    pub recommendation: String,
    #[serde(default)]
    pub avg_usage: Option<f64>,
    #[serde(default)]
    pub avg_units: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Recommendations {
    pub recommendations: Vec<Recommendation>,
}

/// Every endpoint answers either its payload or `{"error": "..."}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Reply<T> {
    Failure { error: String },
    Success(T),
}
