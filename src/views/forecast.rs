use serde::Serialize;

use crate::fetch::{Forecast, Metrics};

/// One x-axis position of the forecast chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastView {
    pub points: Vec<ForecastPoint>,
    pub metrics: Metrics,
    pub message: String,
}

/// History points first, in service order, then forecast points. A forecast
/// date that is already present as history fills that point's `forecast`.
pub fn merge(reply: &Forecast) -> ForecastView {
    let mut points: Vec<ForecastPoint> = reply
        .history
        .iter()
        .map(|(date, &v)| ForecastPoint {
            date: date.clone(),
            actual: Some(v),
            forecast: None,
        })
        .collect();

    for (date, &v) in &reply.forecast {
        match points.iter_mut().find(|p| &p.date == date) {
            Some(existing) => existing.forecast = Some(v),
            None => points.push(ForecastPoint {
                date: date.clone(),
                actual: None,
                forecast: Some(v),
            }),
        }
    }

    ForecastView {
        points,
        metrics: reply.metrics.clone(),
        message: reply.message.clone(),
    }
}
