use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::fetch::Recommendation;
use crate::schema::APPLIANCE_MARKER;

static FIRST_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("number pattern should be valid"));

/// Names treated as the same appliance, after normalization.
const SYNONYMS: &[(&str, &str)] = &[
    ("tv", "television"),
    ("ac", "airconditioner"),
    ("fridge", "refrigerator"),
    ("motor", "motorpump"),
];

const HIGH_USAGE_HOURS: f64 = 8.0;
const LOW_USAGE_HOURS: f64 = 2.0;
const HIGH_UNITS: f64 = 5.0;

/// Service recommendations for one appliance, usage and energy side by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplianceInsight {
    pub appliance: String,
    pub usage_message: String,
    pub unit_message: String,
    pub avg_usage: Option<f64>,
    pub avg_units: Option<f64>,
    pub insight: String,
}

/// Group service items by appliance and attach an insight to each group.
///
/// Items whose appliance name carries `(Units)` supply the energy message,
/// the rest the usage message. Averages are the first number in each message.
pub fn combine(items: &[Recommendation]) -> Vec<ApplianceInsight> {
    let mut combined: Vec<ApplianceInsight> = Vec::new();

    for rec in items {
        let base_name = rec.appliance.replacen(APPLIANCE_MARKER, "", 1).trim().to_string();
        let idx = match combined
            .iter()
            .position(|c| is_similar_name(&c.appliance, &base_name))
        {
            Some(idx) => idx,
            None => {
                combined.push(ApplianceInsight {
                    appliance: base_name,
                    usage_message: String::new(),
                    unit_message: String::new(),
                    avg_usage: None,
                    avg_units: None,
                    insight: String::new(),
                });
                combined.len() - 1
            }
        };

        let found = &mut combined[idx];
        let value = first_number(&rec.recommendation);
        if rec.appliance.contains(APPLIANCE_MARKER) {
            found.unit_message = rec.recommendation.clone();
            found.avg_units = value;
        } else {
            found.usage_message = rec.recommendation.clone();
            found.avg_usage = value;
        }
    }

    for item in &mut combined {
        item.insight = insight(item.avg_usage, item.avg_units);
    }
    combined
}

fn normalize(name: &str) -> String {
    name.to_lowercase()
        .replace("(units)", "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Case- and space-insensitive match, with a few known synonyms.
pub fn is_similar_name(a: &str, b: &str) -> bool {
    let (a, b) = (normalize(a), normalize(b));
    a == b
        || SYNONYMS
            .iter()
            .any(|&(x, y)| (a == x && b == y) || (a == y && b == x))
}

fn first_number(text: &str) -> Option<f64> {
    FIRST_NUMBER
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

/// A zero average counts as unknown.
fn insight(avg_usage: Option<f64>, avg_units: Option<f64>) -> String {
    let mut text = match avg_usage.filter(|u| *u != 0.0) {
        Some(u) if u > HIGH_USAGE_HOURS => {
            "High daily usage: try using it during off-peak hours or reduce runtime.".to_string()
        }
        Some(u) if u < LOW_USAGE_HOURS => {
            "Great efficiency: appliance is used optimally.".to_string()
        }
        _ => "Moderate usage: maintain current schedule for balanced energy consumption."
            .to_string(),
    };
    if avg_units.is_some_and(|u| u > HIGH_UNITS) {
        text.push_str(" Consider energy-saving models or switching it off completely when idle.");
    }
    text
}
