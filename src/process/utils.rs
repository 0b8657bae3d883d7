use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")
        .expect("leading float pattern should be valid")
});

/// Strip a leading byte-order mark, trim whitespace and strip outer quotes if present.
pub fn clean_cell(raw: &str) -> String {
    let trimmed = raw.trim_start_matches('\u{feff}').trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse an energy-units cell: thousands-separator commas are dropped, then the
/// longest leading number of the trimmed text is read as `f64`, so `"3.5 kWh"`
/// is 3.5. No leading number, or a non-finite one, is `None`.
pub fn parse_units(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    LEADING_FLOAT
        .find(cleaned.trim())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// `parse_units`, with anything unparseable (including a missing cell) counted as zero.
pub fn units_or_zero(raw: Option<&str>) -> f64 {
    match raw.and_then(parse_units) {
        Some(v) => v,
        None => {
            tracing::trace!(cell = ?raw, "non-numeric units cell counted as 0");
            0.0
        }
    }
}
