use chrono::NaiveDate;

/// Parse the date part of a cell into a calendar date.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, and day-first `DD-MM-YYYY` / `DD/MM/YYYY`,
/// optionally followed by a time after a space or `T`. Single-digit day and
/// month fields are fine. The separator must be the same on both sides.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim().trim_matches('"');
    let date_part = s.split([' ', 'T']).next()?;
    let sep = date_part.chars().find(|c| !c.is_ascii_digit())?;
    if sep != '-' && sep != '/' {
        return None;
    }

    let parts: Vec<&str> = date_part.split(sep).collect();
    if parts.len() != 3
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    let (y, m, d) = if parts[0].len() == 4 {
        (parts[0], parts[1], parts[2])
    } else if parts[2].len() == 4 {
        (parts[2], parts[1], parts[0])
    } else {
        return None;
    };
    NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
}

/// `"YYYY-MM"` month key for a date cell, zero-padded.
pub fn month_key(s: &str) -> Option<String> {
    parse_date(s).map(|d| d.format("%Y-%m").to_string())
}

/// Display label for a month key: `"2024-01"` → `"Jan 2024"`.
pub fn month_label(key: &str) -> Option<String> {
    let (y, m) = key.split_once('-')?;
    let date = NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, 1)?;
    Some(date.format("%b %Y").to_string())
}
