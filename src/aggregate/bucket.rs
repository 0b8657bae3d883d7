use indexmap::IndexMap;
use serde::Serialize;

/// Grouping key → accumulated total, in first-seen order.
pub type Bucket = IndexMap<String, f64>;

/// Month key → appliance label → total.
pub type MonthApplianceMatrix = IndexMap<String, Bucket>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extreme {
    pub key: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extremes {
    pub highest: Extreme,
    pub lowest: Extreme,
}

/// Largest and smallest entries of `bucket`, or `None` when it is empty.
///
/// Ties resolve to the key inserted first.
pub fn highest_and_lowest(bucket: &Bucket) -> Option<Extremes> {
    let mut iter = bucket.iter();
    let (first_key, &first_total) = iter.next()?;
    let mut highest = (first_key, first_total);
    let mut lowest = (first_key, first_total);

    for (key, &total) in iter {
        if total > highest.1 {
            highest = (key, total);
        }
        if total < lowest.1 {
            lowest = (key, total);
        }
    }

    Some(Extremes {
        highest: Extreme {
            key: highest.0.clone(),
            total: highest.1,
        },
        lowest: Extreme {
            key: lowest.0.clone(),
            total: lowest.1,
        },
    })
}
