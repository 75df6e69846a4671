use crate::models::Record;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Field names treated as numeric by default (price/quantity/count-like).
/// Collector numbers are deliberately absent: values like "123a" compare
/// as text.
const DEFAULT_NUMERIC_FIELDS: &[&str] = &[
    "price",
    "purchase price",
    "quantity",
    "qty",
    "count",
    "total",
];

lazy_static! {
    static ref RANGE_QUERY: Regex =
        Regex::new(r"^(\d+(?:\.\d+)?)\s*-\s*(\d+(?:\.\d+)?)$").unwrap();
}

/// Filter Engine configuration. The numeric-field allow-list is injected
/// here so the engine stays reusable for other record shapes.
#[derive(Debug, Clone)]
pub struct FilterOptions {
    pub numeric_fields: HashSet<String>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            numeric_fields: DEFAULT_NUMERIC_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }
}

impl FilterOptions {
    pub fn is_numeric_field(&self, field: &str) -> bool {
        self.numeric_fields.contains(&field.trim().to_lowercase())
    }
}

/// A parsed numeric query: comparison, inclusive range, or exact value.
#[derive(Debug, Clone, Copy, PartialEq)]
enum NumericQuery {
    GreaterThan(f64),
    GreaterOrEqual(f64),
    LessThan(f64),
    LessOrEqual(f64),
    Range(f64, f64),
    Equals(f64),
}

impl NumericQuery {
    /// Parses a numeric query string. Returns None for anything that is not
    /// a recognized numeric form, so the caller can fall back to substring
    /// matching.
    fn parse(query: &str) -> Option<Self> {
        let query = query.trim();

        if let Some(rest) = query.strip_prefix(">=") {
            return rest.trim().parse().ok().map(NumericQuery::GreaterOrEqual);
        }
        if let Some(rest) = query.strip_prefix("<=") {
            return rest.trim().parse().ok().map(NumericQuery::LessOrEqual);
        }
        if let Some(rest) = query.strip_prefix('>') {
            return rest.trim().parse().ok().map(NumericQuery::GreaterThan);
        }
        if let Some(rest) = query.strip_prefix('<') {
            return rest.trim().parse().ok().map(NumericQuery::LessThan);
        }
        if let Some(caps) = RANGE_QUERY.captures(query) {
            let lo: f64 = caps[1].parse().ok()?;
            let hi: f64 = caps[2].parse().ok()?;
            return Some(NumericQuery::Range(lo, hi));
        }
        query.parse().ok().map(NumericQuery::Equals)
    }

    fn matches(&self, value: f64) -> bool {
        match *self {
            NumericQuery::GreaterThan(n) => value > n,
            NumericQuery::GreaterOrEqual(n) => value >= n,
            NumericQuery::LessThan(n) => value < n,
            NumericQuery::LessOrEqual(n) => value <= n,
            NumericQuery::Range(lo, hi) => value >= lo && value <= hi,
            NumericQuery::Equals(n) => (value - n).abs() < 1e-9,
        }
    }
}

/// Tests one field of a record against one query string.
///
/// Numeric fields get comparison/range semantics; a record whose own value
/// fails to parse is excluded. A malformed numeric query falls back to
/// case-insensitive substring matching, as does every non-numeric field.
/// Missing fields read as the empty string.
pub fn field_matches(record: &Record, field: &str, query: &str, options: &FilterOptions) -> bool {
    if options.is_numeric_field(field) {
        if let Some(numeric_query) = NumericQuery::parse(query) {
            return match record.numeric_value(field) {
                Some(value) => numeric_query.matches(value),
                None => false,
            };
        }
    }
    record
        .get_or_empty(field)
        .to_lowercase()
        .contains(&query.trim().to_lowercase())
}

/// Returns true if the record satisfies every non-empty filter (logical AND).
pub fn record_matches(
    record: &Record,
    filters: &HashMap<String, String>,
    options: &FilterOptions,
) -> bool {
    filters
        .iter()
        .filter(|(_, query)| !query.trim().is_empty())
        .all(|(field, query)| field_matches(record, field, query, options))
}

/// Applies all non-empty filters to the records, preserving input order.
/// Empty filter maps impose no constraint. Pure: no side effects, no errors.
pub fn filter_cards(
    records: &[Record],
    filters: &HashMap<String, String>,
    options: &FilterOptions,
) -> Vec<Record> {
    records
        .iter()
        .filter(|record| record_matches(record, filters, options))
        .cloned()
        .collect()
}
