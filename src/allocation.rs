//! Break Builder allocation engine.
//!
//! Partitions an inventory pool into curated, per-rule, and filler groups
//! for a break: curated picks always go in, each enabled rule then claims
//! matching cards up to its count or percentage target, and filler tops the
//! list up to the requested total. A used-set of record fingerprints
//! guarantees no card is selected twice.

use crate::filter::{field_matches, FilterOptions};
use crate::models::Record;
use log::{debug, warn};
use std::collections::HashSet;

/// One AND-combined filter criterion of an allocation rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub field: String,
    pub query: String,
}

impl Criterion {
    pub fn new(field: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            query: query.into(),
        }
    }
}

/// How many cards a rule wants: an absolute count, or a percentage of the
/// remaining budget after curated picks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleTarget {
    Count(usize),
    Percent(f64),
}

/// A named filter plus a target, used to select cards for a break.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakRule {
    pub name: String,
    pub criteria: Vec<Criterion>,
    pub target: RuleTarget,
    pub enabled: bool,
}

impl BreakRule {
    /// True if the record satisfies every criterion of this rule.
    fn matches(&self, record: &Record, options: &FilterOptions) -> bool {
        self.criteria
            .iter()
            .filter(|c| !c.query.trim().is_empty())
            .all(|c| field_matches(record, &c.field, &c.query, options))
    }
}

/// The cards one rule claimed, with its requested count for shortfall
/// reporting.
#[derive(Debug, Clone)]
pub struct RuleGroup {
    pub rule_name: String,
    pub requested: usize,
    pub records: Vec<Record>,
}

/// The result of a break build: curated ++ rule groups in rule order ++
/// filler, duplicate-free by record fingerprint.
#[derive(Debug, Clone, Default)]
pub struct BreakList {
    pub curated: Vec<Record>,
    pub rule_groups: Vec<RuleGroup>,
    pub filler: Vec<Record>,
}

impl BreakList {
    /// All records in final break order.
    pub fn records(&self) -> Vec<&Record> {
        self.curated
            .iter()
            .chain(self.rule_groups.iter().flat_map(|g| g.records.iter()))
            .chain(self.filler.iter())
            .collect()
    }

    /// Consumes the break list into a flat record vector in break order.
    pub fn into_records(self) -> Vec<Record> {
        let mut records = self.curated;
        for group in self.rule_groups {
            records.extend(group.records);
        }
        records.extend(self.filler);
        records
    }

    pub fn len(&self) -> usize {
        self.curated.len()
            + self.rule_groups.iter().map(|g| g.records.len()).sum::<usize>()
            + self.filler.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sums a numeric field over the whole break list. Records whose value
    /// does not parse contribute nothing.
    pub fn total_price(&self, price_field: &str) -> f64 {
        self.records()
            .iter()
            .filter_map(|r| r.numeric_value(price_field))
            .sum()
    }
}

/// Builds a break list from the pool.
///
/// Curated records are always included and counted against `total_target`;
/// if they alone exceed it, rule and filler allocation is skipped and the
/// oversized list is returned as-is. Each enabled rule, in order, claims up
/// to its target from the not-yet-used pool (percentage targets are
/// computed against the budget remaining after curated picks, not a running
/// remainder, so over-100% rule sets are satisfied first-come in rule
/// order). Filler then draws unused records in pool order until the target
/// is met or the pool runs out.
///
/// Pure selection: the pool is never mutated, and requesting more than is
/// available yields a partial fill rather than an error.
pub fn generate_break_list(
    pool: &[Record],
    curated: &[Record],
    rules: &[BreakRule],
    total_target: usize,
    options: &FilterOptions,
) -> BreakList {
    let mut used: HashSet<String> = curated.iter().map(|r| r.fingerprint()).collect();
    let mut break_list = BreakList {
        curated: curated.to_vec(),
        ..BreakList::default()
    };

    if curated.len() >= total_target {
        if curated.len() > total_target {
            debug!(
                "Curated picks ({}) already exceed the target ({}); skipping rules and filler",
                curated.len(),
                total_target
            );
        }
        return break_list;
    }

    // Budget after curated picks. Percentage rules are sized against this
    // value even as later rules consume it.
    let budget = total_target - curated.len();
    let mut remaining = budget;

    for rule in rules.iter().filter(|r| r.enabled) {
        let requested = match rule.target {
            RuleTarget::Count(count) => count,
            RuleTarget::Percent(percent) => (percent / 100.0 * budget as f64).round() as usize,
        };

        // A rule never takes more than its target or the overall budget left.
        let cap = requested.min(remaining);
        let mut records = Vec::new();
        for record in pool {
            if records.len() >= cap {
                break;
            }
            if !rule.matches(record, options) {
                continue;
            }
            let fingerprint = record.fingerprint();
            if used.contains(&fingerprint) {
                continue;
            }
            used.insert(fingerprint);
            records.push(record.clone());
        }

        if records.len() < requested {
            warn!(
                "Rule '{}' requested {} cards but only {} were allocated",
                rule.name,
                requested,
                records.len()
            );
        }
        debug!("Rule '{}': {} of {} requested", rule.name, records.len(), requested);

        remaining -= records.len();
        break_list.rule_groups.push(RuleGroup {
            rule_name: rule.name.clone(),
            requested,
            records,
        });
    }

    // Filler: top up from the unused pool, in pool order.
    for record in pool {
        if remaining == 0 {
            break;
        }
        let fingerprint = record.fingerprint();
        if used.contains(&fingerprint) {
            continue;
        }
        used.insert(fingerprint);
        break_list.filler.push(record.clone());
        remaining -= 1;
    }

    if remaining > 0 {
        warn!(
            "Pool exhausted: break list has {} cards of the {} requested",
            break_list.len(),
            total_target
        );
    }

    break_list
}
