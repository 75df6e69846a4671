//! Rule-set persistence.
//!
//! Break rules save to and load from JSON files with the shape
//! `{ "rules": [ { "name", "count_type": "count" | "percentage",
//! "count_value" | "percent_value", "criteria": [ {"field", "value"} |
//! {"field", "min", "max"} ], "enabled" } ] }`. Range criteria map onto the
//! Filter Engine's `min-max` query form.

use crate::allocation::{BreakRule, Criterion, RuleTarget};
use crate::error::{InventoryError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
struct RuleSetFile {
    rules: Vec<RuleEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RuleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    count_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    count_value: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    percent_value: Option<f64>,
    #[serde(default)]
    criteria: Vec<CriterionEntry>,
    #[serde(default = "default_enabled")]
    enabled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct CriterionEntry {
    field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
}

fn default_enabled() -> bool {
    true
}

impl CriterionEntry {
    fn into_criterion(self, rule_name: &str) -> Result<Criterion> {
        let query = match (self.value, self.min, self.max) {
            (Some(value), None, None) => value,
            (None, Some(min), Some(max)) => format!("{min}-{max}"),
            _ => {
                return Err(InventoryError::InvalidRule(format!(
                    "rule '{}': criterion for field '{}' needs either a value or both min and max",
                    rule_name, self.field
                )))
            }
        };
        Ok(Criterion {
            field: self.field,
            query,
        })
    }
}

impl RuleEntry {
    fn into_rule(self, index: usize) -> Result<BreakRule> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("Rule {}", index + 1));

        let target = match self.count_type.as_str() {
            "count" => {
                let value = self.count_value.ok_or_else(|| {
                    InventoryError::InvalidRule(format!("rule '{name}': missing count_value"))
                })?;
                RuleTarget::Count(value as usize)
            }
            "percentage" => {
                let value = self.percent_value.ok_or_else(|| {
                    InventoryError::InvalidRule(format!("rule '{name}': missing percent_value"))
                })?;
                RuleTarget::Percent(value)
            }
            other => {
                return Err(InventoryError::InvalidRule(format!(
                    "rule '{name}': unknown count_type '{other}' (expected 'count' or 'percentage')"
                )))
            }
        };

        let criteria = self
            .criteria
            .into_iter()
            .map(|c| c.into_criterion(&name))
            .collect::<Result<Vec<_>>>()?;

        Ok(BreakRule {
            name,
            criteria,
            target,
            enabled: self.enabled,
        })
    }
}

fn rule_to_entry(rule: &BreakRule) -> RuleEntry {
    let (count_type, count_value, percent_value) = match rule.target {
        RuleTarget::Count(count) => ("count".to_string(), Some(count as u64), None),
        RuleTarget::Percent(percent) => ("percentage".to_string(), None, Some(percent)),
    };
    RuleEntry {
        name: Some(rule.name.clone()),
        count_type,
        count_value,
        percent_value,
        criteria: rule
            .criteria
            .iter()
            .map(|c| CriterionEntry {
                field: c.field.clone(),
                value: Some(c.query.clone()),
                min: None,
                max: None,
            })
            .collect(),
        enabled: rule.enabled,
    }
}

/// Parses a rule set from JSON text. A malformed entry yields an error
/// naming the offending rule rather than a silent skip.
pub fn rules_from_str(json: &str) -> Result<Vec<BreakRule>> {
    let file: RuleSetFile = serde_json::from_str(json)?;
    file.rules
        .into_iter()
        .enumerate()
        .map(|(i, entry)| entry.into_rule(i))
        .collect()
}

/// Serializes a rule set to pretty-printed JSON text.
pub fn rules_to_string(rules: &[BreakRule]) -> Result<String> {
    let file = RuleSetFile {
        rules: rules.iter().map(rule_to_entry).collect(),
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

/// Loads a rule-set file.
pub fn load_rules<P: AsRef<Path>>(path: P) -> Result<Vec<BreakRule>> {
    let content = fs::read_to_string(path.as_ref())?;
    let rules = rules_from_str(&content)?;
    info!("Loaded {} rules from {}", rules.len(), path.as_ref().display());
    Ok(rules)
}

/// Saves a rule-set file.
pub fn save_rules<P: AsRef<Path>>(path: P, rules: &[BreakRule]) -> Result<()> {
    fs::write(path.as_ref(), rules_to_string(rules)?)?;
    info!("Saved {} rules to {}", rules.len(), path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_count_rule() {
        let json = r#"{"rules":[{"name":"Rares","count_type":"count","count_value":3,
            "criteria":[{"field":"rarity","value":"rare"}],"enabled":true}]}"#;
        let rules = rules_from_str(json).unwrap();

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "Rares");
        assert_eq!(rules[0].target, RuleTarget::Count(3));
        assert_eq!(rules[0].criteria[0].field, "rarity");
        assert_eq!(rules[0].criteria[0].query, "rare");
        assert!(rules[0].enabled);
    }

    #[test]
    fn test_parses_percentage_rule() {
        let json = r#"{"rules":[{"count_type":"percentage","percent_value":60.0,
            "criteria":[{"field":"rarity","value":"rare"}]}]}"#;
        let rules = rules_from_str(json).unwrap();

        assert_eq!(rules[0].target, RuleTarget::Percent(60.0));
        // Unnamed rules get a positional name; enabled defaults to true.
        assert_eq!(rules[0].name, "Rule 1");
        assert!(rules[0].enabled);
    }

    #[test]
    fn test_range_criterion_becomes_range_query() {
        let json = r#"{"rules":[{"name":"Mid price","count_type":"count","count_value":5,
            "criteria":[{"field":"price","min":2.0,"max":4.0}]}]}"#;
        let rules = rules_from_str(json).unwrap();
        assert_eq!(rules[0].criteria[0].query, "2-4");
    }

    #[test]
    fn test_unknown_count_type_names_the_rule() {
        let json = r#"{"rules":[{"name":"Broken","count_type":"ratio","count_value":1}]}"#;
        let err = rules_from_str(json).unwrap_err();
        assert!(err.to_string().contains("Broken"));
        assert!(err.to_string().contains("ratio"));
    }

    #[test]
    fn test_missing_count_value_is_an_error() {
        let json = r#"{"rules":[{"name":"Broken","count_type":"count"}]}"#;
        assert!(rules_from_str(json).is_err());
    }

    #[test]
    fn test_criterion_without_value_or_range_is_an_error() {
        let json = r#"{"rules":[{"name":"Broken","count_type":"count","count_value":1,
            "criteria":[{"field":"price","min":2.0}]}]}"#;
        let err = rules_from_str(json).unwrap_err();
        assert!(err.to_string().contains("price"));
    }

    #[test]
    fn test_roundtrip_preserves_rules() {
        let rules = vec![
            BreakRule {
                name: "Rares".to_string(),
                criteria: vec![Criterion::new("rarity", "rare")],
                target: RuleTarget::Count(3),
                enabled: true,
            },
            BreakRule {
                name: "Cheap".to_string(),
                criteria: vec![Criterion::new("price", "<2")],
                target: RuleTarget::Percent(40.0),
                enabled: false,
            },
        ];
        let json = rules_to_string(&rules).unwrap();
        let reloaded = rules_from_str(&json).unwrap();
        assert_eq!(reloaded, rules);
    }
}
