//! End-to-end break building: inventory file -> rule set -> break list ->
//! inventory depletion.

use break_builder::{
    generate_break_list, load_rules, read_json, save_rules, write_json, BreakRule, Criterion,
    FilterOptions, InventoryStore, Record, RuleTarget,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn create_sample_inventory_json() -> String {
    let mut objects = Vec::new();
    for i in 0..10 {
        objects.push(format!(
            r#"{{"name": "Rare {i}", "rarity": "rare", "price": "5.00"}}"#
        ));
    }
    for i in 0..10 {
        objects.push(format!(
            r#"{{"name": "Common {i}", "rarity": "common", "price": "0.50"}}"#
        ));
    }
    format!("[{}]", objects.join(","))
}

fn create_sample_rules_json() -> String {
    r#"{
  "rules": [
    {
      "name": "Rares",
      "count_type": "count",
      "count_value": 3,
      "criteria": [{"field": "rarity", "value": "rare"}],
      "enabled": true
    },
    {
      "name": "Commons",
      "count_type": "count",
      "count_value": 2,
      "criteria": [{"field": "rarity", "value": "common"}],
      "enabled": true
    }
  ]
}"#
    .to_string()
}

fn write_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file
}

#[test]
fn test_build_break_from_files() {
    let inventory_file = write_temp_file(&create_sample_inventory_json());
    let rules_file = write_temp_file(&create_sample_rules_json());

    let pool = read_json(inventory_file.path()).unwrap();
    let rules = load_rules(rules_file.path()).unwrap();
    let break_list = generate_break_list(&pool, &[], &rules, 6, &FilterOptions::default());

    // 3 rares + 2 commons + 1 filler.
    assert_eq!(break_list.rule_groups[0].records.len(), 3);
    assert_eq!(break_list.rule_groups[1].records.len(), 2);
    assert_eq!(break_list.filler.len(), 1);
    assert_eq!(break_list.len(), 6);
}

#[test]
fn test_break_depletion_and_writeback() {
    let inventory_file = write_temp_file(&create_sample_inventory_json());
    let rules_file = write_temp_file(&create_sample_rules_json());

    let pool = read_json(inventory_file.path()).unwrap();
    let rules = load_rules(rules_file.path()).unwrap();
    let break_list = generate_break_list(&pool, &[], &rules, 6, &FilterOptions::default());

    let mut store = InventoryStore::with_records(pool);
    let removed = store.remove_break_list(&break_list);
    assert_eq!(removed.len(), 6);
    assert_eq!(store.len(), 14);

    // Write the depleted inventory back out and reload it.
    let output_file = NamedTempFile::new().unwrap();
    write_json(output_file.path(), store.records()).unwrap();
    let reloaded = read_json(output_file.path()).unwrap();
    assert_eq!(reloaded, store.records());

    // The undo path restores the exact removed records.
    assert!(store.undo());
    assert_eq!(store.len(), 20);
}

#[test]
fn test_curated_picks_from_file_are_always_included() {
    let inventory_file = write_temp_file(&create_sample_inventory_json());
    let pool = read_json(inventory_file.path()).unwrap();
    let curated = vec![Record::from_pairs([
        ("name", "Rare 7"),
        ("rarity", "rare"),
        ("price", "5.00"),
    ])];

    let rules = vec![BreakRule {
        name: "Rares".to_string(),
        criteria: vec![Criterion::new("rarity", "rare")],
        target: RuleTarget::Count(3),
        enabled: true,
    }];
    let break_list = generate_break_list(&pool, &curated, &rules, 4, &FilterOptions::default());

    assert_eq!(break_list.curated, curated);
    assert_eq!(break_list.len(), 4);
    // The curated card is structurally equal to a pool card and is not
    // selected a second time by the rule.
    assert!(!break_list.rule_groups[0]
        .records
        .iter()
        .any(|r| r.get("name") == Some("Rare 7")));
}

#[test]
fn test_rule_set_roundtrip_through_file() {
    let rules = vec![
        BreakRule {
            name: "Expensive".to_string(),
            criteria: vec![Criterion::new("price", ">10")],
            target: RuleTarget::Percent(25.0),
            enabled: true,
        },
        BreakRule {
            name: "Bulk".to_string(),
            criteria: vec![Criterion::new("price", "<1")],
            target: RuleTarget::Count(12),
            enabled: false,
        },
    ];

    let temp_file = NamedTempFile::new().unwrap();
    save_rules(temp_file.path(), &rules).unwrap();
    let reloaded = load_rules(temp_file.path()).unwrap();
    assert_eq!(reloaded, rules);
}
