use break_builder::io::{read_csv, read_csv_with_mapping, read_json, write_csv, write_json};
use break_builder::models::Record;
use std::io::Write;
use tempfile::NamedTempFile;

// Test fixtures - sample data for testing

fn create_sample_csv_content() -> String {
    r#"name,setCode,cn,rarity,price
Lightning Bolt,LEA,161,common,25.00
Black Lotus,LEA,232,rare,15000.00
Counterspell,LEA,54,common,30.00"#
        .to_string()
}

fn create_sample_json_content() -> String {
    r#"[
  {"name": "Lightning Bolt", "setCode": "LEA", "cn": "161", "price": "25.00"},
  {"name": "Black Lotus", "setCode": "LEA", "cn": "232", "price": 15000.0, "quantity": 1}
]"#
    .to_string()
}

fn write_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file
}

// Tests for CSV reading

#[test]
fn test_read_csv_keeps_headers_as_field_names() {
    let temp_file = write_temp_file(&create_sample_csv_content());
    let records = read_csv(temp_file.path()).unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].get("name"), Some("Lightning Bolt"));
    assert_eq!(records[0].get("setCode"), Some("LEA"));
    assert_eq!(records[1].get("price"), Some("15000.00"));

    let fields: Vec<&str> = records[0].fields().map(|(k, _)| k).collect();
    assert_eq!(fields, vec!["name", "setCode", "cn", "rarity", "price"]);
}

#[test]
fn test_read_csv_with_mapping_renames_and_drops_columns() {
    let temp_file = write_temp_file(&create_sample_csv_content());
    let mapping = vec![
        ("name".to_string(), "Card Name".to_string()),
        ("cn".to_string(), String::new()), // dropped
    ];
    let records = read_csv_with_mapping(temp_file.path(), &mapping).unwrap();

    assert_eq!(records[0].get("Card Name"), Some("Lightning Bolt"));
    assert_eq!(records[0].get("name"), None);
    assert_eq!(records[0].get("cn"), None);
    // Unmapped columns keep their header name.
    assert_eq!(records[0].get("rarity"), Some("common"));
}

#[test]
fn test_read_csv_missing_file_is_an_error() {
    assert!(read_csv("/this/path/does/not/exist.csv").is_err());
}

// Tests for JSON reading

#[test]
fn test_read_json_array_of_flat_objects() {
    let temp_file = write_temp_file(&create_sample_json_content());
    let records = read_json(temp_file.path()).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("name"), Some("Lightning Bolt"));
    // Numeric JSON values arrive stringified.
    assert_eq!(records[1].get("price"), Some("15000"));
    assert_eq!(records[1].get("quantity"), Some("1"));
}

#[test]
fn test_read_json_rejects_malformed_input() {
    let temp_file = write_temp_file("{\"not\": \"an array\"}");
    assert!(read_json(temp_file.path()).is_err());
}

// Round-trip tests

#[test]
fn test_json_write_read_roundtrip() {
    let records = vec![
        Record::from_pairs([("name", "Bolt"), ("price", "1.00")]),
        Record::from_pairs([("name", "Lotus"), ("price", "9.99"), ("comment", "")]),
    ];
    let temp_file = NamedTempFile::new().unwrap();

    write_json(temp_file.path(), &records).unwrap();
    let reloaded = read_json(temp_file.path()).unwrap();
    assert_eq!(reloaded, records);
}

#[test]
fn test_csv_write_unions_field_names_in_first_appearance_order() {
    let records = vec![
        Record::from_pairs([("name", "Bolt"), ("price", "1.00")]),
        Record::from_pairs([("name", "Lotus"), ("rarity", "rare")]),
    ];
    let temp_file = NamedTempFile::new().unwrap();

    write_csv(temp_file.path(), &records).unwrap();
    let reloaded = read_csv(temp_file.path()).unwrap();

    assert_eq!(reloaded.len(), 2);
    let fields: Vec<&str> = reloaded[0].fields().map(|(k, _)| k).collect();
    assert_eq!(fields, vec!["name", "price", "rarity"]);
    // Missing fields round-trip as empty cells.
    assert_eq!(reloaded[1].get("price"), Some(""));
    assert_eq!(reloaded[1].get("rarity"), Some("rare"));
}
