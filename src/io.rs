use crate::error::Result;
use crate::models::Record;
use log::info;
use std::fs;
use std::path::Path;

/// Reads an inventory JSON file: an array of flat objects.
pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let content = fs::read_to_string(path.as_ref())?;
    let records: Vec<Record> = serde_json::from_str(&content)?;
    info!(
        "Loaded {} records from {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(records)
}

/// Writes an inventory JSON file as a pretty-printed array of flat objects.
pub fn write_json<P: AsRef<Path>>(path: P, records: &[Record]) -> Result<()> {
    fs::write(path.as_ref(), serde_json::to_string_pretty(records)?)?;
    info!(
        "Wrote {} records to {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(())
}

/// Reads an inventory CSV (header row of field names, one row per record),
/// keeping the column names as field names.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    read_csv_with_mapping(path, &[])
}

/// Reads an inventory CSV with a user-driven column-to-field mapping.
///
/// Each `(column, field)` pair renames that CSV column on import; columns
/// not named by the mapping keep their header name, and a column mapped to
/// an empty field name is dropped.
pub fn read_csv_with_mapping<P: AsRef<Path>>(
    path: P,
    mapping: &[(String, String)],
) -> Result<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;

    let field_names: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|column| {
            mapping
                .iter()
                .find(|(c, _)| c == column)
                .map(|(_, field)| field.clone())
                .unwrap_or_else(|| column.to_string())
        })
        .collect();

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let record = Record::from_pairs(
            field_names
                .iter()
                .zip(row.iter())
                .filter(|(field, _)| !field.is_empty())
                .map(|(field, value)| (field.clone(), value.to_string())),
        );
        records.push(record);
    }

    info!(
        "Loaded {} records from {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(records)
}

/// Writes records to CSV. The header is the union of all field names in
/// order of first appearance; missing fields write as empty cells.
pub fn write_csv<P: AsRef<Path>>(path: P, records: &[Record]) -> Result<()> {
    let mut header: Vec<&str> = Vec::new();
    for record in records {
        for (field, _) in record.fields() {
            if !header.contains(&field) {
                header.push(field);
            }
        }
    }

    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    wtr.write_record(&header)?;
    for record in records {
        wtr.write_record(header.iter().map(|field| record.get_or_empty(field)))?;
    }
    wtr.flush()?;

    info!(
        "Wrote {} records to {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(())
}
