use crate::allocation::BreakList;
use crate::models::Record;

/// One display line for a record: the name field (or the first field when
/// there is no name), followed by set code, collector number, and price
/// when present.
pub fn format_record_line(record: &Record, price_field: Option<&str>) -> String {
    let name = record
        .get("name")
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            record
                .fields()
                .next()
                .map(|(_, v)| v.to_string())
                .unwrap_or_else(|| "(empty record)".to_string())
        });

    let mut line = name;
    let set_code = record.get_or_empty("setCode");
    let cn = record.get_or_empty("cn");
    if !set_code.is_empty() {
        if cn.is_empty() {
            line.push_str(&format!(" [{set_code}]"));
        } else {
            line.push_str(&format!(" [{set_code} #{cn}]"));
        }
    }
    if let Some(field) = price_field {
        if let Some(price) = record.numeric_value(field) {
            line.push_str(&format!(" - {price:.2}"));
        }
    }
    line
}

/// Formats a break list as grouped text: curated picks, each rule group
/// with its requested-vs-allocated counts, then filler. When a price field
/// is given, a total is appended.
pub fn format_break_list(break_list: &BreakList, price_field: Option<&str>) -> String {
    let mut output = String::new();

    output.push_str(&format!("Break List ({} cards)\n", break_list.len()));
    output.push_str("-----------------------------------------------\n\n");

    if !break_list.curated.is_empty() {
        output.push_str(&format!("Curated ({}):\n", break_list.curated.len()));
        for record in &break_list.curated {
            output.push_str(&format!("  {}\n", format_record_line(record, price_field)));
        }
        output.push('\n');
    }

    for group in &break_list.rule_groups {
        if group.records.len() < group.requested {
            output.push_str(&format!(
                "{} ({} of {} requested):\n",
                group.rule_name,
                group.records.len(),
                group.requested
            ));
        } else {
            output.push_str(&format!("{} ({}):\n", group.rule_name, group.records.len()));
        }
        for record in &group.records {
            output.push_str(&format!("  {}\n", format_record_line(record, price_field)));
        }
        output.push('\n');
    }

    if !break_list.filler.is_empty() {
        output.push_str(&format!("Filler ({}):\n", break_list.filler.len()));
        for record in &break_list.filler {
            output.push_str(&format!("  {}\n", format_record_line(record, price_field)));
        }
        output.push('\n');
    }

    if let Some(field) = price_field {
        output.push_str(&format!("Total: {:.2}\n", break_list.total_price(field)));
    }

    output
}
