//! Break Builder CLI.
//!
//! `filter` runs the filter engine over an inventory file; `build` generates
//! a break list from a rule-set file and optionally depletes the inventory.

use break_builder::{
    filter_cards, format_break_list, format_record_line, generate_break_list, load_rules,
    read_csv, read_json, write_csv, write_json, FilterOptions, InventoryError, InventoryStore,
    Record, Result,
};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::Path;

/// MTG card inventory filtering and break allocation
#[derive(Parser, Debug)]
#[command(name = "break_builder")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter an inventory file and print the matching cards
    Filter {
        /// Inventory file (.csv is read as CSV, anything else as JSON)
        #[arg(short, long)]
        inventory: String,

        /// Filter clause as FIELD=QUERY; repeat for AND-combined filters
        #[arg(short = 'w', long = "where", value_name = "FIELD=QUERY")]
        filters: Vec<String>,

        /// Write the matches to a file instead of printing them
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Build a break list from an inventory and a rule-set file
    Build {
        /// Inventory file (.csv is read as CSV, anything else as JSON)
        #[arg(short, long)]
        inventory: String,

        /// Rule-set JSON file
        #[arg(short, long)]
        rules: String,

        /// Desired break size
        #[arg(short, long)]
        total: usize,

        /// Optional file of curated picks, always included in the break
        #[arg(long)]
        curated: Option<String>,

        /// Field to total up in the printed break list
        #[arg(long, default_value = "price")]
        price_field: String,

        /// Write the break list to a file
        #[arg(short, long)]
        output: Option<String>,

        /// Remove the break list's cards from the inventory file
        #[arg(long)]
        remove: bool,
    },
}

/// Reads an inventory file, choosing the format by extension.
fn read_inventory(path: &str) -> Result<Vec<Record>> {
    let is_csv = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        read_csv(path)
    } else {
        read_json(path)
    }
}

/// Writes records, choosing the format by extension.
fn write_records(path: &str, records: &[Record]) -> Result<()> {
    let is_csv = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        write_csv(path, records)
    } else {
        write_json(path, records)
    }
}

/// Parses repeated FIELD=QUERY clauses into a filter map.
fn parse_filters(clauses: &[String]) -> Result<HashMap<String, String>> {
    let mut filters = HashMap::new();
    for clause in clauses {
        let (field, query) = clause.split_once('=').ok_or_else(|| {
            InventoryError::InvalidRule(format!(
                "filter clause '{clause}' is not of the form FIELD=QUERY"
            ))
        })?;
        filters.insert(field.trim().to_string(), query.trim().to_string());
    }
    Ok(filters)
}

fn run(cli: Cli) -> Result<()> {
    let options = FilterOptions::default();

    match cli.command {
        Command::Filter {
            inventory,
            filters,
            output,
        } => {
            let records = read_inventory(&inventory)?;
            let filters = parse_filters(&filters)?;
            let matches = filter_cards(&records, &filters, &options);

            log::info!("{} of {} records match", matches.len(), records.len());
            match output {
                Some(path) => write_records(&path, &matches)?,
                None => {
                    for record in &matches {
                        println!("{}", format_record_line(record, Some("price")));
                    }
                    println!("\n{} of {} records match", matches.len(), records.len());
                }
            }
        }
        Command::Build {
            inventory,
            rules,
            total,
            curated,
            price_field,
            output,
            remove,
        } => {
            let pool = read_inventory(&inventory)?;
            let rules = load_rules(&rules)?;
            let curated_records = match &curated {
                Some(path) => read_inventory(path)?,
                None => Vec::new(),
            };

            let break_list =
                generate_break_list(&pool, &curated_records, &rules, total, &options);
            print!("{}", format_break_list(&break_list, Some(&price_field)));

            if break_list.len() < total {
                println!(
                    "Note: only {} of {} requested cards were available.",
                    break_list.len(),
                    total
                );
            }

            if let Some(path) = &output {
                write_records(path, &break_list.clone().into_records())?;
            }

            if remove {
                let mut store = InventoryStore::with_records(pool);
                let removed = store.remove_break_list(&break_list);
                write_records(&inventory, store.records())?;
                log::info!(
                    "Inventory depleted by {} cards at {}",
                    removed.len(),
                    chrono::Utc::now().to_rfc3339()
                );
            }
        }
    }
    Ok(())
}

fn main() {
    // Initialize logger. Set RUST_LOG environment variable to control log level.
    // Examples: RUST_LOG=info, RUST_LOG=warn, RUST_LOG=break_builder=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("Application error: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
