pub mod allocation;
pub mod error;
pub mod filter;
pub mod formatters;
pub mod io;
pub mod models;
pub mod rules;
pub mod store;

// Re-export commonly used items
pub use allocation::{
    generate_break_list, BreakList, BreakRule, Criterion, RuleGroup, RuleTarget,
};
pub use error::{InventoryError, Result};
pub use filter::{filter_cards, FilterOptions};
pub use formatters::{format_break_list, format_record_line};
pub use io::{read_csv, read_csv_with_mapping, read_json, write_csv, write_json};
pub use models::Record;
pub use rules::{load_rules, save_rules};
pub use store::{InventoryStore, Snapshot};
