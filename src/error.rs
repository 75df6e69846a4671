use std::fmt;

/// Unified error type for inventory I/O and rule parsing.
///
/// The filter and allocation engines themselves never fail; errors only
/// arise at the file and rule-set boundary.
#[derive(Debug)]
pub enum InventoryError {
    /// File I/O error
    Io(std::io::Error),
    /// Failed to parse or write JSON
    Json(serde_json::Error),
    /// Failed to read or write CSV
    Csv(csv::Error),
    /// A rule-set entry is malformed
    InvalidRule(String),
}

impl fmt::Display for InventoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryError::Io(e) => write!(f, "I/O error: {}", e),
            InventoryError::Json(e) => write!(f, "JSON error: {}", e),
            InventoryError::Csv(e) => write!(f, "CSV error: {}", e),
            InventoryError::InvalidRule(msg) => write!(f, "Invalid rule: {}", msg),
        }
    }
}

impl std::error::Error for InventoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InventoryError::Io(e) => Some(e),
            InventoryError::Json(e) => Some(e),
            InventoryError::Csv(e) => Some(e),
            InventoryError::InvalidRule(_) => None,
        }
    }
}

impl From<std::io::Error> for InventoryError {
    fn from(err: std::io::Error) -> Self {
        InventoryError::Io(err)
    }
}

impl From<serde_json::Error> for InventoryError {
    fn from(err: serde_json::Error) -> Self {
        InventoryError::Json(err)
    }
}

impl From<csv::Error> for InventoryError {
    fn from(err: csv::Error) -> Self {
        InventoryError::Csv(err)
    }
}

/// Result type alias for inventory operations
pub type Result<T> = std::result::Result<T, InventoryError>;
