//! Shared pieces of the item readers.

use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::warn;

use crate::model::{LineItem, ParticipantId};

/// Errors that can occur when reading receipt items
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: io::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("failed to read csv header: {0}")]
    Header(csv::Error),

    #[error("missing '{0}' column")]
    MissingColumn(&'static str),

    #[error("column '{0}' given more than once")]
    DuplicateColumn(String),

    #[error("invalid receipt json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("line {line}: negative price {price}")]
    NegativePrice { line: usize, price: f64 },
}

/// Items read from a receipt file, before any edits.
#[derive(Debug, Default)]
pub struct ItemTable {
    /// Participant columns found in the file, in column order.
    pub participants: Vec<ParticipantId>,
    /// One entry per row, in file order. Bad rows are reported individually.
    pub rows: Vec<Result<LineItem, InputError>>,
}

/// Source format of an item file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemFormat {
    Csv,
    Json,
}

impl ItemFormat {
    /// Guess the format from the file extension, defaulting to csv.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ItemFormat::Json,
            _ => ItemFormat::Csv,
        }
    }
}

/// Read an item file in the given format.
pub fn read_items(path: impl AsRef<Path>, format: ItemFormat) -> Result<ItemTable, InputError> {
    match format {
        ItemFormat::Csv => crate::csv::read_items(path),
        ItemFormat::Json => crate::receipt::read_items(path),
    }
}

/// Parse a number the way an editable table cell is parsed.
///
/// Blank or non-numeric input becomes 0 so the row stays editable.
pub(crate) fn number_or_zero(raw: &str, field: &'static str, line: usize) -> f64 {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    match digits.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            warn!(line, field, value = raw, "not a number, using 0");
            0.0
        }
    }
}

/// Reject negative prices at the input boundary.
pub(crate) fn check_price(price: f64, line: usize) -> Result<f64, InputError> {
    if price < 0.0 {
        Err(InputError::NegativePrice { line, price })
    } else {
        Ok(price)
    }
}
