//! Reader for the receipt parsing service output.
//!
//! The service answers with `{"parsed_data": [{"Quantity": 1, "Item": "..", "price": 9.5}]}`.
//! Its values come from OCR, so numbers may arrive as strings, `null` or not at
//! all; those fall back to 0 instead of failing the whole receipt.

use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::warn;

use crate::Amount;
use crate::input::{InputError, ItemTable, check_price, number_or_zero};
use crate::model::LineItem;

#[derive(Debug, Default, Deserialize)]
struct ParsedRow {
    #[serde(default, rename = "Quantity", alias = "quantity")]
    quantity: Value,
    #[serde(default, rename = "Item", alias = "item", alias = "description")]
    item: Value,
    #[serde(default, alias = "Price")]
    price: Value,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ParsedReceipt {
    Envelope { parsed_data: Vec<ParsedRow> },
    Rows(Vec<ParsedRow>),
    Single(ParsedRow),
}

impl ParsedReceipt {
    fn into_rows(self) -> Vec<ParsedRow> {
        match self {
            ParsedReceipt::Envelope { parsed_data } => parsed_data,
            ParsedReceipt::Rows(rows) => rows,
            ParsedReceipt::Single(row) => vec![row],
        }
    }
}

fn number(value: &Value, field: &'static str, line: usize) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => number_or_zero(s, field, line),
        other => {
            warn!(line, field, value = %other, "not a number, using 0");
            0.0
        }
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl ParsedRow {
    fn into_item(self, line: usize) -> Result<LineItem, InputError> {
        let quantity = number(&self.quantity, "quantity", line);
        let price = check_price(number(&self.price, "price", line), line)?;
        Ok(LineItem::new(quantity, text(&self.item), Amount::new(price)))
    }
}

/// Parse receipt items from the parsing service's json.
///
/// Rows are numbered from 1 in `line` fields of errors and warnings.
pub fn parse_items(reader: impl Read) -> Result<ItemTable, InputError> {
    let parsed: ParsedReceipt = serde_json::from_reader(reader)?;
    let rows = parsed
        .into_rows()
        .into_iter()
        .enumerate()
        .map(|(idx, row)| row.into_item(idx + 1))
        .collect();

    Ok(ItemTable {
        participants: Vec::new(),
        rows,
    })
}

/// Read receipt items from a json file
pub fn read_items(path: impl AsRef<Path>) -> Result<ItemTable, InputError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| InputError::Open {
        path: path.display().to_string(),
        source,
    })?;
    parse_items(BufReader::new(file))
}
