use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::Amount;
use crate::engine::Allocation;
use crate::input::{InputError, ItemTable, check_price, number_or_zero};
use crate::model::{LineItem, ParticipantId};

/// Column positions of an item table
#[derive(Debug)]
struct Columns {
    quantity: Option<usize>,
    item: Option<usize>,
    price: usize,
    everyone: Option<usize>,
    participants: Vec<(usize, ParticipantId)>,
}

impl Columns {
    fn from_header(header: &csv::StringRecord) -> Result<Self, InputError> {
        let mut quantity = None;
        let mut item = None;
        let mut price = None;
        let mut everyone = None;
        let mut participants: Vec<(usize, ParticipantId)> = Vec::new();

        for (idx, name) in header.iter().enumerate() {
            let slot = match name.to_ascii_lowercase().as_str() {
                "" => continue,
                "quantity" | "qty" => &mut quantity,
                "item" | "description" => &mut item,
                "price" => &mut price,
                "everyone" => &mut everyone,
                _ => {
                    if !participants.iter().any(|(_, p)| p == name) {
                        participants.push((idx, name.to_string()));
                    }
                    continue;
                }
            };
            if slot.replace(idx).is_some() {
                return Err(InputError::DuplicateColumn(name.to_string()));
            }
        }

        Ok(Self {
            quantity,
            item,
            price: price.ok_or(InputError::MissingColumn("price"))?,
            everyone,
            participants,
        })
    }

    fn item(&self, record: &csv::StringRecord, line: usize) -> Result<LineItem, InputError> {
        let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");

        let quantity = number_or_zero(cell(self.quantity), "quantity", line);
        let price = check_price(number_or_zero(cell(Some(self.price)), "price", line), line)?;

        let mut item = LineItem::new(quantity, cell(self.item), Amount::new(price));
        item.everyone = is_checked(cell(self.everyone));
        for (idx, name) in &self.participants {
            item.assignment
                .insert(name.clone(), is_checked(cell(Some(*idx))));
        }
        Ok(item)
    }
}

/// Checkbox cell: `true`, `x`, `yes`, `y` or `1` (any case) means checked.
fn is_checked(cell: &str) -> bool {
    matches!(
        cell.trim().to_ascii_lowercase().as_str(),
        "true" | "x" | "yes" | "y" | "1"
    )
}

/// Read receipt items from a csv file
///
/// Expected header: `quantity,item,price,everyone,<name>...`. Columns other
/// than the known ones are participant checkboxes.
///
/// `quantity`/`qty`, `item`/`description`, `price` and `everyone` are
/// reserved in any case, so they cannot be used as participant names. A
/// reserved column given twice is an error.
pub fn read_items(path: impl AsRef<Path>) -> Result<ItemTable, InputError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| InputError::Open {
        path: path.display().to_string(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let header = reader.headers().map_err(InputError::Header)?.clone();
    let columns = Columns::from_header(&header)?;

    let rows = reader
        .records()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let record = result.map_err(|source| InputError::Parse { line, source })?;
            columns.item(&record, line)
        })
        .collect();

    Ok(ItemTable {
        participants: columns.participants.into_iter().map(|(_, p)| p).collect(),
        rows,
    })
}

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    name: &'a str,
    subtotal: String,
    taxes_and_tips: String,
    total: String,
}

/// Write one csv row per participant
///
/// The header is always written, even without participants.
pub fn write_summary(allocation: &Allocation, writer: impl Write) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(["name", "subtotal", "taxes_and_tips", "total"])?;

    for share in allocation.participants() {
        let row = SummaryRow {
            name: share.name(),
            subtotal: share.subtotal().to_string(),
            taxes_and_tips: share.surcharge().to_string(),
            total: share.owed().to_string(),
        };
        writer.serialize(&row)?;
    }

    writer.flush()?;
    Ok(())
}
