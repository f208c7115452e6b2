//! Editable receipt snapshot.
//!
//! A session owns the receipt table: the ordered item list, the participants
//! and the tax/tip settings. Edits change the snapshot one value at a time and
//! the allocation is recomputed from scratch whenever it is requested.
//! Also supports an async stream of edits.

use tokio_stream::{Stream, StreamExt};
use tracing::info;

use crate::Amount;
use crate::engine::{Allocation, allocate};
use crate::model::{Charge, LineItem, ParticipantId, TaxTip};

mod error;
pub use error::{EditKind, SessionError};

/// A single change to the receipt table.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Append a row.
    AddItem(LineItem),
    SetQuantity { row: usize, value: f64 },
    SetDescription { row: usize, value: String },
    SetPrice { row: usize, value: f64 },
    /// Flip the "everyone" checkbox of a row.
    ToggleEveryone { row: usize },
    /// Flip one participant's checkbox of a row.
    ToggleParticipant { row: usize, name: ParticipantId },
    /// Delete a row; later rows shift up by one.
    RemoveItem { row: usize },
    SetTax(Charge),
    SetTip(Charge),
}

/// Receipt table being split.
#[derive(Debug, Clone, Default)]
pub struct Session {
    items: Vec<LineItem>,
    participants: Vec<ParticipantId>,
    tax_tip: TaxTip,
}

/// Public API
impl Session {
    pub fn new(participants: Vec<ParticipantId>, tax_tip: TaxTip) -> Self {
        Self {
            items: Vec::new(),
            participants,
            tax_tip,
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }

    pub fn tax_tip(&self) -> &TaxTip {
        &self.tax_tip
    }

    /// Allocate the current snapshot.
    pub fn allocation(&self) -> Allocation {
        allocate(&self.items, &self.participants, &self.tax_tip)
    }

    /// Run the session with the given edit stream
    pub async fn run(&mut self, mut stream: impl Stream<Item = Edit> + Unpin) {
        while let Some(edit) = stream.next().await {
            // a rejected edit leaves the table as it was, keep going
            let _ = self.apply(edit);
        }
    }

    /// Apply a single edit on top of the current snapshot
    pub fn apply(&mut self, edit: Edit) -> Result<(), SessionError> {
        let result = match edit {
            Edit::AddItem(item) => self.add_item(item),
            Edit::SetTax(charge) => {
                info!(tax = %charge, "tax updated");
                self.tax_tip.tax = charge;
                return Ok(());
            }
            Edit::SetTip(charge) => {
                info!(tip = %charge, "tip updated");
                self.tax_tip.tip = charge;
                return Ok(());
            }
            Edit::SetQuantity { row, value } => self.set_quantity(row, value),
            Edit::SetDescription { row, value } => self
                .row_mut(EditKind::SetDescription, row)
                .map(|item| item.description = value),
            Edit::SetPrice { row, value } => self.set_price(row, value),
            Edit::ToggleEveryone { row } => self
                .row_mut(EditKind::ToggleEveryone, row)
                .map(|item| item.everyone = !item.everyone),
            Edit::ToggleParticipant { row, name } => self.toggle_participant(row, &name),
            Edit::RemoveItem { row } => self.remove_item(row),
        };

        Self::log_result(&result);
        result
    }
}

/// Private API
impl Session {
    /// Small helper to log `apply` results
    fn log_result(result: &Result<(), SessionError>) {
        match result {
            Ok(()) => info!("edit applied"),
            Err(e) => info!(reason = %e, "edit skipped"),
        }
    }

    /// Append a row:
    /// - Ensure price and quantity are valid
    fn add_item(&mut self, item: LineItem) -> Result<(), SessionError> {
        use EditKind::AddItem;

        Self::check_value(AddItem, item.price.value())?;
        Self::check_value(AddItem, item.quantity)?;

        info!(
            row = self.items.len(),
            item = %item.description,
            price = %item.price,
            "item added"
        );
        self.items.push(item);
        Ok(())
    }

    fn set_quantity(&mut self, row: usize, value: f64) -> Result<(), SessionError> {
        use EditKind::SetQuantity;

        let value = Self::check_value(SetQuantity, value)?;
        self.row_mut(SetQuantity, row)?.quantity = value;
        Ok(())
    }

    fn set_price(&mut self, row: usize, value: f64) -> Result<(), SessionError> {
        use EditKind::SetPrice;

        let value = Self::check_value(SetPrice, value)?;
        self.row_mut(SetPrice, row)?.price = Amount::new(value);
        Ok(())
    }

    /// Prices and quantities must be finite and not negative.
    fn check_value(kind: EditKind, value: f64) -> Result<f64, SessionError> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(SessionError::InvalidValue(kind, value))
        }
    }

    fn row_mut(&mut self, kind: EditKind, row: usize) -> Result<&mut LineItem, SessionError> {
        let len = self.items.len();
        self.items
            .get_mut(row)
            .ok_or(SessionError::RowNotFound(kind, row, len))
    }

    /// Flip a participant checkbox:
    /// - Ensure the participant is part of the session
    /// - Ensure the row exists
    fn toggle_participant(&mut self, row: usize, name: &str) -> Result<(), SessionError> {
        use EditKind::ToggleParticipant;

        if !self.participants.iter().any(|p| p == name) {
            return Err(SessionError::UnknownParticipant(
                ToggleParticipant,
                name.to_string(),
            ));
        }

        self.row_mut(ToggleParticipant, row)?.toggle(name);
        Ok(())
    }

    fn remove_item(&mut self, row: usize) -> Result<(), SessionError> {
        if row >= self.items.len() {
            return Err(SessionError::RowNotFound(
                EditKind::RemoveItem,
                row,
                self.items.len(),
            ));
        }
        self.items.remove(row);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // test utils

    fn session(names: &[&str]) -> Session {
        Session::new(
            names.iter().map(|n| n.to_string()).collect(),
            TaxTip::default(),
        )
    }

    fn add(description: &str, price: f64) -> Edit {
        Edit::AddItem(LineItem::new(1.0, description, Amount::new(price)))
    }

    fn toggle(row: usize, name: &str) -> Edit {
        Edit::ToggleParticipant {
            row,
            name: name.to_string(),
        }
    }

    #[test]
    fn new_session_is_empty() {
        let session = session(&["Alice"]);
        assert!(session.items().is_empty());
        assert_eq!(session.participants(), ["Alice".to_string()]);
        assert_eq!(session.allocation().grand_total(), Amount::ZERO);
    }

    #[test]
    fn add_item_appends_row() {
        let mut session = session(&["Alice"]);
        session.apply(add("Pizza", 12.0)).unwrap();
        session.apply(add("Soda", 3.0)).unwrap();

        assert_eq!(session.items().len(), 2);
        assert_eq!(session.items()[1].description, "Soda");
        assert_eq!(session.allocation().subtotal(), Amount::new(15.0));
    }

    #[test]
    fn set_fields_edit_row_in_place() {
        let mut session = session(&[]);
        session.apply(add("Piza", 12.0)).unwrap();
        session
            .apply(Edit::SetDescription {
                row: 0,
                value: "Pizza".to_string(),
            })
            .unwrap();
        session.apply(Edit::SetQuantity { row: 0, value: 2.0 }).unwrap();
        session.apply(Edit::SetPrice { row: 0, value: 24.0 }).unwrap();

        let item = &session.items()[0];
        assert_eq!(item.description, "Pizza");
        assert_eq!(item.quantity, 2.0);
        assert_eq!(item.price, Amount::new(24.0));
    }

    #[test]
    fn toggles_drive_the_allocation() {
        let mut session = session(&["Alice", "Bob"]);
        session.apply(add("Pizza", 20.0)).unwrap();
        session.apply(add("Beer", 6.0)).unwrap();

        session.apply(Edit::ToggleEveryone { row: 0 }).unwrap();
        session.apply(toggle(1, "Bob")).unwrap();

        let allocation = session.allocation();
        assert_eq!(allocation.get_participant("Alice").unwrap().owed(), Amount::new(10.0));
        assert_eq!(allocation.get_participant("Bob").unwrap().owed(), Amount::new(16.0));

        // untoggle Bob: beer becomes unassigned
        session.apply(toggle(1, "Bob")).unwrap();
        let allocation = session.allocation();
        assert_eq!(allocation.get_participant("Bob").unwrap().owed(), Amount::new(10.0));
        assert_eq!(allocation.unassigned(), Amount::new(6.0));
    }

    #[test]
    fn tax_and_tip_edits_recompute() {
        let mut session = session(&["Alice"]);
        session.apply(add("Pizza", 30.0)).unwrap();
        session.apply(Edit::SetTax(Charge::fixed(3.0))).unwrap();
        session.apply(Edit::SetTip(Charge::percentage(10.0))).unwrap();

        let allocation = session.allocation();
        assert_eq!(allocation.tax(), Amount::new(3.0));
        assert!(allocation.tip().approx_eq(Amount::new(3.3), 1e-9));
        assert_eq!(session.tax_tip().tax, Charge::fixed(3.0));
    }

    #[test]
    fn remove_item_shifts_rows() {
        let mut session = session(&[]);
        session.apply(add("A", 1.0)).unwrap();
        session.apply(add("B", 2.0)).unwrap();
        session.apply(add("C", 3.0)).unwrap();
        session.apply(Edit::RemoveItem { row: 1 }).unwrap();

        let descriptions: Vec<_> = session.items().iter().map(|i| i.description.as_str()).collect();
        assert_eq!(descriptions, vec!["A", "C"]);
    }

    #[test]
    fn edit_on_missing_row_fails() {
        let mut session = session(&["Alice"]);
        session.apply(add("A", 1.0)).unwrap();

        assert_eq!(
            session.apply(Edit::SetPrice { row: 3, value: 5.0 }),
            Err(SessionError::RowNotFound(EditKind::SetPrice, 3, 1))
        );
        assert_eq!(
            session.apply(Edit::RemoveItem { row: 1 }),
            Err(SessionError::RowNotFound(EditKind::RemoveItem, 1, 1))
        );
        assert_eq!(
            session.apply(toggle(9, "Alice")),
            Err(SessionError::RowNotFound(EditKind::ToggleParticipant, 9, 1))
        );

        // Snapshot unchanged
        assert_eq!(session.items()[0].price, Amount::new(1.0));
    }

    #[test]
    fn negative_or_non_finite_price_is_rejected() {
        let mut session = session(&["Alice"]);
        session.apply(add("Pizza", 30.0)).unwrap();
        session.apply(Edit::ToggleEveryone { row: 0 }).unwrap();

        assert_eq!(
            session.apply(Edit::SetPrice { row: 0, value: -5.0 }),
            Err(SessionError::InvalidValue(EditKind::SetPrice, -5.0))
        );
        assert!(matches!(
            session.apply(Edit::SetPrice { row: 0, value: f64::NAN }),
            Err(SessionError::InvalidValue(EditKind::SetPrice, v)) if v.is_nan()
        ));
        assert!(matches!(
            session.apply(Edit::SetPrice { row: 0, value: f64::INFINITY }),
            Err(SessionError::InvalidValue(EditKind::SetPrice, _))
        ));

        // Snapshot unchanged
        let allocation = session.allocation();
        assert_eq!(allocation.subtotal(), Amount::new(30.0));
        assert_eq!(allocation.grand_total().to_string(), "30.00");
    }

    #[test]
    fn negative_or_non_finite_quantity_is_rejected() {
        let mut session = session(&[]);
        session.apply(add("Pizza", 30.0)).unwrap();

        assert_eq!(
            session.apply(Edit::SetQuantity { row: 0, value: -1.0 }),
            Err(SessionError::InvalidValue(EditKind::SetQuantity, -1.0))
        );
        assert!(matches!(
            session.apply(Edit::SetQuantity { row: 0, value: f64::NAN }),
            Err(SessionError::InvalidValue(EditKind::SetQuantity, _))
        ));
        assert_eq!(session.items()[0].quantity, 1.0);
    }

    #[test]
    fn add_item_with_invalid_price_is_rejected() {
        let mut session = session(&["Alice"]);

        assert_eq!(
            session.apply(add("Refund", -3.0)),
            Err(SessionError::InvalidValue(EditKind::AddItem, -3.0))
        );
        assert!(session.apply(add("Broken", f64::NAN)).is_err());
        assert!(session.items().is_empty());
    }

    #[test]
    fn toggle_unknown_participant_fails() {
        let mut session = session(&["Alice"]);
        session.apply(add("A", 1.0)).unwrap();

        assert_eq!(
            session.apply(toggle(0, "Mallory")),
            Err(SessionError::UnknownParticipant(
                EditKind::ToggleParticipant,
                "Mallory".to_string()
            ))
        );
        assert!(session.items()[0].assignment.is_empty());
    }

    //  Async run()

    #[tokio::test]
    async fn run_applies_all_edits() {
        let mut session = session(&["Alice", "Bob"]);
        let edits = vec![add("Pizza", 30.0), Edit::ToggleEveryone { row: 0 }];

        session.run(tokio_stream::iter(edits)).await;

        let allocation = session.allocation();
        assert_eq!(allocation.get_participant("Alice").unwrap().owed(), Amount::new(15.0));
        assert_eq!(allocation.get_participant("Bob").unwrap().owed(), Amount::new(15.0));
    }

    #[tokio::test]
    async fn run_skips_failed_edits_and_continues() {
        let mut session = session(&["Alice"]);
        let edits = vec![
            add("Pizza", 30.0),
            Edit::ToggleEveryone { row: 5 }, // no such row
            toggle(0, "Alice"),              // still applied
        ];

        session.run(tokio_stream::iter(edits)).await;

        assert_eq!(
            session.allocation().get_participant("Alice").unwrap().owed(),
            Amount::new(30.0)
        );
    }
}
