use crate::Amount;
use crate::model::ParticipantId;

/// One line of a participant's itemized breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemShare {
    pub description: String,
    pub amount: Amount,
}

/// A participant's portion of the receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantShare {
    name: ParticipantId,
    subtotal: Amount,
    surcharge: Amount,
    items: Vec<ItemShare>,
}

impl ParticipantShare {
    pub(super) fn new(name: ParticipantId) -> Self {
        Self {
            name,
            subtotal: Amount::ZERO,
            surcharge: Amount::ZERO,
            items: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sum of item shares, before tax and tip.
    pub fn subtotal(&self) -> Amount {
        self.subtotal
    }

    /// Proportional share of tax and tip.
    pub fn surcharge(&self) -> Amount {
        self.surcharge
    }

    /// Amount owed: subtotal plus surcharge.
    pub fn owed(&self) -> Amount {
        self.subtotal + self.surcharge
    }

    /// Item shares in receipt order.
    pub fn items(&self) -> &[ItemShare] {
        &self.items
    }

    pub(super) fn charge(&mut self, description: &str, amount: Amount) {
        self.subtotal += amount;
        self.items.push(ItemShare {
            description: description.to_string(),
            amount,
        });
    }

    pub(super) fn set_surcharge(&mut self, surcharge: Amount) {
        self.surcharge = surcharge;
    }
}
