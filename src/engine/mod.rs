//! Cost allocation engine.
//!
//! Turns a receipt snapshot (items, participants, tax and tip) into receipt
//! totals and a per-participant breakdown. Allocation is a pure computation:
//! it never mutates its inputs and can be repeated after every edit.

use tracing::debug;

use crate::Amount;
use crate::model::{LineItem, ParticipantId, TaxTip};

mod state;
pub use state::{ItemShare, ParticipantShare};

/// Result of allocating a receipt.
///
/// All amounts are unrounded. Rounding to cents happens only when an amount is
/// displayed, so the rounded owed amounts may not add up to the rounded grand
/// total.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    subtotal: Amount,
    tax: Amount,
    tip: Amount,
    unassigned: Amount,
    participants: Vec<ParticipantShare>,
}

impl Allocation {
    /// Sum of all item prices.
    pub fn subtotal(&self) -> Amount {
        self.subtotal
    }

    pub fn tax(&self) -> Amount {
        self.tax
    }

    pub fn tip(&self) -> Amount {
        self.tip
    }

    /// Tax plus tip.
    pub fn surcharge(&self) -> Amount {
        self.tax + self.tip
    }

    pub fn grand_total(&self) -> Amount {
        self.subtotal + self.tax + self.tip
    }

    /// Total price of items nobody is responsible for.
    ///
    /// These still count toward subtotal, tax and tip, so the participants'
    /// owed amounts fall short of the grand total by this amount plus its
    /// share of tax and tip.
    pub fn unassigned(&self) -> Amount {
        self.unassigned
    }

    /// Per-participant shares, in participant order.
    pub fn participants(&self) -> &[ParticipantShare] {
        &self.participants
    }

    pub fn get_participant(&self, name: &str) -> Option<&ParticipantShare> {
        self.participants.iter().find(|p| p.name() == name)
    }

    /// Sum of what every participant owes.
    pub fn total_owed(&self) -> Amount {
        self.participants.iter().map(ParticipantShare::owed).sum()
    }
}

/// Allocate a receipt across participants.
///
/// - Items marked for everyone split evenly across all participants.
/// - Other items split evenly across their checked participants.
/// - Items with nobody responsible count toward the totals only.
/// - Tax and tip are distributed in proportion to each participant's subtotal.
pub fn allocate(
    items: &[LineItem],
    participants: &[ParticipantId],
    tax_tip: &TaxTip,
) -> Allocation {
    let subtotal: Amount = items.iter().map(|item| item.price).sum();
    let tax = tax_tip.tax.amount_on(subtotal);
    let tip = tax_tip.tip.amount_on(subtotal + tax);

    let mut shares: Vec<ParticipantShare> = participants
        .iter()
        .cloned()
        .map(ParticipantShare::new)
        .collect();
    let mut unassigned = Amount::ZERO;

    for item in items {
        let responsible = responsible_set(item, participants);
        if responsible.is_empty() {
            debug!(
                item = %item.description,
                price = %item.price,
                "item not attributed to any participant"
            );
            unassigned += item.price;
            continue;
        }

        let share = item.price / responsible.len() as f64;
        for idx in responsible {
            shares[idx].charge(&item.description, share);
        }
    }

    let surcharge = tax + tip;
    for share in &mut shares {
        share.set_surcharge(surcharge * share.subtotal().ratio_of(subtotal));
    }

    Allocation {
        subtotal,
        tax,
        tip,
        unassigned,
        participants: shares,
    }
}

/// Indices into `participants` of those who pay for `item`.
fn responsible_set(item: &LineItem, participants: &[ParticipantId]) -> Vec<usize> {
    if item.everyone {
        return (0..participants.len()).collect();
    }
    participants
        .iter()
        .enumerate()
        .filter(|(_, name)| item.is_checked(name))
        .map(|(idx, _)| idx)
        .collect()
}
