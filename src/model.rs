//! Core domain types for the receipt splitter.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::Amount;

/// Participant identifier: the display name entered by the user.
pub type ParticipantId = String;

/// A single receipt row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineItem {
    pub quantity: f64,
    pub description: String,
    /// Line total for the row, not a unit price.
    pub price: Amount,
    /// Split evenly among all participants, overriding `assignment`.
    pub everyone: bool,
    /// Per-participant checkbox state.
    pub assignment: HashMap<ParticipantId, bool>,
}

impl LineItem {
    /// Create an unassigned item.
    pub fn new(quantity: f64, description: impl Into<String>, price: Amount) -> Self {
        Self {
            quantity,
            description: description.into(),
            price,
            everyone: false,
            assignment: HashMap::new(),
        }
    }

    /// Builder-style helper marking the item as shared by everyone.
    pub fn for_everyone(mut self) -> Self {
        self.everyone = true;
        self
    }

    /// Builder-style helper checking the given participants.
    pub fn assigned_to<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ParticipantId>,
    {
        for name in names {
            self.assignment.insert(name.into(), true);
        }
        self
    }

    /// Whether `name` is checked for this item. Ignores the everyone flag.
    pub fn is_checked(&self, name: &str) -> bool {
        self.assignment.get(name).copied().unwrap_or(false)
    }

    /// Flip the checkbox for `name`.
    pub fn toggle(&mut self, name: &str) {
        let flag = self.assignment.entry(name.to_string()).or_insert(false);
        *flag = !*flag;
    }
}

/// How a tax or tip value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChargeMode {
    /// `value` is a percentage of the base.
    #[default]
    Percentage,
    /// `value` is a currency amount.
    FixedAmount,
}

/// Tax or tip parameter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Charge {
    pub mode: ChargeMode,
    pub value: f64,
}

impl Charge {
    pub fn percentage(value: f64) -> Self {
        Self {
            mode: ChargeMode::Percentage,
            value,
        }
    }

    pub fn fixed(value: f64) -> Self {
        Self {
            mode: ChargeMode::FixedAmount,
            value,
        }
    }

    /// Resolve the charge against `base`.
    pub fn amount_on(&self, base: Amount) -> Amount {
        match self.mode {
            ChargeMode::Percentage => base * (self.value / 100.0),
            ChargeMode::FixedAmount => Amount::new(self.value),
        }
    }
}

impl fmt::Display for Charge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            ChargeMode::Percentage => write!(f, "{}%", self.value),
            ChargeMode::FixedAmount => write!(f, "${}", Amount::new(self.value)),
        }
    }
}

/// Error when parsing a tax or tip argument such as `10%` or `$2.50`.
#[derive(Debug, Error, PartialEq)]
pub enum ChargeParseError {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("'{0}' must not be negative")]
    Negative(String),
}

impl FromStr for Charge {
    type Err = ChargeParseError;

    /// `10%` is a percentage; `2.50` and `$2.50` are fixed amounts.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (mode, number) = match trimmed.strip_suffix('%') {
            Some(rest) => (ChargeMode::Percentage, rest.trim()),
            None => (
                ChargeMode::FixedAmount,
                trimmed.strip_prefix('$').unwrap_or(trimmed).trim(),
            ),
        };

        let value: f64 = number
            .parse()
            .map_err(|_| ChargeParseError::NotANumber(s.to_string()))?;
        if !value.is_finite() {
            return Err(ChargeParseError::NotANumber(s.to_string()));
        }
        if value < 0.0 {
            return Err(ChargeParseError::Negative(s.to_string()));
        }

        Ok(Self { mode, value })
    }
}

/// Tax and tip configuration for a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TaxTip {
    pub tax: Charge,
    /// A percentage tip applies to subtotal plus tax.
    pub tip: Charge,
}

impl TaxTip {
    pub fn new(tax: Charge, tip: Charge) -> Self {
        Self { tax, tip }
    }
}

/// Parse a comma separated list of names.
///
/// Names are trimmed, empty entries dropped and repeated names kept only once,
/// in first-seen order.
pub fn parse_names(input: &str) -> Vec<ParticipantId> {
    let mut names: Vec<ParticipantId> = Vec::new();
    for name in input.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_is_unassigned() {
        let item = LineItem::new(1.0, "Pizza", Amount::new(12.0));
        assert!(!item.everyone);
        assert!(!item.is_checked("Alice"));
    }

    #[test]
    fn toggle_flips_checkbox() {
        let mut item = LineItem::new(1.0, "Pizza", Amount::new(12.0));
        item.toggle("Alice");
        assert!(item.is_checked("Alice"));
        item.toggle("Alice");
        assert!(!item.is_checked("Alice"));
    }

    #[test]
    fn everyone_keeps_stored_assignment() {
        let item = LineItem::new(1.0, "Wings", Amount::new(9.0))
            .assigned_to(["Bob"])
            .for_everyone();
        assert!(item.everyone);
        assert!(item.is_checked("Bob"));
    }

    #[test]
    fn percentage_charge_on_base() {
        let tax = Charge::percentage(10.0);
        assert!(
            tax.amount_on(Amount::new(30.0))
                .approx_eq(Amount::new(3.0), 1e-9)
        );
    }

    #[test]
    fn fixed_charge_ignores_base() {
        let tax = Charge::fixed(2.0);
        assert_eq!(tax.amount_on(Amount::new(30.0)), Amount::new(2.0));
        assert_eq!(tax.amount_on(Amount::ZERO), Amount::new(2.0));
    }

    #[test]
    fn percentage_is_not_capped() {
        let tip = Charge::percentage(150.0);
        assert_eq!(tip.amount_on(Amount::new(10.0)), Amount::new(15.0));
    }

    #[test]
    fn parse_charge() {
        assert_eq!("10%".parse::<Charge>(), Ok(Charge::percentage(10.0)));
        assert_eq!(" 15 % ".parse::<Charge>(), Ok(Charge::percentage(15.0)));
        assert_eq!("2.50".parse::<Charge>(), Ok(Charge::fixed(2.5)));
        assert_eq!("$2".parse::<Charge>(), Ok(Charge::fixed(2.0)));
    }

    #[test]
    fn parse_charge_rejects_garbage_and_negative() {
        assert_eq!(
            "abc".parse::<Charge>(),
            Err(ChargeParseError::NotANumber("abc".to_string()))
        );
        assert_eq!(
            "-5%".parse::<Charge>(),
            Err(ChargeParseError::Negative("-5%".to_string()))
        );
        assert!("NaN".parse::<Charge>().is_err());
    }

    #[test]
    fn charge_display() {
        assert_eq!(Charge::percentage(12.5).to_string(), "12.5%");
        assert_eq!(Charge::fixed(2.0).to_string(), "$2.00");
    }

    #[test]
    fn parse_names_trims_and_dedups() {
        assert_eq!(
            parse_names(" Alice, Bob ,, Charlie,Alice "),
            vec!["Alice", "Bob", "Charlie"]
        );
        assert!(parse_names(" , ").is_empty());
    }
}
