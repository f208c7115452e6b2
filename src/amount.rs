use std::fmt;
use std::iter::Sum;

/// Currency amount in whole units (e.g. dollars).
///
/// Arithmetic is carried out on the unrounded value; rounding to cents only
/// happens in `Display`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Amount(f64);

impl Amount {
    pub const ZERO: Amount = Amount(0.0);

    pub fn new(value: f64) -> Self {
        Amount(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    /// Value rounded to whole cents.
    pub fn cents(self) -> i64 {
        (self.0 * 100.0).round() as i64
    }

    /// Fraction this amount represents of `whole`, or 0 when `whole` is not positive.
    pub fn ratio_of(self, whole: Amount) -> f64 {
        if whole.0 > 0.0 { self.0 / whole.0 } else { 0.0 }
    }

    /// Returns true when both amounts are within `tolerance` of each other.
    pub fn approx_eq(self, other: Amount, tolerance: f64) -> bool {
        (self.0 - other.0).abs() <= tolerance
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self.cents();
        let sign = if cents < 0 { "-" } else { "" };
        let abs = cents.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl std::ops::Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl std::ops::Mul<f64> for Amount {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Amount(self.0 * rhs)
    }
}

impl std::ops::Div<f64> for Amount {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Amount(self.0 / rhs)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
