use serde::{Deserialize, Serialize};

use crate::error::CalculationError;

/// Minor currency units (cents, kopiykas). All engine arithmetic widens
/// to `i128` before narrowing back through [`Cents::from_i128_checked`].
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Cents(pub i64);

impl Cents {
    pub const ZERO: Self = Self(0);

    pub fn checked_add(self, rhs: Self) -> Result<Self, CalculationError> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(CalculationError::ArithmeticOverflow { op: "add" })
    }

    pub fn from_i128_checked(value: i128, op: &'static str) -> Result<Self, CalculationError> {
        i64::try_from(value)
            .map(Self)
            .map_err(|_| CalculationError::ArithmeticOverflow { op })
    }

    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for Cents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Cents> for i64 {
    fn from(value: Cents) -> Self {
        value.0
    }
}
