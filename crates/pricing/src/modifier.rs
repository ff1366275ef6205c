use serde::{Deserialize, Serialize};

use crate::context::CalculationContext;
use crate::error::CalculationError;
use crate::money::Cents;
use crate::types::{GameId, ServiceTypeId};

const BASIS_SCALE: i128 = 10_000;
const PERCENT_SCALE: i128 = 100;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    Percentage,
    Fixed,
    FormulaBased,
    Multiplier,
    Discount,
}

/// Catalog scope of a modifier. `service_type == None` applies to every
/// service type of the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModifierScope {
    pub game: GameId,
    #[serde(default)]
    pub service_type: Option<ServiceTypeId>,
}

/// A named price adjustment. `value` semantics depend on `kind`:
/// percentage and discount values are basis points (1550 = 15.50%),
/// multiplier values are percent x100 (150 = 1.5x), fixed values are
/// minor units per level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriceModifier {
    pub code: String,
    pub kind: ModifierKind,
    pub value: i64,
    pub active: bool,
    pub sort_order: i32,
    pub scope: ModifierScope,
}

impl PriceModifier {
    /// Signed adjustment this modifier contributes on top of the
    /// context's base price.
    pub fn adjustment(&self, ctx: &CalculationContext) -> Result<Cents, CalculationError> {
        let base = i128::from(ctx.base_price.as_i64());
        let value = i128::from(self.value);
        let raw = match self.kind {
            ModifierKind::Percentage => base * value / BASIS_SCALE,
            // FormulaBased shares Fixed's arithmetic until per-modifier
            // formulas land in the catalog schema.
            ModifierKind::Fixed | ModifierKind::FormulaBased => {
                value * i128::from(ctx.level_difference.max(1))
            }
            ModifierKind::Multiplier => {
                if value <= PERCENT_SCALE {
                    0
                } else {
                    base * (value - PERCENT_SCALE) / PERCENT_SCALE
                }
            }
            ModifierKind::Discount => -(base * value / BASIS_SCALE),
        };
        Cents::from_i128_checked(raw, "modifier adjustment")
    }
}
