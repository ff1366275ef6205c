//! Deterministic price calculation engine for game boosting services.
//!
//! Given a base price, a level interval, a pricing formula and a set of
//! catalog modifiers, the engine computes a final integer price in minor
//! currency units together with a per-modifier breakdown. Every entry
//! point is a pure function of its arguments; the only filesystem access
//! in the crate is [`load_catalog`] at the catalog edge.

pub mod calc;
pub mod catalog;
pub mod context;
pub mod error;
pub mod expr;
pub mod formula;
pub mod modifier;
pub mod money;
pub mod orchestrator;
pub mod response;
pub mod rounding;
pub mod types;

pub use calc::calculate_price;
pub use catalog::{load_catalog, validate_compatibility, CatalogError, ModifierCatalog};
pub use context::CalculationContext;
pub use error::{CalculationError, EngineError, FormulaError, ModifierError, ValidationError};
pub use expr::ExprError;
pub use formula::{CalculationFormula, PriceRange};
pub use modifier::{ModifierKind, ModifierScope, PriceModifier};
pub use money::Cents;
pub use orchestrator::{quote, AppliedModifier, CalculationResult, PricingPolicy, QuoteRequest};
pub use response::CalculationResponse;
pub use rounding::round_half_up;
pub use types::{GameId, ServiceTypeId};

/// Full pipeline: validation, formula calculation, modifier resolution
/// and application, mapped into one of the three response shapes.
pub fn calculate_with_modifiers(
    request: &QuoteRequest,
    catalog: &ModifierCatalog,
    policy: &PricingPolicy,
) -> CalculationResponse {
    CalculationResponse::from_outcome(orchestrator::quote(request, catalog, policy))
}

#[cfg(test)]
mod tests;
