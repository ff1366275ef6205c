use std::time::{Duration, Instant};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::calc::calculate_price;
use crate::catalog::{validate_compatibility, ModifierCatalog};
use crate::context::CalculationContext;
use crate::error::{CalculationError, EngineError, FormulaError, ValidationError};
use crate::formula::CalculationFormula;
use crate::money::Cents;
use crate::types::{GameId, ServiceTypeId};

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub formula: Option<CalculationFormula>,
    pub base_price: Cents,
    pub from_level: i32,
    pub to_level: i32,
    pub game: GameId,
    pub service_type: ServiceTypeId,
    /// Explicit modifier codes; empty selects every active modifier in
    /// scope.
    pub modifier_codes: Vec<String>,
}

/// Business-rule knobs for the final price. Negative totals surface
/// as-is by default so callers can detect over-discounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields, default)]
pub struct PricingPolicy {
    pub clamp_non_negative: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedModifier {
    pub code: String,
    pub adjustment: Cents,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResult {
    /// Formula output before modifiers.
    pub base_price: Cents,
    pub applied_modifiers: Vec<AppliedModifier>,
    pub final_price: Cents,
    pub execution_time: Duration,
}

/// Top-level entry point: validates parameters and formula, computes
/// the formula price, resolves and applies modifiers, and returns the
/// result with an ordered breakdown.
pub fn quote(
    request: &QuoteRequest,
    catalog: &ModifierCatalog,
    policy: &PricingPolicy,
) -> Result<CalculationResult, EngineError> {
    let started = Instant::now();

    validate_scalars(request)?;
    let formula = request
        .formula
        .as_ref()
        .ok_or(ValidationError::Formula(FormulaError::MissingFormula))?;

    let base = calculate_price(
        formula,
        request.base_price,
        request.from_level,
        request.to_level,
    )?;

    let resolved = catalog.resolve(request.game, request.service_type, &request.modifier_codes)?;
    validate_compatibility(&resolved)?;

    let context = CalculationContext::new(base, request.from_level, request.to_level);
    let mut applied = Vec::with_capacity(resolved.len());
    let mut total_adjustment: i64 = 0;
    for modifier in &resolved {
        let adjustment = modifier.adjustment(&context)?;
        debug!(
            "applied modifier '{}': kind={:?}, adjustment={}",
            modifier.code,
            modifier.kind,
            adjustment.as_i64()
        );
        total_adjustment = total_adjustment
            .checked_add(adjustment.as_i64())
            .ok_or(CalculationError::ArithmeticOverflow {
                op: "modifier total",
            })?;
        applied.push(AppliedModifier {
            code: modifier.code.clone(),
            adjustment,
        });
    }

    let mut final_price = base.checked_add(Cents(total_adjustment))?;
    if policy.clamp_non_negative && final_price.as_i64() < 0 {
        final_price = Cents::ZERO;
    }

    debug!(
        "quote complete: base={}, modifiers={}, total_adjustment={}, final={}",
        base.as_i64(),
        applied.len(),
        total_adjustment,
        final_price.as_i64()
    );

    Ok(CalculationResult {
        base_price: base,
        applied_modifiers: applied,
        final_price,
        execution_time: started.elapsed(),
    })
}

fn validate_scalars(request: &QuoteRequest) -> Result<(), ValidationError> {
    if request.base_price.as_i64() < 0 {
        return Err(ValidationError::NegativeBasePrice(
            request.base_price.as_i64(),
        ));
    }
    if request.from_level < 1 {
        return Err(ValidationError::FromLevelTooLow(request.from_level));
    }
    if request.to_level < 1 {
        return Err(ValidationError::ToLevelTooLow(request.to_level));
    }
    // to_level < from_level is a legal downgrade request; the growth
    // component is simply zero.
    Ok(())
}
