use std::collections::BTreeMap;

use log::debug;

use crate::error::{EngineError, FormulaError, ValidationError};
use crate::expr;
use crate::formula::{CalculationFormula, PriceRange};
use crate::money::Cents;
use crate::rounding::round_half_up;

/// Low-level formula-only calculation. Validates the formula, then
/// dispatches to the calculator for its variant.
pub fn calculate_price(
    formula: &CalculationFormula,
    base_price: Cents,
    from_level: i32,
    to_level: i32,
) -> Result<Cents, EngineError> {
    formula.validate().map_err(ValidationError::from)?;

    let price = match formula {
        CalculationFormula::Linear { price_per_level } => {
            linear(base_price, *price_per_level, from_level, to_level)?
        }
        CalculationFormula::Range { segments } => {
            range(base_price, segments, from_level, to_level)?
        }
        CalculationFormula::TimeBased {
            hours_per_level,
            rate_per_hour,
        } => time_based(
            base_price,
            *hours_per_level,
            *rate_per_hour,
            from_level,
            to_level,
        )?,
        CalculationFormula::Expression {
            formula_text,
            variables,
        } => expression(base_price, formula_text, variables, from_level, to_level)?,
    };

    debug!(
        "calculated price with {} formula: base={}, levels={}..{}, result={}",
        formula.kind_name(),
        base_price.as_i64(),
        from_level,
        to_level,
        price.as_i64()
    );

    Ok(price)
}

fn linear(base: Cents, rate: Cents, from: i32, to: i32) -> Result<Cents, EngineError> {
    if to <= from {
        return Ok(base);
    }
    let growth = i128::from(to - from) * i128::from(rate.as_i64());
    let total = i128::from(base.as_i64()) + growth;
    Ok(Cents::from_i128_checked(total, "linear growth")?)
}

fn range(base: Cents, segments: &[PriceRange], from: i32, to: i32) -> Result<Cents, EngineError> {
    if to <= from {
        return Ok(base);
    }
    // Segments are contiguous after validation, so checking the outer
    // bounds is enough to prove full coverage of [from, to).
    let start = segments.first().map_or(i32::MAX, |s| s.from_level);
    let end = segments.last().map_or(i32::MIN, |s| s.to_level);
    if from < start || to > end {
        return Err(FormulaError::LevelOutOfCoverage {
            from_level: from,
            to_level: to,
        }
        .into());
    }

    let mut total = i128::from(base.as_i64());
    for segment in segments {
        let lo = segment.from_level.max(from);
        let hi = segment.to_level.min(to);
        if hi > lo {
            total += i128::from(hi - lo) * i128::from(segment.price_per_level.as_i64());
        }
    }
    Ok(Cents::from_i128_checked(total, "range growth")?)
}

fn time_based(
    base: Cents,
    hours_per_level: f64,
    rate: Cents,
    from: i32,
    to: i32,
) -> Result<Cents, EngineError> {
    let levels = (to - from).max(0);
    let elapsed_hours = hours_per_level * f64::from(levels);
    let amount = elapsed_hours * rate.as_i64() as f64;
    let rounded = round_half_up(amount)?;
    let total = i128::from(base.as_i64()) + i128::from(rounded);
    Ok(Cents::from_i128_checked(total, "time-based total")?)
}

fn expression(
    base: Cents,
    text: &str,
    variables: &BTreeMap<String, i64>,
    from: i32,
    to: i32,
) -> Result<Cents, EngineError> {
    let parsed = expr::parse(text).map_err(FormulaError::from)?;

    // Implicit names win over caller-supplied variables of the same name.
    let mut scope = variables.clone();
    scope.insert("base_price".to_string(), base.as_i64());
    scope.insert("from_level".to_string(), i64::from(from));
    scope.insert("to_level".to_string(), i64::from(to));
    scope.insert(
        "level_difference".to_string(),
        i64::from((to - from).max(0)),
    );

    let value = parsed.eval(&scope)?;
    Ok(Cents(value))
}
