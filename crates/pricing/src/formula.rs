use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::FormulaError;
use crate::expr;
use crate::money::Cents;

/// Variables every expression formula can read without declaring them.
pub const IMPLICIT_VARIABLES: [&str; 4] =
    ["base_price", "from_level", "to_level", "level_difference"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriceRange {
    pub from_level: i32,
    pub to_level: i32,
    pub price_per_level: Cents,
}

/// Closed set of pricing formulas. Exactly one variant per value; every
/// calculator and validator dispatches exhaustively over this enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalculationFormula {
    Linear {
        price_per_level: Cents,
    },
    Range {
        segments: Vec<PriceRange>,
    },
    TimeBased {
        hours_per_level: f64,
        rate_per_hour: Cents,
    },
    Expression {
        formula_text: String,
        variables: BTreeMap<String, i64>,
    },
}

impl CalculationFormula {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Linear { .. } => "linear",
            Self::Range { .. } => "range",
            Self::TimeBased { .. } => "time_based",
            Self::Expression { .. } => "expression",
        }
    }

    /// Structural checks only; value-dependent failures (coverage,
    /// overflow, division by zero) are reported at calculation time.
    pub fn validate(&self) -> Result<(), FormulaError> {
        match self {
            Self::Linear { .. } => Ok(()),
            Self::Range { segments } => validate_segments(segments),
            Self::TimeBased {
                hours_per_level,
                rate_per_hour,
            } => {
                if !hours_per_level.is_finite() || *hours_per_level <= 0.0 {
                    return Err(FormulaError::NonPositiveHours(*hours_per_level));
                }
                if rate_per_hour.as_i64() < 0 {
                    return Err(FormulaError::NegativeRate(rate_per_hour.as_i64()));
                }
                Ok(())
            }
            Self::Expression {
                formula_text,
                variables,
            } => {
                let parsed = expr::parse(formula_text)?;
                for name in parsed.free_variables() {
                    if !variables.contains_key(&name)
                        && !IMPLICIT_VARIABLES.contains(&name.as_str())
                    {
                        return Err(FormulaError::UnknownVariable(name));
                    }
                }
                Ok(())
            }
        }
    }
}

fn validate_segments(segments: &[PriceRange]) -> Result<(), FormulaError> {
    if segments.is_empty() {
        return Err(FormulaError::EmptySegments);
    }
    for (index, segment) in segments.iter().enumerate() {
        if segment.to_level <= segment.from_level {
            return Err(FormulaError::EmptySegmentSpan {
                index,
                from_level: segment.from_level,
                to_level: segment.to_level,
            });
        }
        if index > 0 {
            // Contiguity also rules out gaps, overlap and disorder.
            let previous_end = segments[index - 1].to_level;
            if segment.from_level != previous_end {
                return Err(FormulaError::NonContiguousSegments {
                    index,
                    previous_end,
                    next_start: segment.from_level,
                });
            }
        }
    }
    Ok(())
}
