use thiserror::Error;

use crate::expr::ExprError;

/// Structural or numeric defects in a formula. Always surfaced to the
/// caller as a [`ValidationError`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    #[error("FormulaIsNull")]
    MissingFormula,
    #[error("range formula requires at least one segment")]
    EmptySegments,
    #[error("segment {index} has an empty span ({from_level}..{to_level})")]
    EmptySegmentSpan {
        index: usize,
        from_level: i32,
        to_level: i32,
    },
    #[error(
        "segments must be sorted and contiguous: segment {index} starts at {next_start} \
         but the previous one ends at {previous_end}"
    )]
    NonContiguousSegments {
        index: usize,
        previous_end: i32,
        next_start: i32,
    },
    #[error("levels {from_level}..{to_level} fall outside segment coverage")]
    LevelOutOfCoverage { from_level: i32, to_level: i32 },
    #[error("hours_per_level must be positive and finite, got {0}")]
    NonPositiveHours(f64),
    #[error("rate_per_hour must be non-negative, got {0}")]
    NegativeRate(i64),
    #[error("expression parse error: {0}")]
    Parse(#[from] ExprError),
    #[error("expression references unknown variable '{0}'")]
    UnknownVariable(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModifierError {
    #[error("ModifierNotFound: {0}")]
    NotFound(String),
    #[error("DuplicateModifier: {0}")]
    Duplicate(String),
}

/// Caller-supplied data violated a documented invariant. Recoverable;
/// the message names the offending field or value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("base_price must be non-negative, got {0}")]
    NegativeBasePrice(i64),
    #[error("from_level must be at least 1, got {0}")]
    FromLevelTooLow(i32),
    #[error("to_level must be at least 1, got {0}")]
    ToLevelTooLow(i32),
    #[error(transparent)]
    Formula(#[from] FormulaError),
    #[error(transparent)]
    Modifier(#[from] ModifierError),
}

/// Internal arithmetic failure. Deterministic, so never worth retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationError {
    #[error("arithmetic overflow in {op}")]
    ArithmeticOverflow { op: &'static str },
    #[error("division by zero in expression")]
    DivisionByZero,
    #[error("expression variable '{0}' missing at evaluation")]
    MissingVariable(String),
    #[error("time-based amount {0} is outside the representable range")]
    NonRepresentable(f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("calculation failed: {0}")]
    Calculation(#[from] CalculationError),
}

impl From<FormulaError> for EngineError {
    fn from(err: FormulaError) -> Self {
        Self::Validation(ValidationError::Formula(err))
    }
}

impl From<ModifierError> for EngineError {
    fn from(err: ModifierError) -> Self {
        Self::Validation(ValidationError::Modifier(err))
    }
}
