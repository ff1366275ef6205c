use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::money::Cents;
use crate::orchestrator::{AppliedModifier, CalculationResult};

/// One of the three terminal response shapes. Pure mapping from the
/// orchestrator outcome; no side effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CalculationResponse {
    #[serde(rename_all = "camelCase")]
    Success {
        base_price: Cents,
        final_price: Cents,
        applied_modifiers_count: usize,
        breakdown: Vec<AppliedModifier>,
        execution_time_ms: u64,
    },
    #[serde(rename_all = "camelCase")]
    ValidationError { message: String },
    #[serde(rename_all = "camelCase")]
    CalculationError { message: String },
}

impl CalculationResponse {
    pub fn from_outcome(outcome: Result<CalculationResult, EngineError>) -> Self {
        match outcome {
            Ok(result) => Self::Success {
                base_price: result.base_price,
                final_price: result.final_price,
                applied_modifiers_count: result.applied_modifiers.len(),
                execution_time_ms: result.execution_time.as_millis() as u64,
                breakdown: result.applied_modifiers,
            },
            Err(EngineError::Validation(err)) => Self::ValidationError {
                message: err.to_string(),
            },
            Err(EngineError::Calculation(err)) => Self::CalculationError {
                message: err.to_string(),
            },
        }
    }
}
