use crate::error::CalculationError;

/// Half-up rounding to the nearest minor unit: ties move toward
/// positive infinity (2.5 -> 3, -2.5 -> -2).
pub fn round_half_up(value: f64) -> Result<i64, CalculationError> {
    if !value.is_finite() {
        return Err(CalculationError::NonRepresentable(value));
    }
    let rounded = (value + 0.5).floor();
    if rounded < i64::MIN as f64 || rounded > i64::MAX as f64 {
        return Err(CalculationError::NonRepresentable(value));
    }
    Ok(rounded as i64)
}
