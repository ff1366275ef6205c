use crate::{calculate_price, round_half_up, CalculationFormula, Cents, FormulaError};

fn time_based(hours_per_level: f64, rate_per_hour: i64) -> CalculationFormula {
    CalculationFormula::TimeBased {
        hours_per_level,
        rate_per_hour: Cents(rate_per_hour),
    }
}

#[test]
fn half_up_rounds_ties_upward() {
    assert_eq!(round_half_up(2.5).unwrap(), 3);
    assert_eq!(round_half_up(2.4).unwrap(), 2);
    assert_eq!(round_half_up(-2.5).unwrap(), -2);
    assert_eq!(round_half_up(-2.6).unwrap(), -3);
}

#[test]
fn non_finite_amounts_are_rejected() {
    assert!(round_half_up(f64::NAN).is_err());
    assert!(round_half_up(f64::INFINITY).is_err());
}

#[test]
fn charges_rate_for_estimated_hours() {
    // 4 levels at 1.5h each -> 6 hours at 1000/h
    let price = calculate_price(&time_based(1.5, 1_000), Cents(2_000), 1, 5).expect("price");
    assert_eq!(price, Cents(8_000));
}

#[test]
fn rounds_fractional_amounts_half_up() {
    // 3 levels at 0.25h -> 0.75h * 333 = 249.75 -> 250
    let price = calculate_price(&time_based(0.25, 333), Cents(0), 1, 4).expect("price");
    assert_eq!(price, Cents(250));
}

#[test]
fn downgrade_has_no_time_component() {
    let price = calculate_price(&time_based(2.0, 5_000), Cents(900), 8, 3).expect("price");
    assert_eq!(price, Cents(900));
}

#[test]
fn rejects_non_positive_hours() {
    assert!(matches!(
        time_based(0.0, 100).validate(),
        Err(FormulaError::NonPositiveHours(_))
    ));
    assert!(matches!(
        time_based(f64::NAN, 100).validate(),
        Err(FormulaError::NonPositiveHours(_))
    ));
}

#[test]
fn rejects_negative_rate() {
    assert!(matches!(
        time_based(1.0, -1).validate(),
        Err(FormulaError::NegativeRate(-1))
    ));
}
