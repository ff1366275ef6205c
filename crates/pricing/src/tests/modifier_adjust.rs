use crate::{
    CalculationContext, Cents, GameId, ModifierKind, ModifierScope, PriceModifier,
};

fn modifier(kind: ModifierKind, value: i64) -> PriceModifier {
    PriceModifier {
        code: "TEST".to_string(),
        kind,
        value,
        active: true,
        sort_order: 0,
        scope: ModifierScope {
            game: GameId(1),
            service_type: None,
        },
    }
}

fn ctx(base: i64, from: i32, to: i32) -> CalculationContext {
    CalculationContext::new(Cents(base), from, to)
}

#[test]
fn percentage_uses_basis_points() {
    let adj = modifier(ModifierKind::Percentage, 1_550)
        .adjustment(&ctx(10_000, 1, 2))
        .unwrap();
    assert_eq!(adj, Cents(1_550));
}

#[test]
fn percentage_truncates_toward_zero() {
    // 101 * 333 / 10000 = 3.3633
    let adj = modifier(ModifierKind::Percentage, 333)
        .adjustment(&ctx(101, 1, 2))
        .unwrap();
    assert_eq!(adj, Cents(3));
}

#[test]
fn discount_is_negative_basis_points() {
    let adj = modifier(ModifierKind::Discount, 500)
        .adjustment(&ctx(20_000, 1, 2))
        .unwrap();
    assert_eq!(adj, Cents(-1_000));
}

#[test]
fn fixed_scales_with_level_difference() {
    let adj = modifier(ModifierKind::Fixed, 250)
        .adjustment(&ctx(0, 1, 5))
        .unwrap();
    assert_eq!(adj, Cents(1_000));
}

#[test]
fn fixed_applies_once_on_downgrades() {
    let adj = modifier(ModifierKind::Fixed, 250)
        .adjustment(&ctx(0, 5, 1))
        .unwrap();
    assert_eq!(adj, Cents(250));
}

#[test]
fn formula_based_matches_fixed_for_now() {
    let fixed = modifier(ModifierKind::Fixed, 250)
        .adjustment(&ctx(0, 1, 5))
        .unwrap();
    let formula = modifier(ModifierKind::FormulaBased, 250)
        .adjustment(&ctx(0, 1, 5))
        .unwrap();
    assert_eq!(fixed, formula);
}

#[test]
fn multiplier_at_or_below_neutral_contributes_nothing() {
    for value in [100, 40, 0, -50] {
        let adj = modifier(ModifierKind::Multiplier, value)
            .adjustment(&ctx(10_000, 1, 2))
            .unwrap();
        assert_eq!(adj, Cents(0), "value {value}");
    }
}

#[test]
fn multiplier_adds_the_excess_over_one() {
    let adj = modifier(ModifierKind::Multiplier, 150)
        .adjustment(&ctx(10_000, 1, 2))
        .unwrap();
    assert_eq!(adj, Cents(5_000));
}

#[test]
fn huge_multiplier_overflows_cleanly() {
    let err = modifier(ModifierKind::Multiplier, i64::MAX / 2)
        .adjustment(&ctx(i64::MAX / 2, 1, 2))
        .unwrap_err();
    assert_eq!(err.to_string(), "arithmetic overflow in modifier adjustment");
}
