use axis_core::angle::{evaluate_expression, parse_angle, resolve, AngleUnit, UnitTag};
use axis_core::trig::{evaluate, TrigFunction};
use proptest::prelude::*;

proptest! {
    /// The parser returns a result for any input instead of panicking.
    #[test]
    fn parse_never_panics(s in "\\PC*") {
        let parsed = parse_angle(&s);
        if let Some(value) = parsed.value {
            prop_assert!(value.is_finite());
        }
    }

    /// Whole degrees survive the trip through radians modulo 360.
    #[test]
    fn degree_round_trip(degrees in -1440i32..1440) {
        let parsed = parse_angle(&degrees.to_string());
        prop_assert_eq!(parsed.unit, UnitTag::Unspecified);
        let resolved = resolve(&parsed, AngleUnit::Degrees).expect("plain integers resolve");
        let eval = evaluate(TrigFunction::Sine, resolved.radians);
        prop_assert_eq!(eval.normalized_degrees, f64::from(degrees.rem_euclid(360)));
    }

    /// Letters other than `pi` never reach the arithmetic evaluator.
    #[test]
    fn rejects_disallowed_characters(
        a in 0u32..1000,
        letter in "[a-hj-oq-zA-HJ-OQ-Z_;=]",
        b in 0u32..1000,
    ) {
        let input = format!("{a}*{letter}{b}");
        prop_assert_eq!(parse_angle(&input).value, None);
    }

    /// Nested parentheses of bounded depth evaluate to the inner value.
    #[test]
    fn nested_parentheses(depth in 1usize..30, n in 0u32..10_000) {
        let input = format!("{}{n}{}", "(".repeat(depth), ")".repeat(depth));
        let evaluated = evaluate_expression(&input).expect("balanced expression");
        prop_assert_eq!(evaluated.value, f64::from(n));
        prop_assert!(!evaluated.uses_pi);
    }

    /// `k*pi/d` is tagged as radians and matches the arithmetic value.
    #[test]
    fn pi_multiples_are_radians(k in 1u32..24, d in 1u32..12) {
        let parsed = parse_angle(&format!("{k}pi/{d}"));
        prop_assert_eq!(parsed.unit, UnitTag::Radians);
        let expected = f64::from(k) * std::f64::consts::PI / f64::from(d);
        let value = parsed.value.expect("pi multiple parses");
        prop_assert!((value - expected).abs() < 1e-12);
    }
}
