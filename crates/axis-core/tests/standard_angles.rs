use axis_core::trig::{evaluate, NumericValue, TrigFunction, STANDARD_ANGLES};

/// Numeric value of an exact label such as `-√3/2` or `1/√3`.
fn label_value(label: &str) -> Option<f64> {
    if label == "undefined" {
        return None;
    }
    let (sign, body) = match label.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, label),
    };
    let term = |part: &str| -> f64 {
        match part.strip_prefix('√') {
            Some(radicand) => radicand.parse::<f64>().expect("radicand").sqrt(),
            None => part.parse::<f64>().expect("number"),
        }
    };
    let value = match body.split_once('/') {
        Some((num, den)) => term(num) / term(den),
        None => term(body),
    };
    Some(sign * value)
}

#[test]
fn table_covers_sixteen_angles() {
    let degrees: Vec<u16> = STANDARD_ANGLES.iter().map(|e| e.degrees).collect();
    assert_eq!(
        degrees,
        [0, 30, 45, 60, 90, 120, 135, 150, 180, 210, 225, 240, 270, 300, 315, 330]
    );
}

#[test]
fn exact_labels_match_numeric_values() {
    for entry in &STANDARD_ANGLES {
        let radians = f64::from(entry.degrees).to_radians();
        for function in TrigFunction::ALL {
            let eval = evaluate(function, radians);
            let label = eval.exact.expect("standard angle has an exact label");
            assert_eq!(label, function.exact_label(entry));

            match (label_value(label), eval.numeric) {
                (None, NumericValue::Undefined) => {}
                (Some(expected), NumericValue::Value(actual)) => assert!(
                    (expected - actual).abs() < 1e-6,
                    "{function}({}°): {label} vs {actual}",
                    entry.degrees
                ),
                (expected, actual) => panic!(
                    "{function}({}°): label {label} ({expected:?}) vs {actual:?}",
                    entry.degrees
                ),
            }
        }
    }
}

#[test]
fn tangent_undefined_only_on_vertical_axis() {
    for entry in &STANDARD_ANGLES {
        let eval = evaluate(TrigFunction::Tangent, f64::from(entry.degrees).to_radians());
        let vertical = entry.degrees == 90 || entry.degrees == 270;
        assert_eq!(eval.numeric == NumericValue::Undefined, vertical, "{}°", entry.degrees);
    }
}
