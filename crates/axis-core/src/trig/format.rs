//! Display formatting for numeric results.

/// Magnitudes below this are treated as exact zeros.
pub const ZERO_EPSILON: f64 = 1e-12;

/// Decimal places used for numeric trig values.
pub const NUMERIC_PRECISION: usize = 6;

/// Map floating-point noise around zero (including `-0.0`) to `0.0`.
#[must_use]
pub fn clean_zero(value: f64) -> f64 {
    if value.abs() < ZERO_EPSILON {
        0.0
    } else {
        value
    }
}

/// Format a trig value with fixed precision.
///
/// # Examples
///
/// ```
/// use axis_core::trig::format_numeric;
///
/// assert_eq!(format_numeric(std::f64::consts::FRAC_PI_2.cos()), "0.000000");
/// assert_eq!(format_numeric(0.5), "0.500000");
/// ```
#[must_use]
pub fn format_numeric(value: f64) -> String {
    fixed(clean_zero(value), NUMERIC_PRECISION)
}

/// Format with at most `decimals` places, trailing zeros removed.
///
/// ```
/// use axis_core::trig::format_trimmed;
///
/// assert_eq!(format_trimmed(30.0, 6), "30");
/// assert_eq!(format_trimmed(-45.5, 6), "-45.5");
/// assert_eq!(format_trimmed(57.295_779_513, 4), "57.2958");
/// ```
#[must_use]
pub fn format_trimmed(value: f64, decimals: usize) -> String {
    let formatted = fixed(clean_zero(value), decimals);
    if !formatted.contains('.') {
        return formatted;
    }
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

fn fixed(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    // tiny negatives round to "-0.000…"
    match formatted.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_formats_as_zero() {
        assert_eq!(format_numeric(1e-16), "0.000000");
        assert_eq!(format_numeric(-1e-16), "0.000000");
        assert_eq!(format_numeric(-0.0), "0.000000");
        assert_eq!(format_numeric(-4e-7), "0.000000");
    }

    #[test]
    fn test_fixed_precision() {
        assert_eq!(format_numeric(2.0_f64.sqrt() / 2.0), "0.707107");
        assert_eq!(format_numeric(-1.0), "-1.000000");
        assert_eq!(format_numeric(1.0 / 3.0_f64.sqrt()), "0.577350");
    }

    #[test]
    fn test_trimmed() {
        assert_eq!(format_trimmed(0.0, 6), "0");
        assert_eq!(format_trimmed(-1e-13, 6), "0");
        assert_eq!(format_trimmed(90.0, 6), "90");
        assert_eq!(format_trimmed(89.999, 6), "89.999");
        assert_eq!(format_trimmed(12.5, 4), "12.5");
    }
}
