//! Trigonometric evaluation.
//!
//! [`evaluate`] takes radians and produces a numeric value, the exact label for
//! standard angles, and where the angle sits on the unit circle.

mod format;
mod table;

pub use format::{clean_zero, format_numeric, format_trimmed, NUMERIC_PRECISION, ZERO_EPSILON};
pub use table::{lookup, StandardAngle, STANDARD_ANGLES};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Degrees within this distance of an integer are snapped to it.
const DEGREE_SNAP_EPSILON: f64 = 1e-9;

/// Supported trigonometric functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrigFunction {
    /// sin
    Sine,
    /// cos
    Cosine,
    /// tan
    Tangent,
}

impl TrigFunction {
    /// All functions in display order.
    pub const ALL: [Self; 3] = [Self::Sine, Self::Cosine, Self::Tangent];

    /// Short name (`sin`, `cos`, `tan`).
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Sine => "sin",
            Self::Cosine => "cos",
            Self::Tangent => "tan",
        }
    }

    /// Exact label from a standard-angle entry.
    #[must_use]
    pub const fn exact_label(self, entry: &StandardAngle) -> &'static str {
        match self {
            Self::Sine => entry.sin,
            Self::Cosine => entry.cos,
            Self::Tangent => entry.tan,
        }
    }
}

impl fmt::Display for TrigFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Returned when a function name is not sin, cos or tan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown trigonometric function `{0}`")]
pub struct UnknownFunction(pub String);

impl FromStr for TrigFunction {
    type Err = UnknownFunction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sin" | "sine" => Ok(Self::Sine),
            "cos" | "cosine" => Ok(Self::Cosine),
            "tan" | "tangent" => Ok(Self::Tangent),
            _ => Err(UnknownFunction(s.trim().to_string())),
        }
    }
}

/// Numeric outcome of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum NumericValue {
    /// A finite value
    Value(f64),
    /// Tangent where cosine vanishes
    Undefined,
    /// The computation produced no finite value
    Error,
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.write_str(&format_numeric(*v)),
            Self::Undefined => f.write_str("undefined"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// One of the four 90° sectors, counted counter-clockwise from +x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quadrant(u8);

impl Quadrant {
    /// Classify an angle in degrees. Any real value is accepted; it is
    /// normalized into `[0, 360)` first, so 360° lands in quadrant 1.
    ///
    /// ```
    /// use axis_core::trig::Quadrant;
    ///
    /// assert_eq!(Quadrant::from_degrees(90.0).number(), 2);
    /// assert_eq!(Quadrant::from_degrees(360.0).number(), 1);
    /// ```
    #[must_use]
    pub fn from_degrees(degrees: f64) -> Self {
        let normalized = normalize_degrees(degrees);
        // normalized < 360, so the sector index is 0..=3
        let sector = (normalized / 90.0).floor();
        let number = if sector >= 3.0 {
            4
        } else if sector >= 2.0 {
            3
        } else if sector >= 1.0 {
            2
        } else {
            1
        };
        Self(number)
    }

    /// Quadrant number, 1 to 4.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

/// Normalize degrees into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Convert radians to degrees, snapping conversion noise onto whole degrees.
#[must_use]
pub fn radians_to_degrees(radians: f64) -> f64 {
    let degrees = radians.to_degrees();
    let nearest = degrees.round();
    if (degrees - nearest).abs() < DEGREE_SNAP_EPSILON {
        nearest
    } else {
        degrees
    }
}

/// Full result of [`evaluate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Function that was evaluated
    pub function: TrigFunction,
    /// Numeric value, `undefined`, or error
    pub numeric: NumericValue,
    /// Exact label when the angle rounds to a standard angle
    pub exact: Option<&'static str>,
    /// Angle in degrees, original sign and magnitude
    pub degrees: f64,
    /// Angle in degrees normalized into `[0, 360)`
    pub normalized_degrees: f64,
    /// Unit-circle quadrant of the normalized angle
    pub quadrant: Quadrant,
    /// Angle to the preceding axis, in `[0, 90)`
    pub reference_angle: f64,
}

/// Evaluate `function` at `radians`.
///
/// Tangent reports [`NumericValue::Undefined`] when `|cos| < 1e-12` rather than
/// dividing. Input that is non-finite, or too large to express in degrees,
/// yields [`NumericValue::Error`].
///
/// # Examples
///
/// ```
/// use axis_core::trig::{evaluate, NumericValue, TrigFunction};
///
/// let eval = evaluate(TrigFunction::Tangent, std::f64::consts::FRAC_PI_2);
/// assert_eq!(eval.numeric, NumericValue::Undefined);
/// assert_eq!(eval.exact, Some("undefined"));
/// assert_eq!(eval.quadrant.number(), 2);
/// ```
#[must_use]
pub fn evaluate(function: TrigFunction, radians: f64) -> Evaluation {
    let degrees = radians_to_degrees(radians);
    let normalized_degrees = normalize_degrees(degrees);

    let exact = if normalized_degrees.is_finite() {
        // normalized is within [0, 360), so the cast cannot truncate
        #[allow(clippy::cast_possible_truncation)]
        let key = normalized_degrees.round() as i64;
        lookup(key).map(|entry| function.exact_label(entry))
    } else {
        None
    };

    let numeric = if degrees.is_finite() {
        numeric_value(function, radians)
    } else {
        NumericValue::Error
    };

    Evaluation {
        function,
        numeric,
        exact,
        degrees,
        normalized_degrees,
        quadrant: Quadrant::from_degrees(normalized_degrees),
        reference_angle: normalized_degrees % 90.0,
    }
}

fn numeric_value(function: TrigFunction, radians: f64) -> NumericValue {
    let value = match function {
        TrigFunction::Sine => radians.sin(),
        TrigFunction::Cosine => radians.cos(),
        TrigFunction::Tangent => {
            let cos = radians.cos();
            if cos.abs() < ZERO_EPSILON {
                return NumericValue::Undefined;
            }
            radians.sin() / cos
        }
    };

    if value.is_finite() {
        NumericValue::Value(clean_zero(value))
    } else {
        NumericValue::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_quadrant_boundaries() {
        let cases = [
            (0.0, 1),
            (89.999, 1),
            (90.0, 2),
            (179.999, 2),
            (180.0, 3),
            (269.999, 3),
            (270.0, 4),
            (359.999, 4),
            (360.0, 1),
            (-90.0, 4),
            (720.0 + 45.0, 1),
        ];
        for (degrees, expected) in cases {
            assert_eq!(
                Quadrant::from_degrees(degrees).number(),
                expected,
                "quadrant of {degrees}°"
            );
        }
    }

    #[test]
    fn test_quadrant_after_degree_round_trip() {
        for (degrees, expected) in [(90.0_f64, 2), (180.0, 3), (270.0, 4), (360.0, 1)] {
            let eval = evaluate(TrigFunction::Sine, degrees.to_radians());
            assert_eq!(eval.quadrant.number(), expected, "quadrant of {degrees}°");
        }
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-30.0), 330.0);
        assert_eq!(normalize_degrees(-1e-15), 0.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
    }

    #[test]
    fn test_tangent_undefined_at_vertical_angles() {
        for radians in [PI / 2.0, 3.0 * PI / 2.0, -PI / 2.0, 90.0_f64.to_radians(), 270.0_f64.to_radians()] {
            let eval = evaluate(TrigFunction::Tangent, radians);
            assert_eq!(eval.numeric, NumericValue::Undefined, "tan({radians})");
        }
    }

    #[test]
    fn test_exact_label_uses_rounded_normalized_degrees() {
        let eval = evaluate(TrigFunction::Sine, (-330.0_f64).to_radians());
        assert_eq!(eval.exact, Some("1/2"));
        assert_eq!(eval.degrees, -330.0);
        assert_eq!(eval.normalized_degrees, 30.0);

        let eval = evaluate(TrigFunction::Cosine, 10.0_f64.to_radians());
        assert_eq!(eval.exact, None);
    }

    #[test]
    fn test_cos_half_pi_is_clean_zero() {
        let eval = evaluate(TrigFunction::Cosine, PI / 2.0);
        assert_eq!(eval.numeric, NumericValue::Value(0.0));
        assert_eq!(eval.numeric.to_string(), "0.000000");
    }

    #[test]
    fn test_non_finite_input_is_error() {
        let eval = evaluate(TrigFunction::Sine, f64::INFINITY);
        assert_eq!(eval.numeric, NumericValue::Error);
        assert_eq!(eval.exact, None);
    }

    #[test]
    fn test_radians_beyond_degree_range_are_error() {
        let eval = evaluate(TrigFunction::Sine, 1e307);
        assert!(eval.degrees.is_infinite());
        assert_eq!(eval.numeric, NumericValue::Error);
        assert_eq!(eval.exact, None);
    }

    #[test]
    fn test_reference_angle() {
        let eval = evaluate(TrigFunction::Sine, 150.0_f64.to_radians());
        assert_eq!(eval.reference_angle, 60.0);
        let eval = evaluate(TrigFunction::Sine, 225.0_f64.to_radians());
        assert_eq!(eval.reference_angle, 45.0);
    }

    #[test]
    fn test_function_from_str() {
        assert_eq!("SIN".parse::<TrigFunction>(), Ok(TrigFunction::Sine));
        assert_eq!("cosine".parse::<TrigFunction>(), Ok(TrigFunction::Cosine));
        assert!("sec".parse::<TrigFunction>().is_err());
    }
}
