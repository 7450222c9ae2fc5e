//! Angle values, unit tags and unit resolution.
//!
//! The parser only ever tags a value as explicit radians (the input used `pi`/`π`)
//! or as unspecified. Unspecified values are disambiguated with the user's
//! [`AngleUnit`] preference in [`resolve`].

mod expr;
mod parser;

pub use expr::{evaluate_expression, Evaluated, ExprError};
pub use parser::parse_angle;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A user's preferred unit for plain numeric input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    /// Plain numbers are degrees
    #[default]
    Degrees,
    /// Plain numbers are radians
    Radians,
}

impl AngleUnit {
    /// Full lowercase name, as shown to users.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Degrees => "degrees",
            Self::Radians => "radians",
        }
    }
}

impl fmt::Display for AngleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a unit name is neither degrees nor radians.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown angle unit `{0}`")]
pub struct UnknownUnit(pub String);

impl FromStr for AngleUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deg" | "degree" | "degrees" => Ok(Self::Degrees),
            "rad" | "radian" | "radians" => Ok(Self::Radians),
            _ => Err(UnknownUnit(s.trim().to_string())),
        }
    }
}

/// Unit attached to a numeric angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitTag {
    /// Explicit radians
    Radians,
    /// Explicit degrees
    Degrees,
    /// Plain number, unit decided by the caller
    Unspecified,
}

impl From<AngleUnit> for UnitTag {
    fn from(unit: AngleUnit) -> Self {
        match unit {
            AngleUnit::Degrees => Self::Degrees,
            AngleUnit::Radians => Self::Radians,
        }
    }
}

/// A magnitude together with the unit it is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleValue {
    /// Raw magnitude
    pub magnitude: f64,
    /// Unit of `magnitude`
    pub unit: UnitTag,
}

/// Output of [`parse_angle`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAngle {
    /// Parsed magnitude, `None` when no grammar matched or a division by zero occurred
    pub value: Option<f64>,
    /// Either [`UnitTag::Radians`] or [`UnitTag::Unspecified`]
    pub unit: UnitTag,
    /// Cleaned input kept for display and error messages
    pub canonical: String,
}

impl ParsedAngle {
    /// The parsed magnitude with its tag, if parsing succeeded.
    #[must_use]
    pub fn angle_value(&self) -> Option<AngleValue> {
        self.value.map(|magnitude| AngleValue {
            magnitude,
            unit: self.unit,
        })
    }
}

/// An angle ready for evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAngle {
    /// Value in radians
    pub radians: f64,
    /// Unit the angle is displayed in
    pub display_unit: AngleUnit,
    /// Cleaned user input
    pub canonical: String,
}

/// Resolve a parsed angle to radians.
///
/// Explicit radians are used as-is. Unspecified values follow `preference`:
/// degrees are converted with `value × π / 180`, radians pass through.
/// Returns `None` when the parse produced no value.
#[must_use]
pub fn resolve(parsed: &ParsedAngle, preference: AngleUnit) -> Option<ResolvedAngle> {
    let value = parsed.angle_value()?;
    let (radians, display_unit) = match (value.unit, preference) {
        (UnitTag::Radians, _) | (UnitTag::Unspecified, AngleUnit::Radians) => {
            (value.magnitude, AngleUnit::Radians)
        }
        (UnitTag::Degrees, _) | (UnitTag::Unspecified, AngleUnit::Degrees) => {
            (value.magnitude.to_radians(), AngleUnit::Degrees)
        }
    };
    Some(ResolvedAngle {
        radians,
        display_unit,
        canonical: parsed.canonical.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_unit_from_str_accepts_short_and_long_forms() {
        assert_eq!("deg".parse::<AngleUnit>(), Ok(AngleUnit::Degrees));
        assert_eq!("Degrees".parse::<AngleUnit>(), Ok(AngleUnit::Degrees));
        assert_eq!(" RAD ".parse::<AngleUnit>(), Ok(AngleUnit::Radians));
        assert_eq!("radians".parse::<AngleUnit>(), Ok(AngleUnit::Radians));
        assert_eq!(
            "gradians".parse::<AngleUnit>(),
            Err(UnknownUnit("gradians".to_string()))
        );
    }

    #[test]
    fn test_resolve_respects_preference_for_plain_numbers() {
        let parsed = parse_angle("180");

        let as_degrees = resolve(&parsed, AngleUnit::Degrees).expect("resolved");
        assert!((as_degrees.radians - PI).abs() < 1e-12);
        assert_eq!(as_degrees.display_unit, AngleUnit::Degrees);

        let as_radians = resolve(&parsed, AngleUnit::Radians).expect("resolved");
        assert!((as_radians.radians - 180.0).abs() < 1e-12);
        assert_eq!(as_radians.display_unit, AngleUnit::Radians);
    }

    #[test]
    fn test_resolve_keeps_explicit_radians() {
        let parsed = parse_angle("pi/2");
        let resolved = resolve(&parsed, AngleUnit::Degrees).expect("resolved");
        assert!((resolved.radians - PI / 2.0).abs() < 1e-12);
        assert_eq!(resolved.display_unit, AngleUnit::Radians);
        assert_eq!(resolved.canonical, "pi/2");
    }

    #[test]
    fn test_resolve_without_value() {
        assert!(resolve(&parse_angle("abc"), AngleUnit::Degrees).is_none());
    }

    #[test]
    fn test_explicit_degree_tag_converts() {
        let parsed = ParsedAngle {
            value: Some(90.0),
            unit: UnitTag::Degrees,
            canonical: "90".to_string(),
        };
        let resolved = resolve(&parsed, AngleUnit::Radians).expect("resolved");
        assert!((resolved.radians - PI / 2.0).abs() < 1e-12);
        assert_eq!(resolved.display_unit, AngleUnit::Degrees);
    }
}
