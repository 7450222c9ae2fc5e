// lazy_regex! keeps the patterns in once_cell statics
#![allow(clippy::non_std_lazy_statics)]

use super::expr::evaluate_expression;
use super::{ParsedAngle, UnitTag};
use lazy_regex::lazy_regex;
use std::f64::consts::PI;

/// `[sign][coefficient](pi|π)[/denominator]`, matched against space-free input.
static RE_PI_MULTIPLE: lazy_regex::Lazy<regex::Regex> = lazy_regex!(
    r"(?i)^(?P<num>[+-]?(?:\d+\.?\d*|\.\d+)?)(?:pi|π)(?:/(?P<den>\d+(?:\.\d+)?))?$"
);

/// `numerator/denominator` of two decimals.
static RE_FRACTION: lazy_regex::Lazy<regex::Regex> =
    lazy_regex!(r"^(?P<num>[+-]?\d+(?:\.\d+)?)/(?P<den>\d+(?:\.\d+)?)$");

/// Character class accepted by the restricted arithmetic evaluator.
static RE_EXPRESSION_CHARS: lazy_regex::Lazy<regex::Regex> =
    lazy_regex!(r"(?i)^(?:[0-9.+\-*/()\s]|pi|π)+$");

/// Parse a free-form angle string.
///
/// Accepted forms, tried in this order:
/// 1. a plain decimal (`30`, `-45.5`): unit unspecified
/// 2. a multiple of π (`pi`, `-pi/2`, `3π/4`): radians
/// 3. a fraction of decimals (`1/2`): unit unspecified
/// 4. restricted arithmetic over numbers, `+ - * /`, parentheses and π
///    (`(1+2)/3*pi`): radians when π appears, otherwise unspecified
///
/// Anything else, and any division by zero, yields `value: None`.
///
/// # Examples
///
/// ```
/// use axis_core::angle::{parse_angle, UnitTag};
///
/// let parsed = parse_angle("-pi/2");
/// assert_eq!(parsed.unit, UnitTag::Radians);
/// assert!((parsed.value.unwrap_or_default() + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
///
/// assert_eq!(parse_angle("abc").value, None);
/// ```
#[must_use]
pub fn parse_angle(text: &str) -> ParsedAngle {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return failed(text.to_string(), UnitTag::Unspecified);
    }

    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some(value) = parse_decimal(&compact) {
        return parsed(value, UnitTag::Unspecified, compact);
    }

    if let Some(caps) = RE_PI_MULTIPLE.captures(&compact) {
        let coefficient = match caps.name("num").map_or("", |m| m.as_str()) {
            "" | "+" => Some(1.0),
            "-" => Some(-1.0),
            num => parse_decimal(num),
        };
        let denominator = caps.name("den").map_or(Some(1.0), |m| parse_decimal(m.as_str()));
        let value = coefficient
            .zip(denominator)
            .and_then(|(num, den)| checked_div(num * PI, den));
        return with_value(value, UnitTag::Radians, compact);
    }

    if let Some(caps) = RE_FRACTION.captures(&compact) {
        let numerator = caps.name("num").and_then(|m| parse_decimal(m.as_str()));
        let denominator = caps.name("den").and_then(|m| parse_decimal(m.as_str()));
        let value = numerator
            .zip(denominator)
            .and_then(|(num, den)| checked_div(num, den));
        return with_value(value, UnitTag::Unspecified, compact);
    }

    if RE_EXPRESSION_CHARS.is_match(trimmed) {
        if let Ok(evaluated) = evaluate_expression(trimmed) {
            let unit = if evaluated.uses_pi {
                UnitTag::Radians
            } else {
                UnitTag::Unspecified
            };
            return parsed(evaluated.value, unit, compact);
        }
    }

    failed(compact, UnitTag::Unspecified)
}

/// Finite decimals only; `inf` and `NaN` spellings are rejected.
fn parse_decimal(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn checked_div(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator).filter(|v| v.is_finite())
}

fn parsed(value: f64, unit: UnitTag, canonical: String) -> ParsedAngle {
    ParsedAngle {
        value: Some(value),
        unit,
        canonical,
    }
}

fn failed(canonical: String, unit: UnitTag) -> ParsedAngle {
    ParsedAngle {
        value: None,
        unit,
        canonical,
    }
}

fn with_value(value: Option<f64>, unit: UnitTag, canonical: String) -> ParsedAngle {
    ParsedAngle {
        value,
        unit,
        canonical,
    }
}
