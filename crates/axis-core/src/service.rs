//! Dispatch-facing trig pipeline.
//!
//! [`TrigService`] ties together parsing, unit resolution against the user's
//! stored preference, evaluation and report assembly. Transports only format
//! the [`TrigReport`] it returns.

use crate::angle::{parse_angle, resolve, AngleUnit, ResolvedAngle};
use crate::preferences::PreferenceStore;
use crate::trig::{evaluate, format_trimmed, NumericValue, Quadrant, TrigFunction};
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Decimal places shown for degree values.
const DEGREE_DECIMALS: usize = 6;
/// Decimal places shown for the reference angle.
const REFERENCE_DECIMALS: usize = 4;

/// A trig question from a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrigRequest {
    /// Angle text as typed
    pub raw_angle: String,
    /// Requested function, `None` for all three
    pub function: Option<TrigFunction>,
    /// Platform user id
    pub user_id: i64,
}

/// Where the evaluated angle sits on the unit circle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AngleSummary {
    /// Cleaned user input
    pub input: String,
    /// Unit the angle is displayed in
    pub display_unit: AngleUnit,
    /// Angle in radians
    pub radians: f64,
    /// Angle in degrees
    pub degrees: f64,
    /// Angle in degrees, normalized into `[0, 360)`
    pub normalized_degrees: f64,
    /// Quadrant of the normalized angle
    pub quadrant: Quadrant,
    /// Angle to the preceding axis
    pub reference_angle: f64,
}

impl AngleSummary {
    /// Degrees with trailing zeros trimmed, e.g. `30°`.
    #[must_use]
    pub fn degrees_label(&self) -> String {
        format!("{}°", format_trimmed(self.degrees, DEGREE_DECIMALS))
    }

    /// Normalized degrees, e.g. `330°` for `-30°`.
    #[must_use]
    pub fn normalized_label(&self) -> String {
        format!("{}°", format_trimmed(self.normalized_degrees, DEGREE_DECIMALS))
    }

    /// Reference angle, e.g. `30°`.
    #[must_use]
    pub fn reference_label(&self) -> String {
        format!("{}°", format_trimmed(self.reference_angle, REFERENCE_DECIMALS))
    }

    /// The angle as the user should see it in titles.
    #[must_use]
    pub fn display(&self) -> String {
        match self.display_unit {
            AngleUnit::Degrees => self.degrees_label(),
            AngleUnit::Radians => self.input.clone(),
        }
    }
}

/// One evaluated function.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueRow {
    /// Evaluated function
    pub function: TrigFunction,
    /// Exact label for standard angles
    pub exact: Option<&'static str>,
    /// Numeric value
    pub numeric: NumericValue,
}

/// Structured answer to a [`TrigRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrigReport {
    /// `sin(30°)` for one function, `30°` for all three
    pub title: String,
    /// Position on the unit circle
    pub angle: AngleSummary,
    /// One row per evaluated function
    pub rows: Vec<ValueRow>,
}

impl TrigReport {
    /// Plain-text rendering, one line per fact.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        for row in &self.rows {
            let _ = match (row.exact, row.numeric) {
                (_, NumericValue::Undefined) => writeln!(out, "{} = undefined", row.function),
                (Some(exact), numeric) => writeln!(out, "{} = {exact} ≈ {numeric}", row.function),
                (None, numeric) => writeln!(out, "{} ≈ {numeric}", row.function),
            };
        }
        let _ = write!(
            out,
            "angle {} in {}, reference {}, shown in {}",
            self.angle.normalized_label(),
            self.angle.quadrant,
            self.angle.reference_label(),
            self.angle.display_unit
        );
        out
    }
}

/// Failure to answer a trig request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrigError {
    /// The angle text matched no accepted form
    #[error("could not parse angle `{input}`")]
    Parse {
        /// The offending text
        input: String,
    },
}

impl TrigError {
    /// Reply text for chat users.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Parse { input } if input.trim().is_empty() => {
                "Please give an angle, e.g. `30`, `π/6` or `pi/4`.".to_string()
            }
            Self::Parse { input } => format!(
                "I couldn't understand the angle `{input}`. Try something like `30`, `π/6` or `pi/4`."
            ),
        }
    }
}

/// Failure to change a unit preference
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreferenceError {
    /// Neither degrees nor radians
    #[error("invalid unit `{0}`")]
    InvalidUnit(String),
}

impl PreferenceError {
    /// Reply text for chat users.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidUnit(unit) => format!(
                "Unknown unit `{unit}`. Use `/mode degrees` or `/mode radians`."
            ),
        }
    }
}

/// Trig pipeline shared by every handler.
#[derive(Clone)]
pub struct TrigService {
    store: Arc<dyn PreferenceStore>,
    default_unit: AngleUnit,
}

impl std::fmt::Debug for TrigService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrigService")
            .field("default_unit", &self.default_unit)
            .finish_non_exhaustive()
    }
}

impl TrigService {
    /// Create a service over `store`, falling back to `default_unit` for users
    /// without a stored preference.
    #[must_use]
    pub fn new(store: Arc<dyn PreferenceStore>, default_unit: AngleUnit) -> Self {
        Self {
            store,
            default_unit,
        }
    }

    /// Unit used for a user's plain numbers.
    pub async fn preference(&self, user_id: i64) -> AngleUnit {
        self.store
            .get_unit(user_id)
            .await
            .unwrap_or(self.default_unit)
    }

    /// Store a user's unit from free text (`degrees`, `rad`, ...).
    ///
    /// # Errors
    ///
    /// Returns [`PreferenceError::InvalidUnit`] without touching the store when
    /// the text names no known unit.
    pub async fn set_preference(
        &self,
        user_id: i64,
        unit: &str,
    ) -> Result<AngleUnit, PreferenceError> {
        let unit: AngleUnit = unit
            .parse()
            .map_err(|_| PreferenceError::InvalidUnit(unit.trim().to_string()))?;
        self.store.set_unit(user_id, unit).await;
        info!(user_id, %unit, "Angle unit preference updated");
        Ok(unit)
    }

    /// Number of users with a stored preference.
    pub async fn user_count(&self) -> usize {
        self.store.user_count().await
    }

    /// Evaluate a request.
    ///
    /// # Errors
    ///
    /// Returns [`TrigError::Parse`] when the angle cannot be parsed.
    pub async fn answer(&self, request: TrigRequest) -> Result<TrigReport, TrigError> {
        let resolved = self.resolve(request.user_id, &request.raw_angle).await?;

        let functions: Vec<TrigFunction> = match request.function {
            Some(function) => vec![function],
            None => TrigFunction::ALL.to_vec(),
        };
        let evaluations: Vec<_> = functions
            .into_iter()
            .map(|function| evaluate(function, resolved.radians))
            .collect();

        // every evaluation shares the same angle, so the first describes it
        let Some(first) = evaluations.first() else {
            return Err(TrigError::Parse {
                input: resolved.canonical,
            });
        };
        let angle = AngleSummary {
            input: resolved.canonical.clone(),
            display_unit: resolved.display_unit,
            radians: resolved.radians,
            degrees: first.degrees,
            normalized_degrees: first.normalized_degrees,
            quadrant: first.quadrant,
            reference_angle: first.reference_angle,
        };
        let title = match request.function {
            Some(function) => format!("{function}({})", angle.display()),
            None => angle.display(),
        };
        let rows = evaluations
            .iter()
            .map(|eval| ValueRow {
                function: eval.function,
                exact: eval.exact,
                numeric: eval.numeric,
            })
            .collect();

        debug!(user_id = request.user_id, %title, "Answered trig request");
        Ok(TrigReport { title, angle, rows })
    }

    /// Radians to highlight on the unit circle, `None` for a blank argument.
    ///
    /// # Errors
    ///
    /// Returns [`TrigError::Parse`] when a non-blank angle cannot be parsed.
    pub async fn highlight_radians(
        &self,
        user_id: i64,
        raw: &str,
    ) -> Result<Option<f64>, TrigError> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(self.resolve(user_id, raw).await?.radians))
    }

    async fn resolve(&self, user_id: i64, raw: &str) -> Result<ResolvedAngle, TrigError> {
        let parsed = parse_angle(raw);
        if parsed.value.is_none() {
            return Err(TrigError::Parse {
                input: parsed.canonical,
            });
        }
        let preference = self.preference(user_id).await;
        resolve(&parsed, preference)
            // angles past f64 range in degrees have no quadrant
            .filter(|resolved| resolved.radians.to_degrees().is_finite())
            .ok_or(TrigError::Parse {
                input: parsed.canonical,
            })
    }
}
