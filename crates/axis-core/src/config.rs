//! Configuration and settings management
//!
//! Loads settings from config files and environment variables.

use crate::angle::AngleUnit;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default edge length of the rendered diagram in pixels (7in at 150dpi).
pub const DEFAULT_DIAGRAM_SIZE: u32 = 1050;
/// Smallest diagram edge that still leaves room for labels.
pub const MIN_DIAGRAM_SIZE: u32 = 300;
/// Largest diagram edge accepted from configuration.
pub const MAX_DIAGRAM_SIZE: u32 = 4096;
/// Default limit for a single diagram render.
pub const DEFAULT_DIAGRAM_TIMEOUT_SECS: u64 = 15;

/// Font files tried when `DIAGRAM_FONT_PATH` is not set.
pub const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Build the layered configuration shared by every settings struct.
///
/// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
/// `config/local`, `APP__`-prefixed variables, then plain environment
/// variables (empty values ignored).
///
/// # Errors
///
/// Returns a `ConfigError` if a present file cannot be parsed.
pub fn build_config() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Not checked into git
        .add_source(File::with_name("config/local").required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        // UPPER_SNAKE_CASE maps onto snake_case keys
        .add_source(Environment::default().ignore_empty(true))
        .build()
}

/// Core settings for evaluation and rendering.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AxisSettings {
    /// Unit assumed for plain numbers until a user picks one
    #[serde(default)]
    pub default_unit: AngleUnit,
    /// TrueType/OpenType font used for diagram labels
    pub diagram_font_path: Option<String>,
    /// Diagram edge length in pixels
    #[serde(default = "default_diagram_size")]
    pub diagram_size: u32,
    /// Upper bound for a single render, in seconds
    #[serde(default = "default_diagram_timeout_secs")]
    pub diagram_timeout_secs: u64,
}

const fn default_diagram_size() -> u32 {
    DEFAULT_DIAGRAM_SIZE
}

const fn default_diagram_timeout_secs() -> u64 {
    DEFAULT_DIAGRAM_TIMEOUT_SECS
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self {
            default_unit: AngleUnit::Degrees,
            diagram_font_path: None,
            diagram_size: DEFAULT_DIAGRAM_SIZE,
            diagram_timeout_secs: DEFAULT_DIAGRAM_TIMEOUT_SECS,
        }
    }
}

impl AxisSettings {
    /// Load settings from config files and the environment.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use axis_core::config::AxisSettings;
    ///
    /// let settings = AxisSettings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        build_config()?.try_deserialize()
    }

    /// Diagram size clamped to the supported range.
    #[must_use]
    pub fn diagram_size(&self) -> u32 {
        self.diagram_size.clamp(MIN_DIAGRAM_SIZE, MAX_DIAGRAM_SIZE)
    }

    /// Render timeout as a `Duration`, never zero.
    #[must_use]
    pub fn diagram_timeout(&self) -> Duration {
        Duration::from_secs(self.diagram_timeout_secs.max(1))
    }

    /// Font files to try, the configured one first.
    #[must_use]
    pub fn font_candidates(&self) -> Vec<PathBuf> {
        match &self.diagram_font_path {
            Some(path) if !path.trim().is_empty() => vec![PathBuf::from(path.trim())],
            _ => FONT_CANDIDATES.iter().map(PathBuf::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AxisSettings::default();
        assert_eq!(settings.default_unit, AngleUnit::Degrees);
        assert_eq!(settings.diagram_size(), DEFAULT_DIAGRAM_SIZE);
        assert_eq!(settings.diagram_timeout(), Duration::from_secs(15));
        assert_eq!(settings.font_candidates().len(), FONT_CANDIDATES.len());
    }

    #[test]
    fn test_clamping() {
        let settings = AxisSettings {
            diagram_size: 10,
            diagram_timeout_secs: 0,
            ..AxisSettings::default()
        };
        assert_eq!(settings.diagram_size(), MIN_DIAGRAM_SIZE);
        assert_eq!(settings.diagram_timeout(), Duration::from_secs(1));

        let settings = AxisSettings {
            diagram_size: 100_000,
            ..AxisSettings::default()
        };
        assert_eq!(settings.diagram_size(), MAX_DIAGRAM_SIZE);
    }

    #[test]
    fn test_configured_font_wins() {
        let settings = AxisSettings {
            diagram_font_path: Some(" /opt/fonts/Custom.ttf ".to_string()),
            ..AxisSettings::default()
        };
        assert_eq!(
            settings.font_candidates(),
            vec![PathBuf::from("/opt/fonts/Custom.ttf")]
        );
    }

    // Tests run sequentially to avoid environment variable race conditions
    #[test]
    fn test_config_env_loading() -> Result<(), Box<dyn std::error::Error>> {
        std::env::set_var("DIAGRAM_SIZE", "600");
        std::env::set_var("DEFAULT_UNIT", "radians");

        let settings = AxisSettings::new()?;
        assert_eq!(settings.diagram_size, 600);
        assert_eq!(settings.default_unit, AngleUnit::Radians);

        std::env::remove_var("DIAGRAM_SIZE");
        std::env::remove_var("DEFAULT_UNIT");
        Ok(())
    }
}
