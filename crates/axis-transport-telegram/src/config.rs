//! Telegram transport settings.

use axis_core::config::AxisSettings;
use config::ConfigError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Prefix for text commands such as `?sin 30`.
pub const DEFAULT_COMMAND_PREFIX: &str = "?";
/// Seconds a user waits between two diagram renders.
pub const CIRCLE_COOLDOWN_SECS: u64 = 10;
/// Maximum number of users tracked by the render cooldown.
pub const CIRCLE_COOLDOWN_MAX_SIZE: u64 = 10_000;

/// Base for the exponential backoff between Telegram API retries.
pub const TELEGRAM_API_INITIAL_BACKOFF_MS: u64 = 10;
/// Upper bound for a single backoff delay.
pub const TELEGRAM_API_MAX_BACKOFF_MS: u64 = 5_000;
/// Retries after the first failed attempt.
pub const TELEGRAM_API_MAX_RETRIES: usize = 3;

/// Telegram transport settings loaded from environment variables.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TelegramSettings {
    /// Telegram Bot API token.
    #[serde(default)]
    pub telegram_token: String,
    /// Alternative token variable (`TELEGRAM_BOT_TOKEN`).
    #[serde(default)]
    pub telegram_bot_token: Option<String>,
    /// Alternative token variable (`BOT_TOKEN`).
    #[serde(default)]
    pub bot_token: Option<String>,
    /// Prefix for plain-text commands.
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    /// Seconds between two `/circle` renders for the same user, 0 disables.
    #[serde(default = "default_circle_cooldown_secs")]
    pub circle_cooldown_secs: u64,
}

fn default_command_prefix() -> String {
    DEFAULT_COMMAND_PREFIX.to_string()
}

const fn default_circle_cooldown_secs() -> u64 {
    CIRCLE_COOLDOWN_SECS
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            telegram_token: String::new(),
            telegram_bot_token: None,
            bot_token: None,
            command_prefix: default_command_prefix(),
            circle_cooldown_secs: CIRCLE_COOLDOWN_SECS,
        }
    }
}

impl TelegramSettings {
    /// Create new settings by loading from environment and files.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        axis_core::config::build_config()?.try_deserialize()
    }

    /// First non-blank token among `TELEGRAM_TOKEN`, `TELEGRAM_BOT_TOKEN`
    /// and `BOT_TOKEN`.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        std::iter::once(Some(self.telegram_token.as_str()))
            .chain([self.telegram_bot_token.as_deref(), self.bot_token.as_deref()])
            .flatten()
            .map(str::trim)
            .find(|token| !token.is_empty())
    }

    /// Command prefix, falling back to `?` when blank.
    #[must_use]
    pub fn prefix(&self) -> &str {
        match self.command_prefix.trim() {
            "" => DEFAULT_COMMAND_PREFIX,
            prefix => prefix,
        }
    }
}

/// Combined settings used by the Telegram transport layer.
#[derive(Clone, Debug)]
pub struct BotSettings {
    /// Core settings shared across transport handlers.
    pub core: Arc<AxisSettings>,
    /// Telegram-specific settings.
    pub telegram: Arc<TelegramSettings>,
}

impl BotSettings {
    /// Create a new combined settings bundle.
    #[must_use]
    pub fn new(core: AxisSettings, telegram: TelegramSettings) -> Self {
        Self {
            core: Arc::new(core),
            telegram: Arc::new(telegram),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TelegramSettings;

    #[test]
    fn test_token_fallbacks() {
        let mut settings = TelegramSettings::default();
        assert_eq!(settings.token(), None);

        settings.bot_token = Some("from-bot-token".to_string());
        assert_eq!(settings.token(), Some("from-bot-token"));

        settings.telegram_bot_token = Some("  ".to_string());
        assert_eq!(settings.token(), Some("from-bot-token"));

        settings.telegram_bot_token = Some("from-telegram-bot-token".to_string());
        assert_eq!(settings.token(), Some("from-telegram-bot-token"));

        settings.telegram_token = "primary".to_string();
        assert_eq!(settings.token(), Some("primary"));
    }

    #[test]
    fn test_prefix_defaults() {
        let mut settings = TelegramSettings::default();
        assert_eq!(settings.prefix(), "?");

        settings.command_prefix = " ! ".to_string();
        assert_eq!(settings.prefix(), "!");

        settings.command_prefix = String::new();
        assert_eq!(settings.prefix(), "?");
    }
}
