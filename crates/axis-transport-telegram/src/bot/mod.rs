/// Shared handler dependencies
pub mod context;
/// Command parsing and handlers
pub mod handlers;
/// Per-user throttling of diagram renders
pub mod render_cooldown;
/// Resilient messaging with automatic retry for Telegram API operations
pub mod resilient;
/// View layer for UI components (keyboards, messages)
pub mod views;

pub use context::BotContext;
pub use render_cooldown::RenderCooldown;
