//! Dependencies shared by every handler, injected through the dispatcher.

use crate::bot::RenderCooldown;
use crate::config::BotSettings;
use axis_core::diagram::DiagramService;
use axis_core::service::TrigService;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Everything a handler needs besides the bot and the update.
#[derive(Clone, Debug)]
pub struct BotContext {
    /// Loaded settings
    pub settings: Arc<BotSettings>,
    /// Trig pipeline with the preference store
    pub service: Arc<TrigService>,
    /// Unit-circle renderer
    pub diagrams: Arc<DiagramService>,
    /// `/circle` throttling
    pub cooldown: Arc<RenderCooldown>,
    /// Cancelled when the dispatcher stops
    pub shutdown: CancellationToken,
}
