use crate::bot::resilient::{send_html_resilient, send_photo_resilient};
use crate::bot::views;
use crate::bot::BotContext;
use anyhow::{anyhow, Result};
use axis_core::service::TrigRequest;
use axis_core::trig::TrigFunction;
use std::sync::Arc;
use teloxide::{
    prelude::*,
    types::{ChatAction, ParseMode},
    utils::command::BotCommands,
};
use tracing::{debug, info, warn};

// Helper function to get user name from Message
fn get_user_name(msg: &Message) -> String {
    if let Some(ref user) = msg.from {
        if let Some(ref username) = user.username {
            return username.clone();
        }
        if !user.first_name.is_empty() {
            return user.first_name.clone();
        }
    }
    "Unknown".to_string()
}

/// Safe extraction of user ID from a message.
/// Returns 0 if the user information is missing.
pub fn get_user_id_safe(msg: &Message) -> i64 {
    msg.from.as_ref().map_or(0, |u| u.id.0.cast_signed())
}

/// Supported commands for the bot
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Show the welcome message
    #[command(description = "Start the bot.")]
    Start,
    /// Show usage help
    #[command(description = "Show usage help.")]
    Help,
    /// Sine of an angle
    #[command(description = "Sine of an angle, e.g. /sin 30.")]
    Sin(String),
    /// Cosine of an angle
    #[command(description = "Cosine of an angle, e.g. /cos pi/3.")]
    Cos(String),
    /// Tangent of an angle
    #[command(description = "Tangent of an angle, e.g. /tan 45.")]
    Tan(String),
    /// All three functions
    #[command(description = "Sine, cosine and tangent at once.")]
    Trig(String),
    /// Show or change the unit for plain numbers
    #[command(description = "Set how plain numbers are read: degrees or radians.")]
    Mode(String),
    /// Render the unit circle
    #[command(description = "Unit circle diagram, optionally highlighting an angle.")]
    Circle(String),
    /// Check bot health
    #[command(description = "Check bot health.")]
    Healthcheck,
    /// Show bot statistics
    #[command(description = "Show bot statistics.")]
    Stats,
}

/// Parse a plain-text command such as `?sin 30`.
///
/// The command word is matched case-insensitively; the prefix must be followed
/// directly by the command name.
///
/// # Examples
///
/// ```
/// use axis_transport_telegram::bot::handlers::{parse_prefixed, Command};
///
/// assert_eq!(parse_prefixed("?sin 30", "?"), Some(Command::Sin("30".to_string())));
/// assert_eq!(parse_prefixed("sin 30", "?"), None);
/// ```
#[must_use]
pub fn parse_prefixed(text: &str, prefix: &str) -> Option<Command> {
    let rest = text.trim().strip_prefix(prefix)?;
    let (name, args) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(name, args)| (name, args.trim()));
    if name.is_empty() {
        return None;
    }
    let line = if args.is_empty() {
        format!("/{}", name.to_lowercase())
    } else {
        format!("/{} {args}", name.to_lowercase())
    };
    Command::parse(&line, "").ok()
}

/// Start handler
///
/// # Errors
///
/// Returns an error if the welcome message cannot be sent.
pub async fn start(bot: Bot, msg: Message, ctx: Arc<BotContext>) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    let user_name = get_user_name(&msg);
    info!("User {user_id} ({user_name}) initiated /start command.");

    let text = views::welcome_message(ctx.settings.telegram.prefix());
    send_html_resilient(&bot, msg.chat.id, text, None).await?;
    Ok(())
}

/// Help handler
///
/// # Errors
///
/// Returns an error if the help message cannot be sent.
pub async fn help(bot: Bot, msg: Message, ctx: Arc<BotContext>) -> Result<()> {
    info!("Help requested by user {}.", get_user_id_safe(&msg));
    let text = views::help_message(ctx.settings.telegram.prefix());
    send_html_resilient(&bot, msg.chat.id, text, None).await?;
    Ok(())
}

/// Evaluate one function, or all three when `function` is `None`.
///
/// Unparseable angles get a hint instead of an error.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn trig(
    bot: Bot,
    msg: Message,
    ctx: Arc<BotContext>,
    function: Option<TrigFunction>,
    raw_angle: String,
) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    info!(
        "Trig request from user {user_id}: {} {raw_angle:?}",
        function.map_or("trig", TrigFunction::short_name)
    );

    let request = TrigRequest {
        raw_angle,
        function,
        user_id,
    };
    let text = match ctx.service.answer(request).await {
        Ok(report) => views::render_report(&report),
        Err(e) => {
            debug!("Rejected angle from user {user_id}: {e}");
            views::plain_to_html(&e.user_message())
        }
    };
    send_html_resilient(&bot, msg.chat.id, text, None).await?;
    Ok(())
}

/// `/mode` handler: show the keyboard without an argument, otherwise set the unit.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn mode(bot: Bot, msg: Message, ctx: Arc<BotContext>, unit: String) -> Result<()> {
    let user_id = get_user_id_safe(&msg);

    if unit.trim().is_empty() {
        let current = ctx.service.preference(user_id).await;
        send_html_resilient(
            &bot,
            msg.chat.id,
            views::mode_prompt(current),
            Some(views::mode_keyboard(current)),
        )
        .await?;
        return Ok(());
    }

    let text = match ctx.service.set_preference(user_id, &unit).await {
        Ok(unit) => views::mode_changed(unit),
        Err(e) => {
            info!("User {user_id} sent an invalid unit: {e}");
            views::plain_to_html(&e.user_message())
        }
    };
    send_html_resilient(&bot, msg.chat.id, text, None).await?;
    Ok(())
}

/// Mode keyboard callback handler
///
/// # Errors
///
/// Returns an error if the callback carries no message or the edit fails.
pub async fn mode_callback(bot: Bot, q: CallbackQuery, ctx: Arc<BotContext>) -> Result<()> {
    let Some(unit) = q.data.as_deref().and_then(views::mode_from_callback) else {
        return Ok(());
    };

    let _ = bot.answer_callback_query(q.id.clone()).await;

    let user_id = q.from.id.0.cast_signed();
    let (chat_id, message_id) = q
        .message
        .as_ref()
        .map(|msg| (msg.chat().id, msg.id()))
        .ok_or_else(|| anyhow!("Callback message missing chat id"))?;

    ctx.service.set_preference(user_id, unit.name()).await?;

    bot.edit_message_text(chat_id, message_id, views::mode_changed(unit))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// `/circle` handler: render the unit circle, optionally highlighting an angle.
///
/// # Errors
///
/// Returns an error if a reply cannot be sent.
pub async fn circle(bot: Bot, msg: Message, ctx: Arc<BotContext>, raw_angle: String) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    let chat_id = msg.chat.id;
    info!("Circle request from user {user_id}: {raw_angle:?}");

    let highlight = match ctx.service.highlight_radians(user_id, &raw_angle).await {
        Ok(highlight) => highlight,
        Err(e) => {
            send_html_resilient(&bot, chat_id, views::plain_to_html(&e.user_message()), None)
                .await?;
            return Ok(());
        }
    };

    if !ctx.diagrams.is_available() {
        send_html_resilient(&bot, chat_id, views::renderer_unavailable(), None).await?;
        return Ok(());
    }

    if let Err(remaining) = ctx.cooldown.try_acquire(user_id).await {
        send_html_resilient(&bot, chat_id, views::circle_cooldown(remaining), None).await?;
        return Ok(());
    }

    if let Err(e) = bot.send_chat_action(chat_id, ChatAction::UploadPhoto).await {
        debug!("Failed to send chat action: {e}");
    }

    match ctx.diagrams.render(highlight, &ctx.shutdown.child_token()).await {
        Ok(png) => {
            let caption = views::circle_caption(highlight.map(|_| raw_angle.as_str()));
            send_photo_resilient(&bot, chat_id, png, caption).await?;
            info!("Sent unit circle to user {user_id}.");
        }
        Err(e) => {
            warn!("Unit circle render failed for user {user_id}: {e}");
            ctx.cooldown.release(user_id).await;
            send_html_resilient(&bot, chat_id, views::plain_to_html(e.user_message()), None)
                .await?;
        }
    }
    Ok(())
}

/// Healthcheck handler
///
/// # Errors
///
/// Returns an error if the healthcheck response cannot be sent.
pub async fn healthcheck(bot: Bot, msg: Message) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    info!("Healthcheck command received from user {user_id}.");
    bot.send_message(msg.chat.id, "OK").await?;
    info!("Responded 'OK' to healthcheck from user {user_id}.");
    Ok(())
}

/// Stats handler - preference and diagram throttling counters
///
/// # Errors
///
/// Returns an error if the stats response cannot be sent.
pub async fn stats(bot: Bot, msg: Message, ctx: Arc<BotContext>) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    info!("Stats command received from user {user_id}.");

    let text = views::stats_message(
        ctx.service.user_count().await,
        ctx.diagrams.is_available(),
        ctx.cooldown.cooldown(),
        ctx.cooldown.entry_count(),
        ctx.cooldown.throttled_count(),
    );
    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .await?;

    info!("Responded to stats from user {user_id}.");
    Ok(())
}
