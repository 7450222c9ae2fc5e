use crate::bot;
use crate::bot::handlers::{parse_prefixed, Command};
use crate::bot::{BotContext, RenderCooldown};
use crate::config::{BotSettings, CIRCLE_COOLDOWN_MAX_SIZE};
use axis_core::diagram::DiagramService;
use axis_core::preferences::InMemoryPreferences;
use axis_core::service::TrigService;
use axis_core::trig::TrigFunction;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use teloxide::utils::command::BotCommands;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Run the Telegram transport runtime.
///
/// `token` must be a non-empty Bot API token.
pub async fn run_bot(settings: Arc<BotSettings>, token: String) {
    let bot = Bot::new(token);
    let ctx = init_context(settings);
    let shutdown = ctx.shutdown.clone();

    register_commands(&bot).await;
    let handler = setup_handler();

    info!("Bot is running...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .default_handler(|upd| async move {
            debug!("Ignoring update {:?}", upd.id);
        })
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    // stop renders still in flight
    shutdown.cancel();
    info!("Bot stopped.");
}

fn init_context(settings: Arc<BotSettings>) -> Arc<BotContext> {
    let store = Arc::new(InMemoryPreferences::new());
    let service = Arc::new(TrigService::new(store, settings.core.default_unit));
    info!(
        "Trig service initialized (default unit: {}).",
        settings.core.default_unit
    );

    let diagrams = Arc::new(DiagramService::from_settings(&settings.core));

    let cooldown_secs = settings.telegram.circle_cooldown_secs;
    info!(
        "Initializing RenderCooldown (cooldown: {}s, max_size: {})",
        cooldown_secs, CIRCLE_COOLDOWN_MAX_SIZE
    );
    let cooldown = Arc::new(RenderCooldown::new(cooldown_secs, CIRCLE_COOLDOWN_MAX_SIZE));

    Arc::new(BotContext {
        settings,
        service,
        diagrams,
        cooldown,
        shutdown: CancellationToken::new(),
    })
}

async fn register_commands(bot: &Bot) {
    match bot.set_my_commands(Command::bot_commands()).await {
        Ok(_) => info!("Registered {} bot commands.", Command::bot_commands().len()),
        Err(e) => warn!("Failed to register bot commands: {e}"),
    }
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handle_mode_callback))
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_command),
                )
                .branch(
                    dptree::filter_map(|msg: Message, ctx: Arc<BotContext>| {
                        msg.text()
                            .and_then(|text| parse_prefixed(text, ctx.settings.telegram.prefix()))
                    })
                    .endpoint(handle_command),
                ),
        )
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    ctx: Arc<BotContext>,
) -> Result<(), teloxide::RequestError> {
    let res = match cmd {
        Command::Start => bot::handlers::start(bot, msg, ctx).await,
        Command::Help => bot::handlers::help(bot, msg, ctx).await,
        Command::Sin(angle) => {
            bot::handlers::trig(bot, msg, ctx, Some(TrigFunction::Sine), angle).await
        }
        Command::Cos(angle) => {
            bot::handlers::trig(bot, msg, ctx, Some(TrigFunction::Cosine), angle).await
        }
        Command::Tan(angle) => {
            bot::handlers::trig(bot, msg, ctx, Some(TrigFunction::Tangent), angle).await
        }
        Command::Trig(angle) => bot::handlers::trig(bot, msg, ctx, None, angle).await,
        Command::Mode(unit) => bot::handlers::mode(bot, msg, ctx, unit).await,
        Command::Circle(angle) => bot::handlers::circle(bot, msg, ctx, angle).await,
        Command::Healthcheck => bot::handlers::healthcheck(bot, msg).await,
        Command::Stats => bot::handlers::stats(bot, msg, ctx).await,
    };
    if let Err(e) = res {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_mode_callback(
    bot: Bot,
    q: CallbackQuery,
    ctx: Arc<BotContext>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = bot::handlers::mode_callback(bot, q, ctx).await {
        error!("Mode callback handler error: {}", e);
    }
    respond(())
}
