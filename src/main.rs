use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use inn_bot::application::commands::register_defaults;
use inn_bot::application::errors::BotError;
use inn_bot::application::messaging::{MessageDispatcher, MessageParser};
use inn_bot::application::services::{CommandRouter, LookupService, Outbox};
use inn_bot::domain::traits::Bot;
use inn_bot::infrastructure::adapters::{ConsoleAdapter, TelegramAdapter};
use inn_bot::infrastructure::config::Config;
use inn_bot::infrastructure::registry::DadataClient;
use inn_bot::infrastructure::storage::LastMessageCache;

/// Wait after Telegram reports another poller on the same token
const CONFLICT_BACKOFF: Duration = Duration::from_secs(10);
const ERROR_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "inn-bot")]
#[command(about = "Telegram bot that looks up Russian companies by INN", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Telegram bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_bot(&cli.config, cli.token),
        Commands::Version => {
            println!("inn-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_bot(config_path: &str, token_override: Option<String>) -> Result<(), BotError> {
    let mut config = Config::load_or_default(config_path)?;
    if let Some(token) = token_override {
        config.telegram.token = Some(token);
    }
    config.validate()?;

    tracing::info!("Starting {}", config.bot.name);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;
    rt.block_on(serve(config))
}

async fn serve(config: Config) -> Result<(), BotError> {
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown requested");
                shutdown.cancel();
            }
        });
    }

    let registry = DadataClient::from_config(&config.dadata)?;
    let lookup = LookupService::new(Arc::new(registry));
    let last_messages = Arc::new(LastMessageCache::new());

    match config.telegram.token.clone() {
        Some(token) => {
            let mut bot = TelegramAdapter::new(token).with_api_base(config.telegram.api_base.as_str());
            bot.fetch_bot_info().await?;
            let username = bot.bot_info().username;
            tracing::info!("Bot started: @{}", username);

            let bot = Arc::new(bot);
            let dispatcher = build_dispatcher(
                &config,
                bot.clone(),
                lookup,
                last_messages,
                shutdown.clone(),
                Some(username),
            )?;

            if let Err(e) = bot.register_commands(dispatcher.router().registry()).await {
                tracing::warn!("Failed to register commands: {}", e);
            }

            run_telegram_bot(&bot, &dispatcher, &shutdown, config.telegram.poll_timeout_seconds).await
        }
        None => {
            let bot = Arc::new(ConsoleAdapter::new());
            let dispatcher = build_dispatcher(&config, bot.clone(), lookup, last_messages, shutdown.clone(), None)?;
            run_console_bot(bot.as_ref(), &dispatcher, &shutdown).await
        }
    }
}

fn build_dispatcher(
    config: &Config,
    bot: Arc<dyn Bot>,
    lookup: LookupService,
    last_messages: Arc<LastMessageCache>,
    shutdown: CancellationToken,
    bot_username: Option<String>,
) -> Result<MessageDispatcher, BotError> {
    let outbox = Outbox::new(bot, last_messages, shutdown)
        .with_page_delay(config.bot.page_delay())
        .with_max_message_length(config.bot.max_message_length);

    let parser = match bot_username {
        Some(username) => MessageParser::new().with_bot_username(username),
        None => MessageParser::new(),
    };

    let mut router = CommandRouter::new().with_parser(parser);
    register_defaults(&mut router, lookup, &config.operator)?;
    tracing::info!("Registered {} commands", router.registry().len());

    Ok(MessageDispatcher::new(router, outbox))
}

async fn run_telegram_bot(
    bot: &TelegramAdapter,
    dispatcher: &MessageDispatcher,
    shutdown: &CancellationToken,
    timeout_seconds: u64,
) -> Result<(), BotError> {
    bot.start().await?;

    let mut offset: i64 = 0;
    tracing::info!("Starting message loop...");

    loop {
        let polled = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            polled = bot.get_updates(offset, timeout_seconds) => polled,
        };

        match polled {
            Ok(updates) => {
                if !updates.is_empty() {
                    tracing::info!("Received {} updates", updates.len());
                }
                offset = TelegramAdapter::get_next_offset(&updates, offset);

                // one at a time, so replies to a chat keep their order
                for message in updates.into_iter().filter_map(|u| u.into_message()) {
                    if shutdown.is_cancelled() {
                        break;
                    }
                    dispatcher.handle(message).await;
                }
            }
            Err(e) => {
                let backoff = if e.is_conflict() {
                    tracing::warn!("Another instance is polling with this token: {}", e);
                    CONFLICT_BACKOFF
                } else {
                    tracing::error!("Failed to get updates: {}", e);
                    ERROR_BACKOFF
                };

                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => break,
                    _ = tokio::time::sleep(backoff) => {}
                }
            }
        }
    }

    tracing::info!("Message loop stopped");
    Ok(())
}

async fn run_console_bot(
    bot: &ConsoleAdapter,
    dispatcher: &MessageDispatcher,
    shutdown: &CancellationToken,
) -> Result<(), BotError> {
    bot.start().await?;
    println!("No Telegram token configured, reading commands from stdin (Ctrl-D to quit).");

    let mut lines = ConsoleAdapter::lines();
    loop {
        let line = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            line = lines.next_line() => line,
        };

        match line {
            Ok(Some(line)) => {
                if let Some(message) = ConsoleAdapter::to_message(&line) {
                    dispatcher.handle(message).await;
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }

    Ok(())
}

fn init_config() -> Result<(), BotError> {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config)
        .map_err(|e| BotError::Internal(format!("Failed to render config: {}", e)))?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
