use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use discbot::app;
use discbot::application::errors::BotError;
use discbot::application::services::{load_registry, HelpService, MessageService};
use discbot::commands;
use discbot::domain::entities::Shutdown;
use discbot::domain::traits::Bot;
use discbot::infrastructure::adapters::{ConsoleAdapter, TelegramAdapter};
use discbot::infrastructure::bundle::{build_bundle, BundleRequest};
use discbot::infrastructure::config::{Config, CredentialsConfig, TOKEN_PLACEHOLDER};
use discbot::infrastructure::discovery::DiscoveryScanner;

#[derive(Parser)]
#[command(name = "discbot")]
#[command(about = "A prefix-command chat bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run {
        /// Read commands from stdin even if a token is configured
        #[arg(long)]
        console: bool,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
    /// Scan a command directory and print what the help menu would show
    Catalog {
        /// Command directory (defaults to the configured one)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Copy selected command descriptors and credentials into a deployable directory
    Bundle {
        /// Commands to include, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        commands: Vec<String>,
        /// Output directory
        #[arg(short, long)]
        out: PathBuf,
        #[arg(long)]
        server_id: Option<String>,
        #[arg(long)]
        alerts_channel_id: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

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
        Commands::Version => {
            println!("discbot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(&cli.config),
        command => match load_config(&cli.config, cli.token) {
            Ok(config) => match command {
                Commands::Run { console } => run_bot(config, console).await,
                Commands::Catalog { dir } => print_catalog(&config, dir),
                Commands::Bundle {
                    commands,
                    out,
                    server_id,
                    alerts_channel_id,
                } => bundle(&config, commands, out, server_id, alerts_channel_id),
                Commands::Version | Commands::InitConfig => Ok(()),
            },
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(path: &str, token_override: Option<String>) -> Result<Config, BotError> {
    let mut config = Config::resolve(path)?;
    if let Some(token) = token_override {
        config.credentials.token = Some(token);
    }
    Ok(config)
}

async fn run_bot(config: Config, force_console: bool) -> Result<(), BotError> {
    tracing::info!("Starting {}", config.bot.name);

    let bot: Arc<dyn Bot> = match config.telegram_token() {
        Some(token) if !force_console => Arc::new(TelegramAdapter::new(token)),
        _ => {
            if !config.adapters.console.enabled {
                return Err(BotError::Internal(
                    "no adapter enabled: set a token with adapters.telegram.enabled, or enable the console".to_string(),
                ));
            }
            Arc::new(ConsoleAdapter::new())
        }
    };

    let shutdown = Shutdown::new();
    let (commands, report) = app::build_command_service(&config, bot, shutdown.clone());
    tracing::info!(
        "Active commands: {} ({} failed to load)",
        report.loaded.join(", "),
        report.failed.len()
    );

    let on_ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted");
            on_ctrl_c.trigger();
        }
    });

    MessageService::new(commands).run().await
}

fn init_config(path: &str) -> Result<(), BotError> {
    let mut config = Config::default();
    config.credentials.token = Some(TOKEN_PLACEHOLDER.to_string());
    std::fs::write(path, config.to_yaml()?)?;
    println!("Config written to {}", path);
    Ok(())
}

fn print_catalog(config: &Config, dir: Option<PathBuf>) -> Result<(), BotError> {
    let dir = dir.unwrap_or_else(|| config.commands.directory.clone());
    let catalog = DiscoveryScanner::new(&dir).scan()?;

    println!("{} commands in {}:", catalog.len(), dir.display());
    for (name, meta) in catalog.sorted() {
        println!(
            "  {:<16} {:<12} {:>4}  {}",
            name,
            meta.category,
            meta.order,
            meta.description.as_deref().unwrap_or("-")
        );
    }

    let mut config = config.clone();
    config.commands.directory = dir;
    let units = commands::builtin();
    let menu_catalog = app::build_catalog(&config, &units);
    let (registry, _) = load_registry(units, config.commands.enabled.as_deref(), config.bot.prefix);

    println!();
    println!("{}", HelpService::new(&registry, &menu_catalog, config.bot.prefix).list_all());
    Ok(())
}

fn bundle(
    config: &Config,
    commands: Vec<String>,
    out: PathBuf,
    server_id: Option<String>,
    alerts_channel_id: Option<String>,
) -> Result<(), BotError> {
    let request = BundleRequest {
        commands,
        output: out,
        credentials: CredentialsConfig {
            token: config.credentials.token.clone(),
            server_id: server_id.or_else(|| config.credentials.server_id.clone()),
            alerts_channel_id: alerts_channel_id
                .or_else(|| config.credentials.alerts_channel_id.clone()),
        },
    };

    let report = build_bundle(&config.commands.directory, &request)?;
    println!(
        "Bundled {} commands into {}",
        report.copied.len(),
        request.output.display()
    );
    if !report.missing.is_empty() {
        println!("No descriptor found for: {}", report.missing.join(", "));
    }
    Ok(())
}
