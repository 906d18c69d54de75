//! Marketplace-Relay main entry point
//!
//! This is the command-line interface for the marketplace listing notifier.

use anyhow::{bail, Context};
use clap::Parser;
use marketplace_relay::config::{build_search_config, load_config_with_hash, Config};
use marketplace_relay::discord::{connect, CommandListener, DiscordSink};
use marketplace_relay::marketplace::MarketplaceRegistry;
use marketplace_relay::notify::ConsoleSink;
use marketplace_relay::poller::CycleOutcome;
use marketplace_relay::{CommandRouter, Credentials, PollLoop, RelayState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Marketplace-Relay: a marketplace listing notifier
///
/// Marketplace-Relay watches a marketplace search for listings matching a
/// keyword and price range, and posts every new one to a Discord channel.
/// The search is changed at runtime with `!` commands in that channel.
///
/// Discord credentials are read from DISCORD_TOKEN and CHANNEL_ID
/// (a `.env` file in the working directory is honoured).
#[derive(Parser, Debug)]
#[command(name = "marketplace-relay")]
#[command(version)]
#[command(about = "A marketplace listing notifier for Discord", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Run a single search and print the notifications instead of posting them
    #[arg(long)]
    dry_run: bool,

    /// Initial search keyword, overriding the config file
    #[arg(short, long, value_name = "TEXT")]
    keyword: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) => tracing::debug!("No .env file loaded: {}", e),
    }

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    let mut search = build_search_config(&config.search)?;
    if let Some(keyword) = &cli.keyword {
        search
            .set_keyword(keyword)
            .context("Invalid --keyword value")?;
    }
    let state = Arc::new(RelayState::new(search));

    let registry = MarketplaceRegistry::from_config(&config.scraper, &config.marketplaces)?;

    if cli.dry_run {
        handle_dry_run(registry, state).await
    } else {
        handle_relay(&config, registry, state).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("marketplace_relay=info,warn"),
            1 => EnvFilter::new("marketplace_relay=debug,info"),
            2 => EnvFilter::new("marketplace_relay=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: one search, notifications printed to stdout
async fn handle_dry_run(
    registry: MarketplaceRegistry,
    state: Arc<RelayState>,
) -> anyhow::Result<()> {
    let search = state.snapshot();
    let Some(keyword) = search.keyword() else {
        bail!("--dry-run needs a keyword (--keyword or `keyword` under [search])");
    };

    println!("=== Marketplace-Relay Dry Run ===\n");
    println!("Keyword: {}", keyword);
    println!("Marketplace: {}", search.marketplace());
    println!(
        "Price range: {} - {}",
        search.price_min(),
        search.price_max()
    );
    println!("Results per check: {}\n", search.per_page());

    let poll = PollLoop::new(registry, ConsoleSink::stdout(), state, Duration::ZERO);
    match poll.run_cycle().await.outcome {
        CycleOutcome::Fetched { found, sent, .. } => {
            println!("✓ Found {} items, {} would be announced", found, sent);
            Ok(())
        }
        CycleOutcome::FetchFailed(message) => bail!("Search failed: {}", message),
        CycleOutcome::Idle => Ok(()),
    }
}

/// Handles the main relay operation: command listener and poll loop until Ctrl-C
async fn handle_relay(
    config: &Config,
    registry: MarketplaceRegistry,
    state: Arc<RelayState>,
) -> anyhow::Result<()> {
    let credentials = Credentials::from_env().context("Discord credentials are required")?;
    let channel_id = credentials.channel_id;

    let (client, me) = connect(
        &config.discord,
        &credentials,
        Duration::from_secs(config.scraper.timeout_secs),
    )
    .await
    .context("Failed to log in to Discord, check DISCORD_TOKEN and CHANNEL_ID")?;
    let client = Arc::new(client);

    let listener = CommandListener::new(
        client.clone(),
        channel_id,
        me.id,
        CommandRouter::new(state.clone()),
        Duration::from_millis(config.discord.command_poll_ms),
    );
    let poll = PollLoop::new(
        registry,
        DiscordSink::new(client, channel_id),
        state,
        Duration::from_millis(config.scraper.send_delay_ms),
    );

    tracing::info!("Relaying to channel {}", channel_id);

    tokio::select! {
        _ = listener.run() => {}
        _ = poll.run() => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for shutdown signal")?;
            tracing::info!("Shutting down");
        }
    }

    Ok(())
}
