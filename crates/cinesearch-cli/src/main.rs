//! cinesearch - TMDB movie search from the terminal.

/// Application configuration (TOML).
mod config;

use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use cinesearch_api::tmdb::TmdbClient;
use cinesearch_screen::{
    LogSink, SEARCH_FAILED_MESSAGE, ScreenConfig, SearchController, SearchOutcome,
    run_search_screen,
};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path, resolve_log_path};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Open the interactive movie search screen.
    Browse(BrowseArgs),
    /// Run a single search and print the results.
    Search(SearchArgs),
    /// Inspect or create the config file.
    Config(ConfigCommand),
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Search submitted as soon as the screen opens.
    #[arg(long)]
    query: Option<String>,
    /// Response language (default: from config).
    #[arg(long)]
    language: Option<String>,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "batman").
    #[arg(long, required = true)]
    query: String,
    /// Response language (default: from config).
    #[arg(long)]
    language: Option<String>,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the effective configuration.
    Show,
    /// Write a config file with default values.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print the config file path.
    Path,
}

/// Builds a `TmdbClient` from the `TMDB_API_TOKEN` environment variable and
/// the `[tmdb]` config section.
///
/// # Errors
///
/// Returns an error if `TMDB_API_TOKEN` is not set, the configured base URL is
/// invalid, or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let api_token = std::env::var("TMDB_API_TOKEN")
        .context("TMDB_API_TOKEN environment variable is required")?;

    let mut builder = TmdbClient::builder()
        .api_token(api_token)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .timeout(config.tmdb.timeout());

    if let Some(base_url) = config.tmdb.base_url.as_deref() {
        let url = Url::parse(base_url)
            .with_context(|| format!("invalid tmdb.base_url in config: {base_url}"))?;
        builder = builder.base_url(url);
    }

    builder.build().context("failed to build TMDB client")
}

/// Loads the config for `dir`, falling back to defaults when absent.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the terminal fails.
#[instrument(skip_all)]
async fn run_browse(args: BrowseArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config)?;

    let screen = ScreenConfig {
        search: config.tmdb.search_options(args.language.as_deref()),
        toast_ttl: config.ui.notice_ttl(),
        initial_query: args.query,
    };

    tracing::info!("Launching search screen");
    run_search_screen(Arc::new(client), screen)
        .await
        .context("search screen failed")
}

/// Runs the `search` subcommand.
///
/// Notices go to the log; a service failure ends with the generic
/// user-facing message and a non-zero exit status.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the search fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config)?;
    let options = config.tmdb.search_options(args.language.as_deref());

    let mut controller = SearchController::new(Arc::new(client), LogSink, options);
    match controller.submit_query(&args.query).await {
        SearchOutcome::Failed => bail!("{SEARCH_FAILED_MESSAGE}"),
        SearchOutcome::Found(count) => {
            tracing::info!("Total results: {count}");
            tracing::info!("ID\tTitle\t\t\tReleaseDate\tRating");
            for movie in controller.state().results() {
                tracing::info!(
                    "{}\t{}\t\t{}\t{:.1}",
                    movie.id,
                    movie.title,
                    movie.release_date.as_deref().unwrap_or("-"),
                    movie.vote_average,
                );
            }
        }
        SearchOutcome::EmptyQuery | SearchOutcome::NoResults | SearchOutcome::Stale => {}
    }

    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or serialized.
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let content = config.to_toml()?;
    for line in content.lines() {
        tracing::info!("{line}");
    }
    Ok(())
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file write fails.
fn run_config_init(force: bool, dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    if config_path.exists() && !force {
        tracing::warn!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    AppConfig::default()
        .save(&config_path)
        .context("failed to save config")?;
    tracing::info!("Wrote default config to {}", config_path.display());
    Ok(())
}

/// Runs the `config path` subcommand.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved.
fn run_config_path(dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    tracing::info!("{}", config_path.display());
    Ok(())
}

/// Opens the append-only log file used while the search screen owns the terminal.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created.
fn open_log_file(dir: Option<&PathBuf>) -> Result<File> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let log_path = resolve_log_path(&config_path);
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))
}

/// Installs the global tracing subscriber.
///
/// Logs go to `log_file` without ANSI colours when given, otherwise to stdout.
fn init_tracing(log_file: Option<File>) {
    let (writer, ansi) = match log_file {
        Some(file) => (BoxMakeWriter::new(Mutex::new(file)), false),
        None => (BoxMakeWriter::new(std::io::stdout), true),
    };

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = match cli.command {
        Commands::Browse(_) => Some(open_log_file(cli.dir.as_ref())?),
        Commands::Search(_) | Commands::Config(_) => None,
    };
    init_tracing(log_file);

    match cli.command {
        Commands::Browse(args) => run_browse(args, cli.dir.as_ref()).await,
        Commands::Search(args) => run_search(&args, cli.dir.as_ref()).await,
        Commands::Config(cfg) => match cfg.command {
            ConfigSubcommands::Show => run_config_show(cli.dir.as_ref()),
            ConfigSubcommands::Init { force } => run_config_init(force, cli.dir.as_ref()),
            ConfigSubcommands::Path => run_config_path(cli.dir.as_ref()),
        },
    }
}
