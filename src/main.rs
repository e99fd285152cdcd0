//! COVID-19 case and policy aggregation service entry point.

use std::net::SocketAddr;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use covidcase::api::params::{normalize_country_name, parse_scope};
use covidcase::api::{create_router, AppState};
use covidcase::config::Config;
use covidcase::metrics;
use covidcase::utils::shutdown_signal;

/// COVID-19 case and policy aggregation service.
#[derive(Parser, Debug)]
#[command(name = "covidcase-server")]
#[command(about = "REST facade over public COVID-19 case and policy-stringency APIs")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service (default).
    Serve,

    /// Check configuration validity.
    CheckConfig,

    /// Probe both providers once and print the diagnostic report.
    Diag,

    /// Resolve case figures for one country and print them.
    Country {
        /// Country name, e.g. norway.
        name: String,

        /// Date range as YYYY-MM-DD-YYYY-MM-DD.
        #[arg(long)]
        scope: Option<String>,
    },

    /// Resolve stringency figures for one country and print them.
    Policy {
        /// Country name, e.g. norway.
        name: String,

        /// Date range as YYYY-MM-DD-YYYY-MM-DD.
        #[arg(long)]
        scope: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("covidcase=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Initialize metrics
    metrics::init_metrics();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Diag) => cmd_diag().await,
        Some(Command::Country { name, scope }) => cmd_country(&name, scope.as_deref()).await,
        Some(Command::Policy { name, scope }) => cmd_policy(&name, scope.as_deref()).await,
        Some(Command::Serve) | None => cmd_serve().await,
    }
}

/// Load and validate configuration, logging why it failed.
fn load_config() -> anyhow::Result<Config> {
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    Ok(config)
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("COVIDCASE - CONFIGURATION CHECK");
    println!("======================================================================");

    let config = load_config()?;

    println!("Configuration Summary:");
    println!("  Port: {}", config.port);
    println!("  Case API: {}", config.cases_api_url);
    println!("  Policy API: {}", config.policy_api_url);
    println!("  Countries API: {}", config.countries_api_url);
    match config.http_timeout_ms {
        Some(ms) => println!("  Upstream Timeout: {}ms", ms),
        None => println!("  Upstream Timeout: transport default"),
    }
    match config.metrics_port {
        Some(port) => println!("  Metrics: Prometheus on port {}", port),
        None => println!("  Metrics: Disabled"),
    }
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Probe both providers once.
async fn cmd_diag() -> anyhow::Result<()> {
    let config = load_config()?;
    let state = AppState::from_config(&config, Instant::now())?;

    let report = state.diagnose().await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// Resolve case figures once.
async fn cmd_country(name: &str, scope: Option<&str>) -> anyhow::Result<()> {
    let config = load_config()?;
    let state = AppState::from_config(&config, Instant::now())?;

    let info = state
        .cases
        .resolve_cases(&normalize_country_name(name), &parse_scope(scope))
        .await?;
    println!("{}", serde_json::to_string_pretty(&info)?);

    Ok(())
}

/// Resolve stringency figures once.
async fn cmd_policy(name: &str, scope: Option<&str>) -> anyhow::Result<()> {
    let config = load_config()?;
    let state = AppState::from_config(&config, Instant::now())?;

    let info = state
        .policy
        .resolve_policy(&normalize_country_name(name), &parse_scope(scope))
        .await?;
    println!("{}", serde_json::to_string_pretty(&info)?);

    Ok(())
}

/// Run the HTTP service until a shutdown signal arrives.
async fn cmd_serve() -> anyhow::Result<()> {
    let started_at = Instant::now();

    info!("Loading configuration...");
    let config = load_config()?;

    if let Some(port) = config.metrics_port {
        if let Err(e) = metrics::install_prometheus(port) {
            warn!("{}", e);
        }
    }

    let app_state = AppState::from_config(&config, started_at)?;
    info!("Case API: {}", app_state.cases.base_url());
    info!("Policy API: {}", app_state.policy.base_url());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
