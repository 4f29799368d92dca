pub mod api;
pub mod config;
pub mod country;
pub mod db;
pub mod entities;
pub mod models;
pub mod sample;
pub mod search;
pub mod services;
pub mod state;

pub use config::Config;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub async fn run() -> Result<()> {
    let config = Config::load()?;
    config.validate()?;

    init_tracing(&config)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("serve" | "-d" | "--daemon") => run_server(config).await,
        Some("seed") => seed(config).await,
        Some("init") => init_config(),
        Some("help" | "-h" | "--help") => {
            print_help();
            Ok(())
        }
        Some(other) => {
            eprintln!("Unknown command: {other}\n");
            print_help();
            std::process::exit(1);
        }
    }
}

fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer());

    if config.observability.loki_enabled {
        let url = url::Url::parse(&config.observability.loki_url)
            .context("observability.loki_url is not a valid URL")?;
        let (loki_layer, task) = tracing_loki::builder()
            .label("app", "motorly")?
            .extra_field("pid", std::process::id().to_string())?
            .build_url(url)?;

        registry.with(loki_layer).init();
        tokio::spawn(task);
    } else {
        registry.init();
    }

    Ok(())
}

fn install_metrics(config: &Config) -> Result<Option<PrometheusHandle>> {
    if !config.observability.metrics_enabled {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install the Prometheus recorder")?;
    Ok(Some(handle))
}

async fn run_server(config: Config) -> Result<()> {
    let prometheus_handle = install_metrics(&config)?;
    let port = config.server.port;

    let state = api::create_app_state_from_config(config, prometheus_handle).await?;
    let app = api::create_app(state).await;

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;
    info!("Listening on http://0.0.0.0:{port}");

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {e}");
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutting down");
    server.abort();

    Ok(())
}

/// Loads the built-in sample inventory into the database so a fresh
/// install has something to browse.
async fn seed(config: Config) -> Result<()> {
    let store = db::Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let listings = sample::sample_listings();
    let written = store.upsert_listings(&listings).await?;
    info!("Seeded {written} sample listings");
    Ok(())
}

fn init_config() -> Result<()> {
    match Config::create_default_if_missing()? {
        Some(path) => println!("Wrote default config to {}", path.display()),
        None => println!("A config file already exists; nothing to do"),
    }
    Ok(())
}

fn print_help() {
    println!(
        r"motorly {} - multi-country vehicle marketplace server

USAGE:
    motorly [COMMAND]

COMMANDS:
    serve    Start the API server (default)
    seed     Load the built-in sample inventory into the database
    init     Write a default config file if none exists
    help     Show this message
",
        env!("CARGO_PKG_VERSION")
    );
}
