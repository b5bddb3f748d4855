//! Claims Engine - API Server Binary
//!
//! Starts the HTTP API over the SQLite policy store.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin claims-api
//!
//! API_PORT=9090 API_LLM_API_KEY=sk-... cargo run --bin claims-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_JWT_EXPIRATION_SECS` - JWT token expiration in seconds (default: 3600)
//! * `API_DATABASE_URL` - SQLite URL (default: sqlite://data/policies.db)
//! * `API_POLICY_SEED_PATH` - JSON seed loaded when the store is empty
//! * `API_LOG_LEVEL` - Log level when `RUST_LOG` is unset (default: info)
//! * `API_LLM_API_KEY` - Enables `/coverage/llm` when set
//! * `API_LLM_BASE_URL`, `API_LLM_MODEL`, `API_LLM_TIMEOUT_SECS`

use anyhow::Context;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_policy::{
    load_policies_from_file, seed_store, CoverageService, LlmCoverageChecker, OpenAiChatModel,
    OpenAiConfig, PolicyPort,
};
use infra_db::{DatabaseConfig, SqlitePolicyRepository};
use interface_api::{config::ApiConfig, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid API configuration")?;
    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting claims engine API server"
    );

    let store = SqlitePolicyRepository::connect(DatabaseConfig::new(&config.database_url))
        .await
        .with_context(|| format!("failed to open policy store at {}", config.database_url))?;
    seed_if_empty(&store, config.policy_seed_path.as_deref()).await?;

    let mut coverage = CoverageService::new(Arc::new(store));
    if let Some(api_key) = config.llm_key() {
        let model = OpenAiChatModel::new(OpenAiConfig {
            api_key: api_key.to_string(),
            base_url: config.llm_base_url.clone(),
            model: config.llm_model.clone(),
            timeout_secs: config.llm_timeout_secs,
            ..OpenAiConfig::default()
        })?;
        coverage = coverage
            .with_llm(LlmCoverageChecker::new(Arc::new(model)).with_timeout(config.llm_timeout()));
        tracing::info!(model = %config.llm_model, "Model-backed coverage enabled");
    } else {
        tracing::info!("No LLM API key configured; /coverage/llm will return fallback results");
    }

    let app = create_router(coverage, config.clone());
    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber; `RUST_LOG` wins over the configured level
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Loads the seed file into a store that has no policies yet
async fn seed_if_empty(store: &SqlitePolicyRepository, seed_path: Option<&str>) -> anyhow::Result<()> {
    let Some(path) = seed_path else {
        return Ok(());
    };
    if !store.list_all(1).await?.is_empty() {
        tracing::debug!("Policy store already populated; skipping seed");
        return Ok(());
    }
    if !Path::new(path).exists() {
        tracing::warn!(path, "Seed file not found; starting with an empty policy store");
        return Ok(());
    }

    let policies = load_policies_from_file(path)?;
    let count = seed_store(store, &policies).await?;
    tracing::info!(path, count, "Seeded empty policy store");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
