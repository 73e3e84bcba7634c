//! Macro Gate Binary
//!
//! Starts the macro gate HTTP service.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin macro-gate
//! ```
//!
//! # Environment Variables
//!
//! - `MACRO_GATE_CONFIG`: Path to the YAML config (default: config.yaml)
//! - `RUST_LOG`: Log filter (default: from `observability.logging.level`)
//!
//! The config file may reference any other variable with `${VAR:-default}`.

use anyhow::Context;
use macro_gate::application::use_cases::EvaluateTradeUseCase;
use macro_gate::config::{Config, LoggingConfig, load_config};
use macro_gate::infrastructure::http::{
    AppState, ApiKeys, ENDPOINTS, SlidingWindowLimiter, create_router,
};
use macro_gate::observability::init_metrics;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_ancestors();

    let config = load_config(None).context("failed to load configuration")?;
    init_tracing(&config.observability.logging);

    tracing::info!(
        version = %config.build.version,
        git_sha = %config.build.git_sha,
        "Starting Macro Gate"
    );

    let state = build_state(&config)?;
    let app = create_router(state);

    let addr = config.server.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "HTTP server starting");
    for endpoint in ENDPOINTS {
        tracing::info!("  {endpoint}");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Macro gate stopped");
    Ok(())
}

/// Wire the policy, keys, limiter and metrics into the HTTP state.
fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let evaluate =
        EvaluateTradeUseCase::new(config.policy.to_policy().context("invalid policy table")?);
    let api_keys = ApiKeys::new(config.api.keys.iter().cloned());
    if api_keys.is_empty() {
        tracing::warn!("No API keys configured; every /v1 request will be rejected");
    }

    let limiter = SlidingWindowLimiter::new(config.api.requests_per_minute as usize);

    tracing::info!(
        api_keys = api_keys.len(),
        requests_per_minute = config.api.requests_per_minute,
        cap_aggregate_risk_r = evaluate.policy().cap_aggregate_risk_r(),
        "Configuration loaded"
    );

    let metrics = init_metrics().context("failed to install metrics recorder")?;

    Ok(AppState::new(
        evaluate,
        api_keys,
        limiter,
        config.build.clone(),
    )
    .with_metrics(metrics))
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("macro_gate={}", logging.level)));

    if logging.is_json() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(filter)
            .init();
    }
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv_from_ancestors() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
