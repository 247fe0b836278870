mod analysis;
mod config;
mod errors;
mod ollama;
mod resumes;
mod routes;
mod state;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::ollama::OllamaClient;
use crate::resumes::store::ResumeStore;
use crate::routes::build_router;
use crate::state::AppState;

/// How often the retention sweeper wakes up.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter_directive(&config.rust_log))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Skillscope API v{}", env!("CARGO_PKG_VERSION"));

    let store = ResumeStore::open(&config.resumes_dir).await?;
    info!("Resume store ready at {}", config.resumes_dir.display());

    let ollama = OllamaClient::new(config.ollama_base_url.clone(), config.ollama_model.clone());
    info!(
        "Ollama client initialized (base: {}, model: {})",
        config.ollama_base_url, config.ollama_model
    );

    spawn_retention_sweeper(store.clone(), config.resume_retention_days);

    let state = AppState { ollama, store };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Fallback log filter when RUST_LOG is unset, scoped to this crate's
/// tracing targets. Targets start with the compiled crate name — the binary
/// target `api`, not the package name — and `module_path!()` at the crate
/// root is exactly that name.
fn default_filter_directive(level: &str) -> String {
    format!("{}={level}", module_path!())
}

/// Hourly background sweep deleting resumes older than the configured
/// retention. Retention is opt-in: without RESUME_RETENTION_DAYS, resumes
/// are kept forever.
fn spawn_retention_sweeper(store: ResumeStore, retention_days: Option<u32>) {
    let Some(days) = retention_days else {
        info!("Resume retention: permanent (RESUME_RETENTION_DAYS not set)");
        return;
    };
    info!("Resume retention: {days} days, sweeping hourly");

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
            if let Err(e) = store.sweep_older_than(cutoff).await {
                warn!("Retention sweep failed: {e:?}");
            }
        }
    });
}
