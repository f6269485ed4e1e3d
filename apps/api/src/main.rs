mod analysis;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod narrative;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::MatchEngine;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::narrative::{LlmNarrativeGenerator, NarrativeGenerator};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume analyzer v{}", env!("CARGO_PKG_VERSION"));

    // Match engine: built-in header list and skill vocabulary
    let engine = Arc::new(MatchEngine::default());
    info!(
        "Match engine ready ({} skill tokens)",
        engine.vocabulary().len()
    );

    // Optional narrative backend
    let narrator: Option<Arc<dyn NarrativeGenerator>> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone())?;
            info!("Narrative backend enabled (model: {})", llm_client::MODEL);
            Some(Arc::new(LlmNarrativeGenerator(llm)))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; narrative reports disabled");
            None
        }
    };

    let state = AppState {
        engine,
        narrator,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict allowed origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
