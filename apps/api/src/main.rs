mod analysis;
mod config;
mod errors;
mod extraction;
mod report;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::hf::HfTextGenerator;
use crate::analysis::{AnalysisClient, GenerationParams, RetryPolicy};
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; a missing inference credential must fail
    // here, visibly, not as an empty bearer token at request time.
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("atscan_api={}", &config.rust_log))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting atscan API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the inference client
    let generator = Arc::new(HfTextGenerator::new(
        &config.hf_api_base,
        &config.hf_model,
        config.hf_api_token.clone(),
        config.request_timeout,
    ));
    info!("Inference client initialized (model: {})", config.hf_model);

    let analyzer = AnalysisClient::new(
        generator,
        GenerationParams {
            max_length: config.max_length,
            ..GenerationParams::default()
        },
        RetryPolicy {
            max_retries: config.max_retries,
            initial_backoff: config.initial_backoff,
        },
        config.prompt_char_budget,
    );

    let state = AppState {
        analyzer,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
