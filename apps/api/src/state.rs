use crate::analysis::AnalysisClient;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum
/// extractors. All pipeline state lives inside a single request, so cloning
/// this per request is cheap and concurrent handlers never contend.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: AnalysisClient,
    pub config: Config,
}
