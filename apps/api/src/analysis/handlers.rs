use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::fallback;
use crate::errors::AppError;
use crate::extraction::extract_text;
use crate::report::parse_analysis;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub score: Option<u32>,
    pub feedback: Vec<String>,
    pub suggestions: Vec<String>,
    /// The unparsed analysis text; always present as a display fallback.
    pub raw: String,
    /// True when the analysis was synthesized from generic templates
    /// because the model output carried no score.
    pub degraded: bool,
}

/// POST /api/v1/analyze
/// Multipart upload (field `file`, a PDF); runs the full pipeline:
/// extract, analyze, parse.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut document: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            document = Some(bytes.to_vec());
        }
    }
    let document =
        document.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;

    let text = extract_text(&document)?;
    info!(text_len = text.len(), "extracted CV text from upload");

    let response = run_analysis(&state, &text).await?;
    Ok(Json(response))
}

/// POST /api/v1/analyze/text
/// JSON body with pre-extracted text; skips the PDF stage.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let response = run_analysis(&state, &req.text).await?;
    Ok(Json(response))
}

async fn run_analysis(state: &AppState, text: &str) -> Result<AnalyzeResponse, AppError> {
    let body = state.analyzer.analyze(text).await?;

    let (body, degraded) =
        if state.config.enable_fallback_analysis && fallback::needs_fallback(&body) {
            info!("model output carried no score marker, substituting templated analysis");
            (fallback::synthesize_analysis(&body), true)
        } else {
            (body, false)
        };

    let parsed = parse_analysis(&body);
    Ok(AnalyzeResponse {
        score: parsed.score,
        feedback: parsed.feedback,
        suggestions: parsed.suggestions,
        raw: parsed.raw,
        degraded,
    })
}
