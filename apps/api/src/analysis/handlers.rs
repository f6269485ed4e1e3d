//! Axum route handlers for the Analysis API.

use std::sync::Arc;

use axum::{
    extract::{multipart::Field, Multipart, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::analysis::engine::{MatchEngine, MatchReport};
use crate::analysis::render::RenderedReport;
use crate::errors::AppError;
use crate::extraction::extract_text;
use crate::narrative::{narrate_or_inline_error, NarrativeRequest};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    #[serde(default)]
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub report: MatchReport,
    pub rendered: RenderedReport,
}

#[derive(Debug, Serialize)]
pub struct NarrativeResponse {
    pub analysis_id: Uuid,
    pub backend: Option<&'static str>,
    pub narrative: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let response = run_analysis(&state.engine, req.resume_text, req.jd_text).await?;
    Ok(Json(response))
}

/// POST /api/v1/analyze/upload
///
/// Multipart parts: `resume` (file, required), and either `jd` (file) or
/// `jd_text` (text). A `jd` file wins over `jd_text` when both are sent.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut resume_text: Option<String> = None;
    let mut jd_file_text: Option<String> = None;
    let mut jd_field_text: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => resume_text = Some(read_document(field, "resume").await?),
            "jd" => jd_file_text = Some(read_document(field, "jd").await?),
            "jd_text" => jd_field_text = Some(field.text().await?),
            other => debug!(field = other, "ignoring unknown multipart field"),
        }
    }

    let resume_text = resume_text
        .ok_or_else(|| AppError::Validation("Missing required `resume` file part".to_string()))?;
    let jd_text = jd_file_text.or(jd_field_text).unwrap_or_default();

    let response = run_analysis(&state.engine, resume_text, jd_text).await?;
    Ok(Json(response))
}

/// POST /api/v1/analyze/narrative
pub async fn handle_narrative(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<NarrativeResponse>, AppError> {
    validate_resume(&req.resume_text)?;

    let resume_sections = state.engine.segment(&req.resume_text);
    let jd_sections = state.engine.segment(&req.jd_text);
    let request = NarrativeRequest {
        resume_text: &req.resume_text,
        jd_text: &req.jd_text,
        resume_sections: &resume_sections,
        jd_sections: &jd_sections,
    };

    let narrator = state.narrator.as_deref();
    let narrative = narrate_or_inline_error(narrator, &request).await;

    Ok(Json(NarrativeResponse {
        analysis_id: Uuid::new_v4(),
        backend: narrator.map(|n| n.backend()),
        narrative,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn validate_resume(resume_text: &str) -> Result<(), AppError> {
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Resume text is empty. Provide resume_text or a readable resume file.".to_string(),
        ));
    }
    Ok(())
}

/// Runs the engine on the blocking pool and wraps the report for the wire.
async fn run_analysis(
    engine: &Arc<MatchEngine>,
    resume_text: String,
    jd_text: String,
) -> Result<AnalyzeResponse, AppError> {
    validate_resume(&resume_text)?;

    let engine = Arc::clone(engine);
    let report = tokio::task::spawn_blocking(move || engine.analyze(&resume_text, &jd_text))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("analysis task failed: {e}")))?;

    let rendered = RenderedReport::from_report(&report);
    Ok(AnalyzeResponse {
        analysis_id: Uuid::new_v4(),
        analyzed_at: Utc::now(),
        report,
        rendered,
    })
}

/// Reads a file part and extracts its text. The part must carry a file name.
async fn read_document(field: Field<'_>, part: &str) -> Result<String, AppError> {
    let file_name = field
        .file_name()
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation(format!("`{part}` must be a file upload")))?;
    let bytes = field.bytes().await?;
    debug!(part, file_name = %file_name, size = bytes.len(), "received upload");
    Ok(extract_text(&file_name, bytes).await?)
}
