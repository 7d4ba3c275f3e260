//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::analysis::{AnalysisOutcome, AnalysisRequest};
use crate::errors::AppError;
use crate::extraction::DocumentHandle;
use crate::state::AppState;

pub const UPLOAD_NOTICE: &str = "File successfully uploaded.";

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis_id: Uuid,
    pub status: &'static str,
    pub notice: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_markdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// POST /api/v1/analyses
///
/// Multipart fields: `resume` (file, required), `job_description` (text),
/// `job_url` (text). An unreadable resume is a 200 with
/// `status = "extraction_failed"`; only generation errors fail the request.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut document = None;
    let mut job_description = None;
    let mut job_url = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                if bytes.is_empty() {
                    continue;
                }
                info!(
                    "Received resume upload {:?} ({} bytes)",
                    file_name.as_deref().unwrap_or("<unnamed>"),
                    bytes.len()
                );
                let upload_dir = state.config.upload_dir.clone();
                let stored = tokio::task::spawn_blocking(move || {
                    DocumentHandle::store(&upload_dir, file_name.as_deref(), &bytes)
                })
                .await
                .map_err(|e| AppError::Internal(e.into()))??;
                document = Some(stored);
            }
            Some("job_description") => job_description = Some(field.text().await?),
            Some("job_url") => job_url = Some(field.text().await?),
            _ => {}
        }
    }

    let document =
        document.ok_or_else(|| AppError::Validation("A resume file is required".to_string()))?;

    let report = state
        .analyzer
        .run(AnalysisRequest {
            document,
            job_description,
            job_url,
        })
        .await?;

    let response = match report.outcome {
        AnalysisOutcome::Completed(result) => AnalysisResponse {
            analysis_id: report.analysis_id,
            status: "completed",
            notice: UPLOAD_NOTICE,
            analysis_html: Some(result.html),
            analysis_markdown: Some(result.markdown),
            message: None,
            warning: report.warning,
        },
        AnalysisOutcome::ExtractionFailed { message } => AnalysisResponse {
            analysis_id: report.analysis_id,
            status: "extraction_failed",
            notice: UPLOAD_NOTICE,
            analysis_html: None,
            analysis_markdown: None,
            message: Some(message),
            warning: report.warning,
        },
    };

    Ok(Json(response))
}
