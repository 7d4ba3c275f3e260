//! Resume analysis pipeline.
//!
//! Flow: resolve job description (typed or fetched) → extract resume text →
//!       compose prompt → generate → render Markdown reply to HTML.
//!
//! Extraction and job lookup degrade instead of failing. Only the generation
//! call can fail a request.

pub mod handlers;
pub mod prompts;
pub mod render;

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{DocumentHandle, TextExtractor};
use crate::job_description::JobDescriptionSource;
use crate::llm_client::Generator;

pub const JOB_URL_WARNING: &str = "Failed to extract job description from the given URL.";
pub const EXTRACTION_FAILED_MESSAGE: &str =
    "Resume text is required for analysis. Please upload a resume with readable text.";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// One analysis request: the stored upload plus optional job context.
#[derive(Debug)]
pub struct AnalysisRequest {
    pub document: DocumentHandle,
    pub job_description: Option<String>,
    pub job_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// The model reply as Markdown, fences stripped.
    pub markdown: String,
    pub html: String,
}

#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    Completed(AnalysisResult),
    ExtractionFailed { message: String },
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub outcome: AnalysisOutcome,
    /// Advisory only; present when a job URL could not be resolved.
    pub warning: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Owns the collaborators of the pipeline. Shared across requests read-only.
pub struct Analyzer {
    extractor: Arc<TextExtractor>,
    job_source: Arc<dyn JobDescriptionSource>,
    generator: Arc<dyn Generator>,
}

impl Analyzer {
    pub fn new(
        extractor: Arc<TextExtractor>,
        job_source: Arc<dyn JobDescriptionSource>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            extractor,
            job_source,
            generator,
        }
    }

    /// Runs the pipeline for one request.
    ///
    /// The uploaded document is consumed: its file is gone by the time this
    /// returns, whatever the outcome.
    pub async fn run(&self, request: AnalysisRequest) -> Result<AnalysisReport, AppError> {
        let analysis_id = Uuid::new_v4();
        let AnalysisRequest {
            document,
            job_description,
            job_url,
        } = request;

        // Step 1: A fetched description overrides the typed one
        let mut warning = None;
        let mut job_description = job_description;
        if let Some(url) = job_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            match self.job_source.fetch(url).await {
                Some(fetched) => {
                    info!(
                        "Analysis {}: using job description fetched from URL ({} chars)",
                        analysis_id,
                        fetched.len()
                    );
                    job_description = Some(fetched);
                }
                None => {
                    warn!("Analysis {}: job URL could not be resolved", analysis_id);
                    warning = Some(JOB_URL_WARNING.to_string());
                }
            }
        }

        // Step 2: Extract, then release the upload
        info!(
            "Analysis {}: extracting text from {}",
            analysis_id,
            document.original_name().unwrap_or("<unnamed>")
        );
        let resume_text = self.extract(&document).await;
        document.discard();

        if resume_text.is_empty() {
            warn!("Analysis {}: no text recovered from resume", analysis_id);
            return Ok(AnalysisReport {
                analysis_id,
                outcome: AnalysisOutcome::ExtractionFailed {
                    message: EXTRACTION_FAILED_MESSAGE.to_string(),
                },
                warning,
            });
        }

        // Step 3: Compose
        let job_description = job_description.filter(|jd| !jd.trim().is_empty());
        let prompt = prompts::compose(&resume_text, job_description.as_deref());
        info!(
            "Analysis {}: prompt composed ({} chars, job comparison: {})",
            analysis_id,
            prompt.len(),
            job_description.is_some()
        );

        // Step 4: Generate (single attempt)
        let reply = self.generator.generate(&prompt).await?;

        // Step 5: Render
        let markdown = render::strip_markdown_fences(&reply).to_string();
        let html = render::markdown_to_html(&markdown);
        info!("Analysis {} completed", analysis_id);

        Ok(AnalysisReport {
            analysis_id,
            outcome: AnalysisOutcome::Completed(AnalysisResult { markdown, html }),
            warning,
        })
    }

    async fn extract(&self, document: &DocumentHandle) -> String {
        let extractor = self.extractor.clone();
        let path = document.path().to_path_buf();

        match tokio::task::spawn_blocking(move || extractor.extract_file(&path)).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Extraction task failed: {e}");
                String::new()
            }
        }
    }
}
