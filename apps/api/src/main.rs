mod analysis;
mod config;
mod errors;
mod extraction;
mod job_description;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::Analyzer;
use crate::config::Config;
use crate::extraction::TextExtractor;
use crate::job_description::HttpJobFetcher;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Review API v{}", env!("CARGO_PKG_VERSION"));

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create upload dir {}", config.upload_dir.display()))?;

    // Initialize LLM client
    let llm = LlmClient::new(&config).context("Failed to build LLM client")?;
    info!("LLM client initialized (model: {})", llm.model());

    let job_fetcher = HttpJobFetcher::new(
        &config.job_description_selector,
        Duration::from_secs(config.job_fetch_timeout_secs),
    )?;

    let extractor = TextExtractor::from_config(&config);
    info!(
        "Text extraction: pdf text layer, then OCR fallback (dpi={}, lang={})",
        config.ocr_dpi, config.ocr_lang
    );
    if !extraction::ocr::is_ocr_available() {
        warn!("pdftoppm or tesseract not found; scanned resumes will yield no text");
    }

    let analyzer = Analyzer::new(Arc::new(extractor), Arc::new(job_fetcher), Arc::new(llm));

    // Build app state
    let state = AppState {
        analyzer: Arc::new(analyzer),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
