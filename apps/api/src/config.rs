use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_JOB_DESCRIPTION_SELECTOR: &str = "div.description__text";

/// Application configuration loaded from environment variables.
/// Read once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub generation_timeout_secs: u64,
    pub job_fetch_timeout_secs: u64,
    /// CSS selector for the job posting body on the scraped page.
    pub job_description_selector: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub ocr_dpi: u32,
    pub ocr_lang: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            google_api_key: require_env("GOOGLE_API_KEY")?,
            gemini_model: env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_api_base: env_or("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE),
            generation_timeout_secs: parse_env("GENERATION_TIMEOUT_SECS", 120)?,
            job_fetch_timeout_secs: parse_env("JOB_FETCH_TIMEOUT_SECS", 30)?,
            job_description_selector: env_or(
                "JOB_DESCRIPTION_SELECTOR",
                DEFAULT_JOB_DESCRIPTION_SELECTOR,
            ),
            upload_dir: PathBuf::from(env_or("UPLOAD_DIR", "uploads")),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            ocr_dpi: parse_env("OCR_DPI", 300)?,
            ocr_lang: env_or("OCR_LANG", "eng"),
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
