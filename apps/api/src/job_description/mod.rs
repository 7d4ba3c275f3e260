//! Job description lookup from a posting URL.
//!
//! The content region is located by one CSS selector that matches the public
//! LinkedIn job page markup. It breaks whenever that markup changes; swap the
//! selector through config or provide another `JobDescriptionSource`.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{info, warn};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Resolves a job posting URL into its description text.
/// `None` means "not found"; callers keep whatever text they already had.
#[async_trait]
pub trait JobDescriptionSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Option<String>;
}

pub struct HttpJobFetcher {
    client: Client,
    selector: Selector,
}

impl HttpJobFetcher {
    pub fn new(selector: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        let selector = Selector::parse(selector)
            .map_err(|e| anyhow::anyhow!("Invalid job description selector '{selector}': {e}"))?;

        Ok(Self { client, selector })
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch job post")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        response.text().await.context("Failed to read response body")
    }
}

#[async_trait]
impl JobDescriptionSource for HttpJobFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        info!("Fetching job post: {}", url);

        let html = match self.fetch_html(url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to extract job description from {url}: {e:#}");
                return None;
            }
        };

        let description = extract_description(&html, &self.selector);
        if description.is_none() {
            warn!("No job description region found at {url}");
        }
        description
    }
}

/// Text of the first element matching `selector`, with text nodes joined by
/// spaces and whitespace runs collapsed.
pub fn extract_description(html: &str, selector: &Selector) -> Option<String> {
    let document = Html::parse_document(html);
    let element = document.select(selector).next()?;
    let text = collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "));
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
