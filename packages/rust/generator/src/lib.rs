//! Topic and page generation against the Gemini `generateContent` API.
//!
//! Two calls per run: one asks for a fresh question given every topic already
//! published, the other turns that question into a standalone HTML page. The
//! page then gets the site's structured-data block spliced into its `<head>`.

pub mod prompts;
pub mod schema;

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use pagesmith_shared::{GeminiConfig, PagesmithError, Result, SiteConfig};

pub use schema::{inject_structured_data, structured_data_block};

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("Pagesmith/", env!("CARGO_PKG_VERSION"));

/// Longest slice of an error body echoed into logs.
const MAX_LOGGED_BODY: usize = 512;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of `candidates[0].content.parts[0]`, if present.
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Thin client for a single Gemini model.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Build a client for the model named in `config`.
    pub fn new(config: &GeminiConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PagesmithError::Network(format!("failed to build HTTP client: {e}")))?;

        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.api_base.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }

    /// Send one single-turn prompt.
    ///
    /// Transport failures are errors. A non-success status, a body that is not
    /// the expected JSON, or a response without candidate text yields `None`.
    pub async fn generate_text(&self, prompt: &str) -> Result<Option<String>> {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            // The request URL carries the API key; keep it out of messages.
            .map_err(|e| PagesmithError::Network(format!("generateContent: {}", e.without_url())))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PagesmithError::Network(format!("generateContent: {}", e.without_url())))?;

        if !status.is_success() {
            warn!(%status, body = %truncate(&text), "generateContent returned an error status");
            return Ok(None);
        }

        match serde_json::from_str::<GenerateResponse>(&text) {
            Ok(parsed) => {
                let out = parsed.first_text();
                if out.is_none() {
                    warn!("generateContent response had no candidate text");
                }
                Ok(out)
            }
            Err(e) => {
                warn!(error = %e, "generateContent response was not valid JSON");
                Ok(None)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Generation steps
// ---------------------------------------------------------------------------

/// Ask for one new question not among `completed`.
///
/// Returns the trimmed question, or `None` when the API produced nothing usable.
#[instrument(skip_all, fields(prior_topics = completed.len()))]
pub async fn generate_topic(
    client: &GeminiClient,
    site: &SiteConfig,
    completed: &[String],
) -> Result<Option<String>> {
    let base = site.base_url()?;
    let host = base.host_str().unwrap_or(site.base_url.as_str());
    let prompt = prompts::topic_prompt(&site.brand, host, completed);

    let topic = client
        .generate_text(&prompt)
        .await?
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    match &topic {
        Some(t) => info!(topic = %t, "topic generated"),
        None => warn!("no topic generated"),
    }

    Ok(topic)
}

/// Ask for a full HTML page answering `topic`, with structured data injected.
#[instrument(skip_all, fields(topic = %topic))]
pub async fn generate_page(
    client: &GeminiClient,
    site: &SiteConfig,
    topic: &str,
) -> Result<Option<String>> {
    let prompt = prompts::page_prompt(&site.brand, topic);

    let Some(html) = client.generate_text(&prompt).await? else {
        warn!("no HTML generated");
        return Ok(None);
    };

    debug!(bytes = html.len(), "HTML generated");
    let block = structured_data_block(site);
    Ok(Some(inject_structured_data(&html, &block)))
}

fn truncate(s: &str) -> &str {
    match s.char_indices().nth(MAX_LOGGED_BODY) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
