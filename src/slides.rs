//! Google Slides REST API: the parts of the presentation resource that carry
//! text, and the `replaceAllText` batch update.
//!
//! Only fields the pipeline reads are modelled. Everything else in the JSON
//! is ignored, and absent containers deserialize as empty.

use crate::config::Config;
use crate::error::{is_retryable_error, Error};
use crate::retry::{with_retry_if, RetryConfig};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ==================== Read model ====================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    #[serde(default)]
    pub presentation_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub object_id: String,
    #[serde(default)]
    pub page_elements: Vec<PageElement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageElement {
    pub object_id: String,
    /// Absent for images, tables, charts, lines and other non-shape elements
    #[serde(default)]
    pub shape: Option<Shape>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    #[serde(default)]
    pub text: Option<TextContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    #[serde(default)]
    pub text_elements: Vec<TextElement>,
}

/// One entry of a shape's text. The API sets exactly one of the kind fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    #[serde(default)]
    pub text_run: Option<TextRun>,
    #[serde(default)]
    pub paragraph_marker: Option<serde_json::Value>,
    #[serde(default)]
    pub auto_text: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    #[serde(default)]
    pub content: String,
}

/// Which kind of text element this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextElementKind<'a> {
    TextRun(&'a TextRun),
    ParagraphMarker,
    AutoText,
    Unknown,
}

impl TextElement {
    pub fn kind(&self) -> TextElementKind<'_> {
        if let Some(run) = &self.text_run {
            TextElementKind::TextRun(run)
        } else if self.paragraph_marker.is_some() {
            TextElementKind::ParagraphMarker
        } else if self.auto_text.is_some() {
            TextElementKind::AutoText
        } else {
            TextElementKind::Unknown
        }
    }
}

// ==================== Write model ====================

#[derive(Debug, Clone, Serialize)]
pub struct BatchUpdateRequest {
    pub requests: Vec<Request>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    ReplaceAllText(ReplaceAllTextRequest),
}

/// Replace every occurrence of `contains_text` on the listed pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceAllTextRequest {
    pub page_object_ids: Vec<String>,
    pub replace_text: String,
    pub contains_text: SubstringMatchCriteria,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstringMatchCriteria {
    pub text: String,
    pub match_case: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateResponse {
    #[serde(default)]
    pub presentation_id: String,
    #[serde(default)]
    pub replies: Vec<Response>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default)]
    pub replace_all_text: Option<ReplaceAllTextResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceAllTextResponse {
    #[serde(default)]
    pub occurrences_changed: u32,
}

impl BatchUpdateResponse {
    /// Total text occurrences the service reports as replaced.
    pub fn occurrences_changed(&self) -> u32 {
        self.replies
            .iter()
            .filter_map(|r| r.replace_all_text.as_ref())
            .map(|r| r.occurrences_changed)
            .sum()
    }
}

// ==================== Client ====================

/// Client for the Slides `presentations` resource.
#[derive(Debug, Clone)]
pub struct SlidesClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
    retry: RetryConfig,
}

impl SlidesClient {
    pub fn new(client: reqwest::Client, base_url: &str, access_token: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            retry: RetryConfig::api_call(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(client, &config.slides_api_url, &config.google_access_token)
    }

    /// Retry policy for reads; writes are never retried.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// `{base}/presentations/{segment}` with `segment` percent-encoded as a
    /// single path segment.
    fn presentation_url(&self, segment: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("Invalid Slides API URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Slides API URL cannot take a path: {}", self.base_url))?
            .pop_if_empty()
            .push("presentations")
            .push(segment);
        Ok(url)
    }

    /// Fetch a presentation with its slides and text content.
    pub async fn get_presentation(&self, presentation_id: &str) -> Result<Presentation> {
        let url = self.presentation_url(presentation_id)?;
        debug!("GET {}", url);

        with_retry_if(
            &self.retry,
            "Fetch presentation",
            || async {
                let response = self
                    .client
                    .get(url.clone())
                    .bearer_auth(&self.access_token)
                    .send()
                    .await
                    .context("Failed to send request to Slides API")?;

                let response = check_status(response).await?;

                let presentation: Presentation = response
                    .json()
                    .await
                    .context("Failed to parse presentation")?;

                Ok::<_, anyhow::Error>(presentation)
            },
            is_retryable_error,
        )
        .await
    }

    /// Apply `requests` to the presentation in one atomic batch.
    pub async fn batch_update(
        &self,
        presentation_id: &str,
        requests: Vec<Request>,
    ) -> Result<BatchUpdateResponse> {
        let url = self.presentation_url(&format!("{}:batchUpdate", presentation_id))?;
        debug!("POST {} ({} requests)", url, requests.len());

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&BatchUpdateRequest { requests })
            .send()
            .await
            .context("Failed to send batch update to Slides API")?;

        let response = check_status(response).await?;

        response
            .json()
            .await
            .context("Failed to parse batch update response")
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
    Err(Error::Api {
        service: "Slides",
        status,
        body,
    }
    .into())
}
