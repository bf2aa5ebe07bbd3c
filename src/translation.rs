use crate::i18n::{Language, RunMetrics, TranslationValidator};
use crate::openai::{CompletionStatus, OpenAiClient};
use crate::walker::is_noise;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Returned for fragments that are never sent to the model.
pub const TRIVIAL_TRANSLATION: &str = " ";

/// Translates one fragment of slide text.
///
/// Implementations never fail because of what the model said: an incomplete
/// or filtered reply is still returned, with a warning. `Err` is reserved for
/// the service being unreachable or rejecting the request.
#[async_trait]
pub trait Translate: Send + Sync {
    async fn translate(&self, fragment: &str, source: Language, target: Language)
        -> Result<String>;
}

/// True when a fragment is not worth a remote call (trimmed length of two
/// characters or fewer).
pub fn is_trivial(fragment: &str) -> bool {
    is_noise(fragment.trim())
}

/// Build the system prompt fixing the translator persona
fn build_system_prompt(source: Language, target: Language) -> String {
    format!(
        "You are a professional translator translating text from {} to {}. \
         Reply only with the translation of the user message into {}. \
         Do not add any information that is not contained in the original text. \
         Keep all linefeeds exactly where they are.",
        source.name(),
        target.name(),
        target.name()
    )
}

/// [`Translate`] backed by an OpenAI chat model.
#[derive(Debug, Clone)]
pub struct LlmTranslator {
    client: OpenAiClient,
    model: String,
    metrics: Arc<RunMetrics>,
}

impl LlmTranslator {
    pub fn new(client: OpenAiClient, model: &str, metrics: Arc<RunMetrics>) -> Self {
        Self {
            client,
            model: model.to_string(),
            metrics,
        }
    }
}

#[async_trait]
impl Translate for LlmTranslator {
    async fn translate(
        &self,
        fragment: &str,
        source: Language,
        target: Language,
    ) -> Result<String> {
        if is_trivial(fragment) {
            return Ok(TRIVIAL_TRANSLATION.to_string());
        }

        self.metrics.record_api_call();
        let system_prompt = build_system_prompt(source, target);
        // The fragment goes out verbatim, linefeeds included
        let completion = self
            .client
            .complete(&self.model, &system_prompt, fragment)
            .await?;

        match completion.status {
            CompletionStatus::Complete => {}
            CompletionStatus::Truncated => {
                self.metrics.record_incomplete();
                warn!(
                    "Model output may be incomplete due to the token limit: {:?}",
                    fragment
                );
            }
            CompletionStatus::Filtered => {
                self.metrics.record_incomplete();
                warn!(
                    "Model output may be incomplete due to a content filter flag: {:?}",
                    fragment
                );
            }
            CompletionStatus::InProgress => {
                self.metrics.record_incomplete();
                warn!(
                    "Model response still in progress or incomplete: {:?}",
                    fragment
                );
            }
        }

        let Some(translated) = completion.text else {
            warn!("Model returned no text, keeping original: {:?}", fragment);
            return Ok(fragment.to_string());
        };

        let validation = TranslationValidator::validate(fragment, &translated);
        if !validation.is_clean() {
            warn!(
                "Translation warnings for {:?} ({} -> {}): {:?}",
                fragment,
                source.code(),
                target.code(),
                validation.warnings
            );
        }

        debug!("Original: {:?}", fragment);
        debug!("Length: {}", fragment.chars().count());
        debug!("Translation: {:?}", translated);

        Ok(translated)
    }
}
