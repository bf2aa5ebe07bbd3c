use crate::applier;
use crate::config::Config;
use crate::error::Error;
use crate::i18n::RunMetrics;
use crate::openai::OpenAiClient;
use crate::planner::{self, ReplacementOperation};
use crate::slides::{BatchUpdateResponse, SlidesClient};
use crate::translation::LlmTranslator;
use crate::walker;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// How a successful run ended
#[derive(Debug)]
pub enum Outcome {
    /// The replacements were written to the presentation
    Applied(BatchUpdateResponse),
    /// Dry run: the replacements that would have been written
    Planned(Vec<ReplacementOperation>),
}

/// Translate the configured presentation end to end.
///
/// Reads the presentation, plans the replacements and writes them back in
/// one batch (or only logs them on a dry run). A plan with no replacements
/// is an [`Error::NoOperations`].
pub async fn run(config: &Config, http: reqwest::Client) -> Result<Outcome> {
    let metrics = Arc::new(RunMetrics::new());
    let slides = SlidesClient::from_config(http.clone(), config);
    let translator = LlmTranslator::new(
        OpenAiClient::from_config(http, config),
        &config.openai_model,
        Arc::clone(&metrics),
    );

    info!("OpenAI model is {}", config.openai_model);
    info!(
        "Source language is {} and target language is {}",
        config.source_language, config.target_language
    );

    let presentation = slides.get_presentation(&config.presentation_id).await?;
    info!(
        "Presentation file is |{}| with {} slides",
        presentation.title.as_deref().unwrap_or("<untitled>"),
        presentation.slides.len()
    );

    let operations = planner::plan(
        walker::walk(&presentation),
        &translator,
        config.source_language.code(),
        config.target_language.code(),
        config.concurrency,
        &metrics,
    )
    .await?;

    info!(
        "Run metrics: {}",
        serde_json::to_string(&metrics.report())?
    );

    if operations.is_empty() {
        return Err(Error::NoOperations.into());
    }

    for operation in &operations {
        debug!(
            "Slide {}: {:?} -> {:?}",
            operation.slide_id, operation.original_text, operation.translated_text
        );
    }

    if config.dry_run {
        info!(
            "Dry run: {} replacements planned, presentation left unchanged",
            operations.len()
        );
        return Ok(Outcome::Planned(operations));
    }

    let response = applier::apply(&slides, &config.presentation_id, &operations).await?;
    Ok(Outcome::Applied(response))
}
