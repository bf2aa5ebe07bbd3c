//! Turning text runs into replacement operations.
//!
//! The planner resolves both languages up front, translates every distinct
//! (slide, text) pair once and keeps only the pairs whose translation differs
//! from the original. Translations may run concurrently, but the resulting
//! operations are always in document order.

use crate::i18n::{Language, RunMetrics};
use crate::translation::{is_trivial, Translate};
use crate::walker::TextFragment;
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::HashSet;
use tracing::{debug, info};

/// Replace `original_text` with `translated_text` everywhere on one slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementOperation {
    pub slide_id: String,
    pub original_text: String,
    pub translated_text: String,
    pub match_case: bool,
}

impl ReplacementOperation {
    /// Case-sensitive replacement scoped to `slide_id`.
    ///
    /// Returns `None` when the texts are identical: a replacement that
    /// changes nothing is never built.
    pub fn new(slide_id: &str, original_text: &str, translated_text: &str) -> Option<Self> {
        if original_text == translated_text {
            return None;
        }
        Some(Self {
            slide_id: slide_id.to_string(),
            original_text: original_text.to_string(),
            translated_text: translated_text.to_string(),
            match_case: true,
        })
    }
}

/// Plan the replacements for a sequence of text runs.
///
/// Fails before translating anything if either language code is
/// unsupported. Fragments that are trivial after trimming are skipped, and a
/// repeated (slide, text) pair is translated only once since one replacement
/// already covers every occurrence on the slide. At most `concurrency`
/// translations are in flight at a time.
///
/// An empty result means nothing needs to change; deciding whether that is
/// fatal is up to the caller.
pub async fn plan<'a, I, T>(
    fragments: I,
    translator: &T,
    source_code: &str,
    target_code: &str,
    concurrency: usize,
    metrics: &RunMetrics,
) -> Result<Vec<ReplacementOperation>>
where
    I: IntoIterator<Item = TextFragment<'a>>,
    T: Translate + ?Sized,
{
    let source = Language::from_code(source_code).context("Invalid source language")?;
    let target = Language::from_code(target_code).context("Invalid target language")?;

    let mut seen = HashSet::new();
    let pending: Vec<TextFragment<'a>> = fragments
        .into_iter()
        .filter(|fragment| {
            metrics.record_fragment();
            if is_trivial(fragment.text) {
                metrics.record_trivial();
                info!(
                    "Keeping short text on slide {} as is: {:?}",
                    fragment.slide_id, fragment.text
                );
                return false;
            }
            if !seen.insert((fragment.slide_id, fragment.text)) {
                metrics.record_duplicate();
                debug!(
                    "Duplicate text on slide {}: {:?}",
                    fragment.slide_id, fragment.text
                );
                return false;
            }
            true
        })
        .collect();

    info!(
        "Translating {} fragments from {} to {}",
        pending.len(),
        source,
        target
    );

    let translations: Vec<String> = stream::iter(pending.iter())
        .map(|fragment| translator.translate(fragment.text, source, target))
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    let mut operations = Vec::new();
    for (fragment, translated) in pending.iter().zip(&translations) {
        match ReplacementOperation::new(fragment.slide_id, fragment.text, translated) {
            Some(operation) => {
                metrics.record_replacement();
                operations.push(operation);
            }
            None => {
                metrics.record_unchanged();
                debug!(
                    "Unchanged on slide {}: {:?}",
                    fragment.slide_id, fragment.text
                );
            }
        }
    }

    Ok(operations)
}
