//! Writing planned replacements back to the presentation.

use crate::error::Error;
use crate::planner::ReplacementOperation;
use crate::slides::{
    BatchUpdateResponse, ReplaceAllTextRequest, Request, SlidesClient, SubstringMatchCriteria,
};
use anyhow::Result;
use tracing::info;

impl ReplacementOperation {
    /// The `replaceAllText` directive for this operation.
    pub fn to_request(&self) -> Request {
        Request::ReplaceAllText(ReplaceAllTextRequest {
            page_object_ids: vec![self.slide_id.clone()],
            replace_text: self.translated_text.clone(),
            contains_text: SubstringMatchCriteria {
                text: self.original_text.clone(),
                match_case: self.match_case,
            },
        })
    }
}

/// Submit all operations to the presentation in a single batch.
///
/// Fails with [`Error::NoOperations`] without contacting the service when
/// there is nothing to apply. The batch is sent once; whether it applies
/// atomically is up to the Slides API.
pub async fn apply(
    slides: &SlidesClient,
    presentation_id: &str,
    operations: &[ReplacementOperation],
) -> Result<BatchUpdateResponse> {
    if operations.is_empty() {
        return Err(Error::NoOperations.into());
    }

    let requests: Vec<Request> = operations.iter().map(ReplacementOperation::to_request).collect();
    info!(
        "Submitting {} replacements to presentation {}",
        requests.len(),
        presentation_id
    );

    let response = slides.batch_update(presentation_id, requests).await?;
    info!(
        "Batch applied: {} replies, {} occurrences changed",
        response.replies.len(),
        response.occurrences_changed()
    );

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn op(slide_id: &str, original: &str, translated: &str) -> ReplacementOperation {
        ReplacementOperation::new(slide_id, original, translated).expect("Texts differ")
    }

    #[test]
    fn test_to_request_scopes_to_slide() {
        let request = op("s7", "Hello\n", "Bonjour\n").to_request();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "replaceAllText": {
                    "pageObjectIds": ["s7"],
                    "replaceText": "Bonjour\n",
                    "containsText": { "text": "Hello\n", "matchCase": true }
                }
            })
        );
    }

    #[tokio::test]
    async fn test_apply_empty_is_no_operations() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = SlidesClient::new(reqwest::Client::new(), &server.uri(), "token");
        let err = apply(&client, "deck-1", &[]).await.unwrap_err();

        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NoOperations)));
    }

    #[tokio::test]
    async fn test_apply_sends_one_batch_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/presentations/deck-1:batchUpdate"))
            .and(body_json(json!({
                "requests": [
                    { "replaceAllText": {
                        "pageObjectIds": ["s1"],
                        "replaceText": "Hallo",
                        "containsText": { "text": "Hello", "matchCase": true }
                    }},
                    { "replaceAllText": {
                        "pageObjectIds": ["s2"],
                        "replaceText": "Welt",
                        "containsText": { "text": "World", "matchCase": true }
                    }}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "presentationId": "deck-1",
                "replies": [
                    { "replaceAllText": { "occurrencesChanged": 3 } },
                    { "replaceAllText": { "occurrencesChanged": 1 } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = SlidesClient::new(reqwest::Client::new(), &server.uri(), "token");
        let response = apply(
            &client,
            "deck-1",
            &[op("s1", "Hello", "Hallo"), op("s2", "World", "Welt")],
        )
        .await
        .expect("Should apply");

        assert_eq!(response.occurrences_changed(), 4);
    }

    #[tokio::test]
    async fn test_apply_propagates_service_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Invalid requests[0]"))
            .expect(1)
            .mount(&server)
            .await;

        let client = SlidesClient::new(reqwest::Client::new(), &server.uri(), "token");
        let err = apply(&client, "deck-1", &[op("s1", "Hello", "Hallo")])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Invalid requests[0]"));
    }
}
