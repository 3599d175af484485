//! `LlmClassifier` against a wiremock chat-completions endpoint.

use std::time::Duration;

use newswatch_pipeline::{FetchError, LlmClassifier, TextClassifier};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn classifier(server: &MockServer) -> LlmClassifier {
    LlmClassifier::new(
        &format!("{}/v1", server.uri()),
        "llm-key",
        "test-model",
        Duration::from_secs(5),
    )
    .expect("classifier should build")
}

fn answer(content: &str) -> serde_json::Value {
    json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
}

#[tokio::test]
async fn sends_prompt_and_parses_yes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer llm-key"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "max_tokens": 10,
            "messages": [
                { "role": "system", "content": "You are a helpful assistant." },
                {
                    "role": "user",
                    "content": "Determine if the following text is an article or not:\n\nGrain exports grew.\n\nAnswer with 'Yes' for article and 'No' for non-article."
                }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer(" Yes. ")))
        .expect(1)
        .mount(&server)
        .await;

    let verdict = classifier(&server)
        .is_article("Grain exports grew.")
        .await
        .expect("call should succeed");
    assert_eq!(verdict, Some(true));
}

#[tokio::test]
async fn non_affirmative_answer_is_negative() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer("No")))
        .mount(&server)
        .await;

    let verdict = classifier(&server).is_article("Sign in").await.unwrap();
    assert_eq!(verdict, Some(false));
}

#[tokio::test]
async fn error_status_is_a_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = classifier(&server).is_article("text").await.unwrap_err();
    assert!(
        matches!(err, FetchError::UnexpectedStatus { status: 429, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn missing_choices_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = classifier(&server).is_article("text").await.unwrap_err();
    assert!(matches!(err, FetchError::Malformed(_)), "got: {err:?}");
}
