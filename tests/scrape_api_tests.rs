mod common;

use std::sync::Arc;

use reqwest::StatusCode;
use scrape_summarizer::api::guard::Guard;
use scrape_summarizer::api::routes::create_router;
use scrape_summarizer::prompt::SamplingParams;
use scrape_summarizer::summarizer::Summarizer;
use scrape_summarizer::AppState;
use serde_json::{json, Value};

use common::{serve, StubProvider};

async fn start(provider: Arc<StubProvider>, guard: Guard) -> String {
    let state = AppState::new(Summarizer::new(provider, SamplingParams::default()), guard);
    serve(create_router(state).unwrap()).await
}

async fn post_json(base: &str, body: &Value) -> (StatusCode, Value) {
    let res = reqwest::Client::new()
        .post(format!("{}/scrape", base))
        .json(body)
        .send()
        .await
        .unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn summarizes_article_end_to_end() {
    let provider = StubProvider::replying("* point one\n* point two");
    let base = start(provider.clone(), Guard::default()).await;

    let (status, body) = post_json(
        &base,
        &json!({
            "text": "Article body [1] with   extra   spaces.",
            "title": "T",
            "url": "http://x"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "summary": "* point one\n* point two",
            "meta": { "title": "T", "url": "http://x", "length": 39 }
        })
    );
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn missing_title_and_url_default_to_empty() {
    let provider = StubProvider::replying("Intro line\n* only point");
    let base = start(provider, Guard::default()).await;

    let (status, body) = post_json(&base, &json!({ "text": "Some text" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"], "* only point");
    assert_eq!(body["meta"], json!({ "title": "", "url": "", "length": 9 }));
}

#[tokio::test]
async fn missing_text_is_rejected_without_inference() {
    let provider = StubProvider::replying("* unused");
    let base = start(provider.clone(), Guard::default()).await;

    let (status, body) = post_json(&base, &json!({ "title": "T", "url": "http://x" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(!body["error"].as_str().unwrap().is_empty());
    assert!(body.get("summary").is_none());
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn malformed_json_gets_an_envelope() {
    let provider = StubProvider::replying("* unused");
    let base = start(provider.clone(), Guard::default()).await;

    let res = reqwest::Client::new()
        .post(format!("{}/scrape", base))
        .header("content-type", "application/json")
        .body("{\"text\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn inference_failure_returns_500_envelope() {
    let provider = StubProvider::failing("model crashed: segfault in ggml_compute");
    let base = start(provider.clone(), Guard::default()).await;

    let (status, body) = post_json(&base, &json!({ "text": "Body", "title": "T", "url": "u" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "success": false, "error": "Summary failed", "summary": "" }));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn server_keeps_serving_after_inference_failure() {
    let failing = start(StubProvider::failing("boom"), Guard::default()).await;
    let (status, _) = post_json(&failing, &json!({ "text": "a" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = post_json(&failing, &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn addresses_outside_allow_list_are_forbidden() {
    let provider = StubProvider::replying("* unused");
    let guard = Guard {
        allowed: Some(vec!["10.20.30.40".parse().unwrap()]),
        rate_limit_per_minute: None,
    };
    let base = start(provider.clone(), guard).await;

    let (status, body) = post_json(&base, &json!({ "text": "Body" })).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "Forbidden" }));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn loopback_allow_list_admits_local_client() {
    let guard = Guard {
        allowed: Some(vec!["127.0.0.1".parse().unwrap(), "::1".parse().unwrap()]),
        rate_limit_per_minute: None,
    };
    let base = start(StubProvider::replying("* ok"), guard).await;

    let (status, body) = post_json(&base, &json!({ "text": "Body" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn rate_limit_rejects_excess_requests() {
    let provider = StubProvider::replying("* ok");
    let guard = Guard {
        allowed: None,
        rate_limit_per_minute: Some(2),
    };
    let base = start(provider.clone(), guard).await;

    for _ in 0..2 {
        let (status, _) = post_json(&base, &json!({ "text": "Body" })).await;
        assert_eq!(status, StatusCode::OK);
    }
    let res = reqwest::Client::new()
        .post(format!("{}/scrape", base))
        .json(&json!({ "text": "Body" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn accepts_multi_megabyte_text() {
    let provider = StubProvider::replying("* long read");
    let base = start(provider.clone(), Guard::default()).await;
    let text = "word ".repeat(600_000);

    let (status, body) = post_json(&base, &json!({ "text": text, "title": "Big" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"], "* long read");
    assert_eq!(body["meta"]["length"], 3_000_000);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn wrong_content_type_is_not_reported_as_bad_json() {
    let provider = StubProvider::replying("* unused");
    let base = start(provider.clone(), Guard::default()).await;

    let res = reqwest::Client::new()
        .post(format!("{}/scrape", base))
        .header("content-type", "text/plain")
        .body("{\"text\": \"Body\"}")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Expected a JSON content type"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn responses_carry_cors_headers() {
    let base = start(StubProvider::replying("* ok"), Guard::default()).await;

    let res = reqwest::Client::new()
        .post(format!("{}/scrape", base))
        .header("origin", "chrome-extension://abcdef")
        .json(&json!({ "text": "Body" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
