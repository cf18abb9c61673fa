use std::time::Duration;

use reqwest::Client;
use stroyhelper::ai::{AiAnswer, AiConfig, AiGateway};
use wiremock::{
    matchers::{body_string_contains, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn gateway(server: &MockServer) -> AiGateway {
    let mut config = AiConfig::new("hf-token");
    config.api_url = server.uri();
    config.models = vec!["first/model".into(), "second/model".into()];
    config.backoff_base = Duration::ZERO;
    let client = Client::builder().no_proxy().build().unwrap();
    AiGateway::with_client(client, config)
}

fn generated(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "generated_text": text }]))
}

#[tokio::test]
async fn answers_from_first_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/first/model"))
        .and(header("authorization", "Bearer hf-token"))
        .and(body_string_contains("Сколько сохнет стяжка?"))
        .respond_with(generated("  Около 28 дней. "))
        .expect(1)
        .mount(&server)
        .await;

    let answer = gateway(&server).ask("Сколько сохнет стяжка?").await;
    assert_eq!(answer, AiAnswer::Success("Около 28 дней.".into()));
    server.verify().await;
}

#[tokio::test]
async fn strips_echoed_prompt() {
    let server = MockServer::start().await;
    let prompt = stroyhelper::ai::prompts::build_prompt("Чем грунтовать?");
    Mock::given(method("POST"))
        .and(path("/first/model"))
        .respond_with(generated(&format!("{prompt} Акриловой грунтовкой.")))
        .mount(&server)
        .await;

    let answer = gateway(&server).ask("Чем грунтовать?").await;
    assert_eq!(answer, AiAnswer::Success("Акриловой грунтовкой.".into()));
}

#[tokio::test]
async fn falls_back_to_second_model_on_503() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/first/model"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Model is overloaded"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/second/model"))
        .respond_with(generated("Запасной ответ"))
        .expect(1)
        .mount(&server)
        .await;

    let answer = gateway(&server).ask("Вопрос").await;
    assert_eq!(answer, AiAnswer::Success("Запасной ответ".into()));
    server.verify().await;
}

#[tokio::test]
async fn overloaded_error_body_counts_as_overload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/first/model"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "error": "Model first/model is currently loading" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/second/model"))
        .respond_with(generated("Готово"))
        .expect(1)
        .mount(&server)
        .await;

    let answer = gateway(&server).ask("Вопрос").await;
    assert_eq!(answer, AiAnswer::Success("Готово".into()));
    server.verify().await;
}

#[tokio::test]
async fn exhausted_after_bounded_retries() {
    let server = MockServer::start().await;
    // one pass over both models, then three retries of the first
    Mock::given(method("POST"))
        .and(path("/first/model"))
        .respond_with(ResponseTemplate::new(503))
        .expect(4)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/second/model"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let answer = gateway(&server).ask("Вопрос").await;
    assert_eq!(answer, AiAnswer::Exhausted);
    server.verify().await;
}

#[tokio::test]
async fn other_errors_fail_without_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/first/model"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/second/model"))
        .respond_with(generated("не должен вызываться"))
        .expect(0)
        .mount(&server)
        .await;

    let answer = gateway(&server).ask("Вопрос").await;
    assert!(matches!(answer, AiAnswer::Failed(_)));
    server.verify().await;
}

#[tokio::test]
async fn long_answers_are_truncated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/first/model"))
        .respond_with(generated(&"я".repeat(5000)))
        .mount(&server)
        .await;

    let AiAnswer::Success(text) = gateway(&server).ask("Вопрос").await else {
        panic!("expected an answer");
    };
    assert_eq!(text.chars().count(), 3501);
    assert!(text.ends_with('…'));
}
