use ai_client::Gemini;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use omniscout_common::{Category, GenerationRequest, GenerationResult, Intent, Platform, SamplingParams};
use omniscout_gateway::platform_syntax::syntax_rules;
use omniscout_gateway::testing::{category, MockGenerator};
use omniscout_gateway::{GenerationFailure, QueryGateway, GENERATION_FAILED_MESSAGE};

fn tesla_scan() -> GenerationRequest {
    GenerationRequest::new("tesla.com", [Category::Login, Category::Admin], Platform::Google, false)
        .unwrap()
}

fn two_categories() -> GenerationResult {
    GenerationResult::new(vec![
        category(
            "Login Pages",
            &[
                ("site:tesla.com inurl:login", Intent::Offensive),
                ("site:tesla.com intitle:\"sign in\" -www", Intent::Hybrid),
            ],
        ),
        category(
            "Admin Panels",
            &[("site:tesla.com (inurl:admin OR inurl:dashboard)", Intent::Defensive)],
        ),
    ])
}

#[tokio::test]
async fn target_scan_returns_every_category() {
    let generator = MockGenerator::with_result(&two_categories());
    let gateway = QueryGateway::new(generator);

    let result = gateway.generate(&tesla_scan()).await.unwrap();

    assert_eq!(result.categories().len(), 2);
    assert_eq!(result.categories()[0].category_name, "Login Pages");
    assert_eq!(result.categories()[1].category_name, "Admin Panels");
    assert_eq!(result.total_dorks(), 3);
    assert_eq!(result.categories()[1].dorks[0].intent, Intent::Defensive);
}

#[tokio::test]
async fn fenced_response_with_prose_is_sanitized() {
    let inner = serde_json::to_string(&two_categories()).unwrap();
    let generator = MockGenerator::responding(format!("Sure! ```json\n{inner}\n```"));

    let result = QueryGateway::new(generator).generate(&tesla_scan()).await.unwrap();

    assert_eq!(result, two_categories());
}

#[tokio::test]
async fn empty_response_is_a_generation_error() {
    let gateway = QueryGateway::new(MockGenerator::responding("   \n"));

    let err = gateway.generate(&tesla_scan()).await.unwrap_err();

    assert_eq!(err.to_string(), GENERATION_FAILED_MESSAGE);
    assert!(matches!(err.failure(), GenerationFailure::EmptyResponse));
}

#[tokio::test]
async fn transport_failure_hides_detail_from_message() {
    let gateway = QueryGateway::new(MockGenerator::failing("503 Service Unavailable"));

    let err = gateway.generate(&tesla_scan()).await.unwrap_err();

    assert_eq!(err.to_string(), GENERATION_FAILED_MESSAGE);
    assert!(matches!(err.failure(), GenerationFailure::Transport(_)));
    assert!(err.failure().to_string().contains("503 Service Unavailable"));
}

#[tokio::test]
async fn malformed_json_is_a_parse_failure() {
    let gateway = QueryGateway::new(MockGenerator::responding(
        r#"[{"categoryName": "Login Pages", "dorks": [{"query": "q", "intent": "Neutral"}]}]"#,
    ));

    let err = gateway.generate(&tesla_scan()).await.unwrap_err();

    assert!(matches!(err.failure(), GenerationFailure::Parse(_)));
}

#[tokio::test]
async fn empty_array_is_an_empty_result() {
    let gateway = QueryGateway::new(MockGenerator::responding("[]"));

    let result = gateway.generate(&tesla_scan()).await.unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn generator_receives_rendered_prompt() {
    let sampling = SamplingParams {
        temperature: 0.3,
        top_k: 20,
        top_p: 0.8,
    };
    let gateway = QueryGateway::new(MockGenerator::responding("[]")).with_sampling(sampling);

    let request = GenerationRequest::new("tesla.com", [Category::Code], Platform::GitHub, false).unwrap();
    gateway.generate(&request).await.unwrap();

    let generator = gateway.generator();
    assert_eq!(generator.call_count(), 1);
    let call = &generator.calls()[0];
    assert_eq!(call.sampling, sampling);
    assert_eq!(call.schema["type"], "ARRAY");
    assert!(call.prompt.contains(syntax_rules(Platform::GitHub)));
    assert!(!call.prompt.contains(syntax_rules(Platform::Google)));
    assert!(call.prompt.contains("SCOPE (SELECTED MODULES): Code & Credentials"));
}

#[tokio::test]
async fn smart_mode_with_no_categories_is_accepted() {
    let gateway = QueryGateway::new(MockGenerator::with_result(&two_categories()));
    let request = GenerationRequest::smart("find open cameras", Platform::Shodan).unwrap();

    let result = gateway.generate(&request).await.unwrap();

    assert_eq!(result.total_dorks(), 3);
    let prompt = gateway.generator().last_prompt().unwrap();
    assert!(prompt.contains("USER REQUEST: \"find open cameras\""));
    assert!(!prompt.contains("SELECTED MODULES"));
}

// ---------------------------------------------------------------------------
// End to end against a mocked Gemini endpoint
// ---------------------------------------------------------------------------

fn gemini_response(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn gemini_gateway_end_to_end() {
    let server = MockServer::start().await;
    let body = serde_json::to_string(&two_categories()).unwrap();

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": {
                "topK": 40,
                "responseMimeType": "application/json",
                "responseSchema": {"type": "ARRAY"}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_response(&body)))
        .expect(1)
        .mount(&server)
        .await;

    let gemini = Gemini::new("test-key", "gemini-2.5-flash").with_base_url(server.uri());
    let result = QueryGateway::new(gemini).generate(&tesla_scan()).await.unwrap();

    assert_eq!(result, two_categories());
}

#[tokio::test]
async fn gemini_http_error_maps_to_generation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let gemini = Gemini::new("test-key", "gemini-2.5-flash").with_base_url(server.uri());
    let err = QueryGateway::new(gemini).generate(&tesla_scan()).await.unwrap_err();

    assert_eq!(err.to_string(), GENERATION_FAILED_MESSAGE);
    assert!(err.failure().to_string().contains("500"));
}

#[tokio::test]
async fn gemini_blank_candidate_is_an_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_response("")))
        .mount(&server)
        .await;

    let gemini = Gemini::new("test-key", "gemini-2.5-flash").with_base_url(server.uri());
    let err = QueryGateway::new(gemini).generate(&tesla_scan()).await.unwrap_err();

    assert_eq!(err.to_string(), GENERATION_FAILED_MESSAGE);
    assert!(matches!(err.failure(), GenerationFailure::EmptyResponse));
}

#[tokio::test]
async fn gemini_missing_candidates_is_an_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let gemini = Gemini::new("test-key", "gemini-2.5-flash").with_base_url(server.uri());
    let err = QueryGateway::new(gemini).generate(&tesla_scan()).await.unwrap_err();

    assert!(matches!(err.failure(), GenerationFailure::EmptyResponse));
}
