use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ambiance::{
    Catalog, Embedder, EmbeddingVector, IndexedCatalog, Recommender, SemanticError,
    SentimentClassifier, SentimentLabel, SentimentResult,
};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use semantic::{SemanticConfig, StubEmbedder};
use server::routes::pages::EMPTY_QUERY_MESSAGE;
use server::{build_router, AppState, ServerConfig};
use tower::ServiceExt;
use tower_sessions::cookie::Key;

/// Stub embeddings, except that any text containing "boom" fails.
struct TestEmbedder(StubEmbedder);

impl Embedder for TestEmbedder {
    fn encode(&self, text: &str) -> Result<EmbeddingVector, SemanticError> {
        if text.contains("boom") {
            return Err(SemanticError::Inference("model exploded".into()));
        }
        self.0.encode(text)
    }

    fn model_name(&self) -> &str {
        "test-stub"
    }
}

struct CountingClassifier {
    calls: AtomicUsize,
    delay: Duration,
}

#[async_trait]
impl SentimentClassifier for CountingClassifier {
    async fn classify(&self, _text: &str) -> SentimentResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        SentimentResult::classified(SentimentLabel::Positive, 0.87)
    }
}

struct TestApp {
    router: Router,
    classifier: Arc<CountingClassifier>,
}

fn test_app() -> TestApp {
    test_app_with(ServerConfig::default().timeout_secs, Duration::ZERO)
}

fn test_app_with(timeout_secs: u64, sentiment_delay: Duration) -> TestApp {
    let semantic_cfg = SemanticConfig {
        mode: "stub".into(),
        stub_dim: 32,
        ..SemanticConfig::default()
    };
    let embedder = Arc::new(TestEmbedder(StubEmbedder::new(&semantic_cfg)));
    let index = IndexedCatalog::build(Catalog::builtin(), embedder.as_ref()).unwrap();
    let classifier = Arc::new(CountingClassifier {
        calls: AtomicUsize::new(0),
        delay: sentiment_delay,
    });
    let recommender = Recommender::new(index, embedder, classifier.clone());

    let config = ServerConfig {
        semantic: semantic_cfg,
        timeout_secs,
        ..ServerConfig::default()
    };
    let state = Arc::new(AppState::new(config, recommender));
    TestApp {
        router: build_router(state, Key::generate()),
        classifier,
    }
}

async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/recommend")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// `name=value` part of the session cookie set on `response`.
fn session_cookie(response: &Response) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie should be set")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

fn assert_redirect_to_search(response: &Response) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/search");
}

#[tokio::test]
async fn landing_page_links_to_search() {
    let app = test_app();
    let response = send(&app.router, get("/", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body = body_text(response).await;
    assert!(body.contains(r#"href="/search""#));
}

#[tokio::test]
async fn search_page_renders_form_without_message() {
    let app = test_app();
    let response = send(&app.router, get("/search", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(r#"action="/recommend""#));
    assert!(body.contains(r#"name="atmosphere""#));
    assert!(!body.contains(EMPTY_QUERY_MESSAGE));
}

#[tokio::test]
async fn empty_atmosphere_redirects_and_flashes_once() {
    let app = test_app();

    let response = send(&app.router, post_form("atmosphere=")).await;
    assert_redirect_to_search(&response);
    let cookie = session_cookie(&response);
    assert_eq!(app.classifier.calls.load(Ordering::SeqCst), 0);

    let first = body_text(send(&app.router, get("/search", Some(&cookie))).await).await;
    assert!(first.contains(EMPTY_QUERY_MESSAGE));

    let second = body_text(send(&app.router, get("/search", Some(&cookie))).await).await;
    assert!(!second.contains(EMPTY_QUERY_MESSAGE));
}

#[tokio::test]
async fn whitespace_missing_and_unparseable_forms_are_empty_input() {
    let app = test_app();

    for request in [
        post_form("atmosphere=+%20%0A%09"),
        post_form("other=value"),
        Request::builder()
            .method("POST")
            .uri("/recommend")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"atmosphere":"quiet"}"#))
            .unwrap(),
    ] {
        let response = send(&app.router, request).await;
        assert_redirect_to_search(&response);
        let cookie = session_cookie(&response);
        let page = body_text(send(&app.router, get("/search", Some(&cookie))).await).await;
        assert!(page.contains(EMPTY_QUERY_MESSAGE));
    }
    assert_eq!(app.classifier.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn recommend_renders_best_match_runners_up_and_sentiment() {
    let app = test_app();
    let response = send(&app.router, post_form("atmosphere=lively+izakaya+with+friends")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let body = body_text(response).await;
    assert!(body.contains("Best match"));
    assert!(body.contains("Runners-up"));
    assert_eq!(body.matches("similarity ").count(), 3);
    assert!(body.contains("POSITIVE"));
    assert!(body.contains("0.87"));
    assert!(body.contains("lively izakaya with friends"));
    assert!(Catalog::builtin()
        .iter()
        .any(|r| body.contains(r.name.as_str())));
    assert_eq!(app.classifier.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn recommend_escapes_user_input() {
    let app = test_app();
    let response = send(
        &app.router,
        post_form("atmosphere=%3Cscript%3Ealert(1)%3C%2Fscript%3E"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!body.contains("<script>alert(1)"));
}

#[tokio::test]
async fn pipeline_failure_redirects_with_search_failed_message() {
    let app = test_app();
    let response = send(&app.router, post_form("atmosphere=boom")).await;
    assert_redirect_to_search(&response);
    let cookie = session_cookie(&response);

    let page = body_text(send(&app.router, get("/search", Some(&cookie))).await).await;
    assert!(page.contains("search failed: "));
    assert!(page.contains("model exploded"));
}

#[tokio::test]
async fn slow_recommendation_redirects_instead_of_timing_out() {
    let app = test_app_with(1, Duration::from_secs(3));
    let response = send(&app.router, post_form("atmosphere=%E9%9D%99%E3%81%8B")).await;
    assert_redirect_to_search(&response);
    let cookie = session_cookie(&response);

    let page = body_text(send(&app.router, get("/search", Some(&cookie))).await).await;
    assert!(page.contains("search failed: "));
    assert!(page.contains("no result within 1s"));
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = test_app();
    let response = send(&app.router, get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "ambiance-server");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn ready_reports_catalog_and_dimension() {
    let app = test_app();
    let response = send(&app.router, get("/ready", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "ready");
    assert_eq!(json["catalog_size"], 7);
    assert_eq!(json["embedding_dimension"], 32);
    assert_eq!(json["embedding_model"], "test-stub");
}

#[tokio::test]
async fn unknown_route_is_html_404() {
    let app = test_app();
    let response = send(&app.router, get("/no/such/page", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
    assert!(body_text(response).await.contains("404 Not Found"));
}

#[tokio::test]
async fn incoming_request_id_is_echoed() {
    let app = test_app();
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let response = send(&app.router, request).await;
    assert_eq!(response.headers()["x-request-id"], "req-123");
}
