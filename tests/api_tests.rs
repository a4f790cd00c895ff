// tests/api_tests.rs
use actix_web::{test, web, App};
use async_trait::async_trait;
use autoeval::api::{configure_routes, AppState};
use autoeval::client::Evaluator;
use autoeval::config::AppConfig;
use autoeval::errors::{AssessError, Result, VALIDATION_MESSAGE};
use autoeval::models::{EvaluationResult, Submission};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

const BOUNDARY: &str = "autoeval-test-boundary";

/// Replays a fixed answer and remembers what it was asked.
struct ScriptedEvaluator {
    reply: std::result::Result<EvaluationResult, String>,
    calls: AtomicUsize,
    last: Mutex<Option<Submission>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedEvaluator {
    fn scoring(ocr_text: &str, scaled_score: f64) -> Self {
        Self {
            reply: Ok(EvaluationResult {
                ocr_text: ocr_text.to_string(),
                scaled_score,
            }),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
            gate: None,
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            ..Self::scoring("", 0.0)
        }
    }

    fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Evaluator for ScriptedEvaluator {
    async fn evaluate(&self, submission: &Submission) -> Result<EvaluationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(submission.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.reply {
            Ok(result) => Ok(result.clone()),
            Err(message) => Err(AssessError::Service {
                status: 400,
                message: message.clone(),
            }),
        }
    }
}

fn state_with(evaluator: Arc<ScriptedEvaluator>, max_upload_bytes: usize) -> AppState {
    let mut config = AppConfig::from_lookup(|_| None).unwrap();
    config.max_upload_bytes = max_upload_bytes;
    AppState::with_evaluator(config, evaluator)
}

fn set_field(name: &str, value: &str) -> test::TestRequest {
    test::TestRequest::patch()
        .uri("/api/v1/form/field")
        .set_json(json!({ "name": name, "value": value }))
}

fn upload(file_name: &str, bytes: &str) -> test::TestRequest {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
         Content-Type: image/png\r\n\r\n{bytes}\r\n--{b}--\r\n",
        b = BOUNDARY,
        f = file_name,
    );
    test::TestRequest::post()
        .uri("/api/v1/form/file")
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(body)
}

fn submit() -> test::TestRequest {
    test::TestRequest::post().uri("/api/v1/form/submit")
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_rt::test]
async fn health_reports_service() {
    let evaluator = Arc::new(ScriptedEvaluator::scoring("", 0.0));
    let app = app!(state_with(evaluator, 1024));

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/v1/health").to_request(),
    )
    .await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["evaluation_service"], "http://localhost:5000");
}

#[actix_rt::test]
async fn fresh_form_has_defaults() {
    let evaluator = Arc::new(ScriptedEvaluator::scoring("", 0.0));
    let app = app!(state_with(evaluator, 1024));

    let view: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/v1/form").to_request())
            .await;
    assert_eq!(view["question"], "");
    assert_eq!(view["marks"], "10");
    assert_eq!(view["status"], "idle");
    assert_eq!(view["submit"]["label"], "Evaluate Answer");
    assert_eq!(view["submit"]["disabled"], false);
    assert!(view["error"].is_null());
}

#[actix_rt::test]
async fn unknown_field_is_bad_request() {
    let evaluator = Arc::new(ScriptedEvaluator::scoring("", 0.0));
    let app = app!(state_with(evaluator, 1024));

    let resp = test::call_service(&app, set_field("answer", "x").to_request()).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn submit_without_file_is_rejected_locally() {
    let evaluator = Arc::new(ScriptedEvaluator::scoring("42", 8.5));
    let app = app!(state_with(evaluator.clone(), 1024));

    test::call_service(&app, set_field("question", "q").to_request()).await;
    test::call_service(&app, set_field("solution", "s").to_request()).await;

    let view: Value = test::call_and_read_body_json(&app, submit().to_request()).await;
    assert_eq!(view["error"], VALIDATION_MESSAGE);
    assert!(view["result"].is_null());
    assert_eq!(evaluator.calls(), 0);
}

#[actix_rt::test]
async fn successful_submission_renders_result() {
    let evaluator = Arc::new(ScriptedEvaluator::scoring("42", 8.5));
    let app = app!(state_with(evaluator.clone(), 1024));

    test::call_service(&app, set_field("question", "What is 6 x 7?").to_request()).await;
    test::call_service(&app, set_field("solution", "42").to_request()).await;
    let view: Value = test::call_and_read_body_json(&app, upload("answer.png", "PNG").to_request()).await;
    assert_eq!(view["file_name"], "answer.png");

    let view: Value = test::call_and_read_body_json(&app, submit().to_request()).await;
    assert_eq!(view["result"]["extracted_line"], "Extracted Answer: 42");
    assert_eq!(view["result"]["score_line"], "Score: 8.5 / 10");
    assert_eq!(view["status"], "idle");
    assert_eq!(view["submit"]["disabled"], false);
    assert!(view["error"].is_null());

    let sent = evaluator.last.lock().unwrap().clone().unwrap();
    assert_eq!(sent.text, "42");
    assert_eq!(sent.marks.as_str(), "10");
    assert_eq!(sent.file.bytes, b"PNG");
    assert_eq!(sent.file.content_type.as_deref(), Some("image/png"));
}

#[actix_rt::test]
async fn service_failure_then_new_file_clears_error() {
    let evaluator = Arc::new(ScriptedEvaluator::failing("image unreadable"));
    let app = app!(state_with(evaluator, 1024));

    test::call_service(&app, set_field("question", "q").to_request()).await;
    test::call_service(&app, set_field("solution", "s").to_request()).await;
    test::call_service(&app, upload("blurry.png", "X").to_request()).await;

    let view: Value = test::call_and_read_body_json(&app, submit().to_request()).await;
    assert_eq!(view["error"], "image unreadable");
    assert!(view["result"].is_null());
    assert_eq!(view["status"], "idle");

    let view: Value = test::call_and_read_body_json(&app, upload("sharp.png", "Y").to_request()).await;
    assert!(view["error"].is_null());
    assert_eq!(view["file_name"], "sharp.png");
}

#[actix_rt::test]
async fn oversized_upload_keeps_previous_file() {
    let evaluator = Arc::new(ScriptedEvaluator::scoring("", 0.0));
    let app = app!(state_with(evaluator, 4));

    test::call_service(&app, upload("small.png", "ok").to_request()).await;
    let resp = test::call_service(&app, upload("big.png", "way too large").to_request()).await;
    assert_eq!(resp.status(), 413);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Image must be at most 4 bytes");

    let view: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/v1/form").to_request())
            .await;
    assert_eq!(view["file_name"], "small.png");
}

#[actix_rt::test]
async fn submit_while_loading_is_a_no_op() {
    let gate = Arc::new(Notify::new());
    let evaluator = Arc::new(ScriptedEvaluator::scoring("42", 8.5).gated(gate.clone()));
    let app = app!(state_with(evaluator.clone(), 1024));

    test::call_service(&app, set_field("question", "q").to_request()).await;
    test::call_service(&app, set_field("solution", "s").to_request()).await;
    test::call_service(&app, upload("answer.png", "PNG").to_request()).await;

    let first = test::call_and_read_body_json::<_, _, Value>(&app, submit().to_request());
    let second = async {
        let view: Value = test::call_and_read_body_json(&app, submit().to_request()).await;
        // Typing stays possible while the first attempt is outstanding.
        let edited: Value =
            test::call_and_read_body_json(&app, set_field("marks", "5").to_request()).await;
        gate.notify_one();
        (view, edited)
    };

    let (first, (second, edited)) = futures::join!(first, second);

    assert_eq!(second["status"], "loading");
    assert_eq!(second["submit"]["disabled"], true);
    assert_eq!(second["submit"]["label"], "Evaluating...");
    assert_eq!(edited["marks"], "5");

    assert_eq!(first["status"], "idle");
    assert_eq!(first["result"]["score_line"], "Score: 8.5 / 5");
    assert_eq!(evaluator.calls(), 1);
}
