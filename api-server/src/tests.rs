//! Router tests against a stub engine

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tower::ServiceExt;

use churn_core::{
    ChurnPredictor, FeatureMatrix, FeatureSchema, FieldValue, InferenceEngine, InferenceError,
    NumericPolicy,
};

use crate::config::Config;
use crate::models::CustomerData;
use crate::{create_router, AppState};

struct FixedEngine(Vec<f64>);

impl InferenceEngine for FixedEngine {
    fn name(&self) -> &str {
        "fixed"
    }

    fn predict(&self, _features: &FeatureMatrix) -> Result<Vec<f64>, InferenceError> {
        Ok(self.0.clone())
    }
}

struct BrokenEngine;

impl InferenceEngine for BrokenEngine {
    fn name(&self) -> &str {
        "broken"
    }

    fn predict(&self, _features: &FeatureMatrix) -> Result<Vec<f64>, InferenceError> {
        Err(InferenceError::Runtime("input shape mismatch".to_string()))
    }
}

fn app(engine: Box<dyn InferenceEngine>) -> Router {
    app_with_config(engine, Config::default())
}

fn app_with_config(engine: Box<dyn InferenceEngine>, config: Config) -> Router {
    let columns = ["tenure", "MonthlyCharges", "TotalCharges", "gender", "Partner"];
    let schema = FeatureSchema::new(columns.iter().map(|s| s.to_string()).collect()).unwrap();
    let encoder = config.predictor_config().encoder;
    let predictor = ChurnPredictor::new(engine, Arc::new(schema), encoder);

    create_router(AppState {
        predictor: Arc::new(predictor),
        config,
    })
}

/// Scores 0 and remembers the encoded tenure of every row it sees
struct RecordingEngine(Arc<Mutex<Vec<f32>>>);

impl InferenceEngine for RecordingEngine {
    fn name(&self) -> &str {
        "recording"
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>, InferenceError> {
        let mut seen = self.0.lock();
        for row in 0..features.nrows() {
            seen.extend(features.get(row, "tenure"));
        }
        Ok(vec![0.0])
    }
}

fn recording() -> (Box<dyn InferenceEngine>, Arc<Mutex<Vec<f32>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    (Box::new(RecordingEngine(Arc::clone(&seen))), seen)
}

fn payload_with(overrides: Value) -> Value {
    let mut payload = serde_json::to_value(CustomerData::default()).unwrap();
    for (key, value) in overrides.as_object().unwrap() {
        payload[key] = value.clone();
    }
    payload
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn form_body(data: &CustomerData) -> String {
    let json = serde_json::to_value(data).unwrap();
    json.as_object()
        .unwrap()
        .iter()
        .map(|(key, value)| {
            let raw = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("{}={}", key, raw.replace(' ', "+"))
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn post_form(data: &CustomerData) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/ui")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form_body(data)))
        .unwrap()
}

#[tokio::test]
async fn test_root_reports_local_mode() {
    let (status, body) = send(app(Box::new(FixedEngine(vec![0.0]))), get("/")).await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({"status": "ok", "mode": "local"}));
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(Box::new(FixedEngine(vec![0.0]))), get("/health")).await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_predict_churn() {
    let payload = serde_json::to_value(CustomerData::default()).unwrap();
    let (status, body) = send(app(Box::new(FixedEngine(vec![1.0]))), post_json("/predict", &payload)).await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({"prediction": "Likely to churn"}));
}

#[tokio::test]
async fn test_predict_no_churn() {
    let payload = serde_json::to_value(CustomerData::default()).unwrap();
    let (_, body) = send(app(Box::new(FixedEngine(vec![0.0]))), post_json("/predict", &payload)).await;

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["prediction"], "Not likely to churn");
}

#[tokio::test]
async fn test_predict_engine_failure_is_an_error_body() {
    let payload = serde_json::to_value(CustomerData::default()).unwrap();
    let (status, body) = send(app(Box::new(BrokenEngine)), post_json("/predict", &payload)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = serde_json::from_slice(&body).unwrap();
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Prediction failed"), "got {}", message);
    assert!(message.contains("input shape mismatch"));
    assert_eq!(body.as_object().unwrap().len(), 1, "only the error key: {}", body);
}

#[tokio::test]
async fn test_predict_missing_field_is_rejected() {
    let mut payload = serde_json::to_value(CustomerData::default()).unwrap();
    payload.as_object_mut().unwrap().remove("Contract");

    let (status, _) = send(app(Box::new(FixedEngine(vec![1.0]))), post_json("/predict", &payload)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_predict_ignores_form_limits() {
    // The JSON endpoint scores whatever it is given
    let data = CustomerData { tenure: FieldValue::Number(500.0), ..Default::default() };
    let payload = serde_json::to_value(data).unwrap();

    let (status, _) = send(app(Box::new(FixedEngine(vec![0.0]))), post_json("/predict", &payload)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_predict_accepts_numeric_text() {
    let (engine, seen) = recording();
    let payload = payload_with(json!({"tenure": "12", "MonthlyCharges": "85.0"}));

    let (status, body) = send(app(engine), post_json("/predict", &payload)).await;
    assert_eq!(status, StatusCode::OK, "{}", String::from_utf8_lossy(&body));
    assert_eq!(seen.lock().as_slice(), &[12.0f32]);
}

#[tokio::test]
async fn test_predict_accepts_integral_float_tenure() {
    let (engine, seen) = recording();
    let payload = payload_with(json!({"tenure": 12.0}));

    let (status, _) = send(app(engine), post_json("/predict", &payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seen.lock().as_slice(), &[12.0f32]);
}

#[tokio::test]
async fn test_predict_lenient_zeroes_bad_numeric_text() {
    let (engine, seen) = recording();
    let payload = payload_with(json!({"tenure": "abc"}));

    let (status, _) = send(app(engine), post_json("/predict", &payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seen.lock().as_slice(), &[0.0f32]);
}

#[tokio::test]
async fn test_predict_strict_rejects_bad_numeric_text() {
    let (engine, seen) = recording();
    let config = Config { numeric_policy: NumericPolicy::Strict, ..Default::default() };
    let payload = payload_with(json!({"tenure": "abc"}));

    let (status, body) = send(app_with_config(engine, config), post_json("/predict", &payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(seen.lock().is_empty());

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["error"].as_str().unwrap().contains("tenure"));
}

#[tokio::test]
async fn test_request_validation_only_logs() {
    let config = Config { validate_requests: true, ..Default::default() };
    let payload = payload_with(json!({"Contract": "Monthly", "Partner": "maybe"}));

    let (status, body) = send(
        app_with_config(Box::new(FixedEngine(vec![1.0])), config),
        post_json("/predict", &payload),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({"prediction": "Likely to churn"}));
}

#[tokio::test]
async fn test_validate_batch() {
    let mut row = serde_json::to_value(CustomerData::default()).unwrap();
    row["customerID"] = json!("0001-A");
    row["SeniorCitizen"] = json!(0);

    let (status, body) = send(app(Box::new(FixedEngine(vec![0.0]))), post_json("/validate", &json!([row]))).await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["total_checks"], 22);
    assert_eq!(body["failed_checks"], json!([]));
}

#[tokio::test]
async fn test_validate_failing_batch_is_still_ok() {
    let (status, body) = send(
        app(Box::new(FixedEngine(vec![0.0]))),
        post_json("/validate", &json!([{"customerID": "x"}])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["success"], false);
    assert!(!body["failed_checks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_validate_rejects_non_array() {
    let (status, body) = send(
        app(Box::new(FixedEngine(vec![0.0]))),
        post_json("/validate", &json!({"customerID": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_model_status() {
    let (status, body) = send(app(Box::new(FixedEngine(vec![0.0]))), get("/api/v1/model")).await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["engine"], "fixed");
    assert_eq!(body["feature_count"], 5);
    assert_eq!(body["inference_count"], 0);
}

#[tokio::test]
async fn test_ui_form() {
    let (status, body) = send(app(Box::new(FixedEngine(vec![0.0]))), get("/ui")).await;
    assert_eq!(status, StatusCode::OK);

    let page = String::from_utf8(body).unwrap();
    assert!(page.contains(r#"<form method="post" action="/ui">"#));
    assert!(page.contains(r#"name="PaymentMethod""#));
}

#[tokio::test]
async fn test_ui_loyal_example() {
    let (status, body) = send(app(Box::new(FixedEngine(vec![0.0]))), get("/ui?example=loyal")).await;
    assert_eq!(status, StatusCode::OK);

    let page = String::from_utf8(body).unwrap();
    assert!(page.contains(r#"<option value="Two year" selected>"#));
    assert!(page.contains(r#"<option value="DSL" selected>"#));
    assert!(page.contains(r#"name="tenure" value="60""#));
}

#[tokio::test]
async fn test_ui_submit_scores_form_numbers() {
    let (engine, seen) = recording();
    let (status, body) = send(app(engine), post_form(&CustomerData::loyal())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seen.lock().as_slice(), &[60.0f32]);

    let page = String::from_utf8(body).unwrap();
    assert!(page.contains(r#"<p id="prediction">Not likely to churn</p>"#));
}

#[tokio::test]
async fn test_ui_submit_shows_label() {
    let (status, body) = send(app(Box::new(FixedEngine(vec![1.0]))), post_form(&CustomerData::default())).await;
    assert_eq!(status, StatusCode::OK);

    let page = String::from_utf8(body).unwrap();
    assert!(page.contains(r#"<p id="prediction">Likely to churn</p>"#));
}

#[tokio::test]
async fn test_ui_submit_enforces_limits() {
    let data = CustomerData { monthly_charges: FieldValue::Number(250.0), ..Default::default() };
    let (status, body) = send(app(Box::new(FixedEngine(vec![1.0]))), post_form(&data)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let page = String::from_utf8(body).unwrap();
    assert!(page.contains(r#"id="error""#));
    assert!(!page.contains(r#"id="prediction""#));
}

#[tokio::test]
async fn test_ui_submit_engine_failure() {
    let (status, body) = send(app(Box::new(BrokenEngine)), post_form(&CustomerData::default())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let page = String::from_utf8(body).unwrap();
    assert!(page.contains("Prediction failed"));
}
