//! End-to-end tests driving the router against the in-memory store.

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use wellbeing::api::{app_state::AppState, create_router};
use wellbeing::config::config::AppConfig;
use wellbeing::error::{AppError, Result};
use wellbeing::models::{DailyQuote, QUOTE_CORPUS};
use wellbeing::observability::AppMetrics;
use wellbeing::security::auth::{JwtAuth, JwtTokenGenerator};
use wellbeing::storage::repository::{InsertOutcome, QuoteRepository, Storage};

struct TestApp {
    router: Router,
    tokens: JwtTokenGenerator,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_storage(Storage::in_memory()).await
    }

    /// Same wiring as the binary, catalog seeded
    async fn with_storage(storage: Storage) -> Self {
        let config = AppConfig::development();
        let state = AppState::new(
            &storage,
            Arc::new(JwtAuth::from_config(&config.security)),
            Arc::new(AppMetrics::new().unwrap()),
        );
        state.catalog_service.seed().await.unwrap();
        Self {
            router: create_router(state, &config),
            tokens: JwtTokenGenerator::from_config(&config.security),
        }
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            let token = self.tokens.generate_token(user).unwrap();
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn get(&self, uri: &str, user: Option<&str>) -> (StatusCode, Value) {
        self.send("GET", uri, user, None).await
    }

    async fn post(&self, uri: &str, user: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(user), Some(body)).await
    }
}

#[tokio::test]
async fn test_daily_quote_is_stable_per_date() {
    let app = TestApp::new().await;

    let (status, first) = app.get("/api/quotes?date=2025-01-01", None).await;
    assert_eq!(status, StatusCode::OK);
    let quote = first["quote"].as_str().unwrap().to_string();
    assert!(QUOTE_CORPUS.contains(&quote.as_str()));

    for _ in 0..5 {
        let (_, again) = app.get("/api/quotes?date=2025-01-01", None).await;
        assert_eq!(again["quote"], quote.as_str());
    }
}

#[tokio::test]
async fn test_daily_quote_missing_date() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/quotes", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

struct FailingQuotes;

#[async_trait]
impl QuoteRepository for FailingQuotes {
    async fn find_by_date(&self, _date: &str) -> Result<Option<DailyQuote>> {
        Err(AppError::StorageUnavailable("connection refused".into()))
    }

    async fn insert_if_absent(&self, _quote: &DailyQuote) -> Result<InsertOutcome> {
        Err(AppError::StorageUnavailable("connection refused".into()))
    }
}

#[tokio::test]
async fn test_daily_quote_store_failure_is_500() {
    let mut storage = Storage::in_memory();
    storage.quotes = Arc::new(FailingQuotes);
    let app = TestApp::with_storage(storage).await;

    let (status, body) = app.get("/api/quotes?date=2025-01-01", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "STORAGE_UNAVAILABLE");
    // 不暴露存储细节
    assert!(!body["error"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_display_label_is_stored_canonically_and_joins_tips() {
    let app = TestApp::new().await;
    let (_, before) = app.get("/api/tips", Some("alice")).await;
    assert!(before["mood"].is_null());
    assert!(before["message"].is_string());

    let (status, entry) = app
        .post(
            "/api/mood",
            "alice",
            json!({ "mood": "Very Happy", "score": 9, "notes": "great day" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["mood"], "very_happy");
    assert_eq!(entry["mood_label"], "Very Happy");

    let (_, history) = app.get("/api/mood", Some("alice")).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["mood"], "very_happy");

    let (_, tips) = app.get("/api/tips", Some("alice")).await;
    assert_eq!(tips["mood"], "very_happy");
    assert_eq!(tips["tips"].as_array().unwrap().len(), 2);
    assert!(tips["message"].is_null());
}

#[tokio::test]
async fn test_suggestions_by_display_and_canonical_label() {
    let app = TestApp::new().await;

    let (status, by_display) = app.get("/api/suggestions/Very%20Sad", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, by_token) = app.get("/api/suggestions/very_sad", None).await;
    assert_eq!(by_display, by_token);
    assert_eq!(by_display["tips"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_mood_validation() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post("/api/mood", "alice", json!({ "mood": "ecstatic", "score": 5 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_MOOD_LABEL");

    let (status, _) = app
        .post("/api/mood", "alice", json!({ "mood": "happy", "score": 0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mood_stats_and_isolation() {
    let app = TestApp::new().await;
    for (mood, score) in [("happy", 8), ("sad", 4)] {
        app.post("/api/mood", "alice", json!({ "mood": mood, "score": score }))
            .await;
    }
    app.post("/api/mood", "bob", json!({ "mood": "neutral", "score": 5 }))
        .await;

    let (status, stats) = app.get("/api/mood/stats", Some("alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_entries"], 2);
    assert_eq!(stats["average_score"], 6.0);
    assert_eq!(stats["streak_days"], 1);
    assert_eq!(stats["last_7_days"].as_array().unwrap().len(), 7);

    let (_, bob) = app.get("/api/mood", Some("bob")).await;
    assert_eq!(bob.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            "POST",
            "/api/mood",
            None,
            Some(json!({ "mood": "happy", "score": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/journal")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_journal_flow() {
    let app = TestApp::new().await;

    let (status, entry) = app
        .post(
            "/api/journal",
            "alice",
            json!({ "title": "Morning", "content": "Slept well." }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["title"], "Morning");

    let (status, _) = app
        .post("/api/journal", "alice", json!({ "title": " ", "content": "x" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, entries) = app.get("/api/journal?limit=10", Some("alice")).await;
    assert_eq!(entries.as_array().unwrap().len(), 1);
    let (_, others) = app.get("/api/journal", Some("bob")).await;
    assert!(others.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_limit_is_json_400() {
    let app = TestApp::new().await;

    for uri in ["/api/journal?limit=many", "/api/mood?limit=-1"] {
        let (status, body) = app.get(uri, Some("alice")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["code"], "INVALID_INPUT", "{uri}");
    }
}

#[tokio::test]
async fn test_appointment_booking_and_cancel() {
    let app = TestApp::new().await;
    let (_, therapists) = app.get("/api/therapists", None).await;
    assert_eq!(therapists.as_array().unwrap().len(), 4);

    let (status, body) = app
        .post(
            "/api/appointments",
            "alice",
            json!({ "therapist_id": 42, "date": "2025-09-20", "time": "10:00" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, appt) = app
        .post(
            "/api/appointments",
            "alice",
            json!({ "therapist_id": 1, "date": "2025-09-20", "time": "10:00" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(appt["status"], "scheduled");
    assert_eq!(appt["scheduled_for"], "2025-09-20 10:00");
    assert_eq!(appt["therapist_name"], "Dr. Sarah Johnson");
    let id = appt["id"].as_str().unwrap().to_string();

    let cancel_uri = format!("/api/appointments/{id}/cancel");
    let (status, body) = app.post(&cancel_uri, "mallory", json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, cancelled) = app.post(&cancel_uri, "alice", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    let (status, _) = app.post(&cancel_uri, "alice", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = app.get("/api/appointments", Some("alice")).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_metrics_count_quote_outcomes() {
    let app = TestApp::new().await;
    app.get("/api/quotes?date=2025-03-01", None).await;
    app.get("/api/quotes?date=2025-03-01", None).await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let text = String::from_utf8(
        to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec(),
    )
    .unwrap();
    assert!(text.contains("wellbeing_quote_resolutions_total{outcome=\"miss\"} 1"));
    assert!(text.contains("wellbeing_quote_resolutions_total{outcome=\"hit\"} 1"));
}
