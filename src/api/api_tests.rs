#[cfg(test)]
mod router_tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::api::{app_state::AppState, create_router};
    use crate::config::config::AppConfig;
    use crate::observability::AppMetrics;
    use crate::security::auth::JwtAuth;
    use crate::storage::repository::Storage;

    fn app() -> Router {
        let config = AppConfig::development();
        let state = AppState::new(
            &Storage::in_memory(),
            Arc::new(JwtAuth::from_config(&config.security)),
            Arc::new(AppMetrics::new().unwrap()),
        );
        create_router(state, &config)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_quote_requires_date() {
        let (status, body) = get(app(), "/api/quotes").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");

        let (status, _) = get(app(), "/api/quotes?date=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_query_uses_json_error_body() {
        let (status, body) = get(app(), "/api/quotes?date=a&date=b").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_quote_corpus() {
        let (status, body) = get(app(), "/api/quotes/corpus").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["quotes"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_moods_lists_five_labels() {
        let (status, body) = get(app(), "/api/moods").await;
        assert_eq!(status, StatusCode::OK);
        let moods = body.as_array().unwrap();
        assert_eq!(moods.len(), 5);
        assert_eq!(moods[0]["value"], "very_happy");
        assert_eq!(moods[0]["label"], "Very Happy");
    }

    #[tokio::test]
    async fn test_unknown_mood_suggestions() {
        let (status, body) = get(app(), "/api/suggestions/ecstatic").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_MOOD_LABEL");
    }

    #[tokio::test]
    async fn test_therapists_seed_on_first_list() {
        let (status, body) = get(app(), "/api/therapists").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        for uri in [
            "/api/mood",
            "/api/mood/stats",
            "/api/tips",
            "/api/journal",
            "/api/appointments",
        ] {
            let (status, body) = get(app(), uri).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body["code"], "UNAUTHORIZED");
        }
    }

    #[tokio::test]
    async fn test_security_headers_and_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _) = get(app(), "/api/v1/sessions").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
