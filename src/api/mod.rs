//! API 模块
//!
//! 提供 REST API 支持。所有业务路由挂在 `/api` 下，健康检查与指标在根路径。

#[cfg(test)]
mod api_tests;
pub mod app_state;
pub mod dto;
pub mod handlers;
pub mod routes;

use crate::api::app_state::AppState;
use crate::config::config::{AppConfig, SecurityConfig};
use crate::observability::{ObservabilityState, create_observability_router, metrics_middleware};
use crate::security::middleware::{auth_middleware, security_headers_middleware};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub fn create_router(app_state: AppState, config: &AppConfig) -> Router {
    let public = Router::new()
        .merge(routes::quote_routes::create_public_quote_router())
        .merge(routes::catalog_routes::create_public_catalog_router());

    let protected = Router::new()
        .merge(routes::mood_routes::create_mood_router())
        .merge(routes::journal_routes::create_journal_router())
        .merge(routes::appointment_routes::create_appointment_router())
        .route_layer(middleware::from_fn_with_state(
            app_state.authenticator.clone(),
            auth_middleware,
        ));

    let observability = create_observability_router(Arc::new(ObservabilityState::new(
        env!("CARGO_PKG_VERSION").to_string(),
        app_state.metrics.clone(),
        app_state.store_health.clone(),
    )));

    Router::new()
        .nest("/api", public.merge(protected))
        .route_layer(middleware::from_fn_with_state(
            app_state.metrics.clone(),
            metrics_middleware,
        ))
        .with_state(app_state)
        .merge(observability)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(cors_layer(&config.security))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout.max(1),
        )))
        .layer(DefaultBodyLimit::max(config.server.max_request_size))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &SecurityConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    if config.cors_allowed_origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}
