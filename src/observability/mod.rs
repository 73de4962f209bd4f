//! 可观测性模块
//!
//! 提供 Prometheus 指标、结构化日志和健康检查。

pub mod logging;
pub mod metrics;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

use crate::error::Result;
use crate::storage::repository::StoreHealth;

pub use logging::init_tracing;
pub use metrics::{AppMetrics, metrics_middleware};

// ===== Health Check =====

/// 健康检查状态
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: f64,
    pub checks: Vec<HealthCheck>,
}

/// 单个健康检查项
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: String,
    pub message: Option<String>,
    pub latency_ms: Option<u64>,
}

/// 可观测性状态
#[derive(Clone)]
pub struct ObservabilityState {
    pub metrics: Arc<AppMetrics>,
    pub store: Arc<dyn StoreHealth>,
    pub start_time: DateTime<Utc>,
    pub version: String,
}

impl ObservabilityState {
    pub fn new(version: String, metrics: Arc<AppMetrics>, store: Arc<dyn StoreHealth>) -> Self {
        Self {
            metrics,
            store,
            start_time: Utc::now(),
            version,
        }
    }

    /// 获取应用正常运行时间
    pub fn uptime_seconds(&self) -> f64 {
        (Utc::now() - self.start_time).num_seconds() as f64
    }

    /// 检查存储
    pub async fn check_store(&self) -> HealthCheck {
        let start = Instant::now();
        let result = self.store.ping().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(()) => HealthCheck {
                name: format!("storage:{}", self.store.backend()),
                status: "healthy".to_string(),
                message: None,
                latency_ms: Some(latency_ms),
            },
            Err(e) => {
                warn!(error = %e, "storage health check failed");
                HealthCheck {
                    name: format!("storage:{}", self.store.backend()),
                    status: "unhealthy".to_string(),
                    message: Some(e.to_string()),
                    latency_ms: Some(latency_ms),
                }
            }
        }
    }
}

// ===== Health Check Handlers =====

/// 获取完整健康状态
pub async fn health_check(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    let checks = vec![state.check_store().await];
    let all_healthy = checks.iter().all(|c| c.status == "healthy");

    let health_status = HealthStatus {
        status: if all_healthy {
            "healthy".to_string()
        } else {
            "unhealthy".to_string()
        },
        timestamp: Utc::now().to_rfc3339(),
        version: state.version.clone(),
        uptime_seconds: state.uptime_seconds(),
        checks,
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(health_status))
}

/// 简单存活检查
pub async fn liveness() -> impl IntoResponse {
    "OK"
}

/// 就绪检查（检查存储）
pub async fn readiness(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    if state.store.ping().await.is_ok() {
        (StatusCode::OK, "Ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Not Ready")
    }
}

/// Prometheus 指标端点
pub async fn metrics(State(state): State<Arc<ObservabilityState>>) -> Result<Response> {
    let output = state.metrics.gather()?;
    Ok((
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4")],
        output,
    )
        .into_response())
}

/// 版本信息端点
pub async fn version(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": state.version,
        "uptime_seconds": state.uptime_seconds(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// 创建可观测性路由
pub fn create_observability_router(state: Arc<ObservabilityState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        .route("/metrics", get(metrics))
        .route("/version", get(version))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::storage::memory::MemoryStore;
    use async_trait::async_trait;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    struct DownStore;

    #[async_trait]
    impl StoreHealth for DownStore {
        async fn ping(&self) -> Result<()> {
            Err(AppError::StorageUnavailable("connection refused".into()))
        }

        fn backend(&self) -> &'static str {
            "down"
        }
    }

    fn router(store: Arc<dyn StoreHealth>) -> Router {
        let metrics = Arc::new(AppMetrics::new().unwrap());
        create_observability_router(Arc::new(ObservabilityState::new(
            "0.1.0".into(),
            metrics,
            store,
        )))
    }

    async fn get_status(app: Router, uri: &str) -> StatusCode {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = router(Arc::new(MemoryStore::new()));
        assert_eq!(get_status(app.clone(), "/health").await, StatusCode::OK);
        assert_eq!(get_status(app.clone(), "/health/live").await, StatusCode::OK);
        assert_eq!(get_status(app.clone(), "/health/ready").await, StatusCode::OK);
        assert_eq!(get_status(app.clone(), "/metrics").await, StatusCode::OK);
        assert_eq!(get_status(app, "/version").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unhealthy_store() {
        let app = router(Arc::new(DownStore));
        assert_eq!(
            get_status(app.clone(), "/health").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(app.clone(), "/health/ready").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(get_status(app, "/health/live").await, StatusCode::OK);
    }
}
