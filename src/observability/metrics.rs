//! Prometheus 指标
//!
//! 指标注册在 `AppMetrics` 自带的 `Registry` 上，而不是全局默认 registry，
//! 这样同一进程内可以构建多个应用实例（测试中即如此）。

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Instant;

use crate::error::{AppError, Result};
use crate::models::MoodLabel;
use crate::services::ResolutionOutcome;

const NAMESPACE: &str = "wellbeing";

/// 应用指标
#[derive(Clone)]
pub struct AppMetrics {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_request_duration: HistogramVec,
    quote_resolutions_total: IntCounterVec,
    mood_entries_total: IntCounterVec,
}

impl AppMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests").namespace(NAMESPACE),
            &["method", "route", "status"],
        )
        .map_err(metrics_error)?;
        let http_request_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .namespace(NAMESPACE),
            &["method", "route"],
        )
        .map_err(metrics_error)?;
        let quote_resolutions_total = IntCounterVec::new(
            Opts::new(
                "quote_resolutions_total",
                "Daily quote lookups by resolution path",
            )
            .namespace(NAMESPACE),
            &["outcome"],
        )
        .map_err(metrics_error)?;
        let mood_entries_total = IntCounterVec::new(
            Opts::new("mood_entries_total", "Mood entries recorded").namespace(NAMESPACE),
            &["mood"],
        )
        .map_err(metrics_error)?;

        registry
            .register(Box::new(http_requests_total.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(http_request_duration.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(quote_resolutions_total.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(mood_entries_total.clone()))
            .map_err(metrics_error)?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration,
            quote_resolutions_total,
            mood_entries_total,
        })
    }

    /// 记录 HTTP 请求
    pub fn record_http_request(&self, method: &str, route: &str, status: u16, seconds: f64) {
        let status = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, route, status.as_str()])
            .inc();
        self.http_request_duration
            .with_label_values(&[method, route])
            .observe(seconds);
    }

    /// 记录名言解析路径
    pub fn record_quote_resolution(&self, outcome: ResolutionOutcome) {
        self.quote_resolutions_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    /// 记录心情
    pub fn record_mood_entry(&self, mood: MoodLabel) {
        self.mood_entries_total
            .with_label_values(&[mood.as_str()])
            .inc();
    }

    /// 生成 Prometheus 文本格式
    pub fn gather(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(metrics_error)?;
        String::from_utf8(buffer).map_err(|e| AppError::Internal(e.to_string()))
    }
}

fn metrics_error(e: prometheus::Error) -> AppError {
    AppError::Internal(format!("metrics error: {}", e))
}

/// 记录请求指标的中间件
pub async fn metrics_middleware(
    State(metrics): State<Arc<AppMetrics>>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let start = Instant::now();
    let response = next.run(req).await;

    metrics.record_http_request(
        &method,
        &route,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}
