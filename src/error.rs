//! 错误处理模块
//!
//! 定义应用程序的错误类型和错误处理逻辑。

use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// 参数缺失或格式错误
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 无法识别的心情标签
    #[error("Invalid mood label: {0}")]
    InvalidMoodLabel(String),

    /// 认证错误
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// 授权错误
    #[error("Access denied: {0}")]
    Authorization(String),

    /// 资源不存在
    #[error("Not found: {0}")]
    NotFound(String),

    /// 存储层不可用或写冲突未解决
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Serialization(e.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(e.to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::InvalidInput(e.body_text())
    }
}

#[cfg(feature = "surrealdb")]
impl From<surrealdb::Error> for AppError {
    fn from(e: surrealdb::Error) -> Self {
        AppError::StorageUnavailable(e.to_string())
    }
}

impl AppError {
    /// HTTP 状态码与错误代码
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            AppError::InvalidMoodLabel(_) => (StatusCode::BAD_REQUEST, "INVALID_MOOD_LABEL"),
            AppError::Authentication(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Authorization(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::StorageUnavailable(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_UNAVAILABLE")
            }
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            AppError::Serialization(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

/// Axum response implementation for AppError
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(code, error = %self, "request failed");
        } else {
            tracing::debug!(code, error = %self, "request rejected");
        }

        // 5xx 不向客户端暴露存储层细节
        let message = if status.is_server_error() {
            match self {
                AppError::StorageUnavailable(_) => "Storage temporarily unavailable".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse::new(code, &message))).into_response()
    }
}

/// 错误响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误消息
    pub error: String,
    /// 错误代码
    pub code: String,
}

impl ErrorResponse {
    /// 创建新错误响应
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            error: message.to_string(),
            code: code.to_string(),
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::InvalidInput("date".into()).status_and_code(),
            (StatusCode::BAD_REQUEST, "INVALID_INPUT")
        );
        assert_eq!(
            AppError::InvalidMoodLabel("ecstatic".into()).status_and_code().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::StorageUnavailable("down".into()).status_and_code(),
            (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_UNAVAILABLE")
        );
        assert_eq!(
            AppError::Authentication("no token".into()).status_and_code().0,
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_storage_error_hides_details() {
        let response = AppError::StorageUnavailable("connection refused at 10.0.0.3".into())
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
