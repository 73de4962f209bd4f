//! DTO 模块
//!
//! 数据传输对象，用于 API 请求和响应的序列化。

pub mod appointment_dto;
pub mod catalog_dto;
pub mod journal_dto;
pub mod mood_dto;
pub mod quote_dto;

pub use appointment_dto::*;
pub use catalog_dto::*;
pub use journal_dto::*;
pub use mood_dto::*;
pub use quote_dto::*;

use serde::Deserialize;
use validator::ValidationError;

/// 列表查询参数
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    /// 最多返回条数
    pub limit: Option<usize>,
}

/// 去掉首尾空白后不能为空
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
