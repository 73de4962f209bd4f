//! 每日名言 DTO

use serde::{Deserialize, Serialize};

/// `GET /quotes` 查询参数
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QuoteParams {
    /// 客户端本地日期，按原样比较
    pub date: Option<String>,
}

/// 每日名言响应
#[derive(Debug, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub quote: String,
}

/// 语料响应
#[derive(Debug, Serialize, Deserialize)]
pub struct CorpusResponse {
    pub quotes: Vec<String>,
}
