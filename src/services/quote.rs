//! 每日名言服务
//!
//! 每个日期第一次被查询时从语料中随机选出一条并持久化，之后对同一日期
//! 永远返回同一条。并发的首次查询通过存储层的日期唯一性收敛：
//! 先尝试插入，冲突则回读已写入的值。

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::models::{DailyQuote, QUOTE_CORPUS};
use crate::storage::repository::{InsertOutcome, QuoteRepository};

/// 解析路径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// 日期已有记录
    Hit,
    /// 本次调用写入了新记录
    Miss,
    /// 另一个调用抢先写入，返回的是对方的值
    Conflict,
}

impl ResolutionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionOutcome::Hit => "hit",
            ResolutionOutcome::Miss => "miss",
            ResolutionOutcome::Conflict => "conflict",
        }
    }
}

/// 解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub quote: String,
    pub outcome: ResolutionOutcome,
}

/// 每日名言服务 trait
#[async_trait]
pub trait QuoteService: Send + Sync {
    /// 解析日期对应的名言，并报告走了哪条路径
    async fn resolve(&self, date: &str) -> Result<Resolution>;

    /// 日期对应的名言
    async fn quote_for_date(&self, date: &str) -> Result<String> {
        Ok(self.resolve(date).await?.quote)
    }

    /// 完整语料
    fn corpus(&self) -> &'static [&'static str] {
        &QUOTE_CORPUS
    }
}

/// 每日名言解析器
pub struct DailyQuoteResolver {
    repository: Arc<dyn QuoteRepository>,
}

impl DailyQuoteResolver {
    pub fn new(repository: Arc<dyn QuoteRepository>) -> Self {
        Self { repository }
    }
}

/// Uniform pick from the corpus
fn pick_quote() -> &'static str {
    QUOTE_CORPUS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(QUOTE_CORPUS[0])
}

#[async_trait]
impl QuoteService for DailyQuoteResolver {
    async fn resolve(&self, date: &str) -> Result<Resolution> {
        if date.trim().is_empty() {
            return Err(AppError::InvalidInput("date is required".into()));
        }

        if let Some(existing) = self.repository.find_by_date(date).await? {
            debug!(date, "daily quote hit");
            return Ok(Resolution {
                quote: existing.quote,
                outcome: ResolutionOutcome::Hit,
            });
        }

        let candidate = DailyQuote::new(date, pick_quote());
        match self.repository.insert_if_absent(&candidate).await? {
            InsertOutcome::Inserted => {
                debug!(date, "daily quote stored");
                Ok(Resolution {
                    quote: candidate.quote,
                    outcome: ResolutionOutcome::Miss,
                })
            }
            InsertOutcome::Conflict => {
                let winner = self.repository.find_by_date(date).await?.ok_or_else(|| {
                    warn!(date, "insert conflicted but no row found on re-read");
                    AppError::StorageUnavailable(format!(
                        "write conflict unresolved for date {date}"
                    ))
                })?;
                debug!(date, "daily quote written concurrently, using stored value");
                Ok(Resolution {
                    quote: winner.quote,
                    outcome: ResolutionOutcome::Conflict,
                })
            }
        }
    }
}

/// 创建每日名言服务
pub fn create_quote_service(repository: Arc<dyn QuoteRepository>) -> Arc<dyn QuoteService> {
    Arc::new(DailyQuoteResolver::new(repository))
}
