//! 日记 DTO

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::dto::not_blank;
use crate::models::JournalEntry;

/// 新建日记请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateJournalRequest {
    #[validate(length(max = 200), custom(function = "not_blank"))]
    pub title: String,
    #[validate(length(max = 20000), custom(function = "not_blank"))]
    pub content: String,
}

/// 日记响应
#[derive(Debug, Serialize, Deserialize)]
pub struct JournalEntryResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<JournalEntry> for JournalEntryResponse {
    fn from(entry: JournalEntry) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            content: entry.content,
            created_at: entry.created_at,
        }
    }
}
