//! 日记服务

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::JournalEntry;
use crate::storage::repository::JournalRepository;

/// 列表默认条数
pub const DEFAULT_JOURNAL_LIMIT: usize = 50;

/// 日记服务 trait
#[async_trait]
pub trait JournalService: Send + Sync {
    /// 新建日记，标题和正文都不能为空
    async fn create(&self, user_id: &str, title: &str, content: &str) -> Result<JournalEntry>;

    /// 最新的在前
    async fn list(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<JournalEntry>>;
}

/// 日记服务实现
pub struct JournalServiceImpl {
    repository: Arc<dyn JournalRepository>,
}

impl JournalServiceImpl {
    pub fn new(repository: Arc<dyn JournalRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl JournalService for JournalServiceImpl {
    async fn create(&self, user_id: &str, title: &str, content: &str) -> Result<JournalEntry> {
        if title.trim().is_empty() || content.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "title and content are required".to_string(),
            ));
        }

        let entry = self
            .repository
            .insert(&JournalEntry::new(user_id, title, content))
            .await?;
        debug!(user_id, entry_id = %entry.id, "journal entry created");
        Ok(entry)
    }

    async fn list(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<JournalEntry>> {
        self.repository
            .list_by_user(user_id, Some(limit.unwrap_or(DEFAULT_JOURNAL_LIMIT)))
            .await
    }
}

/// 创建日记服务
pub fn create_journal_service(repository: Arc<dyn JournalRepository>) -> Arc<dyn JournalService> {
    Arc::new(JournalServiceImpl::new(repository))
}
