//! 仓储 trait
//!
//! 服务层只依赖这些 trait，具体后端见 `memory` 与 `surrealdb`。

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{
    Appointment, AppointmentStatus, DailyQuote, JournalEntry, MoodEntry, MoodLabel, Suggestion,
    Therapist,
};

/// 唯一键插入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// 新行已写入
    Inserted,
    /// 同键的行已存在，本次写入被忽略
    Conflict,
}

/// 心情记录仓储（只追加）
#[async_trait]
pub trait MoodRepository: Send + Sync {
    async fn insert(&self, entry: &MoodEntry) -> Result<MoodEntry>;

    /// 按 `created_at` 倒序列出用户的心情记录
    async fn list_by_user(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<MoodEntry>>;
}

/// 日记仓储
#[async_trait]
pub trait JournalRepository: Send + Sync {
    async fn insert(&self, entry: &JournalEntry) -> Result<JournalEntry>;

    /// 按 `created_at` 倒序列出用户的日记
    async fn list_by_user(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<JournalEntry>>;
}

/// 咨询师仓储
#[async_trait]
pub trait TherapistRepository: Send + Sync {
    async fn insert_if_absent(&self, therapist: &Therapist) -> Result<InsertOutcome>;

    async fn get_by_id(&self, id: u32) -> Result<Option<Therapist>>;

    /// 按 id 升序列出
    async fn list(&self) -> Result<Vec<Therapist>>;
}

/// 预约仓储
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn insert(&self, appointment: &Appointment) -> Result<Appointment>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Appointment>>;

    /// 仅当当前状态为 `from` 时改为 `to`，检查与写入是原子的。
    ///
    /// 记录不存在或状态不符时返回 `None`。
    async fn transition_status(
        &self,
        id: &str,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<Option<Appointment>>;

    /// 按 `created_at` 倒序列出
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Appointment>>;
}

/// 心情建议仓储，以规范化的 `MoodLabel` 为连接键
#[async_trait]
pub trait SuggestionRepository: Send + Sync {
    /// `(mood, tip)` 重复时返回 `Conflict`
    async fn insert_if_absent(&self, suggestion: &Suggestion) -> Result<InsertOutcome>;

    async fn list_by_mood(&self, mood: MoodLabel) -> Result<Vec<Suggestion>>;
}

/// 每日名言仓储
///
/// 实现必须保证 `date` 唯一：并发插入同一日期时只有一个能返回 `Inserted`。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn find_by_date(&self, date: &str) -> Result<Option<DailyQuote>>;

    async fn insert_if_absent(&self, quote: &DailyQuote) -> Result<InsertOutcome>;
}

/// 存储健康检查
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<()>;

    fn backend(&self) -> &'static str;
}

/// 所有仓储的集合，由 `StorageFactory` 创建
#[derive(Clone)]
pub struct Storage {
    pub moods: Arc<dyn MoodRepository>,
    pub journals: Arc<dyn JournalRepository>,
    pub therapists: Arc<dyn TherapistRepository>,
    pub appointments: Arc<dyn AppointmentRepository>,
    pub suggestions: Arc<dyn SuggestionRepository>,
    pub quotes: Arc<dyn QuoteRepository>,
    pub health: Arc<dyn StoreHealth>,
}

impl Storage {
    /// 由一个实现了全部仓储 trait 的后端构造
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: MoodRepository
            + JournalRepository
            + TherapistRepository
            + AppointmentRepository
            + SuggestionRepository
            + QuoteRepository
            + StoreHealth
            + 'static,
    {
        Self {
            moods: backend.clone(),
            journals: backend.clone(),
            therapists: backend.clone(),
            appointments: backend.clone(),
            suggestions: backend.clone(),
            quotes: backend.clone(),
            health: backend,
        }
    }

    /// 进程内存储，主要用于开发与测试
    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(crate::storage::memory::MemoryStore::new()))
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("backend", &self.health.backend())
            .finish()
    }
}
