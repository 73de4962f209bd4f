//! SurrealDB 存储
//!
//! 每个模型对应一张表，唯一性由记录 ID 保证：
//! `daily_quote:<date>`、`therapist:<id>`、`suggestion:<mood/tip>`。
//! 创建已存在的记录 ID 会失败，冲突时回读确认。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use surrealdb::{
    Surreal,
    engine::any::{Any, connect},
    opt::auth::Root,
};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::config::DatabaseConfig;
use crate::error::{AppError, Result};
use crate::models::{
    Appointment, AppointmentStatus, DailyQuote, JournalEntry, MoodEntry, MoodLabel, Suggestion,
    Therapist,
};
use crate::storage::newest_first;
use crate::storage::repository::{
    AppointmentRepository, InsertOutcome, JournalRepository, MoodRepository, QuoteRepository,
    StoreHealth, SuggestionRepository, TherapistRepository,
};

const MOOD_TABLE: &str = "mood_entry";
const JOURNAL_TABLE: &str = "journal";
const THERAPIST_TABLE: &str = "therapist";
const APPOINTMENT_TABLE: &str = "appointment";
const SUGGESTION_TABLE: &str = "suggestion";
const QUOTE_TABLE: &str = "daily_quote";

/// 唯一创建在双方都未落盘时的重试次数
const CREATE_ATTEMPTS: u32 = 3;

const TRANSITION_STATUS_SQL: &str =
    "UPDATE type::thing($tb, $id) SET status = $to WHERE status = $from RETURN AFTER";

/// SurrealDB 连接
#[derive(Clone)]
pub struct SurrealPool {
    db: Surreal<Any>,
}

impl SurrealPool {
    /// 连接数据库并选择命名空间
    pub async fn new(config: DatabaseConfig) -> std::result::Result<Self, surrealdb::Error> {
        let db: Surreal<Any> = connect(config.url.as_str()).await?;

        // 嵌入式引擎（mem:// / rocksdb://）无需登录
        if !config.username.is_empty() {
            db.signin(Root {
                username: &config.username,
                password: &config.password,
            })
            .await?;
        }

        db.use_ns(config.namespace.as_str())
            .use_db(config.database.as_str())
            .await?;

        info!(url = %config.url, namespace = %config.namespace, "connected to SurrealDB");
        Ok(Self { db })
    }

    /// 获取内部数据库实例
    pub fn inner(&self) -> &Surreal<Any> {
        &self.db
    }
}

// 记录 ID 即主键，存储行中不能再出现 `id` 字段，因此模型经由以下行结构读写。

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MoodRow {
    entry_id: String,
    user_id: String,
    mood: MoodLabel,
    score: i32,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<&MoodEntry> for MoodRow {
    fn from(e: &MoodEntry) -> Self {
        Self {
            entry_id: e.id.clone(),
            user_id: e.user_id.clone(),
            mood: e.mood,
            score: e.score,
            notes: e.notes.clone(),
            created_at: e.created_at,
        }
    }
}

impl From<MoodRow> for MoodEntry {
    fn from(r: MoodRow) -> Self {
        Self {
            id: r.entry_id,
            user_id: r.user_id,
            mood: r.mood,
            score: r.score,
            notes: r.notes,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JournalRow {
    entry_id: String,
    user_id: String,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<&JournalEntry> for JournalRow {
    fn from(e: &JournalEntry) -> Self {
        Self {
            entry_id: e.id.clone(),
            user_id: e.user_id.clone(),
            title: e.title.clone(),
            content: e.content.clone(),
            created_at: e.created_at,
        }
    }
}

impl From<JournalRow> for JournalEntry {
    fn from(r: JournalRow) -> Self {
        Self {
            id: r.entry_id,
            user_id: r.user_id,
            title: r.title,
            content: r.content,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TherapistRow {
    therapist_id: u32,
    name: String,
    specialization: String,
    email: String,
    available_days: Vec<String>,
}

impl From<&Therapist> for TherapistRow {
    fn from(t: &Therapist) -> Self {
        Self {
            therapist_id: t.id,
            name: t.name.clone(),
            specialization: t.specialization.clone(),
            email: t.email.clone(),
            available_days: t.available_days.clone(),
        }
    }
}

impl From<TherapistRow> for Therapist {
    fn from(r: TherapistRow) -> Self {
        Self {
            id: r.therapist_id,
            name: r.name,
            specialization: r.specialization,
            email: r.email,
            available_days: r.available_days,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AppointmentRow {
    appointment_id: String,
    user_id: String,
    therapist_id: u32,
    scheduled_for: String,
    status: AppointmentStatus,
    created_at: DateTime<Utc>,
}

impl From<&Appointment> for AppointmentRow {
    fn from(a: &Appointment) -> Self {
        Self {
            appointment_id: a.id.clone(),
            user_id: a.user_id.clone(),
            therapist_id: a.therapist_id,
            scheduled_for: a.scheduled_for.clone(),
            status: a.status,
            created_at: a.created_at,
        }
    }
}

impl From<AppointmentRow> for Appointment {
    fn from(r: AppointmentRow) -> Self {
        Self {
            id: r.appointment_id,
            user_id: r.user_id,
            therapist_id: r.therapist_id,
            scheduled_for: r.scheduled_for,
            status: r.status,
            created_at: r.created_at,
        }
    }
}

/// SurrealDB 仓储实现
#[derive(Clone)]
pub struct SurrealStore {
    pool: SurrealPool,
}

impl SurrealStore {
    pub fn new(pool: SurrealPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: DatabaseConfig) -> Result<Self> {
        Ok(Self::new(SurrealPool::new(config).await?))
    }

    fn db(&self) -> &Surreal<Any> {
        self.pool.inner()
    }

    /// 以给定记录 ID 创建，ID 已存在时返回 `Conflict`
    ///
    /// 并发创建同一 ID 时，失败方可能收到事务冲突而非“记录已存在”。
    /// 两种情况都以回读为准：读到记录即为 `Conflict`，读不到则重试。
    async fn create_unique<T>(
        &self,
        table: &'static str,
        key: String,
        row: T,
    ) -> Result<InsertOutcome>
    where
        T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let mut attempt = 1;
        loop {
            let created: std::result::Result<Option<T>, surrealdb::Error> = self
                .db()
                .create((table, key.clone()))
                .content(row.clone())
                .await;

            let err = match created {
                Ok(Some(_)) => return Ok(InsertOutcome::Inserted),
                Ok(None) => {
                    return Err(AppError::StorageUnavailable(format!(
                        "create returned no record: {table}:{key}"
                    )));
                }
                Err(err) => err,
            };

            let existing: Option<T> = self.db().select((table, key.clone())).await?;
            if existing.is_some() {
                debug!(table, key = %key, "record already exists");
                return Ok(InsertOutcome::Conflict);
            }
            if attempt >= CREATE_ATTEMPTS {
                return Err(err.into());
            }

            warn!(
                table,
                key = %key,
                attempt,
                error = %err,
                "create failed with no stored record, retrying"
            );
            tokio::time::sleep(Duration::from_millis(5 * u64::from(attempt))).await;
            attempt += 1;
        }
    }

    async fn create_row<T>(&self, table: &'static str, key: String, row: T) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let created: Option<T> = self.db().create((table, key.clone())).content(row).await?;
        created.ok_or_else(|| {
            AppError::StorageUnavailable(format!("create returned no record: {table}:{key}"))
        })
    }

    async fn select_by_user<T>(&self, table: &'static str, user_id: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let sql = format!("SELECT * FROM {table} WHERE user_id = $user_id");
        let rows: Vec<T> = self
            .db()
            .query(sql)
            .bind(("user_id", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(rows)
    }
}

#[async_trait]
impl MoodRepository for SurrealStore {
    async fn insert(&self, entry: &MoodEntry) -> Result<MoodEntry> {
        let row = self
            .create_row(MOOD_TABLE, entry.id.clone(), MoodRow::from(entry))
            .await?;
        Ok(row.into())
    }

    async fn list_by_user(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<MoodEntry>> {
        let rows: Vec<MoodRow> = self.select_by_user(MOOD_TABLE, user_id).await?;
        let entries = rows.into_iter().map(MoodEntry::from).collect();
        Ok(newest_first(entries, |e: &MoodEntry| e.created_at, limit))
    }
}

#[async_trait]
impl JournalRepository for SurrealStore {
    async fn insert(&self, entry: &JournalEntry) -> Result<JournalEntry> {
        let row = self
            .create_row(JOURNAL_TABLE, entry.id.clone(), JournalRow::from(entry))
            .await?;
        Ok(row.into())
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<JournalEntry>> {
        let rows: Vec<JournalRow> = self.select_by_user(JOURNAL_TABLE, user_id).await?;
        let entries = rows.into_iter().map(JournalEntry::from).collect();
        Ok(newest_first(entries, |e: &JournalEntry| e.created_at, limit))
    }
}

#[async_trait]
impl TherapistRepository for SurrealStore {
    async fn insert_if_absent(&self, therapist: &Therapist) -> Result<InsertOutcome> {
        self.create_unique(
            THERAPIST_TABLE,
            therapist.id.to_string(),
            TherapistRow::from(therapist),
        )
        .await
    }

    async fn get_by_id(&self, id: u32) -> Result<Option<Therapist>> {
        let row: Option<TherapistRow> = self.db().select((THERAPIST_TABLE, id.to_string())).await?;
        Ok(row.map(Therapist::from))
    }

    async fn list(&self) -> Result<Vec<Therapist>> {
        let rows: Vec<TherapistRow> = self
            .db()
            .query(format!("SELECT * FROM {THERAPIST_TABLE}"))
            .await?
            .take(0)?;
        let mut therapists: Vec<Therapist> = rows.into_iter().map(Therapist::from).collect();
        therapists.sort_by_key(|t| t.id);
        Ok(therapists)
    }
}

#[async_trait]
impl AppointmentRepository for SurrealStore {
    async fn insert(&self, appointment: &Appointment) -> Result<Appointment> {
        let row = self
            .create_row(
                APPOINTMENT_TABLE,
                appointment.id.clone(),
                AppointmentRow::from(appointment),
            )
            .await?;
        Ok(row.into())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Appointment>> {
        let row: Option<AppointmentRow> =
            self.db().select((APPOINTMENT_TABLE, id.to_string())).await?;
        Ok(row.map(Appointment::from))
    }

    async fn transition_status(
        &self,
        id: &str,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<Option<Appointment>> {
        // 单条 UPDATE 语句，状态条件与写入在同一事务内
        let rows: Vec<AppointmentRow> = self
            .db()
            .query(TRANSITION_STATUS_SQL)
            .bind(("tb", APPOINTMENT_TABLE))
            .bind(("id", id.to_string()))
            .bind(("from", from))
            .bind(("to", to))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next().map(Appointment::from))
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Appointment>> {
        let rows: Vec<AppointmentRow> = self.select_by_user(APPOINTMENT_TABLE, user_id).await?;
        let appointments = rows.into_iter().map(Appointment::from).collect();
        Ok(newest_first(appointments, |a: &Appointment| a.created_at, None))
    }
}

#[async_trait]
impl SuggestionRepository for SurrealStore {
    async fn insert_if_absent(&self, suggestion: &Suggestion) -> Result<InsertOutcome> {
        self.create_unique(SUGGESTION_TABLE, suggestion.key(), suggestion.clone())
            .await
    }

    async fn list_by_mood(&self, mood: MoodLabel) -> Result<Vec<Suggestion>> {
        let mut rows: Vec<Suggestion> = self
            .db()
            .query(format!("SELECT * FROM {SUGGESTION_TABLE} WHERE mood = $mood"))
            .bind(("mood", mood.as_str().to_string()))
            .await?
            .take(0)?;
        rows.sort_by(|a, b| a.tip.cmp(&b.tip));
        Ok(rows)
    }
}

#[async_trait]
impl QuoteRepository for SurrealStore {
    async fn find_by_date(&self, date: &str) -> Result<Option<DailyQuote>> {
        let row: Option<DailyQuote> = self.db().select((QUOTE_TABLE, date.to_string())).await?;
        Ok(row)
    }

    async fn insert_if_absent(&self, quote: &DailyQuote) -> Result<InsertOutcome> {
        self.create_unique(QUOTE_TABLE, quote.date.clone(), quote.clone())
            .await
    }
}

#[async_trait]
impl StoreHealth for SurrealStore {
    async fn ping(&self) -> Result<()> {
        self.db().health().await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "surrealdb"
    }
}
