//! 心情服务
//!
//! 记录心情、查询历史与统计，并按最近一次心情给出建议。
//! 所有进入存储或用作连接键的标签都先经过 `canonicalize`。

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::mood::{MAX_SCORE, MIN_SCORE};
use crate::models::{MoodEntry, MoodLabel, MoodStats, Suggestion, canonicalize};
use crate::storage::repository::{MoodRepository, SuggestionRepository};

/// 历史查询的默认条数
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// 基于最近心情的建议
#[derive(Debug, Clone, PartialEq)]
pub struct PersonalTips {
    pub mood: Option<MoodLabel>,
    pub tips: Vec<Suggestion>,
}

/// 心情服务 trait
#[async_trait]
pub trait MoodService: Send + Sync {
    /// 记录一次心情
    async fn record(
        &self,
        user_id: &str,
        label: &str,
        score: i32,
        notes: Option<String>,
    ) -> Result<MoodEntry>;

    /// 最近的心情记录，最新的在前
    async fn history(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<MoodEntry>>;

    /// 统计
    async fn stats(&self, user_id: &str, today: NaiveDate) -> Result<MoodStats>;

    /// 按用户最近一次心情给出建议
    async fn tips_for_user(&self, user_id: &str) -> Result<PersonalTips>;

    /// 某种心情的建议，`label` 可为展示形式或规范形式
    async fn tips_for_mood(&self, label: &str) -> Result<(MoodLabel, Vec<Suggestion>)>;
}

/// 心情服务实现
pub struct MoodServiceImpl {
    moods: Arc<dyn MoodRepository>,
    suggestions: Arc<dyn SuggestionRepository>,
}

impl MoodServiceImpl {
    pub fn new(moods: Arc<dyn MoodRepository>, suggestions: Arc<dyn SuggestionRepository>) -> Self {
        Self { moods, suggestions }
    }
}

#[async_trait]
impl MoodService for MoodServiceImpl {
    async fn record(
        &self,
        user_id: &str,
        label: &str,
        score: i32,
        notes: Option<String>,
    ) -> Result<MoodEntry> {
        let mood = canonicalize(label)?;
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(AppError::InvalidInput(format!(
                "score must be between {MIN_SCORE} and {MAX_SCORE}, got {score}"
            )));
        }

        let entry = MoodEntry::new(user_id, mood, score, notes);
        let saved = self.moods.insert(&entry).await?;
        debug!(user_id, mood = %saved.mood, score, "mood recorded");
        Ok(saved)
    }

    async fn history(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<MoodEntry>> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        self.moods.list_by_user(user_id, Some(limit)).await
    }

    async fn stats(&self, user_id: &str, today: NaiveDate) -> Result<MoodStats> {
        let entries = self.moods.list_by_user(user_id, None).await?;
        Ok(MoodStats::from_entries(&entries, today))
    }

    async fn tips_for_user(&self, user_id: &str) -> Result<PersonalTips> {
        let latest = self.moods.list_by_user(user_id, Some(1)).await?;
        let Some(mood) = latest.first().map(|e| e.mood) else {
            return Ok(PersonalTips {
                mood: None,
                tips: Vec::new(),
            });
        };

        let tips = self.suggestions.list_by_mood(mood).await?;
        Ok(PersonalTips {
            mood: Some(mood),
            tips,
        })
    }

    async fn tips_for_mood(&self, label: &str) -> Result<(MoodLabel, Vec<Suggestion>)> {
        let mood = canonicalize(label)?;
        let tips = self.suggestions.list_by_mood(mood).await?;
        Ok((mood, tips))
    }
}

/// 创建心情服务
pub fn create_mood_service(
    moods: Arc<dyn MoodRepository>,
    suggestions: Arc<dyn SuggestionRepository>,
) -> Arc<dyn MoodService> {
    Arc::new(MoodServiceImpl::new(moods, suggestions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;
    use chrono::Utc;
    use rstest::rstest;

    fn service() -> (Arc<MemoryStore>, MoodServiceImpl) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), MoodServiceImpl::new(store.clone(), store))
    }

    #[tokio::test]
    async fn test_record_stores_canonical_label() {
        let (_, service) = service();
        let entry = service
            .record("alice", "Very Happy", 5, Some("promotion".into()))
            .await
            .unwrap();
        assert_eq!(entry.mood, MoodLabel::VeryHappy);

        let history = service.history("alice", None).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].mood.as_str(), "very_happy");
    }

    #[tokio::test]
    async fn test_record_rejects_unknown_label() {
        let (_, service) = service();
        let err = service.record("alice", "ecstatic", 5, None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidMoodLabel(_)));
        assert!(service.history("alice", None).await.unwrap().is_empty());
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    #[case(11)]
    #[tokio::test]
    async fn test_record_rejects_out_of_range_score(#[case] score: i32) {
        let (_, service) = service();
        let err = service.record("alice", "happy", score, None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_tips_follow_latest_mood() {
        let (store, service) = service();
        store
            .insert_if_absent(&Suggestion::new(MoodLabel::VeryHappy, "Share it"))
            .await
            .unwrap();
        store
            .insert_if_absent(&Suggestion::new(MoodLabel::Sad, "Breathe"))
            .await
            .unwrap();

        let empty = service.tips_for_user("alice").await.unwrap();
        assert_eq!(empty.mood, None);
        assert!(empty.tips.is_empty());

        service.record("alice", "very happy", 9, None).await.unwrap();
        let tips = service.tips_for_user("alice").await.unwrap();
        assert_eq!(tips.mood, Some(MoodLabel::VeryHappy));
        assert_eq!(tips.tips.len(), 1);
        assert_eq!(tips.tips[0].tip, "Share it");
    }

    #[tokio::test]
    async fn test_tips_for_mood_accepts_display_form() {
        let (store, service) = service();
        store
            .insert_if_absent(&Suggestion::new(MoodLabel::VerySad, "Reach out"))
            .await
            .unwrap();

        let (mood, tips) = service.tips_for_mood("Very Sad").await.unwrap();
        assert_eq!(mood, MoodLabel::VerySad);
        assert_eq!(tips.len(), 1);
    }

    #[tokio::test]
    async fn test_stats_for_today() {
        let (_, service) = service();
        service.record("alice", "happy", 8, None).await.unwrap();
        service.record("alice", "sad", 4, None).await.unwrap();

        let stats = service.stats("alice", Utc::now().date_naive()).await.unwrap();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.average_score, 6.0);
        assert_eq!(stats.streak_days, 1);
        assert_eq!(stats.distribution[&MoodLabel::Happy], 1);
    }
}
