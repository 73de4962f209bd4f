//! 目录服务
//!
//! 咨询师与心情建议的默认数据。种子数据重复写入时忽略冲突，可在每次启动时执行。

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::error::Result;
use crate::models::{MoodLabel, Suggestion, Therapist};
use crate::storage::repository::{InsertOutcome, SuggestionRepository, TherapistRepository};

/// 默认咨询师
pub fn default_therapists() -> Vec<Therapist> {
    vec![
        Therapist::new(
            1,
            "Dr. Sarah Johnson",
            "Anxiety & Depression",
            "sarah.johnson@wellbeing.com",
            &["Monday", "Wednesday", "Friday"],
        ),
        Therapist::new(
            2,
            "Dr. Michael Chen",
            "Trauma & PTSD",
            "michael.chen@wellbeing.com",
            &["Tuesday", "Thursday", "Saturday"],
        ),
        Therapist::new(
            3,
            "Dr. Emily Rodriguez",
            "Relationship & Family Therapy",
            "emily.rodriguez@wellbeing.com",
            &["Monday", "Tuesday", "Thursday", "Friday"],
        ),
        Therapist::new(
            4,
            "Dr. James Wilson",
            "Addiction & Recovery",
            "james.wilson@wellbeing.com",
            &["Monday", "Wednesday", "Thursday", "Saturday"],
        ),
    ]
}

/// 默认建议，每种心情两条
pub fn default_suggestions() -> Vec<Suggestion> {
    [
        (MoodLabel::VeryHappy, "Share your happiness with others - it's contagious!"),
        (MoodLabel::VeryHappy, "Take a moment to reflect on what brought you joy today"),
        (MoodLabel::Happy, "Keep up the positive momentum with some light exercise"),
        (MoodLabel::Happy, "Connect with a friend or family member"),
        (MoodLabel::Neutral, "Try some gentle movement like stretching or walking"),
        (MoodLabel::Neutral, "Practice mindfulness or meditation for 5-10 minutes"),
        (MoodLabel::Sad, "Be gentle with yourself - it's okay to feel sad sometimes"),
        (MoodLabel::Sad, "Try some deep breathing exercises"),
        (MoodLabel::VerySad, "Remember that you're not alone in feeling this way"),
        (MoodLabel::VerySad, "Consider speaking with a mental health professional"),
    ]
    .into_iter()
    .map(|(mood, tip)| Suggestion::new(mood, tip))
    .collect()
}

/// 种子写入统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub therapists_inserted: usize,
    pub suggestions_inserted: usize,
}

/// 目录服务 trait
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// 写入默认咨询师与建议
    async fn seed(&self) -> Result<SeedReport>;

    /// 咨询师列表，表为空时先写入默认数据
    async fn therapists(&self) -> Result<Vec<Therapist>>;
}

/// 目录服务实现
pub struct CatalogServiceImpl {
    therapists: Arc<dyn TherapistRepository>,
    suggestions: Arc<dyn SuggestionRepository>,
}

impl CatalogServiceImpl {
    pub fn new(
        therapists: Arc<dyn TherapistRepository>,
        suggestions: Arc<dyn SuggestionRepository>,
    ) -> Self {
        Self {
            therapists,
            suggestions,
        }
    }

    async fn seed_therapists(&self) -> Result<usize> {
        let mut inserted = 0;
        for therapist in default_therapists() {
            if self.therapists.insert_if_absent(&therapist).await? == InsertOutcome::Inserted {
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn seed(&self) -> Result<SeedReport> {
        let therapists_inserted = self.seed_therapists().await?;

        let mut suggestions_inserted = 0;
        for suggestion in default_suggestions() {
            if self.suggestions.insert_if_absent(&suggestion).await? == InsertOutcome::Inserted {
                suggestions_inserted += 1;
            }
        }

        let report = SeedReport {
            therapists_inserted,
            suggestions_inserted,
        };
        info!(
            therapists = report.therapists_inserted,
            suggestions = report.suggestions_inserted,
            "catalog seeded"
        );
        Ok(report)
    }

    async fn therapists(&self) -> Result<Vec<Therapist>> {
        let existing = self.therapists.list().await?;
        if !existing.is_empty() {
            return Ok(existing);
        }

        self.seed_therapists().await?;
        self.therapists.list().await
    }
}

/// 创建目录服务
pub fn create_catalog_service(
    therapists: Arc<dyn TherapistRepository>,
    suggestions: Arc<dyn SuggestionRepository>,
) -> Arc<dyn CatalogService> {
    Arc::new(CatalogServiceImpl::new(therapists, suggestions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;

    fn service() -> (Arc<MemoryStore>, CatalogServiceImpl) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), CatalogServiceImpl::new(store.clone(), store))
    }

    #[test]
    fn test_defaults_cover_every_mood() {
        let suggestions = default_suggestions();
        assert_eq!(suggestions.len(), 10);
        for mood in MoodLabel::ALL {
            assert_eq!(suggestions.iter().filter(|s| s.mood == mood).count(), 2);
        }
        assert_eq!(default_therapists().len(), 4);
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let (store, service) = service();
        let first = service.seed().await.unwrap();
        assert_eq!(first.therapists_inserted, 4);
        assert_eq!(first.suggestions_inserted, 10);

        let second = service.seed().await.unwrap();
        assert_eq!(second, SeedReport::default());
        assert_eq!(store.list_by_mood(MoodLabel::Neutral).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_therapists_seeds_empty_table() {
        let (_, service) = service();
        let therapists = service.therapists().await.unwrap();
        assert_eq!(therapists.len(), 4);
        assert_eq!(therapists[0].name, "Dr. Sarah Johnson");
        assert_eq!(therapists[3].id, 4);
    }
}
