//! 心情 DTO

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::dto::not_blank;
use crate::models::{MoodEntry, MoodLabel};

/// 记录心情请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMoodRequest {
    /// 展示形式或规范形式均可
    #[validate(length(max = 32), custom(function = "not_blank"))]
    pub mood: String,
    #[validate(range(min = 1, max = 10))]
    pub score: i32,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// 心情记录响应
#[derive(Debug, Serialize, Deserialize)]
pub struct MoodEntryResponse {
    pub id: String,
    pub mood: MoodLabel,
    pub mood_label: String,
    pub score: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<MoodEntry> for MoodEntryResponse {
    fn from(entry: MoodEntry) -> Self {
        Self {
            id: entry.id,
            mood: entry.mood,
            mood_label: entry.mood.display_name().to_string(),
            score: entry.score,
            notes: entry.notes,
            created_at: entry.created_at,
        }
    }
}

/// 个性化建议响应
#[derive(Debug, Serialize, Deserialize)]
pub struct TipsResponse {
    /// 最近一次心情，没有记录时为空
    pub mood: Option<MoodLabel>,
    pub tips: Vec<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_mood_request_validation() {
        let ok = CreateMoodRequest {
            mood: "Very Happy".into(),
            score: 8,
            notes: None,
        };
        assert!(ok.validate().is_ok());

        let blank = CreateMoodRequest {
            mood: "   ".into(),
            score: 8,
            notes: None,
        };
        assert!(blank.validate().is_err());

        let zero = CreateMoodRequest {
            mood: "happy".into(),
            score: 0,
            notes: None,
        };
        assert!(zero.validate().is_err());
    }
}
