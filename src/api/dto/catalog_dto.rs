//! 心情选项、建议与咨询师 DTO

use serde::{Deserialize, Serialize};

use crate::models::{MoodLabel, Suggestion};

/// 心情选项
#[derive(Debug, Serialize, Deserialize)]
pub struct MoodOption {
    /// 规范形式，如 `very_happy`
    pub value: MoodLabel,
    /// 展示形式，如 `Very Happy`
    pub label: String,
    pub emoji: String,
    pub default_score: i32,
}

impl From<MoodLabel> for MoodOption {
    fn from(mood: MoodLabel) -> Self {
        Self {
            value: mood,
            label: mood.display_name().to_string(),
            emoji: mood.emoji().to_string(),
            default_score: mood.default_score(),
        }
    }
}

/// 某种心情的建议
#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub mood: MoodLabel,
    pub tips: Vec<String>,
}

impl SuggestionsResponse {
    pub fn new(mood: MoodLabel, suggestions: Vec<Suggestion>) -> Self {
        Self {
            mood,
            tips: suggestions.into_iter().map(|s| s.tip).collect(),
        }
    }
}
