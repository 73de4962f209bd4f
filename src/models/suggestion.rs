use serde::{Deserialize, Serialize};

use crate::models::mood::MoodLabel;

/// A tip shown for a given mood
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Suggestion {
    pub mood: MoodLabel,
    pub tip: String,
}

impl Suggestion {
    pub fn new(mood: MoodLabel, tip: &str) -> Self {
        Self {
            mood,
            tip: tip.to_string(),
        }
    }

    /// Stable key identifying a `(mood, tip)` pair
    pub fn key(&self) -> String {
        format!("{}/{}", self.mood.as_str(), self.tip)
    }
}
