use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 日记条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn new(user_id: &str, title: &str, content: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: title.trim().to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_title() {
        let entry = JournalEntry::new("user_1", "  Morning  ", "Slept well.");
        assert_eq!(entry.title, "Morning");
        assert_eq!(entry.content, "Slept well.");
        assert!(!entry.id.is_empty());
    }
}
