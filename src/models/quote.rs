//! Daily quote records and the fixed quote corpus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Candidate quotes for the daily quote, in display order.
pub static QUOTE_CORPUS: [&str; 10] = [
    "Every day is a new beginning. Take a deep breath, smile, and start again.",
    "You are stronger than you think, braver than you feel, and more loved than you know.",
    "Progress, not perfection, is what we should strive for.",
    "Your mental health is just as important as your physical health.",
    "It's okay to not be okay. What matters is that you're trying.",
    "Small steps every day lead to big changes over time.",
    "You have survived 100% of your difficult days so far. You're doing great.",
    "Be patient with yourself. Growth takes time.",
    "Your feelings are valid, and it's okay to feel them.",
    "Every small act of self-care is a victory worth celebrating.",
];

/// The quote chosen for one calendar date.
///
/// `date` is the caller's wall-clock date string, compared byte for byte. A row is
/// written once, on the first lookup for its date, and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyQuote {
    pub date: String,
    pub quote: String,
    pub created_at: DateTime<Utc>,
}

impl DailyQuote {
    pub fn new(date: &str, quote: &str) -> Self {
        Self {
            date: date.to_string(),
            quote: quote.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_corpus_has_ten_distinct_quotes() {
        let unique: HashSet<_> = QUOTE_CORPUS.iter().collect();
        assert_eq!(QUOTE_CORPUS.len(), 10);
        assert_eq!(unique.len(), 10);
    }
}
