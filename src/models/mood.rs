//! Mood taxonomy and mood entries.
//!
//! `MoodLabel` is the single canonical encoding of a mood. It is what mood entries
//! store and what suggestions are keyed by, so every label coming from a client goes
//! through [`canonicalize`] before it reaches a repository.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Canonical mood token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodLabel {
    VeryHappy,
    Happy,
    Neutral,
    Sad,
    VerySad,
}

impl MoodLabel {
    /// All labels, happiest first
    pub const ALL: [MoodLabel; 5] = [
        MoodLabel::VeryHappy,
        MoodLabel::Happy,
        MoodLabel::Neutral,
        MoodLabel::Sad,
        MoodLabel::VerySad,
    ];

    /// Canonical storage / join token
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodLabel::VeryHappy => "very_happy",
            MoodLabel::Happy => "happy",
            MoodLabel::Neutral => "neutral",
            MoodLabel::Sad => "sad",
            MoodLabel::VerySad => "very_sad",
        }
    }

    /// Human-readable form shown to users
    pub fn display_name(&self) -> &'static str {
        match self {
            MoodLabel::VeryHappy => "Very Happy",
            MoodLabel::Happy => "Happy",
            MoodLabel::Neutral => "Neutral",
            MoodLabel::Sad => "Sad",
            MoodLabel::VerySad => "Very Sad",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            MoodLabel::VeryHappy => "😄",
            MoodLabel::Happy => "😊",
            MoodLabel::Neutral => "😐",
            MoodLabel::Sad => "😔",
            MoodLabel::VerySad => "😢",
        }
    }

    /// Score the mood picker suggests for this label
    pub fn default_score(&self) -> i32 {
        match self {
            MoodLabel::VeryHappy => 5,
            MoodLabel::Happy => 4,
            MoodLabel::Neutral => 3,
            MoodLabel::Sad => 2,
            MoodLabel::VerySad => 1,
        }
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a user-facing mood label onto its canonical token.
///
/// Lower-cases the input and joins whitespace-separated words with `_`, so
/// `"Very Happy"`, `"very  happy"` and `"very_happy"` all yield
/// [`MoodLabel::VeryHappy`]. Anything outside the five known labels is rejected
/// rather than stored verbatim.
pub fn canonicalize(label: &str) -> Result<MoodLabel> {
    let token = label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();

    match token.as_str() {
        "very_happy" => Ok(MoodLabel::VeryHappy),
        "happy" => Ok(MoodLabel::Happy),
        "neutral" => Ok(MoodLabel::Neutral),
        "sad" => Ok(MoodLabel::Sad),
        "very_sad" => Ok(MoodLabel::VerySad),
        _ => Err(AppError::InvalidMoodLabel(label.to_string())),
    }
}

/// Lowest accepted mood score
pub const MIN_SCORE: i32 = 1;
/// Highest accepted mood score
pub const MAX_SCORE: i32 = 10;

/// A single mood check-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: String,
    pub user_id: String,
    pub mood: MoodLabel,
    pub score: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MoodEntry {
    pub fn new(user_id: &str, mood: MoodLabel, score: i32, notes: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            mood,
            score,
            notes: notes.filter(|n| !n.trim().is_empty()),
            created_at: Utc::now(),
        }
    }

    /// Calendar day (UTC) the entry was recorded on
    pub fn day(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

/// One day of the weekly chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyScore {
    pub date: NaiveDate,
    pub score: Option<i32>,
    pub mood: Option<MoodLabel>,
}

/// Dashboard statistics for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodStats {
    pub total_entries: usize,
    pub average_score: f64,
    pub weekly_average: f64,
    pub streak_days: u32,
    pub latest_mood: Option<MoodLabel>,
    pub distribution: BTreeMap<MoodLabel, usize>,
    pub last_7_days: Vec<DailyScore>,
}

/// Longest look-back when counting a streak
const STREAK_WINDOW_DAYS: u64 = 30;

impl MoodStats {
    /// Build stats from a user's entries, newest first.
    pub fn from_entries(entries: &[MoodEntry], today: NaiveDate) -> Self {
        let total_entries = entries.len();
        let average_score = average(entries.iter().map(|e| e.score));

        let last_7_days: Vec<DailyScore> = (0..7u64)
            .rev()
            .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
            .map(|date| {
                // newest first, so this is the latest check-in of the day
                let entry = entries.iter().find(|e| e.day() == date);
                DailyScore {
                    date,
                    score: entry.map(|e| e.score),
                    mood: entry.map(|e| e.mood),
                }
            })
            .collect();
        let weekly_average = average(last_7_days.iter().filter_map(|d| d.score));

        let mut distribution: BTreeMap<MoodLabel, usize> =
            MoodLabel::ALL.iter().map(|label| (*label, 0)).collect();
        for entry in entries {
            *distribution.entry(entry.mood).or_default() += 1;
        }

        Self {
            total_entries,
            average_score,
            weekly_average,
            streak_days: streak(entries, today),
            latest_mood: entries.first().map(|e| e.mood),
            distribution,
            last_7_days,
        }
    }
}

/// Mean rounded to one decimal, 0.0 for no samples
fn average(scores: impl Iterator<Item = i32>) -> f64 {
    let (sum, count) = scores.fold((0i64, 0usize), |(sum, count), s| {
        (sum + i64::from(s), count + 1)
    });
    if count == 0 {
        return 0.0;
    }
    let mean = sum as f64 / count as f64;
    (mean * 10.0).round() / 10.0
}

/// Consecutive days with at least one entry, counting back from today.
///
/// A missing entry for today does not break the streak; the first gap after that
/// does.
fn streak(entries: &[MoodEntry], today: NaiveDate) -> u32 {
    let mut days = 0;
    for offset in 0..STREAK_WINDOW_DAYS {
        let Some(date) = today.checked_sub_days(Days::new(offset)) else {
            break;
        };
        if entries.iter().any(|e| e.day() == date) {
            days += 1;
        } else if offset > 0 {
            break;
        }
    }
    days
}
