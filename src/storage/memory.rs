//! 进程内存储
//!
//! 使用 `DashMap` 保证唯一键的原子插入，列表型数据用 `parking_lot::RwLock` 保护。
//! 数据只在进程生命周期内存在。

use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};
use parking_lot::RwLock;

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

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    moods: RwLock<Vec<MoodEntry>>,
    journals: RwLock<Vec<JournalEntry>>,
    therapists: DashMap<u32, Therapist>,
    appointments: DashMap<String, Appointment>,
    suggestions: DashMap<String, Suggestion>,
    quotes: DashMap<String, DailyQuote>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已解析的日期数量
    pub fn quote_count(&self) -> usize {
        self.quotes.len()
    }
}

#[async_trait]
impl MoodRepository for MemoryStore {
    async fn insert(&self, entry: &MoodEntry) -> Result<MoodEntry> {
        self.moods.write().push(entry.clone());
        Ok(entry.clone())
    }

    async fn list_by_user(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<MoodEntry>> {
        let rows: Vec<MoodEntry> = self
            .moods
            .read()
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(rows, |e| e.created_at, limit))
    }
}

#[async_trait]
impl JournalRepository for MemoryStore {
    async fn insert(&self, entry: &JournalEntry) -> Result<JournalEntry> {
        self.journals.write().push(entry.clone());
        Ok(entry.clone())
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<JournalEntry>> {
        let rows: Vec<JournalEntry> = self
            .journals
            .read()
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(rows, |e| e.created_at, limit))
    }
}

#[async_trait]
impl TherapistRepository for MemoryStore {
    async fn insert_if_absent(&self, therapist: &Therapist) -> Result<InsertOutcome> {
        match self.therapists.entry(therapist.id) {
            Entry::Occupied(_) => Ok(InsertOutcome::Conflict),
            Entry::Vacant(slot) => {
                slot.insert(therapist.clone());
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    async fn get_by_id(&self, id: u32) -> Result<Option<Therapist>> {
        Ok(self.therapists.get(&id).map(|t| t.value().clone()))
    }

    async fn list(&self) -> Result<Vec<Therapist>> {
        let mut rows: Vec<Therapist> = self.therapists.iter().map(|t| t.value().clone()).collect();
        rows.sort_by_key(|t| t.id);
        Ok(rows)
    }
}

#[async_trait]
impl AppointmentRepository for MemoryStore {
    async fn insert(&self, appointment: &Appointment) -> Result<Appointment> {
        match self.appointments.entry(appointment.id.clone()) {
            Entry::Occupied(_) => Err(AppError::StorageUnavailable(format!(
                "duplicate appointment id: {}",
                appointment.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(appointment.clone());
                Ok(appointment.clone())
            }
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Appointment>> {
        Ok(self.appointments.get(id).map(|a| a.value().clone()))
    }

    async fn transition_status(
        &self,
        id: &str,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<Option<Appointment>> {
        // get_mut 持有分片写锁直到返回
        let Some(mut slot) = self.appointments.get_mut(id) else {
            return Ok(None);
        };
        if slot.status != from {
            return Ok(None);
        }
        slot.status = to;
        Ok(Some(slot.clone()))
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Appointment>> {
        let rows: Vec<Appointment> = self
            .appointments
            .iter()
            .filter(|a| a.user_id == user_id)
            .map(|a| a.value().clone())
            .collect();
        Ok(newest_first(rows, |a| a.created_at, None))
    }
}

#[async_trait]
impl SuggestionRepository for MemoryStore {
    async fn insert_if_absent(&self, suggestion: &Suggestion) -> Result<InsertOutcome> {
        match self.suggestions.entry(suggestion.key()) {
            Entry::Occupied(_) => Ok(InsertOutcome::Conflict),
            Entry::Vacant(slot) => {
                slot.insert(suggestion.clone());
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    async fn list_by_mood(&self, mood: MoodLabel) -> Result<Vec<Suggestion>> {
        let mut rows: Vec<Suggestion> = self
            .suggestions
            .iter()
            .filter(|s| s.mood == mood)
            .map(|s| s.value().clone())
            .collect();
        rows.sort_by(|a, b| a.tip.cmp(&b.tip));
        Ok(rows)
    }
}

#[async_trait]
impl QuoteRepository for MemoryStore {
    async fn find_by_date(&self, date: &str) -> Result<Option<DailyQuote>> {
        Ok(self.quotes.get(date).map(|q| q.value().clone()))
    }

    async fn insert_if_absent(&self, quote: &DailyQuote) -> Result<InsertOutcome> {
        // entry() 持有分片写锁，检查与插入是原子的
        match self.quotes.entry(quote.date.clone()) {
            Entry::Occupied(_) => Ok(InsertOutcome::Conflict),
            Entry::Vacant(slot) => {
                slot.insert(quote.clone());
                Ok(InsertOutcome::Inserted)
            }
        }
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_quote_insert_is_unique_per_date() {
        let store = MemoryStore::new();
        let first = DailyQuote::new("2025-01-01", "a");
        let second = DailyQuote::new("2025-01-01", "b");

        assert_eq!(
            QuoteRepository::insert_if_absent(&store, &first).await.unwrap(),
            InsertOutcome::Inserted
        );
        assert_eq!(
            QuoteRepository::insert_if_absent(&store, &second).await.unwrap(),
            InsertOutcome::Conflict
        );

        let stored = store.find_by_date("2025-01-01").await.unwrap().unwrap();
        assert_eq!(stored.quote, "a");
        assert_eq!(store.quote_count(), 1);
    }

    #[tokio::test]
    async fn test_quote_dates_are_exact_strings() {
        let store = MemoryStore::new();
        QuoteRepository::insert_if_absent(&store, &DailyQuote::new("2025-01-01", "a"))
            .await
            .unwrap();
        assert!(store.find_by_date("2025-1-1").await.unwrap().is_none());
        assert!(store.find_by_date("2025-01-01 ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_moods_newest_first_per_user() {
        let store = MemoryStore::new();
        let mut older = MoodEntry::new("alice", MoodLabel::Sad, 2, None);
        older.created_at -= Duration::hours(3);
        let newer = MoodEntry::new("alice", MoodLabel::Happy, 4, None);
        let other = MoodEntry::new("bob", MoodLabel::Neutral, 3, None);

        for entry in [&older, &newer, &other] {
            MoodRepository::insert(&store, entry).await.unwrap();
        }

        let rows = MoodRepository::list_by_user(&store, "alice", None).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, newer.id);
        assert_eq!(rows[1].id, older.id);

        let limited = MoodRepository::list_by_user(&store, "alice", Some(1)).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_suggestions_dedup_and_filter() {
        let store = MemoryStore::new();
        let tip = Suggestion::new(MoodLabel::Sad, "Try some deep breathing exercises");

        assert_eq!(
            SuggestionRepository::insert_if_absent(&store, &tip).await.unwrap(),
            InsertOutcome::Inserted
        );
        assert_eq!(
            SuggestionRepository::insert_if_absent(&store, &tip).await.unwrap(),
            InsertOutcome::Conflict
        );
        assert_eq!(store.list_by_mood(MoodLabel::Sad).await.unwrap().len(), 1);
        assert!(store.list_by_mood(MoodLabel::Happy).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_appointment_transition_requires_current_status() {
        use AppointmentStatus::{Cancelled, Scheduled};

        let store = MemoryStore::new();
        let appt = Appointment::new("alice", 1, "2025-09-20", "10:00");
        AppointmentRepository::insert(&store, &appt).await.unwrap();

        let updated = store
            .transition_status(&appt.id, Scheduled, Cancelled)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, Cancelled);

        // already cancelled
        assert!(
            store
                .transition_status(&appt.id, Scheduled, Cancelled)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            store
                .transition_status("no-such-id", Scheduled, Cancelled)
                .await
                .unwrap()
                .is_none()
        );
    }
}
