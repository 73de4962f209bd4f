use crate::observability::AppMetrics;
use crate::security::auth::Authenticator;
use crate::services::{
    AppointmentService, CatalogService, JournalService, MoodService, QuoteService,
    create_appointment_service, create_catalog_service, create_journal_service,
    create_mood_service, create_quote_service,
};
use crate::storage::repository::{Storage, StoreHealth};
use std::sync::Arc;

/// Application state containing all shared services and security components
#[derive(Clone)]
pub struct AppState {
    /// Daily quote resolver
    pub quote_service: Arc<dyn QuoteService>,
    /// Mood check-ins, stats and tips
    pub mood_service: Arc<dyn MoodService>,
    /// Journal entries
    pub journal_service: Arc<dyn JournalService>,
    /// Therapist appointments
    pub appointment_service: Arc<dyn AppointmentService>,
    /// Therapists and suggestion seed data
    pub catalog_service: Arc<dyn CatalogService>,
    /// Bearer token validation
    pub authenticator: Arc<dyn Authenticator>,
    /// Prometheus metrics
    pub metrics: Arc<AppMetrics>,
    /// Storage health probe
    pub store_health: Arc<dyn StoreHealth>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("quote_service", &"Arc<dyn QuoteService>")
            .field("mood_service", &"Arc<dyn MoodService>")
            .field("journal_service", &"Arc<dyn JournalService>")
            .field("appointment_service", &"Arc<dyn AppointmentService>")
            .field("catalog_service", &"Arc<dyn CatalogService>")
            .field("authenticator", &self.authenticator.authenticator_type())
            .field("store_backend", &self.store_health.backend())
            .finish()
    }
}

impl AppState {
    /// Wire every service onto one storage backend
    pub fn new(
        storage: &Storage,
        authenticator: Arc<dyn Authenticator>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            quote_service: create_quote_service(storage.quotes.clone()),
            mood_service: create_mood_service(storage.moods.clone(), storage.suggestions.clone()),
            journal_service: create_journal_service(storage.journals.clone()),
            appointment_service: create_appointment_service(
                storage.appointments.clone(),
                storage.therapists.clone(),
            ),
            catalog_service: create_catalog_service(
                storage.therapists.clone(),
                storage.suggestions.clone(),
            ),
            authenticator,
            metrics,
            store_health: storage.health.clone(),
        }
    }
}
