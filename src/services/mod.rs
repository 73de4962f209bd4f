//! 服务模块

pub mod appointment;
pub mod catalog;
pub mod journal;
pub mod mood;
pub mod quote;

pub use appointment::{AppointmentService, create_appointment_service};
pub use catalog::{CatalogService, SeedReport, create_catalog_service};
pub use journal::{JournalService, create_journal_service};
pub use mood::{MoodService, PersonalTips, create_mood_service};
pub use quote::{QuoteService, Resolution, ResolutionOutcome, create_quote_service};
