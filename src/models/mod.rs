//! 数据模型模块
//!
//! 定义心情、日记、预约、建议和每日名言的数据结构。

pub mod appointment;
pub mod journal;
pub mod mood;
pub mod quote;
pub mod suggestion;

pub use appointment::{Appointment, AppointmentStatus, Therapist};
pub use journal::JournalEntry;
pub use mood::{DailyScore, MoodEntry, MoodLabel, MoodStats, canonicalize};
pub use quote::{DailyQuote, QUOTE_CORPUS};
pub use suggestion::Suggestion;
