//! Therapists and the appointments booked with them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 咨询师
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Therapist {
    pub id: u32,
    pub name: String,
    pub specialization: String,
    pub email: String,
    pub available_days: Vec<String>,
}

impl Therapist {
    pub fn new(id: u32, name: &str, specialization: &str, email: &str, days: &[&str]) -> Self {
        Self {
            id,
            name: name.to_string(),
            specialization: specialization.to_string(),
            email: email.to_string(),
            available_days: days.iter().map(|d| d.to_string()).collect(),
        }
    }
}

/// 预约状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

/// 预约
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub user_id: String,
    pub therapist_id: u32,
    /// `"<date> <time>"` exactly as the client sent it
    pub scheduled_for: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn new(user_id: &str, therapist_id: u32, date: &str, time: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            therapist_id,
            scheduled_for: format!("{} {}", date.trim(), time.trim()),
            status: AppointmentStatus::Scheduled,
            created_at: Utc::now(),
        }
    }

    /// Only scheduled appointments can be cancelled
    pub fn can_cancel(&self) -> bool {
        self.status == AppointmentStatus::Scheduled
    }
}
