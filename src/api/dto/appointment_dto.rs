//! 预约 DTO

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::dto::not_blank;
use crate::models::{Appointment, AppointmentStatus, Therapist};

/// 预约请求
#[derive(Debug, Deserialize, Validate)]
pub struct BookAppointmentRequest {
    #[validate(range(min = 1))]
    pub therapist_id: u32,
    #[validate(length(max = 32), custom(function = "not_blank"))]
    pub date: String,
    #[validate(length(max = 32), custom(function = "not_blank"))]
    pub time: String,
}

/// 预约响应
#[derive(Debug, Serialize, Deserialize)]
pub struct AppointmentResponse {
    pub id: String,
    pub therapist_id: u32,
    pub therapist_name: Option<String>,
    pub scheduled_for: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl AppointmentResponse {
    /// `therapists` 用于补全咨询师姓名
    pub fn new(appointment: Appointment, therapists: &[Therapist]) -> Self {
        let therapist_name = therapists
            .iter()
            .find(|t| t.id == appointment.therapist_id)
            .map(|t| t.name.clone());
        Self {
            id: appointment.id,
            therapist_id: appointment.therapist_id,
            therapist_name,
            scheduled_for: appointment.scheduled_for,
            status: appointment.status,
            created_at: appointment.created_at,
        }
    }
}
