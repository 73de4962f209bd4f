//! 预约服务
//!
//! 预约只能针对已存在的咨询师；只有预约本人可以取消，且只能取消 `scheduled` 状态的预约。

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::error::{AppError, Result};
use crate::models::{Appointment, AppointmentStatus};
use crate::storage::repository::{AppointmentRepository, TherapistRepository};

/// 预约服务 trait
#[async_trait]
pub trait AppointmentService: Send + Sync {
    /// 预约咨询师
    async fn book(
        &self,
        user_id: &str,
        therapist_id: u32,
        date: &str,
        time: &str,
    ) -> Result<Appointment>;

    /// 用户的预约，最新的在前
    async fn list(&self, user_id: &str) -> Result<Vec<Appointment>>;

    /// 取消预约
    async fn cancel(&self, user_id: &str, appointment_id: &str) -> Result<Appointment>;
}

/// 预约服务实现
pub struct AppointmentServiceImpl {
    appointments: Arc<dyn AppointmentRepository>,
    therapists: Arc<dyn TherapistRepository>,
}

impl AppointmentServiceImpl {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        therapists: Arc<dyn TherapistRepository>,
    ) -> Self {
        Self {
            appointments,
            therapists,
        }
    }
}

#[async_trait]
impl AppointmentService for AppointmentServiceImpl {
    async fn book(
        &self,
        user_id: &str,
        therapist_id: u32,
        date: &str,
        time: &str,
    ) -> Result<Appointment> {
        if date.trim().is_empty() || time.trim().is_empty() {
            return Err(AppError::InvalidInput("date and time are required".to_string()));
        }

        self.therapists
            .get_by_id(therapist_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Therapist not found: {}", therapist_id)))?;

        let appointment = self
            .appointments
            .insert(&Appointment::new(user_id, therapist_id, date, time))
            .await?;
        info!(
            user_id,
            therapist_id,
            appointment_id = %appointment.id,
            scheduled_for = %appointment.scheduled_for,
            "appointment booked"
        );
        Ok(appointment)
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Appointment>> {
        self.appointments.list_by_user(user_id).await
    }

    async fn cancel(&self, user_id: &str, appointment_id: &str) -> Result<Appointment> {
        let appointment = self
            .appointments
            .get_by_id(appointment_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Appointment not found: {}", appointment_id))
            })?;

        if appointment.user_id != user_id {
            return Err(AppError::Authorization(
                "Appointment belongs to another user".to_string(),
            ));
        }
        let not_scheduled =
            || AppError::InvalidInput(format!("Appointment is not scheduled: {}", appointment_id));
        if !appointment.can_cancel() {
            return Err(not_scheduled());
        }

        // 状态可能已被并发请求改变，以存储层的条件更新为准
        let updated = self
            .appointments
            .transition_status(
                appointment_id,
                AppointmentStatus::Scheduled,
                AppointmentStatus::Cancelled,
            )
            .await?
            .ok_or_else(not_scheduled)?;
        info!(user_id, appointment_id, "appointment cancelled");
        Ok(updated)
    }
}

/// 创建预约服务
pub fn create_appointment_service(
    appointments: Arc<dyn AppointmentRepository>,
    therapists: Arc<dyn TherapistRepository>,
) -> Arc<dyn AppointmentService> {
    Arc::new(AppointmentServiceImpl::new(appointments, therapists))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Therapist;
    use crate::storage::memory::MemoryStore;

    async fn service() -> AppointmentServiceImpl {
        let store = Arc::new(MemoryStore::new());
        TherapistRepository::insert_if_absent(
            store.as_ref(),
            &Therapist::new(1, "Dr. Test", "Anxiety", "test@example.com", &["Monday"]),
        )
        .await
        .unwrap();
        AppointmentServiceImpl::new(store.clone(), store)
    }

    #[tokio::test]
    async fn test_book_unknown_therapist() {
        let service = service().await;
        let err = service
            .book("alice", 99, "2025-09-20", "10:00")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(service.list("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_book_and_cancel() {
        let service = service().await;
        let appt = service.book("alice", 1, "2025-09-20", "10:00").await.unwrap();
        assert_eq!(appt.status, AppointmentStatus::Scheduled);
        assert_eq!(appt.scheduled_for, "2025-09-20 10:00");

        let cancelled = service.cancel("alice", &appt.id).await.unwrap();
        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

        // cancelled is terminal
        let err = service.cancel("alice", &appt.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_cancel_requires_owner() {
        let service = service().await;
        let appt = service.book("alice", 1, "2025-09-20", "10:00").await.unwrap();

        let err = service.cancel("mallory", &appt.id).await.unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));

        let err = service.cancel("alice", "no-such-id").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_cancels_succeed_once() {
        let service = Arc::new(service().await);
        let appt = service.book("alice", 1, "2025-09-20", "10:00").await.unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let service = service.clone();
                let id = appt.id.clone();
                tokio::spawn(async move { service.cancel("alice", &id).await })
            })
            .collect();

        let mut cancelled = 0;
        for result in futures_util::future::join_all(handles).await {
            match result.unwrap() {
                Ok(appt) => {
                    assert_eq!(appt.status, AppointmentStatus::Cancelled);
                    cancelled += 1;
                }
                Err(err) => assert!(matches!(err, AppError::InvalidInput(_))),
            }
        }
        assert_eq!(cancelled, 1);
    }

    #[tokio::test]
    async fn test_book_requires_date_and_time() {
        let service = service().await;
        let err = service.book("alice", 1, "", "10:00").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
