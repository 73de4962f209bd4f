//! Appointment Routes

use crate::api::handlers::appointment_handler::*;
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::app_state::AppState;

/// 创建预约路由器
pub fn create_appointment_router() -> Router<AppState> {
    Router::new()
        .route("/appointments", post(book_appointment))
        .route("/appointments", get(list_appointments))
        .route("/appointments/:id/cancel", post(cancel_appointment))
}
