//! Journal Routes

use crate::api::handlers::journal_handler::*;
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::app_state::AppState;

/// 创建日记路由器
pub fn create_journal_router() -> Router<AppState> {
    Router::new()
        .route("/journal", post(create_journal_entry))
        .route("/journal", get(list_journal_entries))
}
