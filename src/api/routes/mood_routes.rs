//! Mood Routes

use crate::api::handlers::mood_handler::*;
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::app_state::AppState;

/// 创建心情路由器
pub fn create_mood_router() -> Router<AppState> {
    Router::new()
        .route("/mood", post(create_mood_entry))
        .route("/mood", get(list_mood_entries))
        .route("/mood/stats", get(get_mood_stats))
        .route("/tips", get(get_personal_tips))
}
