//! Catalog Routes
//!
//! 心情选项、建议和咨询师列表。

use crate::api::handlers::catalog_handler::*;
use axum::{Router, routing::get};

use crate::api::app_state::AppState;

/// 创建目录路由器
pub fn create_public_catalog_router() -> Router<AppState> {
    Router::new()
        .route("/moods", get(list_moods))
        .route("/suggestions/:mood", get(get_suggestions))
        .route("/therapists", get(list_therapists))
}
