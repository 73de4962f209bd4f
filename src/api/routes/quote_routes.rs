//! Quote Routes

use crate::api::handlers::quote_handler::*;
use axum::{Router, routing::get};

use crate::api::app_state::AppState;

/// 创建每日名言路由器
pub fn create_public_quote_router() -> Router<AppState> {
    Router::new()
        .route("/quotes", get(get_daily_quote))
        .route("/quotes/corpus", get(get_quote_corpus))
}
