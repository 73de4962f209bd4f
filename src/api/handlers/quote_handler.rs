use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::quote_dto::*},
    error::AppError,
};

pub async fn get_daily_quote(
    State(state): State<AppState>,
    params: Result<Query<QuoteParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let date = params
        .date
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("Date is required".to_string()))?;
    debug!("Resolving daily quote for {}", date);

    let resolution = state.quote_service.resolve(&date).await?;
    state.metrics.record_quote_resolution(resolution.outcome);

    Ok(Json(QuoteResponse {
        quote: resolution.quote,
    }))
}

pub async fn get_quote_corpus(State(state): State<AppState>) -> impl IntoResponse {
    Json(CorpusResponse {
        quotes: state
            .quote_service
            .corpus()
            .iter()
            .map(|q| q.to_string())
            .collect(),
    })
}
