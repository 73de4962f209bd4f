use axum::{
    Json,
    extract::{Extension, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;
use validator::Validate;

use crate::{
    api::{
        app_state::AppState,
        dto::{ListParams, journal_dto::*},
    },
    error::AppError,
    security::auth::Claims,
};

pub async fn create_journal_entry(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CreateJournalRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Creating journal entry for {}", claims.sub);
    request.validate()?;

    let entry = state
        .journal_service
        .create(claims.user_id(), &request.title, &request.content)
        .await?;

    Ok((StatusCode::CREATED, Json(JournalEntryResponse::from(entry))))
}

pub async fn list_journal_entries(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let entries = state
        .journal_service
        .list(claims.user_id(), params.limit)
        .await?;

    let response: Vec<JournalEntryResponse> =
        entries.into_iter().map(JournalEntryResponse::from).collect();
    Ok(Json(response))
}
