use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::catalog_dto::*},
    error::AppError,
    models::MoodLabel,
};

pub async fn list_moods() -> impl IntoResponse {
    let options: Vec<MoodOption> = MoodLabel::ALL.into_iter().map(MoodOption::from).collect();
    Json(options)
}

pub async fn get_suggestions(
    State(state): State<AppState>,
    Path(mood): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Listing suggestions for mood: {}", mood);

    let (mood, suggestions) = state.mood_service.tips_for_mood(&mood).await?;
    Ok(Json(SuggestionsResponse::new(mood, suggestions)))
}

pub async fn list_therapists(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let therapists = state.catalog_service.therapists().await?;
    Ok(Json(therapists))
}
