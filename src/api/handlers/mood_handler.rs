use axum::{
    Json,
    extract::{Extension, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::debug;
use validator::Validate;

use crate::{
    api::{
        app_state::AppState,
        dto::{ListParams, mood_dto::*},
    },
    error::AppError,
    security::auth::Claims,
};

/// 没有心情记录时的提示
const NO_MOOD_MESSAGE: &str = "Start by tracking your mood to get personalized recommendations!";

pub async fn create_mood_entry(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CreateMoodRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Recording mood '{}' for {}", request.mood, claims.sub);
    request.validate()?;

    let entry = state
        .mood_service
        .record(claims.user_id(), &request.mood, request.score, request.notes)
        .await?;
    state.metrics.record_mood_entry(entry.mood);

    Ok((StatusCode::CREATED, Json(MoodEntryResponse::from(entry))))
}

pub async fn list_mood_entries(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let entries = state
        .mood_service
        .history(claims.user_id(), params.limit)
        .await?;

    let response: Vec<MoodEntryResponse> =
        entries.into_iter().map(MoodEntryResponse::from).collect();
    Ok(Json(response))
}

pub async fn get_mood_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let stats = state
        .mood_service
        .stats(claims.user_id(), Utc::now().date_naive())
        .await?;
    Ok(Json(stats))
}

pub async fn get_personal_tips(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let personal = state.mood_service.tips_for_user(claims.user_id()).await?;

    let message = personal.mood.is_none().then(|| NO_MOOD_MESSAGE.to_string());
    Ok(Json(TipsResponse {
        mood: personal.mood,
        tips: personal.tips.into_iter().map(|s| s.tip).collect(),
        message,
    }))
}
