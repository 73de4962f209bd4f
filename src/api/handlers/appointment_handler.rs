use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;
use validator::Validate;

use crate::{
    api::{app_state::AppState, dto::appointment_dto::*},
    error::AppError,
    security::auth::Claims,
};

pub async fn book_appointment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!(
        "Booking therapist {} on {} {} for {}",
        request.therapist_id, request.date, request.time, claims.sub
    );
    request.validate()?;

    let appointment = state
        .appointment_service
        .book(
            claims.user_id(),
            request.therapist_id,
            &request.date,
            &request.time,
        )
        .await?;
    let therapists = state.catalog_service.therapists().await?;

    Ok((
        StatusCode::CREATED,
        Json(AppointmentResponse::new(appointment, &therapists)),
    ))
}

pub async fn list_appointments(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let appointments = state.appointment_service.list(claims.user_id()).await?;
    let therapists = state.catalog_service.therapists().await?;

    let response: Vec<AppointmentResponse> = appointments
        .into_iter()
        .map(|a| AppointmentResponse::new(a, &therapists))
        .collect();
    Ok(Json(response))
}

pub async fn cancel_appointment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Cancelling appointment {} for {}", id, claims.sub);

    let appointment = state
        .appointment_service
        .cancel(claims.user_id(), &id)
        .await?;
    let therapists = state.catalog_service.therapists().await?;

    Ok(Json(AppointmentResponse::new(appointment, &therapists)))
}
