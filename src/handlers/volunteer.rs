// src/handlers/volunteer.rs

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::AuthenticatedActor,
        i18n::Locale,
        rbac::{PermGetVolunteers, PermissionDef},
    },
    models::voluntary_work::VoluntaryWorkResponse,
    services::ownership,
};

// GET /api/volunteers/{id}/voluntary-works
// O próprio voluntário sempre vê a sua lista; para os outros é preciso GET_volunteers.
pub async fn list_voluntary_works(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(volunteer_id): Path<Uuid>,
) -> Result<Json<Vec<VoluntaryWorkResponse>>, ApiError> {
    if !ownership::is_self(&actor, volunteer_id) {
        app_state
            .rbac_service
            .check(&actor, PermGetVolunteers::slug())
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    }

    let works = app_state
        .registration_service
        .voluntary_works_for_volunteer(volunteer_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(works.into_iter().map(VoluntaryWorkResponse::from).collect()))
}
