// src/handlers/voluntary_work.rs

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedActor,
        i18n::Locale,
        rbac::{
            PermDeleteVoluntaryWork, PermDeregisterVoluntaryWork, PermGetVoluntaryWorks,
            PermPutCertificate, PermPutFeedback, PermPutRating, PermRegisterVoluntaryWork,
            RequirePermission,
        },
    },
    models::{
        actor::Actor,
        voluntary_work::{
            require_volunteer_id, CertificatePayload, DeregisterPayload, DispatchResponse,
            FeedbackPayload, MessageResponse, RatingPayload, RatingResponse, RegisterPayload,
            VoluntaryWorkResponse,
        },
    },
    services::ownership,
};

// Grava a auditoria (sucesso ou falha) e traduz o erro para o cliente
fn audited<T>(
    app_state: &AppState,
    locale: &Locale,
    actor: &Actor,
    request: String,
    result: Result<T, AppError>,
) -> Result<T, ApiError> {
    match result {
        Ok(value) => {
            app_state.audit_service.success(actor, request);
            Ok(value)
        }
        Err(e) => Err(audited_failure(app_state, locale, actor, request, e)),
    }
}

fn audited_failure(
    app_state: &AppState,
    locale: &Locale,
    actor: &Actor,
    request: String,
    error: AppError,
) -> ApiError {
    app_state.audit_service.failure(actor, request);
    error.to_api_error(locale, &app_state.i18n_store)
}

// Corpo JSON já validado; erro de leitura ou de validação vira AppError
fn read<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    Ok(payload)
}

// Corpo opcional: sem corpo vale o padrão
fn read_optional<T: Validate + Default>(
    payload: Result<Option<Json<T>>, JsonRejection>,
) -> Result<T, AppError> {
    let payload = payload?.map(|Json(p)| p).unwrap_or_default();
    payload.validate()?;
    Ok(payload)
}

// GET /api/voluntary-works/{id}
pub async fn get_voluntary_work(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermGetVoluntaryWorks>,
    Path(id): Path<i64>,
) -> Result<Json<VoluntaryWorkResponse>, ApiError> {
    let work = app_state
        .registration_service
        .voluntary_work(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(work.into()))
}

// PUT /api/voluntary-works/{id}/register
// Voluntário se inscreve sozinho; admin informa o `volunteerId`.
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedActor(actor): AuthenticatedActor,
    _perm: RequirePermission<PermRegisterVoluntaryWork>,
    Path(id): Path<i64>,
    payload: Result<Option<Json<RegisterPayload>>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = match read_optional(payload) {
        Ok(payload) => payload,
        Err(e) => {
            let request = format!("Register to voluntary work with id {} volunteer id: -", id);
            return Err(audited_failure(&app_state, &locale, &actor, request, e));
        }
    };

    let service = &app_state.registration_service;
    let (target, result) = match &actor {
        // Voluntário só inscreve a si mesmo
        Actor::Volunteer(volunteer) => {
            let target = payload.volunteer_id.unwrap_or(volunteer.id);
            let result = match ownership::ensure(ownership::is_self(&actor, target)) {
                Ok(()) => service.register_by_volunteer(id, volunteer).await,
                Err(e) => Err(e),
            };
            (target.to_string(), result)
        }
        Actor::OrganizationAdmin(_) => match require_volunteer_id(payload.volunteer_id) {
            Ok(volunteer_id) => (
                volunteer_id.to_string(),
                service.register_by_organization_admin(id, volunteer_id).await,
            ),
            Err(errors) => ("-".to_string(), Err(AppError::ValidationError(errors))),
        },
    };

    let request = format!("Register to voluntary work with id {} volunteer id: {}", id, target);
    let receipt = audited(&app_state, &locale, &actor, request, result)?;

    app_state
        .notification_service
        .registration_confirmed(&receipt.work_name, &receipt.volunteer);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse { message: "Registration done successfully!!".into() }),
    ))
}

// PUT /api/voluntary-works/{id}/deregister
// Voluntário só desinscreve a si mesmo; admin informa o `volunteerId`.
pub async fn deregister(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedActor(actor): AuthenticatedActor,
    _perm: RequirePermission<PermDeregisterVoluntaryWork>,
    Path(id): Path<i64>,
    payload: Result<Option<Json<DeregisterPayload>>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = match read_optional(payload) {
        Ok(payload) => payload,
        Err(e) => {
            let request = format!("Deregister to voluntary work with id {} volunteer id: -", id);
            return Err(audited_failure(&app_state, &locale, &actor, request, e));
        }
    };

    let target = match &actor {
        Actor::Volunteer(volunteer) => {
            let target = payload.volunteer_id.unwrap_or(volunteer.id);
            ownership::ensure(ownership::is_self(&actor, target)).map(|_| target)
        }
        Actor::OrganizationAdmin(_) => {
            require_volunteer_id(payload.volunteer_id).map_err(AppError::ValidationError)
        }
    };

    let request = format!(
        "Deregister to voluntary work with id {} volunteer id: {}",
        id,
        target.as_ref().map(|t| t.to_string()).unwrap_or_else(|_| "-".into())
    );

    let result = match target {
        Ok(volunteer_id) => app_state.registration_service.deregister(id, volunteer_id).await,
        Err(e) => Err(e),
    };
    let receipt = audited(&app_state, &locale, &actor, request, result)?;

    app_state
        .notification_service
        .deregistration_confirmed(&receipt.work_name, &receipt.volunteer);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse { message: "Deregistration done successfully!!".into() }),
    ))
}

// PUT /api/voluntary-works/{id}/rating
pub async fn put_rating(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedActor(actor): AuthenticatedActor,
    _perm: RequirePermission<PermPutRating>,
    Path(id): Path<i64>,
    payload: Result<Json<RatingPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let result: Result<f64, AppError> = async {
        let payload = read(payload)?;
        // Só quem participa do trabalho avalia
        let work = app_state.registration_service.voluntary_work(id).await?;
        ownership::ensure(ownership::participates_in(&actor, &work))?;
        app_state.rating_service.put_rating(id, payload.rating, actor.name()).await
    }
    .await;

    let request = format!("Adding rating to voluntary work with id {}", id);
    let avg_rating = audited(&app_state, &locale, &actor, request, result)?;

    Ok((
        StatusCode::CREATED,
        Json(RatingResponse { message: "Rating added successfully!!".into(), avg_rating }),
    ))
}

// PUT /api/voluntary-works/{id}/feedback
pub async fn put_feedback(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedActor(actor): AuthenticatedActor,
    _perm: RequirePermission<PermPutFeedback>,
    Path(id): Path<i64>,
    payload: Result<Json<FeedbackPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let result: Result<(), AppError> = async {
        let payload = read(payload)?;
        let work = app_state.registration_service.voluntary_work(id).await?;
        ownership::ensure(ownership::participates_in(&actor, &work))?;
        app_state.rating_service.put_feedback(id, &payload.feedback, actor.name()).await
    }
    .await;

    let request = format!("Adding feedback to voluntary work with id {}", id);
    audited(&app_state, &locale, &actor, request, result)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse { message: "Feedback added successfully!!".into() }),
    ))
}

// POST /api/voluntary-works/{id}/reminder
pub async fn remind_members(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedActor(actor): AuthenticatedActor,
    _perm: RequirePermission<PermDeleteVoluntaryWork>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let result: Result<usize, AppError> = async {
        let work = app_state.registration_service.voluntary_work(id).await?;
        ownership::ensure(ownership::is_creator(&actor, &work))?;
        app_state.notification_service.remind_members(&work).await
    }
    .await;

    let request = format!("Reminder to rate and feedback voluntary work with id {}", id);
    let recipients = audited(&app_state, &locale, &actor, request, result)?;

    Ok(Json(DispatchResponse { message: "Reminder sent successfully!!".into(), recipients }))
}

// POST /api/voluntary-works/{id}/certificates
pub async fn issue_certificates(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedActor(actor): AuthenticatedActor,
    _perm: RequirePermission<PermPutCertificate>,
    Path(id): Path<i64>,
    payload: Result<Json<CertificatePayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = read(payload);
    let organization_name = payload
        .as_ref()
        .map(|p| p.organization_name.clone())
        .unwrap_or_else(|_| "-".into());

    let result: Result<usize, AppError> = async {
        let payload = payload?;
        let work = app_state.registration_service.voluntary_work(id).await?;
        ownership::ensure(app_state.ownership_service.may_manage(&actor, &work).await?)?;
        app_state
            .notification_service
            .issue_certificates(&work, &payload.organization_name, payload.date.as_deref())
            .await
    }
    .await;

    let request = format!(
        "Certifications generated for voluntary work with id {} for organization: {}",
        id, organization_name
    );
    let recipients = audited(&app_state, &locale, &actor, request, result)?;

    Ok((
        StatusCode::CREATED,
        Json(DispatchResponse { message: "Certificates generated successfully!!".into(), recipients }),
    ))
}
