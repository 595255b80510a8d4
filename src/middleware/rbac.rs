// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::actor::Actor,
    services::rbac_service::Grant,
};

/// 1. O Trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

/// 2. O Extractor (Guardião). Guarda como o acesso foi concedido.
pub struct RequirePermission<T> {
    pub grant: Grant,
    _permission: PhantomData<T>,
}

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_request_parts(parts, state).await.unwrap_or_default();

        // A. Ator colocado pelo auth_guard
        let actor = parts
            .extensions
            .get::<Actor>()
            .ok_or_else(|| AppError::InvalidToken.to_api_error(&locale, &app_state.i18n_store))?;

        // B. Decide pelo conjunto de permissões dos cargos
        let grant = app_state
            .rbac_service
            .check(actor, T::slug())
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

        Ok(RequirePermission { grant, _permission: PhantomData })
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermGetMe;
impl PermissionDef for PermGetMe {
    fn slug() -> &'static str { "GET_me" }
}

pub struct PermGetVoluntaryWorks;
impl PermissionDef for PermGetVoluntaryWorks {
    fn slug() -> &'static str { "GET_voluntaryWorks" }
}

pub struct PermGetVolunteers;
impl PermissionDef for PermGetVolunteers {
    fn slug() -> &'static str { "GET_volunteers" }
}

pub struct PermRegisterVoluntaryWork;
impl PermissionDef for PermRegisterVoluntaryWork {
    fn slug() -> &'static str { "REGISTER_voluntaryWork" }
}

pub struct PermDeregisterVoluntaryWork;
impl PermissionDef for PermDeregisterVoluntaryWork {
    fn slug() -> &'static str { "DEREGISTER_voluntaryWork" }
}

pub struct PermPutRating;
impl PermissionDef for PermPutRating {
    fn slug() -> &'static str { "PUT_rating" }
}

pub struct PermPutFeedback;
impl PermissionDef for PermPutFeedback {
    fn slug() -> &'static str { "PUT_feedback" }
}

// O lembrete reaproveita a permissão de remoção do trabalho
pub struct PermDeleteVoluntaryWork;
impl PermissionDef for PermDeleteVoluntaryWork {
    fn slug() -> &'static str { "DELETE_voluntaryWork" }
}

pub struct PermPutCertificate;
impl PermissionDef for PermPutCertificate {
    fn slug() -> &'static str { "PUT_certificate" }
}
