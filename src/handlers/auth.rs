// src/handlers/auth.rs

use axum::{extract::State, Json};

use crate::{
    config::AppState,
    middleware::{
        auth::AuthenticatedActor,
        rbac::{PermGetMe, RequirePermission},
    },
    models::auth::MeResponse,
};

// Handler da rota protegida /me: o ator e as permissões efetivas dos cargos
pub async fn get_me(
    State(app_state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
    _perm: RequirePermission<PermGetMe>,
) -> Json<MeResponse> {
    let permissions = app_state.rbac_service.permissions_for(&actor).names();

    Json(MeResponse {
        id: actor.id(),
        name: actor.name().to_string(),
        email: actor.email().to_string(),
        kind: actor.kind(),
        permissions,
    })
}
