// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};

use crate::{config::AppState, handlers, middleware::auth::auth_guard};

pub fn app_router(app_state: AppState) -> Router {
    // Trabalhos voluntários: inscrição, avaliação e avisos aos inscritos
    let voluntary_work_routes = Router::new()
        .route("/{id}", get(handlers::voluntary_work::get_voluntary_work))
        .route("/{id}/register", put(handlers::voluntary_work::register))
        .route("/{id}/deregister", put(handlers::voluntary_work::deregister))
        .route("/{id}/rating", put(handlers::voluntary_work::put_rating))
        .route("/{id}/feedback", put(handlers::voluntary_work::put_feedback))
        .route("/{id}/reminder", post(handlers::voluntary_work::remind_members))
        .route("/{id}/certificates", post(handlers::voluntary_work::issue_certificates));

    let volunteer_routes = Router::new()
        .route("/{id}/voluntary-works", get(handlers::volunteer::list_voluntary_works));

    // Tudo aqui exige Bearer token
    let protected_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .nest("/voluntary-works", voluntary_work_routes)
        .nest("/volunteers", volunteer_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let api_routes = Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(protected_routes);

    Router::new()
        .nest("/api", api_routes)
        .with_state(app_state)
}
