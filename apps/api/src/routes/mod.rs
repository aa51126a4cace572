pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/options", get(handlers::handle_options))
        // Auth
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        .route("/api/v1/auth/me", get(auth::handle_me))
        // Teacher view
        .route(
            "/api/v1/curricula",
            post(handlers::handle_create_curriculum).get(handlers::handle_list_curricula),
        )
        .route(
            "/api/v1/curricula/:id",
            get(handlers::handle_get_curriculum).put(handlers::handle_update_curriculum),
        )
        .route(
            "/api/v1/curricula/:id/edit",
            post(handlers::handle_enter_edit).delete(handlers::handle_cancel_edit),
        )
        .route(
            "/api/v1/curricula/:id/rubric",
            post(handlers::handle_curriculum_rubric),
        )
        .route(
            "/api/v1/curricula/:id/quiz",
            post(handlers::handle_curriculum_quiz),
        )
        .route(
            "/api/v1/curricula/:id/pdf",
            get(handlers::handle_curriculum_pdf),
        )
        // Student view
        .route(
            "/api/v1/roadmap",
            post(handlers::handle_create_roadmap).get(handlers::handle_get_roadmap),
        )
        .route(
            "/api/v1/roadmap/rubric",
            post(handlers::handle_roadmap_rubric),
        )
        .route("/api/v1/roadmap/pdf", get(handlers::handle_roadmap_pdf))
        .with_state(state)
}
