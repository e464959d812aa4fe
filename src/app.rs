use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/countdown", get(handlers::get_countdown))
        .route("/api/tasks", get(handlers::get_tasks).post(handlers::add_task))
        .route("/api/weak", get(handlers::get_weak).post(handlers::add_weak))
        .route(
            "/api/revisions",
            get(handlers::get_revisions).post(handlers::add_revision),
        )
        .route("/api/revisions/clear", post(handlers::clear_revisions))
        .route("/api/mock", get(handlers::get_mock).post(handlers::save_mock))
        .route(
            "/api/mistakes",
            get(handlers::get_mistakes).post(handlers::add_mistake),
        )
        .route(
            "/api/execution",
            get(handlers::get_execution).post(handlers::toggle_execution),
        )
        .route("/api/theme", get(handlers::get_theme).post(handlers::set_theme))
        .route(
            "/api/lectures/:chapter/last-video",
            get(handlers::get_last_video).post(handlers::set_last_video),
        )
        .with_state(state)
}
