use axum::{
    routing::{get, put},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(handlers::list_users))
        .route(
            "/admin/users/:id",
            put(handlers::update_user).delete(handlers::delete_user),
        )
        .route("/admin/posts", get(handlers::list_posts))
        .route("/admin/stats", get(handlers::stats))
}
