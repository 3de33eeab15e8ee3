use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/posts",
            get(handlers::list_posts)
                .post(handlers::create_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .route("/posts/:slug", get(handlers::get_post))
        .route("/posts/:slug/like", post(handlers::toggle_like))
        .route("/posts/:slug/comments", post(handlers::create_comment))
}
