use axum::{
    routing::{get, put},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user/posts", get(handlers::my_posts))
        .route("/user/profile", put(handlers::update_profile))
}
