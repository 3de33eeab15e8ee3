use axum::{
    extract::{Query, State},
    Json,
};
use tracing::{info, instrument};

use crate::auth::{dto::PublicUser, extractors::AuthUser, repo::User};
use crate::error::ApiResult;
use crate::posts::dto::{Pagination, PostListItem, PostListResponse};
use crate::posts::repo::Post;
use crate::profile::dto::ProfileUpdate;
use crate::state::AppState;

/// The caller's own posts, drafts included.
#[instrument(skip(state))]
pub async fn my_posts(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<PostListResponse>> {
    let posts = Post::list_by_author(&state.db, user.id, page.limit(), page.offset()).await?;
    let total = Post::count_by_author(&state.db, user.id).await?;
    Ok(Json(PostListResponse {
        posts: posts.into_iter().map(PostListItem::from).collect(),
        has_more: page.has_more(total),
        total,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<ProfileUpdate>,
) -> ApiResult<Json<PublicUser>> {
    payload.validate()?;

    let updated = User::update_profile(
        &state.db,
        user.id,
        payload.name.trim(),
        payload.bio.as_deref(),
        payload.avatar.as_deref(),
    )
    .await?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(updated))
}
