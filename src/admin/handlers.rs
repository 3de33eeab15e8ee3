use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::admin::dto::{
    AdminUserUpdate, StatsResponse, UserListItem, UserListResponse,
};
use crate::admin::repo;
use crate::auth::{dto::PublicUser, extractors::AdminUser};
use crate::error::{ApiError, ApiResult};
use crate::posts::dto::{MessageResponse, Pagination, PostListItem, PostListResponse};
use crate::posts::repo::Post;
use crate::state::AppState;

/// Admins may not delete their own account through the dashboard.
fn ensure_not_self(admin_id: Uuid, target_id: Uuid) -> Result<(), ApiError> {
    if admin_id == target_id {
        return Err(ApiError::Validation(
            "Cannot delete your own account".into(),
        ));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<UserListResponse>> {
    let users = repo::list_users(&state.db, page.limit(), page.offset()).await?;
    let total = repo::count_users(&state.db).await?;
    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserListItem::from).collect(),
        has_more: page.has_more(total),
        total,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdminUserUpdate>,
) -> ApiResult<Json<PublicUser>> {
    payload.validate()?;

    if payload.email.is_some() || payload.username.is_some() {
        let taken = repo::identity_taken_excluding(
            &state.db,
            id,
            payload.email.as_deref(),
            payload.username.as_deref(),
        )
        .await?;
        if taken {
            warn!(target = %id, "admin update with taken identity");
            return Err(ApiError::Validation(
                "Email or username already exists".into(),
            ));
        }
    }

    let user = repo::update_user(
        &state.db,
        id,
        payload.name.as_deref(),
        payload.email.as_deref(),
        payload.username.as_deref(),
        payload.role,
        payload.bio.as_deref(),
        payload.avatar.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    info!(admin_id = %admin.id, target = %id, "user updated by admin");
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    ensure_not_self(admin.id, id)?;

    let deleted = repo::delete_user(&state.db, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("User not found".into()));
    }

    info!(admin_id = %admin.id, target = %id, "user deleted by admin");
    Ok(Json(MessageResponse {
        message: "User deleted successfully".into(),
    }))
}

/// All posts, drafts included.
#[instrument(skip(state))]
pub async fn list_posts(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<PostListResponse>> {
    let posts = Post::list_all(&state.db, page.limit(), page.offset()).await?;
    let total = Post::count_all(&state.db).await?;
    Ok(Json(PostListResponse {
        posts: posts.into_iter().map(PostListItem::from).collect(),
        has_more: page.has_more(total),
        total,
    }))
}

#[instrument(skip(state))]
pub async fn stats(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> ApiResult<Json<StatsResponse>> {
    let stats = repo::stats(&state.db).await?;
    Ok(Json(StatsResponse {
        total_users: stats.users,
        total_posts: stats.posts,
        total_comments: stats.comments,
        total_likes: stats.likes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn deleting_someone_else_is_allowed() {
        assert!(ensure_not_self(Uuid::new_v4(), Uuid::new_v4()).is_ok());
    }

    #[test]
    fn self_deletion_is_a_bad_request() {
        let id = Uuid::new_v4();
        let err = ensure_not_self(id, id).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("own account"));
    }
}
