use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::{info, instrument, warn};

use crate::auth::{dto::PublicUser, extractors::AuthUser, policy::can_modify, repo::User};
use crate::error::{ApiError, ApiResult};
use crate::posts::dto::{
    AuthorBrief, AuthorDetail, CommentInput, CommentPayload, LikePayload, LikeResponse,
    MessageResponse, Pagination, PostDetail, PostIdQuery, PostInput, PostListItem,
    PostListResponse, PostPayload,
};
use crate::posts::repo::{self, CommentWithAuthor, LikeWithUser, Post};
use crate::state::AppState;
use crate::util::generate_slug;

#[instrument(skip(state))]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<PostListResponse>> {
    let posts = Post::list_published(&state.db, page.limit(), page.offset()).await?;
    let total = Post::count_published(&state.db).await?;
    Ok(Json(PostListResponse {
        posts: posts.into_iter().map(PostListItem::from).collect(),
        has_more: page.has_more(total),
        total,
    }))
}

#[instrument(skip(state, payload))]
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<PostInput>,
) -> ApiResult<Json<PostPayload>> {
    payload.validate()?;

    let slug = generate_slug(&payload.title);
    if slug.is_empty() {
        return Err(ApiError::Validation(
            "Title must contain letters or digits".into(),
        ));
    }
    if Post::slug_exists(&state.db, &slug, None).await? {
        warn!(%slug, "slug collision on create");
        return Err(ApiError::Validation(
            "A post with this title already exists".into(),
        ));
    }

    let post = Post::create(
        &state.db,
        user.id,
        payload.title.trim(),
        &slug,
        &payload.content,
        payload.excerpt.as_deref(),
        &payload.tags,
        payload.published,
        payload.featured_image.as_deref(),
    )
    .await?;

    info!(post_id = %post.id, author_id = %user.id, "post created");
    Ok(Json(payload_with_author(post, &user)))
}

#[instrument(skip(state, payload))]
pub async fn update_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<PostIdQuery>,
    Json(payload): Json<PostInput>,
) -> ApiResult<Json<PostPayload>> {
    payload.validate()?;

    let existing = Post::find_by_id(&state.db, query.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".into()))?;
    if !can_modify(&user, existing.author_id) {
        warn!(post_id = %existing.id, user_id = %user.id, "post update forbidden");
        return Err(ApiError::Forbidden("Forbidden".into()));
    }

    let slug = generate_slug(&payload.title);
    if slug.is_empty() {
        return Err(ApiError::Validation(
            "Title must contain letters or digits".into(),
        ));
    }
    if Post::slug_exists(&state.db, &slug, Some(existing.id)).await? {
        warn!(%slug, "slug collision on update");
        return Err(ApiError::Validation(
            "A post with this title already exists".into(),
        ));
    }

    let post = Post::update(
        &state.db,
        existing.id,
        payload.title.trim(),
        &slug,
        &payload.content,
        payload.excerpt.as_deref(),
        &payload.tags,
        payload.published,
        payload.featured_image.as_deref(),
    )
    .await?;

    // The editor may be an admin; respond with the owning author.
    let author = User::find_public_by_id(&state.db, post.author_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Author not found".into()))?;

    info!(post_id = %post.id, user_id = %user.id, "post updated");
    Ok(Json(payload_with_author(post, &author)))
}

#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<PostIdQuery>,
) -> ApiResult<Json<MessageResponse>> {
    let existing = Post::find_by_id(&state.db, query.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".into()))?;
    if !can_modify(&user, existing.author_id) {
        warn!(post_id = %existing.id, user_id = %user.id, "post delete forbidden");
        return Err(ApiError::Forbidden("Forbidden".into()));
    }

    Post::delete(&state.db, existing.id).await?;
    info!(post_id = %existing.id, user_id = %user.id, "post deleted");
    Ok(Json(MessageResponse {
        message: "Post deleted successfully".into(),
    }))
}

#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<PostDetail>> {
    let post = Post::find_detail_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".into()))?;

    let comments = CommentWithAuthor::list_for_post(&state.db, post.id).await?;
    let likes = LikeWithUser::list_for_post(&state.db, post.id).await?;

    Ok(Json(PostDetail {
        id: post.id,
        title: post.title,
        slug: post.slug,
        content: post.content,
        excerpt: post.excerpt,
        tags: post.tags,
        published: post.published,
        featured_image: post.featured_image,
        created_at: post.created_at,
        author: AuthorDetail {
            id: post.author_id,
            name: post.author_name,
            username: post.author_username,
            avatar: post.author_avatar,
            bio: post.author_bio,
        },
        like_count: likes.len() as i64,
        comment_count: comments.len() as i64,
        comments: comments.into_iter().map(CommentPayload::from).collect(),
        likes: likes.into_iter().map(LikePayload::from).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn toggle_like(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(slug): Path<String>,
) -> ApiResult<Json<LikeResponse>> {
    let post = Post::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".into()))?;

    let liked = repo::toggle_like(&state.db, user.id, post.id).await?;
    info!(post_id = %post.id, user_id = %user.id, liked, "like toggled");
    Ok(Json(LikeResponse {
        liked,
        message: if liked {
            "Post liked".into()
        } else {
            "Post unliked".into()
        },
    }))
}

#[instrument(skip(state, payload))]
pub async fn create_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(slug): Path<String>,
    Json(payload): Json<CommentInput>,
) -> ApiResult<Json<CommentPayload>> {
    payload.validate()?;

    let post = Post::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".into()))?;

    let comment = repo::create_comment(&state.db, post.id, user.id, payload.content.trim()).await?;
    info!(post_id = %post.id, user_id = %user.id, comment_id = %comment.id, "comment created");
    Ok(Json(CommentPayload {
        id: comment.id,
        content: comment.content,
        created_at: comment.created_at,
        author: AuthorBrief {
            name: user.name,
            username: user.username,
            avatar: user.avatar,
        },
    }))
}

fn payload_with_author(post: Post, author: &PublicUser) -> PostPayload {
    PostPayload {
        id: post.id,
        title: post.title,
        slug: post.slug,
        content: post.content,
        excerpt: post.excerpt,
        tags: post.tags,
        published: post.published,
        featured_image: post.featured_image,
        created_at: post.created_at,
        author: AuthorBrief {
            name: author.name.clone(),
            username: author.username.clone(),
            avatar: author.avatar.clone(),
        },
    }
}
