use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::dto::PublicUser;
use crate::auth::repo::Role;

#[derive(Debug, Clone, FromRow)]
pub struct UserWithCounts {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub created_at: OffsetDateTime,
    pub post_count: i64,
    pub comment_count: i64,
    pub like_count: i64,
}

pub async fn list_users(
    db: &PgPool,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<UserWithCounts>> {
    let rows = sqlx::query_as::<_, UserWithCounts>(
        r#"
        SELECT u.id, u.email, u.username, u.name, u.role, u.avatar, u.bio, u.created_at,
               (SELECT COUNT(*) FROM posts p WHERE p.author_id = u.id) AS post_count,
               (SELECT COUNT(*) FROM comments c WHERE c.author_id = u.id) AS comment_count,
               (SELECT COUNT(*) FROM likes l WHERE l.user_id = u.id) AS like_count
        FROM users u
        ORDER BY u.created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn count_users(db: &PgPool) -> anyhow::Result<i64> {
    let total = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM users"#)
        .fetch_one(db)
        .await?;
    Ok(total)
}

/// True when a different user already holds one of the provided email or
/// username values.
pub async fn identity_taken_excluding(
    db: &PgPool,
    exclude: Uuid,
    email: Option<&str>,
    username: Option<&str>,
) -> anyhow::Result<bool> {
    let taken = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM users
            WHERE id <> $1
              AND (($2::text IS NOT NULL AND email = $2)
                OR ($3::text IS NOT NULL AND username = $3))
        )
        "#,
    )
    .bind(exclude)
    .bind(email)
    .bind(username)
    .fetch_one(db)
    .await?;
    Ok(taken)
}

/// Partial update; NULL parameters leave the column as it was.
pub async fn update_user(
    db: &PgPool,
    id: Uuid,
    name: Option<&str>,
    email: Option<&str>,
    username: Option<&str>,
    role: Option<Role>,
    bio: Option<&str>,
    avatar: Option<&str>,
) -> anyhow::Result<Option<PublicUser>> {
    let user = sqlx::query_as::<_, PublicUser>(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            email = COALESCE($3, email),
            username = COALESCE($4, username),
            role = COALESCE($5, role),
            bio = COALESCE($6, bio),
            avatar = COALESCE($7, avatar)
        WHERE id = $1
        RETURNING id, email, username, name, role, avatar, bio, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(username)
    .bind(role)
    .bind(bio)
    .bind(avatar)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

/// Rows affected; zero means the user did not exist.
pub async fn delete_user(db: &PgPool, id: Uuid) -> anyhow::Result<u64> {
    let result = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

pub struct Stats {
    pub users: i64,
    pub posts: i64,
    pub comments: i64,
    pub likes: i64,
}

pub async fn stats(db: &PgPool) -> anyhow::Result<Stats> {
    let users = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM users"#)
        .fetch_one(db)
        .await?;
    let posts = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM posts"#)
        .fetch_one(db)
        .await?;
    let comments = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM comments"#)
        .fetch_one(db)
        .await?;
    let likes = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM likes"#)
        .fetch_one(db)
        .await?;
    Ok(Stats {
        users,
        posts,
        comments,
        likes,
    })
}
