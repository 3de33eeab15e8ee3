use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::dto::PublicUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[sqlx(rename = "USER")]
    User,
    #[sqlx(rename = "ADMIN")]
    Admin,
}

/// Full user row, including the password hash. Never serialized to clients;
/// handlers respond with [`PublicUser`] projections instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub created_at: OffsetDateTime,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, name, password_hash, role, avatar, bio, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// True when another account already holds the email or the username.
    pub async fn identity_taken(db: &PgPool, email: &str, username: &str) -> anyhow::Result<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users WHERE email = $1 OR username = $2
            )
            "#,
        )
        .bind(email)
        .bind(username)
        .fetch_one(db)
        .await?;
        Ok(taken)
    }

    pub async fn create(
        db: &PgPool,
        email: &str,
        username: &str,
        name: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, username, name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, username, name, password_hash, role, avatar, bio, created_at
            "#,
        )
        .bind(email)
        .bind(username)
        .bind(name)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Safe projection for authenticated requests: no password hash leaves
    /// the repo layer.
    pub async fn find_public_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<PublicUser>> {
        let user = sqlx::query_as::<_, PublicUser>(
            r#"
            SELECT id, email, username, name, role, avatar, bio, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        name: &str,
        bio: Option<&str>,
        avatar: Option<&str>,
    ) -> anyhow::Result<PublicUser> {
        let user = sqlx::query_as::<_, PublicUser>(
            r#"
            UPDATE users
            SET name = $2, bio = $3, avatar = $4
            WHERE id = $1
            RETURNING id, email, username, name, role, avatar, bio, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(bio)
        .bind(avatar)
        .fetch_one(db)
        .await?;
        Ok(user)
    }
}
