use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::admin::repo::UserWithCounts;
use crate::auth::dto::is_valid_email;
use crate::auth::repo::Role;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListItem {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub post_count: i64,
    pub comment_count: i64,
    pub like_count: i64,
}

impl From<UserWithCounts> for UserListItem {
    fn from(u: UserWithCounts) -> Self {
        Self {
            id: u.id,
            email: u.email,
            username: u.username,
            name: u.name,
            role: u.role,
            avatar: u.avatar,
            bio: u.bio,
            created_at: u.created_at,
            post_count: u.post_count,
            comment_count: u.comment_count,
            like_count: u.like_count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub users: Vec<UserListItem>,
    pub has_more: bool,
    pub total: i64,
}

/// Partial user update from the admin dashboard; absent fields stay
/// unchanged.
#[derive(Debug, Deserialize)]
pub struct AdminUserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub role: Option<Role>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

impl AdminUserUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            if name.chars().count() < 2 {
                return Err(ApiError::Validation(
                    "Name must be at least 2 characters".into(),
                ));
            }
        }
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                return Err(ApiError::Validation("Invalid email address".into()));
            }
        }
        if let Some(username) = &self.username {
            if username.chars().count() < 3 {
                return Err(ApiError::Validation(
                    "Username must be at least 3 characters".into(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_users: i64,
    pub total_posts: i64,
    pub total_comments: i64,
    pub total_likes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> AdminUserUpdate {
        AdminUserUpdate {
            name: None,
            email: None,
            username: None,
            role: None,
            bio: None,
            avatar: None,
        }
    }

    #[test]
    fn empty_update_is_valid() {
        assert!(empty().validate().is_ok());
    }

    #[test]
    fn rejects_bad_email() {
        let mut update = empty();
        update.email = Some("nope".into());
        assert!(update.validate().is_err());
    }

    #[test]
    fn rejects_short_username() {
        let mut update = empty();
        update.username = Some("ab".into());
        assert!(update.validate().is_err());
    }
}
