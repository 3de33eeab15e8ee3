use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo::{Role, User};
use crate::error::ApiError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub name: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !is_valid_email(&self.email) {
            return Err(ApiError::Validation("Invalid email address".into()));
        }
        if self.username.chars().count() < 3 {
            return Err(ApiError::Validation(
                "Username must be at least 3 characters".into(),
            ));
        }
        if self.name.chars().count() < 2 {
            return Err(ApiError::Validation(
                "Name must be at least 2 characters".into(),
            ));
        }
        if self.password.chars().count() < 6 {
            return Err(ApiError::Validation(
                "Password must be at least 6 characters".into(),
            ));
        }
        Ok(())
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !is_valid_email(&self.email) {
            return Err(ApiError::Validation("Invalid email address".into()));
        }
        Ok(())
    }
}

/// Public part of a user record; what clients and tokens may see.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            username: u.username,
            name: u.name,
            role: u.role,
            avatar: u.avatar,
            bio: u.bio,
            created_at: u.created_at,
        }
    }
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: PublicUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterRequest {
        RegisterRequest {
            email: "reader@example.com".into(),
            username: "reader".into(),
            name: "Reader".into(),
            password: "hunter22".into(),
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn rejects_invalid_email() {
        let mut req = request();
        req.email = "not-an-email".into();
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn rejects_short_username() {
        let mut req = request();
        req.username = "ab".into();
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("Username"));
    }

    #[test]
    fn rejects_short_password() {
        let mut req = request();
        req.password = "12345".into();
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("Password"));
    }

    #[test]
    fn role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"USER\"");
    }
}
