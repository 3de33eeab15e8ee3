use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::warn;

use crate::auth::dto::PublicUser;
use crate::auth::jwt::JwtKeys;
use crate::auth::repo::{Role, User};
use crate::error::ApiError;
use crate::state::AppState;

/// Bearer token from the Authorization header, falling back to the
/// `auth-token` cookie.
fn token_from_parts(parts: &Parts) -> Option<String> {
    if let Some(value) = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = value.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }
    parts
        .headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .map(str::trim)
        .find_map(|c| c.strip_prefix("auth-token="))
        .map(|t| t.to_string())
}

/// Authenticated caller. Verifies the token and re-fetches the user row on
/// every request; a deleted account fails even with a live token.
pub struct AuthUser(pub PublicUser);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts)
            .ok_or_else(|| ApiError::Unauthorized("Unauthorized".into()))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(&token).ok_or_else(|| {
            warn!("invalid or expired token");
            ApiError::Unauthorized("Invalid or expired token".into())
        })?;

        let user = User::find_public_by_id(&state.db, claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %claims.sub, "token for unknown user");
                ApiError::Unauthorized("Unauthorized".into())
            })?;

        Ok(AuthUser(user))
    }
}

/// Authenticated caller with the administrator role.
pub struct AdminUser(pub PublicUser);

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(ApiError::Forbidden("Forbidden".into()));
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_headers(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/api/auth/me");
        for (k, v) in headers {
            builder = builder.header(*k, *v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn reads_bearer_header() {
        let parts = parts_with_headers(&[("authorization", "Bearer abc.def.ghi")]);
        assert_eq!(token_from_parts(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn falls_back_to_cookie() {
        let parts = parts_with_headers(&[("cookie", "theme=dark; auth-token=abc.def.ghi")]);
        assert_eq!(token_from_parts(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn header_wins_over_cookie() {
        let parts = parts_with_headers(&[
            ("authorization", "Bearer header-token"),
            ("cookie", "auth-token=cookie-token"),
        ]);
        assert_eq!(token_from_parts(&parts).as_deref(), Some("header-token"));
    }

    #[test]
    fn missing_token_is_none() {
        let parts = parts_with_headers(&[("cookie", "theme=dark")]);
        assert!(token_from_parts(&parts).is_none());
        let parts = parts_with_headers(&[]);
        assert!(token_from_parts(&parts).is_none());
    }

    #[test]
    fn non_bearer_authorization_is_ignored() {
        let parts = parts_with_headers(&[("authorization", "Basic dXNlcjpwYXNz")]);
        assert!(token_from_parts(&parts).is_none());
    }
}
