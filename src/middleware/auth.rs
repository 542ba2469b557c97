use crate::error::AppError;
use crate::models::user::{Claims, Role};
use crate::state::AppState;
use crate::utils::jwt::TokenError;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

/// The caller, as proven by a bearer token.
///
/// Add `user: AuthenticatedUser` to a handler and Axum will:
/// 1. Pull the token out of `Authorization: Bearer <token>`
/// 2. Verify signature, issuer and expiry
/// 3. Stash the identity in the request extensions
///
/// Anything wrong along the way is a 401.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub username: String,
    pub role: Role,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            role: claims.role,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}

/// An [`AuthenticatedUser`] whose role is admin. Anyone else gets a 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

/// Splits `Bearer <token>`. The scheme is case-insensitive.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already resolved by an earlier extractor on this request.
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = bearer_token(header).ok_or_else(|| {
            AppError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let claims = state.tokens.verify(token).map_err(|e| {
            match &e {
                TokenError::Expired => tracing::debug!(path = %parts.uri.path(), "expired token"),
                _ => tracing::warn!(path = %parts.uri.path(), error = %e, "rejected token"),
            }
            AppError::from(e)
        })?;

        let user = AuthenticatedUser::from(claims);
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        match user.role {
            Role::Admin => Ok(AdminUser(user)),
            Role::User => {
                tracing::warn!(
                    username = %user.username,
                    path = %parts.uri.path(),
                    "admin route denied"
                );
                Err(AppError::Forbidden("Admin access required".to_string()))
            }
        }
    }
}
