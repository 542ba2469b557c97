use crate::config::SeedAdmin;
use crate::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::{
    AuthResponse, LoginRequest, MeResponse, RegisterRequest, Role, User, UserSummary,
};
use crate::state::AppState;
use crate::utils::auth::{hash_password, verify_password};
use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserSummary>), AppError> {
    let Json(payload) = payload?;
    payload.validate().map_err(AppError::Validation)?;

    // 1. Check if user already exists
    // The store checks again on insert; this just skips hashing for a taken name.
    if state.users.find_by_username(&payload.username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    // 2. Hash password
    let password_hash = hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

    // 3. Create user
    let user = User {
        username: payload.username,
        password_hash,
        role: payload.role,
        created_at: chrono::Utc::now().timestamp(),
    };
    state.users.insert(user.clone()).await?;

    tracing::info!(username = %user.username, role = %user.role, "user registered");
    Ok((StatusCode::CREATED, Json(UserSummary::from(user))))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(payload) = payload?;

    // 1. Fetch user
    let Some(user) = state.users.find_by_username(&payload.username).await? else {
        tracing::info!(username = %payload.username, "login failed: unknown user");
        return Err(AppError::invalid_credentials());
    };

    // 2. Verify password
    if !verify_password(&payload.password, &user.password_hash) {
        tracing::info!(username = %user.username, "login failed: wrong password");
        return Err(AppError::invalid_credentials());
    }

    // 3. Issue token
    let ttl = state.tokens.default_ttl();
    let token = state.tokens.issue(&user.username, user.role, ttl)?;

    tracing::info!(username = %user.username, "user logged in");
    Ok(Json(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: ttl.num_seconds(),
        username: user.username,
        role: user.role,
    }))
}

pub async fn me(user: AuthenticatedUser) -> Json<MeResponse> {
    Json(MeResponse {
        username: user.username,
        role: user.role,
        issued_at: user.issued_at,
        expires_at: user.expires_at,
    })
}

/// Creates the configured admin account unless some admin already exists.
///
/// Returns whether an account was created.
pub async fn seed_admin(state: &AppState, seed: &SeedAdmin) -> Result<bool, AppError> {
    if state.users.has_admin().await? {
        tracing::debug!("admin account present, skipping seed");
        return Ok(false);
    }

    let password_hash = hash_password(&seed.password)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

    state
        .users
        .insert(User {
            username: seed.username.clone(),
            password_hash,
            role: Role::Admin,
            created_at: chrono::Utc::now().timestamp(),
        })
        .await?;

    tracing::info!(username = %seed.username, "seeded admin account");
    Ok(true)
}
