//! Handlers for the `/auth` resource (signup, login, refresh, logout, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use imgview_core::error::CoreError;
use imgview_core::permissions::Grants;
use imgview_core::roles::ROLE_USER;
use imgview_core::types::DbId;
use imgview_core::validation::{validate_signup_passwords, validate_username};
use imgview_db::models::session::CreateSession;
use imgview_db::models::user::{CreateUser, User, UserResponse};
use imgview_db::repositories::{PermissionRepo, RoleRepo, SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::CurrentGrants;
use crate::response::DataResponse;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Please enter a correct username and password.";
const PENDING_APPROVAL: &str = "Your account is pending approval by an administrator.";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password1: String,
    pub password2: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub user: UserResponse,
    /// Always `true`: new accounts wait for an admin to activate them.
    pub pending_approval: bool,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Register a new account. The account starts inactive and cannot log in
/// until an admin activates it.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SignupResponse>>)> {
    let username = validate_username(&input.username)?;
    validate_signup_passwords(&input.password1, &input.password2)?;

    if UserRepo::find_by_username(&state.pool, &username)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "A user with that username already exists.".into(),
        )));
    }

    let role = RoleRepo::find_by_name(&state.pool, ROLE_USER)
        .await?
        .ok_or_else(|| AppError::InternalError("user role missing from seed data".into()))?;

    let password_hash = hash_password(&input.password1)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username,
            password_hash,
            role_id: role.id,
            is_active: false,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User signed up, pending approval");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SignupResponse {
                user: UserResponse::build(&user, role.name, Vec::new()),
                pending_approval: true,
            },
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

    // Password first, so the pending-approval message is only shown to
    // someone who knows the password.
    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::debug!(user_id = user.id, "Login rejected: bad password");
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS.into(),
        )));
    }

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(PENDING_APPROVAL.into())));
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, "User logged in");

    let response = create_auth_response(&state, &user).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens. The old
/// session is revoked in the same statement that validates it, so each
/// refresh token is accepted at most once.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::claim_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(PENDING_APPROVAL.into())));
    }

    let response = create_auth_response(&state, &user).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke every session of the caller. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    tracing::info!(user_id = auth_user.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
///
/// The caller's account with effective permissions (admin expanded).
pub async fn me(
    State(state): State<AppState>,
    CurrentGrants(grants): CurrentGrants,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = find_user(&state, grants.user_id).await?;
    Ok(Json(DataResponse {
        data: user_response(&user, &grants),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

fn user_response(user: &User, grants: &Grants) -> UserResponse {
    UserResponse::build(user, grants.role.clone(), grants.effective())
}

/// Generate access + refresh tokens, persist a session row, and build the
/// response.
async fn create_auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    let codenames = PermissionRepo::codenames_for_user(&state.pool, user.id).await?;
    let grants = Grants::new(user.id, role.clone(), &codenames);

    let access_token = generate_access_token(user.id, &user.username, &role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let refresh = generate_refresh_token();
    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh.hash,
            expires_at,
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh.plaintext,
        expires_in: state.config.jwt.access_token_ttl_secs(),
        user: user_response(user, &grants),
    })
}
