//! Startup provisioning of the first admin account.

use imgview_core::roles::ROLE_ADMIN;
use imgview_core::validation::validate_username;
use imgview_db::models::user::CreateUser;
use imgview_db::repositories::{RoleRepo, UserRepo};
use imgview_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::AdminBootstrap;
use crate::error::{AppError, AppResult};

/// Create the configured admin account unless a user with that name exists.
///
/// Returns `true` when an account was created. An existing account is left
/// untouched, password included.
pub async fn ensure_admin(pool: &DbPool, admin: &AdminBootstrap) -> AppResult<bool> {
    let username = validate_username(&admin.username)?;

    if UserRepo::find_by_username(pool, &username).await?.is_some() {
        tracing::debug!(username = %username, "Admin account already present");
        return Ok(false);
    }

    let role = RoleRepo::find_by_name(pool, ROLE_ADMIN)
        .await?
        .ok_or_else(|| AppError::InternalError("admin role missing from seed data".into()))?;

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username,
            password_hash,
            role_id: role.id,
            is_active: true,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Created admin account");
    Ok(true)
}
