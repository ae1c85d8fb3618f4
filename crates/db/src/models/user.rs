//! User entity model and DTOs.

use imgview_core::permissions::Permission;
use imgview_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Carries the password hash, so it is never serialized. Use
/// [`UserResponse`] for anything leaving the server.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public view of a user, with the role resolved and permissions expanded.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub role: String,
    pub is_active: bool,
    pub permissions: Vec<Permission>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl UserResponse {
    pub fn build(user: &User, role: String, permissions: Vec<Permission>) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role,
            is_active: user.is_active,
            permissions,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// DTO for inserting a user. The password is already hashed.
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub is_active: bool,
}
