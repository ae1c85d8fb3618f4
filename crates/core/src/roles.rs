//! Well-known role names.
//!
//! These must match the seed rows in `20260301000001_create_users.sql`.

/// Superuser role: implicitly holds every permission.
pub const ROLE_ADMIN: &str = "admin";

/// Default role assigned at signup.
pub const ROLE_USER: &str = "user";
