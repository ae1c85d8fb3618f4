//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Identity from a JWT Bearer token.
//! - [`rbac::CurrentGrants`] -- Active user plus role and granted permissions,
//!   re-read from the database on every request.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.

pub mod auth;
pub mod rbac;
