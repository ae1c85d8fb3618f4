//! Grantable permission rows.

use serde::Serialize;
use sqlx::FromRow;

/// A row from the `permissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PermissionRow {
    pub codename: String,
    pub description: String,
}
