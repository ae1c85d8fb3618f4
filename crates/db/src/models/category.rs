//! Category model and DTOs.

use imgview_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Category plus the number of images filed under it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryWithCount {
    pub id: DbId,
    pub name: String,
    pub created_by: Option<DbId>,
    pub image_count: i64,
}

/// Category joined with its creator's username (admin search).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryWithCreator {
    pub id: DbId,
    pub name: String,
    pub created_by: Option<DbId>,
    pub created_by_username: Option<String>,
    pub created_at: Timestamp,
}

/// Request body for creating or renaming a category.
#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    pub name: String,
}

pub struct CreateCategory {
    pub name: String,
    pub created_by: Option<DbId>,
}
