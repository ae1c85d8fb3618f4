//! Image item model and DTOs.

use imgview_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An `image_items` row joined with its category name and creator username.
///
/// Every read goes through this shape so list, detail and slideshow payloads
/// agree.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ImageItem {
    pub id: DbId,
    pub title: String,
    pub created_by: Option<DbId>,
    pub created_by_username: Option<String>,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    /// Path relative to the media root, e.g. `uploads/<uuid>.png`.
    pub image_path: String,
    pub uploaded_at: Timestamp,
    pub updated_at: Timestamp,
}

pub struct CreateImageItem {
    pub title: String,
    pub created_by: Option<DbId>,
    pub category_id: Option<DbId>,
    pub image_path: String,
}

/// Full edit: title and category are replaced, the file only when given.
pub struct UpdateImageItem {
    pub title: String,
    pub category_id: Option<DbId>,
    pub image_path: Option<String>,
}

/// Request body for `PUT /images/{id}/category`. `null` clears the category.
#[derive(Debug, Deserialize)]
pub struct ImageCategoryInput {
    pub category_id: Option<DbId>,
}

/// Filters for the admin image search.
#[derive(Debug)]
pub struct ImageSearchParams {
    pub search: Option<String>,
    pub category: Option<DbId>,
}
