//! Handlers for the `/categories` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use imgview_core::error::CoreError;
use imgview_core::permissions::{can_manage_all_categories, ensure_can_manage_category};
use imgview_core::types::DbId;
use imgview_core::validation::validate_category_name;
use imgview_db::models::category::{Category, CategoryInput, CategoryWithCount, CreateCategory};
use imgview_db::repositories::CategoryRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::IdPath;
use crate::middleware::rbac::CurrentGrants;
use crate::response::DataResponse;
use crate::state::AppState;

const DUPLICATE_NAME: &str = "Category with this Name already exists.";

#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryWithCount>,
    /// Whether the list covers every user's categories, not only the caller's.
    pub can_manage_all: bool,
}

/// GET /api/v1/categories
///
/// The caller's own categories with image counts, or every category when the
/// caller can manage all of them.
pub async fn list_categories(
    State(state): State<AppState>,
    CurrentGrants(grants): CurrentGrants,
) -> AppResult<Json<DataResponse<CategoryListResponse>>> {
    let manage_all = can_manage_all_categories(&grants);
    let owner = if manage_all { None } else { Some(grants.user_id) };
    let categories = CategoryRepo::list_with_counts(&state.pool, owner).await?;

    Ok(Json(DataResponse {
        data: CategoryListResponse {
            categories,
            can_manage_all: manage_all,
        },
    }))
}

/// POST /api/v1/categories
pub async fn create_category(
    State(state): State<AppState>,
    CurrentGrants(grants): CurrentGrants,
    Json(input): Json<CategoryInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    let name = validate_category_name(&input.name)?;
    ensure_name_free(&state, &name, None).await?;

    let category = CategoryRepo::create(
        &state.pool,
        &CreateCategory {
            name,
            created_by: Some(grants.user_id),
        },
    )
    .await?;

    tracing::info!(user_id = grants.user_id, category_id = category.id, name = %category.name, "Category created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /api/v1/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    CurrentGrants(grants): CurrentGrants,
    IdPath(id): IdPath<DbId>,
    Json(input): Json<CategoryInput>,
) -> AppResult<Json<DataResponse<Category>>> {
    let existing = find_category(&state, id).await?;
    ensure_can_manage_category(&grants, id, existing.created_by)?;

    let name = validate_category_name(&input.name)?;
    ensure_name_free(&state, &name, Some(id)).await?;

    let category = CategoryRepo::rename(&state.pool, id, &name)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;

    tracing::info!(user_id = grants.user_id, category_id = id, name = %category.name, "Category renamed");
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/categories/{id}
///
/// Images in the category become uncategorized. Returns 204 No Content.
pub async fn delete_category(
    State(state): State<AppState>,
    CurrentGrants(grants): CurrentGrants,
    IdPath(id): IdPath<DbId>,
) -> AppResult<StatusCode> {
    let existing = find_category(&state, id).await?;
    ensure_can_manage_category(&grants, id, existing.created_by)?;

    if !CategoryRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }));
    }

    tracing::info!(user_id = grants.user_id, category_id = id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_category(state: &AppState, id: DbId) -> AppResult<Category> {
    CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))
}

/// 409 when another category already uses `name`. `current` is the category
/// being renamed, which may keep its own name.
async fn ensure_name_free(state: &AppState, name: &str, current: Option<DbId>) -> AppResult<()> {
    match CategoryRepo::find_by_name(&state.pool, name).await? {
        Some(other) if Some(other.id) != current => {
            Err(AppError::Core(CoreError::Conflict(DUPLICATE_NAME.into())))
        }
        _ => Ok(()),
    }
}
