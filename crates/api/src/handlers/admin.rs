//! Handlers for the `/admin` resource: account approval, permission grants
//! and cross-user search.
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Query, State};
use axum::Json;
use imgview_core::error::CoreError;
use imgview_core::permissions::{parse_codenames, Grants};
use imgview_core::types::DbId;
use imgview_core::validation::parse_optional_id;
use imgview_db::models::category::CategoryWithCreator;
use imgview_db::models::image::ImageSearchParams;
use imgview_db::models::permission::PermissionRow;
use imgview_db::models::user::{User, UserResponse};
use imgview_db::repositories::{
    CategoryRepo, ImageRepo, PermissionRepo, RoleRepo, SessionRepo, UserRepo,
};
use serde::Deserialize;

use super::images::ImageView;
use crate::error::{AppError, AppResult};
use crate::extract::IdPath;
use crate::middleware::rbac::RequireAdmin;
use crate::query::SearchParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `PUT /admin/users/{id}/permissions`.
#[derive(Debug, Deserialize)]
pub struct SetPermissionsRequest {
    pub permissions: Vec<String>,
}

/// `GET /admin/images?search=&category=`
///
/// `category` is kept as text so `?category=` means "any".
#[derive(Debug, Deserialize)]
pub struct AdminImageSearchParams {
    pub search: Option<String>,
    pub category: Option<String>,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
///
/// Every account with its role and directly granted permissions.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;

    // Pre-fetch roles and grants to avoid N+1 queries.
    let roles = RoleRepo::list(&state.pool).await?;
    let grants = PermissionRepo::list_all_grants(&state.pool).await?;

    let responses = users
        .iter()
        .map(|u| {
            let role_name = roles
                .iter()
                .find(|r| r.id == u.role_id)
                .map(|r| r.name.clone())
                .unwrap_or_else(|| "unknown".to_string());
            let codenames: Vec<String> = grants
                .iter()
                .filter(|(user_id, _)| *user_id == u.id)
                .map(|(_, codename)| codename.clone())
                .collect();
            let effective = Grants::new(u.id, role_name.clone(), &codenames).effective();
            UserResponse::build(u, role_name, effective)
        })
        .collect();

    Ok(Json(DataResponse { data: responses }))
}

/// POST /api/v1/admin/users/{id}/activate
///
/// Approve a pending signup. Activating an active account is a no-op.
pub async fn activate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    IdPath(id): IdPath<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::set_active(&state.pool, id, true)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(admin_id = admin.user_id, user_id = id, "User activated");
    Ok(Json(DataResponse {
        data: user_to_response(&state, &user).await?,
    }))
}

/// POST /api/v1/admin/users/{id}/deactivate
///
/// Block the account and revoke its sessions. Admins cannot deactivate
/// themselves.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    IdPath(id): IdPath<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot deactivate your own account".into(),
        )));
    }

    let user = UserRepo::set_active(&state.pool, id, false)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(admin_id = admin.user_id, user_id = id, revoked, "User deactivated");
    Ok(Json(DataResponse {
        data: user_to_response(&state, &user).await?,
    }))
}

/// PUT /api/v1/admin/users/{id}/permissions
///
/// Replace the user's grants with exactly the listed codenames.
pub async fn set_user_permissions(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    IdPath(id): IdPath<DbId>,
    Json(input): Json<SetPermissionsRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let perms = parse_codenames(&input.permissions)?;
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    let granted = PermissionRepo::replace_for_user(&state.pool, id, &perms).await?;

    tracing::info!(
        admin_id = admin.user_id,
        user_id = id,
        permissions = ?granted,
        "User permissions replaced"
    );
    Ok(Json(DataResponse {
        data: user_to_response(&state, &user).await?,
    }))
}

/// GET /api/v1/admin/permissions
pub async fn list_permissions(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<PermissionRow>>>> {
    let perms = PermissionRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: perms }))
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/categories?search=
pub async fn search_categories(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<CategoryWithCreator>>>> {
    let categories = CategoryRepo::search(&state.pool, params.term()).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/admin/images?search=&category=
///
/// `search` matches the title or the uploader's username.
pub async fn search_images(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<AdminImageSearchParams>,
) -> AppResult<Json<DataResponse<Vec<ImageView>>>> {
    let search = ImageSearchParams {
        search: params.search,
        category: parse_optional_id("category", params.category.as_deref())?,
    };
    let images = ImageRepo::search(&state.pool, &search).await?;
    Ok(Json(DataResponse {
        data: images.into_iter().map(ImageView::from).collect(),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn user_to_response(state: &AppState, user: &User) -> AppResult<UserResponse> {
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    let codenames = PermissionRepo::codenames_for_user(&state.pool, user.id).await?;
    let effective = Grants::new(user.id, role.clone(), &codenames).effective();
    Ok(UserResponse::build(user, role, effective))
}
