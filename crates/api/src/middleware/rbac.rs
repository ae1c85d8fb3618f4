//! Permission-aware extractors.
//!
//! Roles and permission grants can change while an access token is still
//! valid, so both are loaded fresh from the database here rather than taken
//! from the token claims.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use imgview_core::error::CoreError;
use imgview_core::permissions::Grants;
use imgview_db::repositories::{PermissionRepo, RoleRepo, UserRepo};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// The caller's current authorization state.
///
/// Rejects with 401 when the token is missing or invalid, when the user no
/// longer exists, or when the account has been deactivated.
///
/// ```ignore
/// async fn delete_thing(CurrentGrants(grants): CurrentGrants) -> AppResult<StatusCode> {
///     ensure_can_manage_image(&grants, id, image.created_by)?;
///     Ok(StatusCode::NO_CONTENT)
/// }
/// ```
pub struct CurrentGrants(pub Grants);

impl FromRequestParts<AppState> for CurrentGrants {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;

        let user = UserRepo::find_by_id(&state.pool, auth.user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Account not found or inactive".into(),
                ))
            })?;

        let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
        let codenames = PermissionRepo::codenames_for_user(&state.pool, user.id).await?;

        Ok(CurrentGrants(Grants::new(user.id, role, &codenames)))
    }
}

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequireAdmin(pub Grants);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentGrants(grants) = CurrentGrants::from_request_parts(parts, state).await?;
        if !grants.is_admin() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(grants))
    }
}
