//! Route definitions for the `/admin` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET  /users                    -> list_users
/// POST /users/{id}/activate      -> activate_user
/// POST /users/{id}/deactivate    -> deactivate_user
/// PUT  /users/{id}/permissions   -> set_user_permissions
/// GET  /permissions              -> list_permissions
/// GET  /categories               -> search_categories
/// GET  /images                   -> search_images
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}/activate", post(admin::activate_user))
        .route("/users/{id}/deactivate", post(admin::deactivate_user))
        .route("/users/{id}/permissions", put(admin::set_user_permissions))
        .route("/permissions", get(admin::list_permissions))
        .route("/categories", get(admin::search_categories))
        .route("/images", get(admin::search_images))
}
