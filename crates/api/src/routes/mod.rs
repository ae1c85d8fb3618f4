pub mod admin;
pub mod auth;
pub mod categories;
pub mod health;
pub mod images;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                         register, pending approval (public)
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (requires auth)
/// /auth/me                             current user (requires auth)
///
/// /images                              list (public), upload
/// /images/{id}                         detail + slideshow (public), edit, delete
/// /images/{id}/category                re-categorize
///
/// /categories                          list, create
/// /categories/{id}                     rename, delete
///
/// /admin/users                         list (admin only)
/// /admin/users/{id}/activate           approve signup
/// /admin/users/{id}/deactivate         block account
/// /admin/users/{id}/permissions        replace grants
/// /admin/permissions                   permission catalogue
/// /admin/categories                    search categories
/// /admin/images                        search images
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/images", images::router())
        .nest("/categories", categories::router())
        .nest("/admin", admin::router())
}
