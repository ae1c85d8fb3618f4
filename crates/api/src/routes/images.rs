//! Route definitions for the `/images` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::images;
use crate::state::AppState;

/// Routes mounted at `/images`.
///
/// Reads are public; writes require the owner or `can_manage_all_images`
/// (enforced by handler extractors).
///
/// ```text
/// GET    /                -> list_images
/// POST   /                -> upload_image (multipart)
/// GET    /{id}            -> get_image
/// PUT    /{id}            -> update_image (multipart)
/// DELETE /{id}            -> delete_image
/// PUT    /{id}/category   -> update_image_category
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(images::list_images).post(images::upload_image))
        .route(
            "/{id}",
            get(images::get_image)
                .put(images::update_image)
                .delete(images::delete_image),
        )
        .route("/{id}/category", put(images::update_image_category))
}
