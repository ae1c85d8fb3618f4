use crate::types::DbId;

/// Domain error shared by every layer of the gallery.
///
/// The HTTP layer maps each variant to a status code; nothing here knows
/// about HTTP.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A category, image or user id that does not exist.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Form input rejected before it reached storage.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A uniqueness rule (category name, username) would be broken.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No identity, or an identity that can no longer be trusted.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but neither owner nor holder of the matching
    /// manage-all permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
