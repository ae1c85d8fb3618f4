//! Request extractors whose rejections use the JSON error envelope.

use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, Path};

use crate::error::AppError;

/// [`Path`] that renders extraction failures as [`AppError`].
///
/// A segment that does not parse (`/images/abc`) is a 404, the same as an
/// id that matches no row.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct IdPath<T>(pub T);

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(_) => {
                AppError::NotFound("Resource not found".into())
            }
            other => AppError::InternalError(other.body_text()),
        }
    }
}
