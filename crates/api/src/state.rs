use std::sync::Arc;

use crate::config::ServerConfig;
use crate::media::MediaStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference-counted and everything else sits
/// behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: imgview_db::DbPool,
    /// Server configuration (JWT secrets, media root, limits).
    pub config: Arc<ServerConfig>,
    /// On-disk store for uploaded image files.
    pub media: Arc<MediaStore>,
}
