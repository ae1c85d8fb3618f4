//! Shared response envelope.
//!
//! Resource payloads are wrapped as `{ "data": ... }`. Token responses from
//! `/auth` are the one exception and are returned bare.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: categories }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
