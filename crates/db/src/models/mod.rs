//! Row structs and DTOs.
//!
//! Each submodule holds the `FromRow` struct(s) for one table (joined views
//! included) and the input DTOs its repository accepts.

pub mod category;
pub mod image;
pub mod permission;
pub mod role;
pub mod session;
pub mod user;
