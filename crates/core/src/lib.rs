//! Domain rules for the imgview gallery.
//!
//! Nothing in this crate touches the database or HTTP. It holds the shared
//! id/timestamp types, the error enum every layer converts into, and the
//! pure rules (permissions, form validation, pagination, slideshow ordering,
//! upload sniffing) that handlers apply before and after repository calls.

pub mod error;
pub mod pagination;
pub mod permissions;
pub mod roles;
pub mod slideshow;
pub mod storage;
pub mod types;
pub mod validation;
