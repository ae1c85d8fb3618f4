//! Credentials and tokens.
//!
//! - [`password`] -- Argon2id hashing and verification.
//! - [`jwt`] -- access-token signing/validation and refresh-token helpers.

pub mod jwt;
pub mod password;
