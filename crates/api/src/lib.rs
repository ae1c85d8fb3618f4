//! imgview API server library.
//!
//! Exposes config, state, error handling, auth and routes so integration
//! tests and the binary entrypoint build the exact same application.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod media;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
