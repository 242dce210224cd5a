//! Insight widget API server library.
//!
//! Exposes config, state, error handling, the router builder and routes so
//! integration tests and the binary entrypoint share the same wiring.

pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
