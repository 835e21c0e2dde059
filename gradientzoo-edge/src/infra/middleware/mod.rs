//! Middleware for the edge server.

pub mod basic_auth;

pub use basic_auth::{BasicAuthLayer, BasicAuthMiddleware, DEFAULT_REALM};
