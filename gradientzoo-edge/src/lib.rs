//! # Gradientzoo edge server
//!
//! Front door for the Gradientzoo web client. Requests flow through a short
//! pipeline:
//!
//! 1. responses are compressed when the client accepts it
//! 2. `/static/*` is served from the built asset directory
//! 3. `/api/*` is reverse-proxied to the API service
//! 4. everything else requires HTTP basic auth
//! 5. and is answered with the single-page-application shell

pub mod errors;
pub mod handlers;
pub mod infra;
pub mod proxy;
pub mod routes;
pub mod server;

pub use infra::app_state::AppState;
pub use routes::create_app;
