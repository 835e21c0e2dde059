//! Core data model definitions shared across Gradientzoo crates.
//!
//! Everything here is plain data: the client store snapshot the navigation
//! header reads from, the public user record, and the fixed set of
//! navigation tabs.

pub mod ids;
pub mod state;
pub mod tab;
pub mod user;

pub use ids::UserId;
pub use state::{ApplicationState, Entities};
pub use tab::Tab;
pub use user::User;
