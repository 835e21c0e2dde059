pub mod update;

use serde::Serialize;

pub use update::{
    Dispatchers, HOME_ROUTE, LinkEvent, NavAction, NavActions, RecordedActions,
    update_nav_header,
};

/// Interactions the navigation header handles itself instead of leaving
/// them to the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavMessage {
    Logout,
}

impl NavMessage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Logout => "logout",
        }
    }
}
