//! Read-only snapshot of the client store.
//!
//! Views never reach into global state; the host hands them an
//! [`ApplicationState`] and they derive what they need from it.

use std::collections::HashMap;

use crate::{ids::UserId, user::User};

/// The slice of client state the web front reads.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ApplicationState {
    #[cfg_attr(feature = "serde", serde(default))]
    pub auth_user_id: Option<UserId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub entities: Entities,
}

/// Normalized entity tables, keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entities {
    #[cfg_attr(feature = "serde", serde(default))]
    pub users: HashMap<UserId, User>,
}

impl ApplicationState {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Snapshot with `user` stored and marked as the authenticated account.
    pub fn logged_in_as(user: User) -> Self {
        let mut state = Self {
            auth_user_id: Some(user.id.clone()),
            ..Self::default()
        };
        state.insert_user(user);
        state
    }

    pub fn insert_user(&mut self, user: User) {
        self.entities.users.insert(user.id.clone(), user);
    }

    /// True iff the auth id is present and non-empty.
    pub fn is_logged_in(&self) -> bool {
        self.auth_user_id.as_ref().is_some_and(|id| !id.is_empty())
    }

    /// Record of the authenticated user, if the store has it loaded.
    pub fn auth_user(&self) -> Option<&User> {
        let id = self.auth_user_id.as_ref().filter(|id| !id.is_empty())?;
        self.entities.users.get(id)
    }
}
