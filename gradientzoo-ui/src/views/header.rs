use gradientzoo_model::{ApplicationState, Tab, User};
use serde::Serialize;

use crate::header_ui::NavMessage;

pub const MASTHEAD_TITLE: &str = "Gradientzoo";

/// Inputs of one render pass of the navigation header.
///
/// Built fresh from the store snapshot every time; nothing here outlives
/// the render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavHeaderProps {
    pub active_tab: Option<Tab>,
    pub is_logged_in: bool,
    pub auth_user: Option<User>,
}

impl NavHeaderProps {
    pub fn from_state(state: &ApplicationState, active_tab: Option<Tab>) -> Self {
        Self {
            active_tab,
            is_logged_in: state.is_logged_in(),
            auth_user: state.auth_user().cloned(),
        }
    }

    /// Same as [`NavHeaderProps::from_state`] for pages that pass the raw
    /// tab tag. Unrecognized tags highlight nothing.
    pub fn from_state_tag(state: &ApplicationState, tag: Option<&str>) -> Self {
        Self::from_state(state, tag.and_then(Tab::from_tag))
    }

    fn is_active(&self, tab: Tab) -> bool {
        self.active_tab == Some(tab)
    }
}

/// Where activating a link leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum LinkTarget {
    /// Client-side route change.
    Route(String),
    /// Intercepted by the header and fed to `update_nav_header`.
    Message(NavMessage),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: String,
    pub target: LinkTarget,
}

impl NavLink {
    fn route(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: LinkTarget::Route(path.into()),
        }
    }

    fn message(label: impl Into<String>, message: NavMessage) -> Self {
        Self {
            label: label.into(),
            target: LinkTarget::Message(message),
        }
    }

    pub fn href(&self) -> Option<&str> {
        match &self.target {
            LinkTarget::Route(path) => Some(path),
            LinkTarget::Message(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    Home,
    CreateModel,
    Profile,
    Login,
    /// Holds either "Logout" or "Sign Up".
    Account,
}

/// One `<li>` of the nav list.
///
/// The login slot stays in the list even when it has no link, so the
/// account slot keeps its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavSlot {
    pub kind: SlotKind,
    pub active: bool,
    pub link: Option<NavLink>,
}

/// Rendered navigation header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavHeader {
    pub title: String,
    pub slots: Vec<NavSlot>,
}

impl NavHeader {
    pub fn slot(&self, kind: SlotKind) -> Option<&NavSlot> {
        self.slots.iter().find(|slot| slot.kind == kind)
    }

    pub fn links(&self) -> impl Iterator<Item = &NavLink> {
        self.slots.iter().filter_map(|slot| slot.link.as_ref())
    }

    pub fn link(&self, label: &str) -> Option<&NavLink> {
        self.links().find(|link| link.label == label)
    }

    pub fn active_slots(&self) -> impl Iterator<Item = &NavSlot> {
        self.slots.iter().filter(|slot| slot.active)
    }
}

pub fn view_nav_header(props: &NavHeaderProps) -> NavHeader {
    let mut slots = Vec::with_capacity(5);

    slots.push(NavSlot {
        kind: SlotKind::Home,
        active: props.is_active(Tab::Home),
        link: Some(NavLink::route("Home", "/")),
    });

    if props.is_logged_in {
        slots.push(NavSlot {
            kind: SlotKind::CreateModel,
            active: props.is_active(Tab::CreateModel),
            link: Some(NavLink::route("Create Model", "/create-model")),
        });
    }

    if let Some(user) = &props.auth_user {
        slots.push(NavSlot {
            kind: SlotKind::Profile,
            active: props.is_active(Tab::Profile),
            link: Some(NavLink::route(user.username.clone(), user.profile_path())),
        });
    }

    slots.push(NavSlot {
        kind: SlotKind::Login,
        active: props.is_active(Tab::Login),
        link: (!props.is_logged_in).then(|| NavLink::route("Login", "/login")),
    });

    let account = if props.is_logged_in {
        NavLink::message("Logout", NavMessage::Logout)
    } else {
        NavLink::route("Sign Up", "/register")
    };
    slots.push(NavSlot {
        kind: SlotKind::Account,
        active: props.is_active(Tab::Register),
        link: Some(account),
    });

    NavHeader {
        title: MASTHEAD_TITLE.to_string(),
        slots,
    }
}
