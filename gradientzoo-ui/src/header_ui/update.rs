use tracing::debug;

use super::NavMessage;

/// Route the client lands on after logging out.
pub const HOME_ROUTE: &str = "/";

/// Action dispatchers the host injects into the header.
pub trait NavActions {
    /// Clear the session in the client store.
    fn logout(&mut self);
    /// Client-side route change.
    fn navigate(&mut self, path: &str);
}

/// Adapts a pair of closures into [`NavActions`].
#[derive(Debug, Clone)]
pub struct Dispatchers<L, N> {
    logout: L,
    navigate: N,
}

impl<L, N> Dispatchers<L, N>
where
    L: FnMut(),
    N: FnMut(&str),
{
    pub fn new(logout: L, navigate: N) -> Self {
        Self { logout, navigate }
    }
}

impl<L, N> NavActions for Dispatchers<L, N>
where
    L: FnMut(),
    N: FnMut(&str),
{
    fn logout(&mut self) {
        (self.logout)()
    }

    fn navigate(&mut self, path: &str) {
        (self.navigate)(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    Logout,
    Navigate(String),
}

/// Collects dispatched actions for hosts that apply them after `update`.
#[derive(Debug, Default)]
pub struct RecordedActions {
    actions: Vec<NavAction>,
}

impl RecordedActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> &[NavAction] {
        &self.actions
    }

    pub fn drain(&mut self) -> Vec<NavAction> {
        std::mem::take(&mut self.actions)
    }
}

impl NavActions for RecordedActions {
    fn logout(&mut self) {
        self.actions.push(NavAction::Logout);
    }

    fn navigate(&mut self, path: &str) {
        self.actions.push(NavAction::Navigate(path.to_string()));
    }
}

/// The browser event behind a link activation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinkEvent {
    default_prevented: bool,
}

impl LinkEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

pub fn update_nav_header<A>(
    message: NavMessage,
    event: &mut LinkEvent,
    actions: &mut A,
) where
    A: NavActions + ?Sized,
{
    match message {
        NavMessage::Logout => {
            event.prevent_default();
            debug!(message = message.name(), "navigation header logout");
            actions.logout();
            actions.navigate(HOME_ROUTE);
        }
    }
}
