//! View logic for the Gradientzoo web client.
//!
//! Views are pure functions from an explicit state snapshot to a view
//! tree. Interaction flows back as messages, which `update` functions turn
//! into calls on host-provided action dispatchers.

pub mod header_ui;
pub mod views;

pub use header_ui::{
    Dispatchers, LinkEvent, NavAction, NavActions, NavMessage,
    RecordedActions, update_nav_header,
};
pub use views::header::{
    LinkTarget, NavHeader, NavHeaderProps, NavLink, NavSlot, SlotKind,
    view_nav_header,
};
