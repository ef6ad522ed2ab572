//! Collapsible sidebar controller.
//!
//! A [`Sidebar`] wraps one element of a [`navdom::Document`] and keeps its
//! open / closed / locked / force-open state as CSS classes on that element.
//! [`Sidebars`] is the page-level registry: it owns the document, routes
//! events and timers to the sidebar that registered for them, and keeps at
//! most one sidebar open at a time.

pub mod error;
pub mod gesture;
pub mod options;
pub mod plugin;
pub mod scroller;
pub mod sidebar;
pub mod state;

pub use error::SidebarError;
pub use gesture::{Direction, PanEvent, PanPhase, PanRecognizer};
pub use options::{
    ClassNames, ForceToggle, GestureOptions, KeyboardShortcut, Position, ScrollerOptions,
    SidebarOptions,
};
pub use plugin::{Command, CommandOutput, Sidebars};
pub use scroller::{ClassScroller, Scroller, ScrollerFactory};
pub use sidebar::{Handler, Sidebar};
pub use state::{SidebarState, Transition};
