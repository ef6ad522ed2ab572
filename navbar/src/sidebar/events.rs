//! Event and timer entry points of the sidebar.

use std::str::FromStr;
use std::time::Duration;

use log::trace;
use navdom::{Document, Event, EventTarget, FiredTimer, HandlerId, NodeId};

use super::{CLASS_SWIPE, Sidebar};
use crate::error::SidebarError;

/// Delay before transitions are restored once a resize starts. Further
/// resizes during the delay do not extend it.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(500);

const TIMER_RESIZE: &str = "resize";

/// Listener routines a sidebar registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    /// Click or tap on the toggle element.
    Toggle,
    /// Mouse over the toggle element.
    HoverOpen,
    /// Click or tap anywhere on the page while open.
    CloseExternal,
    /// Window keyup.
    Keyboard,
    /// Window resize.
    Resize,
    /// Pointer input feeding the pan recognizer.
    Pan,
}

impl Handler {
    pub fn as_str(self) -> &'static str {
        match self {
            Handler::Toggle => "toggle",
            Handler::HoverOpen => "hoverOpen",
            Handler::CloseExternal => "closeExternal",
            Handler::Keyboard => "keyboardAction",
            Handler::Resize => "resizeWindow",
            Handler::Pan => "pan",
        }
    }
}

impl FromStr for Handler {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Handler::Toggle,
            Handler::HoverOpen,
            Handler::CloseExternal,
            Handler::Keyboard,
            Handler::Resize,
            Handler::Pan,
        ]
        .into_iter()
        .find(|h| h.as_str() == s)
        .ok_or_else(|| format!("unknown handler '{s}'"))
    }
}

impl From<Handler> for HandlerId {
    fn from(handler: Handler) -> Self {
        HandlerId::new(handler.as_str())
    }
}

impl Sidebar {
    /// Run `handler` for an event the sidebar registered for.
    pub fn handle(
        &mut self,
        doc: &mut Document,
        peers: &mut [&mut Sidebar],
        handler: Handler,
        event: &mut Event,
    ) -> Result<(), SidebarError> {
        trace!("sidebar {} handles {} with {:?}", self.guid, event.kind, handler);
        match handler {
            Handler::Toggle => {
                event.stop_propagation();
                event.prevent_default();
                self.toggle(doc, peers)
            }
            Handler::HoverOpen => self.open(doc, peers),
            Handler::CloseExternal => self.close_external(doc, event),
            Handler::Keyboard => self.keyboard_action(doc, peers, event),
            Handler::Resize => self.resize_window(doc, peers, event),
            Handler::Pan => self.pointer_input(doc, peers, event),
        }
    }

    /// Run the work scheduled by a timer this sidebar set.
    pub fn on_timer(&mut self, doc: &mut Document, timer: &FiredTimer) -> Result<(), SidebarError> {
        if timer.tag == TIMER_RESIZE && self.resize_delay == Some(timer.id) {
            self.resize_delay = None;
            self.set_transition(doc, "")?;
        }
        Ok(())
    }

    fn keyboard_action(
        &mut self,
        doc: &mut Document,
        peers: &mut [&mut Sidebar],
        event: &Event,
    ) -> Result<(), SidebarError> {
        if self.options.disabled_keyboard {
            return Ok(());
        }
        match event.key() {
            Some((key, modifiers)) if self.options.keyboard.matches(key, modifiers) => {
                self.toggle(doc, peers)
            }
            _ => Ok(()),
        }
    }

    /// Whether `node` is part of the sidebar area (wrapper or swipe zone).
    fn is_inside(&self, doc: &Document, node: NodeId) -> bool {
        doc.has_class(node, CLASS_SWIPE)
            || doc.closest_with_class(node, &self.options.classes.wrapper).is_some()
    }

    /// Dismiss on an interaction outside the sidebar.
    fn close_external(&mut self, doc: &mut Document, event: &mut Event) -> Result<(), SidebarError> {
        let over = self.is_over_min_width(doc);
        let active = match event.current_target {
            EventTarget::Document => doc.active_element(),
            _ => None,
        };
        let inside = active
            .into_iter()
            .chain(event.target.node())
            .any(|node| self.is_inside(doc, node));

        if (self.is_locked() && over) || inside || self.mouse_drag_end {
            self.mouse_drag_end = false;
            return Ok(());
        }

        event.stop_propagation();
        event.prevent_default();

        if over {
            self.close(doc)
        } else {
            self.force_close(doc)
        }
    }

    fn resize_window(
        &mut self,
        doc: &mut Document,
        peers: &mut [&mut Sidebar],
        event: &mut Event,
    ) -> Result<(), SidebarError> {
        self.set_transition(doc, "none")?;

        if self.is_over_min_width(doc) && self.is_locked() {
            self.force_open(doc, peers)?;
        } else {
            self.close_external(doc, event)?;
        }

        if self.resize_delay.is_none() {
            self.resize_delay = Some(doc.set_timeout(RESIZE_DEBOUNCE, self.guid, TIMER_RESIZE));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_names_parse() {
        for handler in [Handler::Toggle, Handler::CloseExternal, Handler::Pan] {
            assert_eq!(handler.as_str().parse::<Handler>(), Ok(handler));
        }
        assert!("nope".parse::<Handler>().is_err());
    }
}
