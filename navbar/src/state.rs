//! State derived from the element's classes and the decision tables that act on it.

use crate::gesture::Direction;
use crate::options::{ForceToggle, Position};

/// Visible state of a sidebar, read back from its CSS classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SidebarState {
    Closed,
    Open,
    /// Open and pinned (force-open class present).
    ForceOpen,
}

impl SidebarState {
    /// `fully_opened` without `open` still reads as closed: a locked sidebar
    /// below the breakpoint keeps its force-open class while hidden.
    pub fn from_flags(open: bool, fully_opened: bool) -> Self {
        match (open, fully_opened) {
            (true, true) => SidebarState::ForceOpen,
            (true, false) => SidebarState::Open,
            (false, _) => SidebarState::Closed,
        }
    }

    pub fn is_open(self) -> bool {
        self != SidebarState::Closed
    }
}

/// Operation chosen by a decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Open,
    Close,
    ForceOpen,
    ForceClose,
}

/// What `toggle` does from `state`.
pub fn toggle_transition(
    state: SidebarState,
    over_breakpoint: bool,
    force_toggle: ForceToggle,
) -> Transition {
    match state {
        SidebarState::ForceOpen => Transition::ForceClose,
        SidebarState::Open if over_breakpoint && force_toggle.pins_open_sidebar() => {
            Transition::ForceOpen
        }
        SidebarState::Open => Transition::Close,
        SidebarState::Closed if over_breakpoint && force_toggle.is_always() => {
            Transition::ForceOpen
        }
        SidebarState::Closed => Transition::Open,
    }
}

/// Swipe directions that close and open a sidebar at `position`.
pub fn gesture_directions(position: Position) -> (Direction, Direction) {
    match position {
        Position::Left => (Direction::Left, Direction::Right),
        Position::Right => (Direction::Right, Direction::Left),
    }
}

/// What a committed swipe in `direction` does. Swipes along the vertical
/// axis, or closing swipes on a closed sidebar, do nothing.
pub fn swipe_transition(
    open: bool,
    direction: Direction,
    position: Position,
    over_breakpoint: bool,
    force_toggle: ForceToggle,
) -> Option<Transition> {
    let (close_gesture, open_gesture) = gesture_directions(position);

    if open && direction == close_gesture {
        return Some(Transition::ForceClose);
    }
    if direction != open_gesture {
        return None;
    }

    let pins = force_toggle.is_always() || (open && force_toggle.pins_open_sidebar());
    if over_breakpoint && pins {
        Some(Transition::ForceOpen)
    } else {
        Some(Transition::Open)
    }
}
