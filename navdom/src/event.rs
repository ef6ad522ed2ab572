use crate::element::NodeId;

/// Where an event is dispatched or a listener is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Document,
    Node(NodeId),
}

impl EventTarget {
    pub fn node(&self) -> Option<NodeId> {
        match self {
            EventTarget::Node(id) => Some(*id),
            _ => None,
        }
    }
}

/// Event types understood by the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    TouchStart,
    MouseOver,
    KeyUp,
    Resize,
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::TouchStart => "touchstart",
            EventKind::MouseOver => "mouseover",
            EventKind::KeyUp => "keyup",
            EventKind::Resize => "resize",
            EventKind::PointerDown => "pointerdown",
            EventKind::PointerMove => "pointermove",
            EventKind::PointerUp => "pointerup",
            EventKind::PointerCancel => "pointercancel",
        }
    }

    /// Whether the event travels from its target up through the ancestors.
    pub fn bubbles(self) -> bool {
        !matches!(self, EventKind::Resize)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input device behind a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerType {
    #[default]
    Mouse,
    Touch,
    Pen,
}

/// Payload carried by an event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EventDetail {
    #[default]
    None,
    Key {
        key: Key,
        modifiers: Modifiers,
    },
    Pointer {
        x: f64,
        y: f64,
        pointer_type: PointerType,
    },
}

/// A dispatched event. Listeners flip the propagation and default flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub target: EventTarget,
    pub current_target: EventTarget,
    pub detail: EventDetail,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    pub fn new(kind: EventKind, target: EventTarget) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            detail: EventDetail::None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn click(node: NodeId) -> Self {
        Self::new(EventKind::Click, EventTarget::Node(node))
    }

    pub fn touch_start(node: NodeId) -> Self {
        Self::new(EventKind::TouchStart, EventTarget::Node(node))
    }

    pub fn mouse_over(node: NodeId) -> Self {
        Self::new(EventKind::MouseOver, EventTarget::Node(node))
    }

    pub fn resize() -> Self {
        Self::new(EventKind::Resize, EventTarget::Window)
    }

    pub fn key_up(key: Key, modifiers: Modifiers) -> Self {
        let mut event = Self::new(EventKind::KeyUp, EventTarget::Window);
        event.detail = EventDetail::Key { key, modifiers };
        event
    }

    pub fn pointer(kind: EventKind, node: NodeId, x: f64, y: f64, pointer_type: PointerType) -> Self {
        let mut event = Self::new(kind, EventTarget::Node(node));
        event.detail = EventDetail::Pointer { x, y, pointer_type };
        event
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn key(&self) -> Option<(Key, Modifiers)> {
        match self.detail {
            EventDetail::Key { key, modifiers } => Some((key, modifiers)),
            _ => None,
        }
    }

    pub fn pointer_position(&self) -> Option<(f64, f64, PointerType)> {
        match self.detail {
            EventDetail::Pointer { x, y, pointer_type } => Some((x, y, pointer_type)),
            _ => None,
        }
    }
}

/// Simplified key representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    F(u8),
    Unidentified,
}

impl Key {
    /// Legacy DOM `keyCode` of the key. Letters map to their upper case ASCII
    /// code, so `Char('s')` and `Char('S')` both report 83.
    pub fn key_code(self) -> u32 {
        match self {
            Key::Char(c) if c.is_ascii_alphanumeric() => c.to_ascii_uppercase() as u32,
            Key::Char(' ') => 32,
            Key::Char(_) => 0,
            Key::Backspace => 8,
            Key::Tab => 9,
            Key::Enter => 13,
            Key::Escape => 27,
            Key::PageUp => 33,
            Key::PageDown => 34,
            Key::End => 35,
            Key::Home => 36,
            Key::Left => 37,
            Key::Up => 38,
            Key::Right => 39,
            Key::Down => 40,
            Key::Insert => 45,
            Key::Delete => 46,
            Key::F(n) => 111 + n as u32,
            Key::Unidentified => 0,
        }
    }
}

/// Key modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Default::default()
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Default::default()
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Default::default()
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn none(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt
    }
}

// Conversion from crossterm types
impl From<crossterm::event::KeyCode> for Key {
    fn from(code: crossterm::event::KeyCode) -> Self {
        use crossterm::event::KeyCode;
        match code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Tab | KeyCode::BackTab => Key::Tab,
            KeyCode::Esc => Key::Escape,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::Insert => Key::Insert,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Unidentified,
        }
    }
}

impl From<crossterm::event::KeyModifiers> for Modifiers {
    fn from(mods: crossterm::event::KeyModifiers) -> Self {
        use crossterm::event::KeyModifiers;
        Self {
            shift: mods.contains(KeyModifiers::SHIFT),
            ctrl: mods.contains(KeyModifiers::CONTROL),
            alt: mods.contains(KeyModifiers::ALT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_key_codes_ignore_case() {
        assert_eq!(Key::Char('s').key_code(), 83);
        assert_eq!(Key::Char('S').key_code(), 83);
        assert_eq!(Key::Char('7').key_code(), 55);
        assert_eq!(Key::F(1).key_code(), 112);
    }

    #[test]
    fn crossterm_modifiers_convert() {
        use crossterm::event::KeyModifiers;
        let mods = Modifiers::from(KeyModifiers::CONTROL | KeyModifiers::ALT);
        assert_eq!(mods, Modifiers::ctrl().with_alt());
    }

    #[test]
    fn flags_start_clear() {
        let mut event = Event::resize();
        assert!(!event.default_prevented());
        assert!(!event.propagation_stopped());
        event.prevent_default();
        event.stop_propagation();
        assert!(event.default_prevented());
        assert!(event.propagation_stopped());
    }
}
