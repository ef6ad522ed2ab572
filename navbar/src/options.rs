//! Sidebar configuration.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::warn;
use navdom::{Key, Modifiers};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Side of the viewport the sidebar is attached to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Left,
    Right,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Left => f.write_str("left"),
            Position::Right => f.write_str("right"),
        }
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Position::Left),
            "right" => Ok(Position::Right),
            other => Err(format!("unknown position '{other}'")),
        }
    }
}

/// How toggling behaves above the breakpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ForceToggle {
    /// Toggle only opens and closes.
    #[default]
    No,
    /// Toggling an open sidebar above the breakpoint pins it (force-open).
    Force,
    /// Like `Force`, and opening a closed sidebar above the breakpoint pins it
    /// directly.
    Always,
}

impl ForceToggle {
    /// `Force` or `Always`.
    pub fn pins_open_sidebar(self) -> bool {
        matches!(self, ForceToggle::Force | ForceToggle::Always)
    }

    pub fn is_always(self) -> bool {
        self == ForceToggle::Always
    }
}

impl FromStr for ForceToggle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "false" | "no" => Ok(ForceToggle::No),
            "true" | "force" => Ok(ForceToggle::Force),
            "always" => Ok(ForceToggle::Always),
            other => Err(format!("unknown force toggle mode '{other}'")),
        }
    }
}

// Accepts `false`, `true` or `"always"`.
impl<'de> Deserialize<'de> for ForceToggle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Mode(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(false) => Ok(ForceToggle::No),
            Raw::Flag(true) => Ok(ForceToggle::Force),
            Raw::Mode(mode) => mode.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Keyboard shortcut toggling the sidebar. Modifiers must match exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct KeyboardShortcut {
    #[serde(rename = "ctrlKey")]
    pub ctrl: bool,
    #[serde(rename = "shiftKey")]
    pub shift: bool,
    #[serde(rename = "altKey")]
    pub alt: bool,
    /// Legacy DOM key code, see [`Key::key_code`].
    #[serde(rename = "keyCode")]
    pub key_code: u32,
}

impl Default for KeyboardShortcut {
    /// Ctrl+Alt+S
    fn default() -> Self {
        Self {
            ctrl: true,
            shift: false,
            alt: true,
            key_code: 'S' as u32,
        }
    }
}

impl KeyboardShortcut {
    pub fn matches(&self, key: Key, modifiers: Modifiers) -> bool {
        modifiers.shift == self.shift
            && modifiers.ctrl == self.ctrl
            && modifiers.alt == self.alt
            && key.key_code() == self.key_code
    }
}

/// Options passed to the scroller collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollerOptions {
    pub content_selector: String,
    #[serde(rename = "scrollerStickyHeader")]
    pub sticky_header: bool,
    pub sticky_selector: String,
    /// Draw the scrollbar on the inner (left) side. Set for right sidebars.
    pub scrollbar_inverse: bool,
}

impl Default for ScrollerOptions {
    fn default() -> Self {
        Self {
            content_selector: ".sidebar-menu".to_string(),
            sticky_header: true,
            sticky_selector: "> .sidebar-menu > .sidebar-group > span".to_string(),
            scrollbar_inverse: false,
        }
    }
}

/// Pan recognizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GestureOptions {
    /// Minimal distance, in pixels, before a pan starts.
    pub threshold: f64,
    pub enable: bool,
}

impl Default for GestureOptions {
    fn default() -> Self {
        Self {
            threshold: 10.0,
            enable: true,
        }
    }
}

/// CSS class hooks shared with the page stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassNames {
    #[serde(rename = "classWrapper")]
    pub wrapper: String,
    #[serde(rename = "classContainer")]
    pub container: String,
    #[serde(rename = "classOpen")]
    pub open: String,
    #[serde(rename = "classLocked")]
    pub locked: String,
    #[serde(rename = "classForceOpen")]
    pub force_open: String,
    #[serde(rename = "classOnDragging")]
    pub on_dragging: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            wrapper: "sidebar-wrapper".to_string(),
            container: "container-main".to_string(),
            open: "sidebar-open".to_string(),
            locked: "sidebar-locked".to_string(),
            force_open: "sidebar-force-open".to_string(),
            on_dragging: "sidebar-dragging".to_string(),
        }
    }
}

impl ClassNames {
    /// Marker added to the element while the initial open state is pending.
    pub fn open_init(&self) -> String {
        format!("{}-init", self.open)
    }

    pub fn locked_toggle(&self) -> String {
        format!("{}-toggle", self.locked)
    }

    pub fn force_open_toggle(&self) -> String {
        format!("{}-toggle", self.force_open)
    }
}

/// Sidebar configuration.
///
/// Deserializes from the camelCase object a page would pass, e.g.
/// `{"locked": true, "minLockWidth": 1200, "forceToggle": "always"}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SidebarOptions {
    #[serde(flatten)]
    pub classes: ClassNames,
    pub force_toggle: ForceToggle,
    /// Pinned open above the breakpoint.
    pub locked: bool,
    pub position: Position,
    /// Breakpoint, in pixels, from which lock behavior applies.
    pub min_lock_width: u32,
    pub toggle_id: Option<String>,
    pub toggle_open_on_hover: bool,
    pub draggable: bool,
    pub use_scroller: bool,
    pub scroller: ScrollerOptions,
    #[serde(alias = "hammer")]
    pub gesture: GestureOptions,
    pub disabled_keyboard: bool,
    #[serde(rename = "keyboardEvent")]
    pub keyboard: KeyboardShortcut,
}

impl Default for SidebarOptions {
    fn default() -> Self {
        Self {
            classes: ClassNames::default(),
            force_toggle: ForceToggle::No,
            locked: false,
            position: Position::Left,
            min_lock_width: 992,
            toggle_id: None,
            toggle_open_on_hover: false,
            draggable: true,
            use_scroller: true,
            scroller: ScrollerOptions::default(),
            gesture: GestureOptions::default(),
            disabled_keyboard: false,
            keyboard: KeyboardShortcut::default(),
        }
    }
}

impl SidebarOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn min_lock_width(mut self, width: u32) -> Self {
        self.min_lock_width = width;
        self
    }

    pub fn toggle_id(mut self, id: impl Into<String>) -> Self {
        self.toggle_id = Some(id.into());
        self
    }

    pub fn toggle_open_on_hover(mut self, enabled: bool) -> Self {
        self.toggle_open_on_hover = enabled;
        self
    }

    pub fn force_toggle(mut self, mode: ForceToggle) -> Self {
        self.force_toggle = mode;
        self
    }

    pub fn draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn use_scroller(mut self, enabled: bool) -> Self {
        self.use_scroller = enabled;
        self
    }

    pub fn disabled_keyboard(mut self, disabled: bool) -> Self {
        self.disabled_keyboard = disabled;
        self
    }

    pub fn keyboard(mut self, shortcut: KeyboardShortcut) -> Self {
        self.keyboard = shortcut;
        self
    }

    /// Defaults overridden by an element's `data-*` attributes (prefix
    /// stripped, kebab-case: `min-lock-width`, `toggle-id`, `class-open`, ...).
    /// `keyboard-event`, `scroller` and `hammer` hold JSON objects.
    /// Unknown keys and unparsable values are skipped with a warning.
    pub fn from_dataset(dataset: &BTreeMap<String, String>) -> Self {
        let mut options = Self::default();
        for (key, value) in dataset {
            if let Err(reason) = options.apply_data(key, value) {
                warn!("ignoring data-{key}=\"{value}\": {reason}");
            }
        }
        options
    }

    fn apply_data(&mut self, key: &str, value: &str) -> Result<(), String> {
        fn flag(value: &str) -> Result<bool, String> {
            match value {
                "true" | "" => Ok(true),
                "false" => Ok(false),
                other => Err(format!("expected a boolean, got '{other}'")),
            }
        }

        fn json<T: DeserializeOwned>(value: &str) -> Result<T, String> {
            serde_json::from_str(value).map_err(|e| format!("{e}"))
        }

        match key {
            // Marker attribute read by the data-API itself.
            "sidebar" => {}
            "locked" => self.locked = flag(value)?,
            "position" => self.position = value.parse()?,
            "min-lock-width" => {
                self.min_lock_width = value.parse().map_err(|e| format!("{e}"))?;
            }
            "toggle-id" => self.toggle_id = Some(value.to_string()),
            "toggle-open-on-hover" => self.toggle_open_on_hover = flag(value)?,
            "force-toggle" => self.force_toggle = value.parse()?,
            "draggable" => self.draggable = flag(value)?,
            "use-scroller" => self.use_scroller = flag(value)?,
            "disabled-keyboard" => self.disabled_keyboard = flag(value)?,
            "class-wrapper" => self.classes.wrapper = value.to_string(),
            "class-container" => self.classes.container = value.to_string(),
            "class-open" => self.classes.open = value.to_string(),
            "class-locked" => self.classes.locked = value.to_string(),
            "class-force-open" => self.classes.force_open = value.to_string(),
            "class-on-dragging" => self.classes.on_dragging = value.to_string(),
            "keyboard-event" => self.keyboard = json(value)?,
            "scroller" => self.scroller = json(value)?,
            "hammer" | "gesture" => self.gesture = json(value)?,
            _ => return Err("unknown option".to_string()),
        }
        Ok(())
    }
}
