pub mod document;
pub mod element;
pub mod error;
pub mod event;
pub mod listener;
pub mod selector;
pub mod style;
pub mod timer;
pub mod transform;

pub use document::{Document, Viewport};
pub use element::{Element, NodeId};
pub use error::DomError;
pub use event::{Event, EventDetail, EventKind, EventTarget, Key, Modifiers, PointerType};
pub use listener::{HandlerId, Listener, Listeners};
pub use selector::Selector;
pub use style::{Rule, Stylesheet};
pub use timer::{FiredTimer, TimerId, Timers};
pub use transform::Matrix;
