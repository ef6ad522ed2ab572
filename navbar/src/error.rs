use navdom::{DomError, NodeId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SidebarError {
    #[error(transparent)]
    Dom(#[from] DomError),

    /// No element carries the requested id.
    #[error("No element with id '{0}'")]
    ElementNotFound(String),

    /// The element has no sidebar attached.
    #[error("No sidebar attached to {0}")]
    NotInitialized(NodeId),

    /// A plugin command name that does not exist.
    #[error("Unknown sidebar command '{0}'")]
    UnknownCommand(String),
}
