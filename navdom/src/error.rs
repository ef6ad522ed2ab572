use thiserror::Error;

use crate::element::NodeId;

/// Errors raised by structural document operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The node id was never allocated by this document.
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    /// The node existed but has been removed.
    #[error("Node {0} has been removed")]
    Removed(NodeId),

    /// Inserting relative to a node that has no parent.
    #[error("Node {0} is detached and has no siblings")]
    Detached(NodeId),

    /// Appending a node into itself or one of its descendants.
    #[error("Cannot move {node} into its own subtree at {parent}")]
    Cycle { node: NodeId, parent: NodeId },

    /// The selector string could not be parsed.
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
}
