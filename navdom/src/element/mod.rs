mod node;

pub use node::{Element, NodeId};
