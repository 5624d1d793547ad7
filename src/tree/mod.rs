pub mod element;
pub mod node;

pub use element::{Element, NodeKind};
pub use node::Node;
