pub mod error;
pub mod index;
pub mod marked;
pub mod node;

pub use error::TreeError;
pub use index::{SharedIndex, TreeSelectionIndex};
pub use node::{Node, NodeId};
