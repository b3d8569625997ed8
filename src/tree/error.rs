use thiserror::Error;

use super::node::NodeId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The selection index and the rendered views have diverged.
    #[error("selected id {id} has no corresponding registered view")]
    ConsistencyViolation { id: NodeId },

    #[error("duplicate node id {id} in hierarchy")]
    DuplicateId { id: NodeId },
}
