//! Error types for skeleton and pose storage construction.

use thiserror::Error;

/// Errors reported while building a skeleton or allocating pose storage.
///
/// Mismatched node counts between hierarchy poses are not represented here: they are
/// programming errors and the broadcast operators panic on them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoseError {
    #[error("hierarchy must contain at least one node")]
    EmptyHierarchy,

    #[error("node {node} ('{name}') has parent {parent}, which does not precede it")]
    InvalidParent {
        node: usize,
        name: String,
        parent: usize,
    },

    #[error("duplicate node name '{name}' at index {node}")]
    DuplicateNodeName { node: usize, name: String },

    #[error("pose group requires at least one pose")]
    EmptyPoseGroup,

    #[error("node index {index} out of range (node count {count})")]
    NodeOutOfRange { index: usize, count: usize },

    #[error("pose index {index} out of range (pose count {count})")]
    PoseOutOfRange { index: usize, count: usize },
}

impl PoseError {
    /// Coarse grouping used when reporting errors upstream.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::EmptyHierarchy | Self::InvalidParent { .. } | Self::DuplicateNodeName { .. } => {
                "hierarchy"
            }
            Self::EmptyPoseGroup => "allocation",
            Self::NodeOutOfRange { .. } | Self::PoseOutOfRange { .. } => "index",
        }
    }
}
