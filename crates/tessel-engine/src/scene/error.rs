use thiserror::Error;

use super::NodeId;

/// Structural misuse of the scene graph.
///
/// These are programmer errors; the graph is left untouched when one is
/// returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("node {0:?} does not exist (destroyed or from another scene)")]
    StaleNode(NodeId),

    #[error("node {child:?} already belongs to {parent:?}")]
    AlreadyAttached { child: NodeId, parent: NodeId },

    #[error("node {0:?} is a leaf and cannot hold children")]
    NotAContainer(NodeId),

    #[error("the scene root cannot be attached, detached, destroyed or transformed")]
    RootNode,

    #[error("adding {child:?} under {parent:?} would create a cycle")]
    Cycle { child: NodeId, parent: NodeId },

    #[error("node {0:?} is not attached to the scene; attach it before mutating it")]
    Detached(NodeId),

    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { child: NodeId, parent: NodeId },
}

pub type Result<T> = std::result::Result<T, SceneError>;
