//! Scene graph.
//!
//! Responsibilities:
//! - own every node in an arena (`Scene`) and keep parent/child links consistent
//! - forward pending-change flags from a node up to the root
//! - derive global matrix, bounds and sum color lazily
//! - run the per-frame action drain, update and draw traversals
//!
//! Nodes are plain transform state (`TransformNode`). Behaviour is attached:
//! a `Drawable` decides what is drawn, manipulators (`crate::animate`) decide
//! how the node changes over time.

mod config;
mod derived;
mod draw;
mod error;
mod flags;
mod graph;
mod handle;
mod node;
mod order;
mod queue;
mod space;
mod traverse;

pub use config::SceneConfig;
pub use draw::{Drawable, Mesh, Sprite};
pub use error::{Result, SceneError};
pub use flags::InvalidateFlags;
pub use graph::{GraphRole, ManipulatorKey, NodeId, Scene};
pub use handle::NodeMut;
pub use node::{TransformNode, DEFAULT_ROTATION_AXIS};
pub use order::SortKey;
pub use queue::{Action, ActionSender};
pub use space::BoundsPath;
pub use traverse::FrameReport;
