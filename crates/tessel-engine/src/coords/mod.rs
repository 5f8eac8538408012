//! Coordinate and geometry types shared by the scene graph and the render-state cache.
//!
//! Canonical CPU space:
//! - scene units (one unit per pixel at the default projection)
//! - a node's local space has its content rectangle at `[0, 0, w, h]`
//! - global space is the scene root's space
//!
//! The y-axis direction is decided by the projection (`device::ProjectionMode`), not here.

mod matrix;
mod rect;
mod vec2;
mod viewport;

pub use matrix::Matrix;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
