//! Tessel engine crate.
//!
//! A 2D scene graph with lazily derived transforms, upward change
//! propagation and a render-state cache that only forwards state changes to
//! a fixed-function GPU backend.

pub mod animate;
pub mod coords;
pub mod device;
pub mod geometry;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod time;
