//! Paint model shared by nodes and the render-state cache.
//!
//! Scope:
//! - tint colors (straight alpha, multiplied down the hierarchy)
//! - blend functions (combined or separate-alpha)
//!
//! Geometry types remain in `coords`.

mod blend;
mod color;

pub use blend::{BlendFactor, BlendFunc};
pub use color::Color;
