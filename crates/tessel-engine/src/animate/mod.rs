//! Per-frame node manipulators.
//!
//! A manipulator is attached to one node and advanced by the scene's update
//! pass, in attachment order, before the node's children are updated.
//!
//! Built-ins:
//! - [`Tween`] interpolates one property over a duration with an [`Easing`] curve
//! - [`Spin`] rotates at a constant angular velocity
//! - [`Velocity`] moves inside a rectangle and bounces off its edges

mod easing;
mod motion;
mod tween;

pub use easing::Easing;
pub use motion::{Spin, Velocity};
pub use tween::{Repeat, Tween, TweenProperty};

use crate::scene::{NodeId, NodeMut};

/// Behaviour advanced once per update tick on its target node.
pub trait Manipulator {
    /// Called when the manipulator is attached to `target`.
    fn bind(&mut self, _target: NodeId) {}

    /// Advances by `delta_ms` milliseconds. Returns `true` if the target changed.
    fn advance(&mut self, target: &mut NodeMut<'_>, delta_ms: f32) -> bool;

    /// Called when the manipulator is detached or its node is destroyed.
    fn unbind(&mut self) {}
}
