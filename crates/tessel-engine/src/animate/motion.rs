use crate::coords::{Rect, Vec2};
use crate::scene::NodeMut;

use super::Manipulator;

/// Constant angular velocity about the node's rotation axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Spin {
    /// Degrees per second.
    pub speed: f32,
}

impl Spin {
    pub const fn new(degrees_per_second: f32) -> Self {
        Self {
            speed: degrees_per_second,
        }
    }
}

impl Manipulator for Spin {
    fn advance(&mut self, target: &mut NodeMut<'_>, delta_ms: f32) -> bool {
        let step = self.speed * delta_ms / 1000.0;
        if step == 0.0 {
            return false;
        }
        // Wrapped to (-360, 360).
        let angle = (target.node().rotation() + step) % 360.0;
        target.set_rotation(angle);
        true
    }
}

/// Linear motion that reflects off the edges of `bounds`.
///
/// `bounds` is in the parent's space and constrains the node's position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Velocity {
    /// Units per second.
    pub velocity: Vec2,
    pub bounds: Rect,
}

impl Velocity {
    pub const fn new(velocity: Vec2, bounds: Rect) -> Self {
        Self { velocity, bounds }
    }
}

/// Reflects one axis. Returns the new coordinate and velocity.
#[inline]
fn bounce(pos: f32, vel: f32, min: f32, max: f32) -> (f32, f32) {
    if pos < min {
        (min, vel.abs())
    } else if pos > max {
        (max, -vel.abs())
    } else {
        (pos, vel)
    }
}

impl Manipulator for Velocity {
    fn advance(&mut self, target: &mut NodeMut<'_>, delta_ms: f32) -> bool {
        if self.velocity.is_zero() || delta_ms <= 0.0 {
            return false;
        }
        let p = target.node().position() + self.velocity * (delta_ms / 1000.0);
        let b = self.bounds;

        let (x, vx) = bounce(p.x, self.velocity.x, b.left, b.right);
        let (y, vy) = bounce(p.y, self.velocity.y, b.top, b.bottom);
        self.velocity = Vec2::new(vx, vy);

        target.set_position(x, y);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::RecordingBackend;
    use crate::scene::{NodeId, Scene, SceneConfig};

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn setup() -> (Scene, NodeId) {
        let mut s = Scene::new(Box::new(RecordingBackend::new()), SceneConfig::sized(100.0, 100.0));
        let a = s.create_node();
        s.add_child(s.root(), a).unwrap();
        (s, a)
    }

    #[test]
    fn spin_accumulates_degrees() {
        let (mut s, a) = setup();
        let mut spin = Spin::new(90.0);
        assert!(spin.advance(&mut s.node_mut(a).unwrap(), 500.0));
        assert!(approx_eq(s.node(a).unwrap().rotation(), 45.0));
        spin.advance(&mut s.node_mut(a).unwrap(), 4000.0);
        assert!(approx_eq(s.node(a).unwrap().rotation(), 45.0));
    }

    #[test]
    fn stopped_spin_reports_no_change() {
        let (mut s, a) = setup();
        let mut spin = Spin::new(0.0);
        assert!(!spin.advance(&mut s.node_mut(a).unwrap(), 16.0));
    }

    #[test]
    fn velocity_moves_then_bounces() {
        let (mut s, a) = setup();
        s.node_mut(a).unwrap().set_position(90.0, 50.0);
        let mut v = Velocity::new(Vec2::new(100.0, 0.0), Rect::new(0.0, 0.0, 100.0, 100.0));

        v.advance(&mut s.node_mut(a).unwrap(), 150.0);
        assert_eq!(s.node(a).unwrap().x(), 100.0);
        assert_eq!(v.velocity.x, -100.0);

        v.advance(&mut s.node_mut(a).unwrap(), 100.0);
        assert!(approx_eq(s.node(a).unwrap().x(), 90.0));
    }

    #[test]
    fn velocity_bounces_off_low_edge() {
        let (mut s, a) = setup();
        s.node_mut(a).unwrap().set_position(5.0, 5.0);
        let mut v = Velocity::new(Vec2::new(0.0, -20.0), Rect::new(0.0, 0.0, 100.0, 100.0));
        v.advance(&mut s.node_mut(a).unwrap(), 1000.0);
        assert_eq!(s.node(a).unwrap().y(), 0.0);
        assert_eq!(v.velocity.y, 20.0);
    }
}
