use crate::coords::Vec2;
use crate::scene::NodeMut;

use super::{Easing, Manipulator};

/// Node property driven by a [`Tween`], with its start and end values.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TweenProperty {
    Position { from: Vec2, to: Vec2 },
    Scale { from: Vec2, to: Vec2 },
    Size { from: Vec2, to: Vec2 },
    /// Degrees about the node's rotation axis.
    Rotation { from: f32, to: f32 },
    Alpha { from: f32, to: f32 },
}

/// What a tween does once it reaches the end of its duration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Repeat {
    /// Stop at the end value.
    #[default]
    Once,
    /// Jump back to the start value and run again.
    Loop,
    /// Run back towards the start value, then forward again.
    Yoyo,
}

/// Interpolates one node property over a fixed duration.
#[derive(Debug, Clone)]
pub struct Tween {
    property: TweenProperty,
    duration_ms: f32,
    easing: Easing,
    repeat: Repeat,
    elapsed_ms: f32,
    finished: bool,
}

impl Tween {
    pub fn new(property: TweenProperty, duration_ms: f32) -> Self {
        Self {
            property,
            duration_ms,
            easing: Easing::Linear,
            repeat: Repeat::Once,
            elapsed_ms: 0.0,
            finished: false,
        }
    }

    pub fn position(from: Vec2, to: Vec2, duration_ms: f32) -> Self {
        Self::new(TweenProperty::Position { from, to }, duration_ms)
    }

    pub fn scale(from: Vec2, to: Vec2, duration_ms: f32) -> Self {
        Self::new(TweenProperty::Scale { from, to }, duration_ms)
    }

    pub fn size(from: Vec2, to: Vec2, duration_ms: f32) -> Self {
        Self::new(TweenProperty::Size { from, to }, duration_ms)
    }

    pub fn rotation(from: f32, to: f32, duration_ms: f32) -> Self {
        Self::new(TweenProperty::Rotation { from, to }, duration_ms)
    }

    pub fn alpha(from: f32, to: f32, duration_ms: f32) -> Self {
        Self::new(TweenProperty::Alpha { from, to }, duration_ms)
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    #[inline]
    pub fn property(&self) -> TweenProperty {
        self.property
    }

    #[inline]
    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    /// `true` once a `Repeat::Once` tween has written its end value.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Rewinds to the start value on the next advance.
    pub fn restart(&mut self) {
        self.elapsed_ms = 0.0;
        self.finished = false;
    }

    /// Linear progress in `0.0..=1.0` after advancing the clock.
    fn progress(&mut self, delta_ms: f32) -> f32 {
        self.elapsed_ms += delta_ms.max(0.0);

        if self.duration_ms <= 0.0 {
            self.finished = self.repeat == Repeat::Once;
            return 1.0;
        }

        match self.repeat {
            Repeat::Once => {
                if self.elapsed_ms >= self.duration_ms {
                    self.elapsed_ms = self.duration_ms;
                    self.finished = true;
                }
                self.elapsed_ms / self.duration_ms
            }
            Repeat::Loop => {
                self.elapsed_ms %= self.duration_ms;
                self.elapsed_ms / self.duration_ms
            }
            Repeat::Yoyo => {
                let period = self.duration_ms * 2.0;
                self.elapsed_ms %= period;
                let t = self.elapsed_ms / self.duration_ms;
                if t <= 1.0 { t } else { 2.0 - t }
            }
        }
    }

    /// Writes the value at eased progress `e`. Returns `true` if it differs
    /// from the node's current value.
    fn apply(&self, target: &mut NodeMut<'_>, e: f32) -> bool {
        let node = target.node();
        match self.property {
            TweenProperty::Position { from, to } => {
                let v = from.lerp(to, e);
                let changed = node.position() != v;
                target.set_position(v.x, v.y);
                changed
            }
            TweenProperty::Scale { from, to } => {
                let v = from.lerp(to, e);
                let changed = node.scale() != v;
                target.set_scale(v.x, v.y);
                changed
            }
            TweenProperty::Size { from, to } => {
                let v = from.lerp(to, e);
                let changed = node.size() != v;
                target.set_size(v.x, v.y);
                changed
            }
            TweenProperty::Rotation { from, to } => {
                let v = from + (to - from) * e;
                let changed = node.rotation() != v;
                target.set_rotation(v);
                changed
            }
            TweenProperty::Alpha { from, to } => {
                let v = from + (to - from) * e;
                let changed = node.alpha() != v;
                target.set_alpha(v);
                changed
            }
        }
    }
}

impl Manipulator for Tween {
    fn advance(&mut self, target: &mut NodeMut<'_>, delta_ms: f32) -> bool {
        if self.finished {
            return false;
        }
        let t = self.progress(delta_ms);
        let e = self.easing.evaluate(t);
        self.apply(target, e)
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

    fn step(s: &mut Scene, id: NodeId, tw: &mut Tween, ms: f32) -> bool {
        tw.advance(&mut s.node_mut(id).unwrap(), ms)
    }

    #[test]
    fn once_reaches_end_and_stops() {
        let (mut s, a) = setup();
        let mut tw = Tween::position(Vec2::ZERO, Vec2::new(100.0, 50.0), 1000.0);

        assert!(step(&mut s, a, &mut tw, 250.0));
        let p = s.node(a).unwrap().position();
        assert!(approx_eq(p.x, 25.0) && approx_eq(p.y, 12.5));

        assert!(step(&mut s, a, &mut tw, 5000.0));
        assert!(tw.is_finished());
        assert_eq!(s.node(a).unwrap().position(), Vec2::new(100.0, 50.0));

        assert!(!step(&mut s, a, &mut tw, 16.0));
    }

    #[test]
    fn loop_wraps_to_start() {
        let (mut s, a) = setup();
        let mut tw = Tween::alpha(0.0, 1.0, 100.0).with_repeat(Repeat::Loop);
        step(&mut s, a, &mut tw, 125.0);
        assert!(approx_eq(s.node(a).unwrap().alpha(), 0.25));
        assert!(!tw.is_finished());
    }

    #[test]
    fn yoyo_runs_back() {
        let (mut s, a) = setup();
        let mut tw = Tween::rotation(0.0, 90.0, 100.0).with_repeat(Repeat::Yoyo);
        step(&mut s, a, &mut tw, 100.0);
        assert!(approx_eq(s.node(a).unwrap().rotation(), 90.0));
        step(&mut s, a, &mut tw, 50.0);
        assert!(approx_eq(s.node(a).unwrap().rotation(), 45.0));
        step(&mut s, a, &mut tw, 50.0);
        assert!(approx_eq(s.node(a).unwrap().rotation(), 0.0));
    }

    #[test]
    fn easing_shapes_progress() {
        let (mut s, a) = setup();
        let mut tw = Tween::scale(Vec2::ONE, Vec2::splat(3.0), 100.0).with_easing(Easing::EaseIn);
        step(&mut s, a, &mut tw, 50.0);
        // 1 + 2 * 0.25
        assert!(approx_eq(s.node(a).unwrap().scale().x, 1.5));
    }

    #[test]
    fn zero_duration_jumps_to_end() {
        let (mut s, a) = setup();
        let mut tw = Tween::size(Vec2::ONE, Vec2::new(8.0, 4.0), 0.0);
        assert!(step(&mut s, a, &mut tw, 0.0));
        assert_eq!(s.node(a).unwrap().size(), Vec2::new(8.0, 4.0));
        assert!(tw.is_finished());
    }

    #[test]
    fn restart_rewinds() {
        let (mut s, a) = setup();
        let mut tw = Tween::alpha(1.0, 0.0, 10.0);
        step(&mut s, a, &mut tw, 20.0);
        assert!(tw.is_finished());
        tw.restart();
        step(&mut s, a, &mut tw, 0.0);
        assert_eq!(s.node(a).unwrap().alpha(), 1.0);
    }
}
