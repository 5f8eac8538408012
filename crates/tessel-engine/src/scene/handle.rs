use std::rc::Rc;

use crate::coords::Vec2;
use crate::paint::{BlendFunc, Color};
use crate::render::{DebugFlags, Maskable};

use super::node::Change;
use super::{NodeId, Scene, TransformNode};

/// Mutable view of one node inside a `Scene`.
///
/// Every setter writes the field, then (only if the value changed) raises the
/// matching `InvalidateFlags` on the node and forwards them to its ancestors.
/// Setters chain:
///
/// ```
/// # use tessel_engine::device::RecordingBackend;
/// # use tessel_engine::scene::{Scene, SceneConfig};
/// # let mut scene = Scene::new(Box::new(RecordingBackend::new()), SceneConfig::default());
/// # let id = scene.create_node();
/// # scene.add_child(scene.root(), id)?;
/// scene.node_mut(id)?.set_size(64.0, 64.0).set_origin_at_center().set_alpha(0.5);
/// # Ok::<(), tessel_engine::scene::SceneError>(())
/// ```
pub struct NodeMut<'a> {
    scene: &'a mut Scene,
    id: NodeId,
}

impl<'a> NodeMut<'a> {
    /// `id` must be live in `scene`.
    pub(crate) fn new(scene: &'a mut Scene, id: NodeId) -> Self {
        Self { scene, id }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Read access to the node's current values.
    #[inline]
    pub fn node(&self) -> &TransformNode {
        &self.scene.nodes[self.id].node
    }

    #[inline]
    fn node_raw(&mut self) -> &mut TransformNode {
        &mut self.scene.nodes[self.id].node
    }

    #[inline]
    fn apply(&mut self, change: Change) -> &mut Self {
        if let Some(bits) = change {
            self.scene.invalidate_unchecked(self.id, bits);
        }
        self
    }

    // ── position ──────────────────────────────────────────────────────────

    pub fn set_position(&mut self, x: f32, y: f32) -> &mut Self {
        let c = self.node_raw().set_position(Vec2::new(x, y));
        self.apply(c)
    }

    pub fn set_x(&mut self, x: f32) -> &mut Self {
        let y = self.node().y();
        self.set_position(x, y)
    }

    pub fn set_y(&mut self, y: f32) -> &mut Self {
        let x = self.node().x();
        self.set_position(x, y)
    }

    pub fn move_by(&mut self, dx: f32, dy: f32) -> &mut Self {
        let p = self.node().position();
        self.set_position(p.x + dx, p.y + dy)
    }

    /// Depth for the draw translation and for paint order among siblings.
    pub fn set_z(&mut self, z: f32) -> &mut Self {
        let c = self.node_raw().set_z(z);
        if c.is_some() {
            self.mark_parent_order();
        }
        self.apply(c)
    }

    fn mark_parent_order(&mut self) {
        if let Some(parent) = self.scene.nodes[self.id].parent {
            let slot = &mut self.scene.nodes[parent];
            slot.order.mark_dirty();
            slot.node.raise(super::InvalidateFlags::CHILDREN);
        }
    }

    // ── shape ─────────────────────────────────────────────────────────────

    pub fn set_origin(&mut self, x: f32, y: f32) -> &mut Self {
        let c = self.node_raw().set_origin(Vec2::new(x, y));
        self.apply(c)
    }

    /// Origin at the middle of the current size.
    pub fn set_origin_at_center(&mut self) -> &mut Self {
        let s = self.node().size();
        self.set_origin(s.x * 0.5, s.y * 0.5)
    }

    pub fn set_size(&mut self, w: f32, h: f32) -> &mut Self {
        let c = self.node_raw().set_size(Vec2::new(w, h));
        self.apply(c)
    }

    pub fn set_scale(&mut self, sx: f32, sy: f32) -> &mut Self {
        let c = self.node_raw().set_scale(Vec2::new(sx, sy));
        self.apply(c)
    }

    // ── rotation ──────────────────────────────────────────────────────────

    /// Rotation in degrees about the node's rotation axis.
    pub fn set_rotation(&mut self, degrees: f32) -> &mut Self {
        let c = self.node_raw().set_rotation(degrees);
        self.apply(c)
    }

    pub fn rotate_by(&mut self, degrees: f32) -> &mut Self {
        let r = self.node().rotation();
        self.set_rotation(r + degrees)
    }

    pub fn set_rotation_x(&mut self, degrees: f32) -> &mut Self {
        let c = self.node_raw().set_rotation_x(degrees);
        self.apply(c)
    }

    pub fn set_rotation_y(&mut self, degrees: f32) -> &mut Self {
        let c = self.node_raw().set_rotation_y(degrees);
        self.apply(c)
    }

    /// Axis used by `set_rotation`. Defaults to `(0, 1, 0)`.
    pub fn set_rotation_axis(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        let c = self.node_raw().set_rotation_axis([x, y, z]);
        self.apply(c)
    }

    // ── appearance ────────────────────────────────────────────────────────

    pub fn set_alpha(&mut self, alpha: f32) -> &mut Self {
        let c = self.node_raw().set_alpha(alpha);
        self.apply(c)
    }

    /// Tint multiplied with every ancestor tint. `None` means opaque white.
    pub fn set_color(&mut self, color: Option<Color>) -> &mut Self {
        let c = self.node_raw().set_color(color);
        self.apply(c)
    }

    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        let c = self.node_raw().set_visible(visible);
        self.apply(c)
    }

    /// Blend override. `None` uses the scene default.
    pub fn set_blend_func(&mut self, blend: Option<BlendFunc>) -> &mut Self {
        let c = self.node_raw().set_blend_func(blend);
        self.apply(c)
    }

    pub fn set_alpha_test(&mut self, enabled: bool) -> &mut Self {
        let c = self.node_raw().set_alpha_test(enabled);
        self.apply(c)
    }

    pub fn set_mask(&mut self, mask: Option<Rc<dyn Maskable>>) -> &mut Self {
        let c = self.node_raw().set_mask(mask);
        self.apply(c)
    }

    /// Draws this subtree under a perspective camera, so `rotation_x` and
    /// `rotation_y` tilt it in depth. Bounds stay the orthographic footprint.
    pub fn set_perspective(&mut self, perspective: bool) -> &mut Self {
        let c = self.node_raw().set_perspective(perspective);
        self.apply(c)
    }

    pub fn set_debug_flags(&mut self, flags: DebugFlags) -> &mut Self {
        let c = self.node_raw().set_debug_flags(flags);
        self.apply(c)
    }

    /// Gates the per-frame update of this node and its subtree.
    pub fn set_alive(&mut self, alive: bool) -> &mut Self {
        let c = self.node_raw().set_alive(alive);
        self.apply(c)
    }
}
