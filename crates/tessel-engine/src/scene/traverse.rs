//! Per-frame traversals: deferred actions, update, draw.

use crate::coords::{Vec2, Viewport};
use crate::device::{Projection, ProjectionMode};
use crate::render::{DebugFlags, RenderStats, DEBUG_BOUNDS_COLOR, DEBUG_SHAPE_COLOR};

use super::{GraphRole, InvalidateFlags, NodeId, NodeMut, Scene};

/// What one call to `Scene::frame` did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameReport {
    pub frame_index: u64,
    /// Deferred actions drained at the start of the frame.
    pub actions_run: usize,
    /// `true` if any manipulator changed a node.
    pub updated: bool,
    /// `true` if the tree was drawn.
    pub drawn: bool,
    pub stats: RenderStats,
    pub gpu_errors: usize,
}

impl Scene {
    /// Runs one frame: drains queued actions (FIFO), updates every live node
    /// by `delta_ms`, then draws if anything requested a redraw.
    pub fn frame(&mut self, delta_ms: f32) -> FrameReport {
        self.ctx.state.reset_stats();

        let batch = self.actions.take_batch();
        let actions_run = batch.len();
        for action in batch {
            action(self);
        }

        let updated = self.update(delta_ms);
        let drawn = self.redraw_requested || updated;
        if drawn {
            self.render();
        }

        let gpu_errors = self.ctx.state.poll_errors();
        let report = FrameReport {
            frame_index: self.frame_index,
            actions_run,
            updated,
            drawn,
            stats: self.ctx.state.stats(),
            gpu_errors,
        };
        log::trace!("frame {}: {report:?}", self.frame_index);

        self.frame_index = self.frame_index.wrapping_add(1);
        report
    }

    // ── update ────────────────────────────────────────────────────────────

    /// Depth-first update of every live node. Returns `true` if any
    /// manipulator reported a change.
    pub fn update(&mut self, delta_ms: f32) -> bool {
        let root = self.root();
        self.update_node(root, delta_ms)
    }

    fn update_node(&mut self, id: NodeId, delta_ms: f32) -> bool {
        let slot = &self.nodes[id];
        if !slot.node.is_alive() {
            return false;
        }

        if self.config.auto_update_bounds && slot.node.flags().contains(InvalidateFlags::BOUNDS) {
            self.refresh_space(id);
        }

        let mut changed = false;

        let mut list = std::mem::take(&mut self.nodes[id].manipulators);
        if !list.is_empty() {
            let mut target = NodeMut::new(self, id);
            for (_, m) in list.iter_mut() {
                changed |= m.advance(&mut target, delta_ms);
            }
            self.nodes[id].manipulators = list;
        }

        let mut i = 0;
        while let Some(&child) = self.nodes[id].children.get(i) {
            changed |= self.update_node(child, delta_ms);
            i += 1;
        }
        changed
    }

    // ── draw ──────────────────────────────────────────────────────────────

    /// Sets viewport and projection, clears, and draws the whole tree.
    pub fn render(&mut self) {
        let (w, h) = (self.config.size.x as i32, self.config.size.y as i32);
        let state = &mut self.ctx.state;
        state.set_viewport(Viewport::sized(w, h));
        state.set_projection(Projection::new(self.config.projection, w, h));
        if let Some(color) = self.config.clear_color {
            state.clear(color);
        }
        state.load_identity();

        let root = self.root();
        self.draw_children(root);
        self.nodes[root].node.validate(InvalidateFlags::VISUAL);
        self.redraw_requested = false;
    }

    fn draw_children(&mut self, id: NodeId) {
        if self.nodes[id].children.is_empty() {
            return;
        }

        let mut order = std::mem::take(&mut self.nodes[id].order);
        let children = &self.nodes[id].children;
        let indices = order.indices(children.len(), |i| self.nodes[children[i]].node.z());
        for &i in indices {
            let child = self.nodes[id].children[i];
            self.draw_node(child);
        }
        self.nodes[id].order = order;
    }

    fn draw_node(&mut self, id: NodeId) {
        let slot = &self.nodes[id];
        let node = &slot.node;
        if !node.is_visible() || node.alpha() <= 0.0 {
            self.validate_subtree(id, InvalidateFlags::VISUAL);
            return;
        }

        let role = slot.role;
        let mask = node.mask().cloned();
        let blend = node.blend_func();
        let alpha_test = node.is_alpha_test_enabled();
        let perspective = node.is_perspective();
        let debug = node.debug_flags() | self.ctx.debug;
        let local = node.local_rect();
        let has_content = slot.drawable.is_some() && !local.is_degenerate();

        let (color, _) = self.refresh_tint(id);

        // Prologue.
        if perspective {
            let (w, h) = (self.config.size.x as i32, self.config.size.y as i32);
            self.ctx
                .state
                .push_projection(Projection::new(ProjectionMode::Perspective, w, h));
        }
        self.push_transform(id);
        let state = &mut self.ctx.state;
        state.set_alpha_test_enabled(alpha_test);
        let restore_mask = mask.as_ref().map(|_| state.mask());
        if mask.is_some() {
            state.set_mask(mask);
        }
        state.set_blend_func(blend);
        state.set_color(color);

        if has_content && !self.is_culled(id, role) {
            let Scene { nodes, ctx, .. } = self;
            let slot = &mut nodes[id];
            if let Some(drawable) = slot.drawable.as_mut() {
                drawable.draw(ctx, &slot.node);
            }
        }

        if role.can_hold_children() {
            self.draw_children(id);
        }

        // Epilogue.
        if debug.contains(DebugFlags::LOCAL_SHAPE) {
            self.ctx.draw_debug_rect(local, DEBUG_SHAPE_COLOR);
        }
        if let Some(prev) = restore_mask {
            self.ctx.state.set_mask(prev);
        }
        self.ctx.state.pop_matrix();
        if perspective {
            self.ctx.state.pop_projection();
        }
        if debug.contains(DebugFlags::GLOBAL_BOUNDS) {
            let (space, _) = self.refresh_space(id);
            self.ctx.draw_debug_rect_global(space.bounds, DEBUG_BOUNDS_COLOR);
        }

        self.nodes[id].node.validate(InvalidateFlags::VISUAL);
    }

    /// Skipped subtrees count as drawn.
    fn validate_subtree(&mut self, id: NodeId, bits: InvalidateFlags) {
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let slot = &mut self.nodes[cur];
            slot.node.validate(bits);
            stack.extend_from_slice(&slot.children);
        }
    }

    /// Pushes the model-view matrix and applies the node's local transform,
    /// in the same order as `TransformNode::local_matrix`.
    fn push_transform(&mut self, id: NodeId) {
        let node = &self.nodes[id].node;
        let state = &mut self.ctx.state;
        state.push_matrix();

        let p = node.position();
        if !p.is_zero() || node.z() != 0.0 {
            state.translate(p.x, p.y, node.z());
        }
        let s = node.scale();
        if s != Vec2::ONE {
            state.scale(s.x, s.y);
        }
        if node.rotation() != 0.0 {
            state.rotate(node.rotation(), node.rotation_axis());
        }
        if node.rotation_x() != 0.0 {
            state.rotate(node.rotation_x(), [1.0, 0.0, 0.0]);
        }
        if node.rotation_y() != 0.0 {
            state.rotate(node.rotation_y(), [0.0, 1.0, 0.0]);
        }
        let o = node.origin();
        if !o.is_zero() {
            state.translate(-o.x, -o.y, 0.0);
        }
    }

    /// Leaves are culled against the scene rect when culling is on and
    /// bounds are maintained.
    fn is_culled(&mut self, id: NodeId, role: GraphRole) -> bool {
        if role != GraphRole::Leaf || !self.config.auto_update_bounds || self.ctx.cull_rect.is_none() {
            return false;
        }
        let (space, _) = self.refresh_space(id);
        self.ctx.is_culled(space.bounds)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::animate::Manipulator;
    use crate::device::{
        Capability, CallLog, GpuCall, GpuErrorCode, Primitive, RecordingBackend, TextureId,
    };
    use crate::paint::{BlendFunc, Color};
    use crate::render::{ScissorMask, Texture};
    use crate::scene::SceneConfig;

    fn scene_with(config: SceneConfig) -> (Scene, CallLog) {
        let backend = RecordingBackend::new();
        let log = backend.log();
        (Scene::new(Box::new(backend), config), log)
    }

    fn scene() -> (Scene, CallLog) {
        scene_with(SceneConfig::sized(200.0, 200.0))
    }

    fn sprite(s: &mut Scene, parent: NodeId, x: f32, y: f32) -> NodeId {
        let id = s.create_sprite(Some(Texture::new(TextureId(1), 10, 10)));
        s.add_child(parent, id).unwrap();
        s.node_mut(id).unwrap().set_position(x, y);
        id
    }

    fn draws(log: &CallLog) -> usize {
        log.count(GpuCall::is_draw)
    }

    fn is_blend(c: &GpuCall) -> bool {
        matches!(c, GpuCall::BlendFunc(..) | GpuCall::BlendFuncSeparate(..))
    }

    // ── frame ──

    #[test]
    fn first_frame_sets_viewport_projection_and_clears() {
        let (mut s, log) = scene();
        let report = s.frame(16.0);
        assert!(report.drawn);
        assert_eq!(report.frame_index, 0);
        assert_eq!(log.count(|c| *c == GpuCall::Viewport(Viewport::sized(200, 200))), 1);
        assert_eq!(log.count(|c| matches!(c, GpuCall::Projection(_))), 1);
        assert_eq!(log.count(|c| *c == GpuCall::Clear(Color::BLACK)), 1);
        assert_eq!(s.frame_index(), 1);
    }

    #[test]
    fn unchanged_scene_is_not_redrawn() {
        let (mut s, log) = scene();
        let root = s.root();
        sprite(&mut s, root, 0.0, 0.0);
        s.frame(16.0);

        log.clear();
        let report = s.frame(16.0);
        assert!(!report.drawn);
        assert!(log.is_empty());
    }

    #[test]
    fn second_frame_emits_no_state_changes() {
        let (mut s, log) = scene();
        let root = s.root();
        sprite(&mut s, root, 10.0, 10.0);
        s.frame(16.0);

        log.clear();
        s.request_redraw();
        let report = s.frame(16.0);

        assert!(report.drawn);
        assert_eq!(log.count(GpuCall::is_state_change), 0);
        assert_eq!(draws(&log), 1);
        assert_eq!(report.stats.emitted, 0);
        assert!(report.stats.saved() > 0);
    }

    #[test]
    fn gpu_errors_are_counted_not_fatal() {
        let (mut s, log) = scene();
        log.push_error(GpuErrorCode::InvalidValue);
        let report = s.frame(16.0);
        assert_eq!(report.gpu_errors, 1);
        assert_eq!(report.stats.gpu_errors, 1);
    }

    // ── actions ──

    #[test]
    fn actions_run_in_order_before_update() {
        let (mut s, _) = scene();
        for _ in 0..3 {
            s.queue_action(|s| {
                let id = s.create_node();
                let root = s.root();
                s.add_child(root, id).unwrap();
                let n = s.children(root).unwrap().len();
                s.node_mut(id).unwrap().set_x(n as f32);
            });
        }
        let report = s.frame(16.0);
        assert_eq!(report.actions_run, 3);

        let root = s.root();
        let xs: Vec<f32> = s
            .children(root)
            .unwrap()
            .iter()
            .map(|&c| s.node(c).unwrap().x())
            .collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn actions_queued_while_draining_wait_for_next_frame() {
        let (mut s, _) = scene();
        s.queue_action(|s| {
            s.queue_action(|s| {
                let id = s.create_node();
                let root = s.root();
                s.add_child(root, id).unwrap();
            });
        });

        assert_eq!(s.frame(16.0).actions_run, 1);
        assert!(s.is_empty());
        assert_eq!(s.frame(16.0).actions_run, 1);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn sender_works_from_another_thread() {
        let (mut s, _) = scene();
        let sender = s.action_sender();
        std::thread::spawn(move || {
            for _ in 0..4 {
                assert!(sender.send(|s: &mut Scene| {
                    let id = s.create_node();
                    let root = s.root();
                    s.add_child(root, id).unwrap();
                }));
            }
        })
        .join()
        .unwrap();

        assert_eq!(s.frame(16.0).actions_run, 4);
        assert_eq!(s.count_descendants(s.root()).unwrap(), 4);
    }

    #[test]
    fn removal_requested_mid_frame_applies_next_frame() {
        let (mut s, log) = scene();
        let root = s.root();
        let a = sprite(&mut s, root, 0.0, 0.0);
        s.frame(16.0);

        s.queue_action(move |s| {
            s.remove_from_parent(a).unwrap();
        });
        log.clear();
        let report = s.frame(16.0);
        assert!(report.drawn);
        assert_eq!(draws(&log), 0);
        assert_eq!(s.parent(a).unwrap(), None);
    }

    // ── update ──

    struct Trace {
        name: &'static str,
        out: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Manipulator for Trace {
        fn advance(&mut self, target: &mut NodeMut<'_>, _delta_ms: f32) -> bool {
            self.out.borrow_mut().push(self.name);
            target.move_by(1.0, 0.0);
            true
        }
    }

    #[test]
    fn manipulators_advance_in_attachment_order_then_children() {
        let (mut s, _) = scene();
        let root = s.root();
        let group = s.create_container();
        let leaf = s.create_node();
        s.add_child(root, group).unwrap();
        s.add_child(group, leaf).unwrap();

        let out = Rc::new(RefCell::new(Vec::new()));
        let t = |name| Trace { name, out: out.clone() };
        s.add_manipulator(leaf, t("leaf")).unwrap();
        s.add_manipulator(group, t("first")).unwrap();
        s.add_manipulator(group, t("second")).unwrap();

        assert!(s.update(16.0));
        assert_eq!(*out.borrow(), vec!["first", "second", "leaf"]);
        assert_eq!(s.node(group).unwrap().x(), 2.0);
        assert_eq!(s.manipulator_count(group).unwrap(), 2);
    }

    #[test]
    fn dead_subtree_is_not_updated() {
        let (mut s, _) = scene();
        let root = s.root();
        let group = s.create_container();
        let leaf = s.create_node();
        s.add_child(root, group).unwrap();
        s.add_child(group, leaf).unwrap();

        let out = Rc::new(RefCell::new(Vec::new()));
        s.add_manipulator(leaf, Trace { name: "leaf", out: out.clone() }).unwrap();
        s.node_mut(group).unwrap().set_alive(false);

        assert!(!s.update(16.0));
        assert!(out.borrow().is_empty());
    }

    #[test]
    fn auto_bounds_refresh_clears_bounds_flag() {
        let mut config = SceneConfig::sized(100.0, 100.0);
        config.auto_update_bounds = true;
        let (mut s, _) = scene_with(config);
        let root = s.root();
        let a = s.create_node();
        s.add_child(root, a).unwrap();
        s.node_mut(a).unwrap().set_position(5.0, 5.0);

        s.update(16.0);
        assert!(!s.node(a).unwrap().flags().contains(InvalidateFlags::BOUNDS));
    }

    // ── draw ──

    #[test]
    fn blend_calls_follow_value_transitions() {
        let (mut s, log) = scene();
        let root = s.root();
        let _a = sprite(&mut s, root, 0.0, 0.0);
        let b = sprite(&mut s, root, 20.0, 0.0);
        let _c = sprite(&mut s, root, 40.0, 0.0);
        s.node_mut(b).unwrap().set_blend_func(Some(BlendFunc::add()));

        s.frame(16.0);
        // default, add, default
        assert_eq!(log.count(is_blend), 3);

        log.clear();
        s.request_redraw();
        s.frame(16.0);
        // cache already holds default for the first sprite
        assert_eq!(log.count(is_blend), 2);
    }

    #[test]
    fn matrix_stack_stays_balanced() {
        let (mut s, log) = scene();
        let root = s.root();
        let outer = s.create_container();
        let inner = s.create_container();
        s.add_child(root, outer).unwrap();
        s.add_child(outer, inner).unwrap();
        sprite(&mut s, inner, 1.0, 1.0);
        sprite(&mut s, outer, 2.0, 2.0);
        s.set_debug_flags(DebugFlags::all());

        let report = s.frame(16.0);
        assert_eq!(report.gpu_errors, 0);
        assert_eq!(
            log.count(|c| *c == GpuCall::PushMatrix),
            log.count(|c| *c == GpuCall::PopMatrix)
        );
    }

    #[test]
    fn prologue_applies_transform_in_order() {
        let (mut s, log) = scene();
        let root = s.root();
        let a = sprite(&mut s, root, 5.0, 6.0);
        s.node_mut(a).unwrap().set_scale(2.0, 2.0).set_origin(1.0, 1.0);
        s.frame(16.0);

        let calls = log.calls();
        let transform: Vec<&GpuCall> = calls
            .iter()
            .filter(|c| matches!(c, GpuCall::Translate(..) | GpuCall::Scale(..) | GpuCall::Rotate(..)))
            .collect();
        assert_eq!(
            transform,
            vec![
                &GpuCall::Translate(5.0, 6.0, 0.0),
                &GpuCall::Scale(2.0, 2.0),
                &GpuCall::Translate(-1.0, -1.0, 0.0),
            ]
        );
    }

    #[test]
    fn invisible_and_transparent_nodes_are_skipped() {
        let (mut s, log) = scene();
        let root = s.root();
        let group = s.create_container();
        s.add_child(root, group).unwrap();
        sprite(&mut s, group, 0.0, 0.0);
        let b = sprite(&mut s, root, 0.0, 0.0);
        s.node_mut(group).unwrap().set_visible(false);
        s.node_mut(b).unwrap().set_alpha(0.0);

        s.frame(16.0);
        assert_eq!(draws(&log), 0);
        assert!(!s.node(group).unwrap().flags().intersects(InvalidateFlags::VISUAL));
    }

    #[test]
    fn hidden_subtree_is_validated_too() {
        let (mut s, _) = scene();
        let root = s.root();
        let group = s.create_container();
        s.add_child(root, group).unwrap();
        let a = sprite(&mut s, group, 0.0, 0.0);
        s.node_mut(a).unwrap().set_alpha(0.5);
        s.node_mut(group).unwrap().set_visible(false);

        s.frame(16.0);
        assert!(!s.node(a).unwrap().flags().intersects(InvalidateFlags::VISUAL));

        // Only the new change is forwarded upward.
        s.node_mut(a).unwrap().set_x(1.0);
        assert!(!s.node(group).unwrap().flags().contains(InvalidateFlags::ALPHA));
        assert!(s.node(group).unwrap().flags().contains(InvalidateFlags::POSITION));
    }

    #[test]
    fn perspective_node_swaps_projection_for_its_subtree() {
        let (mut s, log) = scene();
        let root = s.root();
        let group = s.create_container();
        s.add_child(root, group).unwrap();
        let a = sprite(&mut s, group, 0.0, 0.0);
        s.node_mut(group).unwrap().set_perspective(true).set_rotation_x(30.0);
        s.node_mut(a).unwrap().set_perspective(true);
        sprite(&mut s, root, 20.0, 0.0);

        s.frame(16.0);
        let ortho = Projection::new(ProjectionMode::BottomLeft, 200, 200);
        let persp = Projection::new(ProjectionMode::Perspective, 200, 200);
        let projections: Vec<GpuCall> = log
            .calls()
            .into_iter()
            .filter(|c| matches!(c, GpuCall::Projection(_)))
            .collect();
        // scene, group (nested node reuses it), back to scene
        assert_eq!(
            projections,
            vec![GpuCall::Projection(ortho), GpuCall::Projection(persp), GpuCall::Projection(ortho)]
        );
        assert_eq!(log.count(|c| *c == GpuCall::Rotate(30.0, [1.0, 0.0, 0.0])), 1);
        assert_eq!(s.render_context().state.projection(), Some(ortho));
    }

    #[test]
    fn degenerate_size_skips_own_content_only() {
        let (mut s, log) = scene();
        let root = s.root();
        let group = s.create_container();
        s.add_child(root, group).unwrap();
        s.set_drawable(group, crate::scene::Sprite::new(None)).unwrap();
        s.node_mut(group).unwrap().set_size(0.0, 10.0);
        sprite(&mut s, group, 0.0, 0.0);

        s.frame(16.0);
        assert_eq!(draws(&log), 1);
    }

    #[test]
    fn culling_skips_offscreen_leaves() {
        let mut config = SceneConfig::sized(100.0, 100.0);
        config.auto_update_bounds = true;
        config.cull_to_viewport = true;
        let (mut s, log) = scene_with(config);
        let root = s.root();
        sprite(&mut s, root, 10.0, 10.0);
        sprite(&mut s, root, 500.0, 500.0);

        s.frame(16.0);
        assert_eq!(draws(&log), 1);
    }

    #[test]
    fn debug_overlay_draws_outlines() {
        let (mut s, log) = scene();
        let root = s.root();
        let a = sprite(&mut s, root, 0.0, 0.0);
        s.node_mut(a)
            .unwrap()
            .set_debug_flags(DebugFlags::LOCAL_SHAPE | DebugFlags::GLOBAL_BOUNDS);

        s.frame(16.0);
        assert_eq!(log.count(|c| matches!(c, GpuCall::DrawArrays(Primitive::LineLoop, 0, 4))), 2);
        assert_eq!(log.count(|c| *c == GpuCall::Color(DEBUG_SHAPE_COLOR)), 1);
        assert_eq!(log.count(|c| *c == GpuCall::Color(DEBUG_BOUNDS_COLOR)), 1);
    }

    #[test]
    fn mask_is_enabled_for_subtree_and_restored() {
        let (mut s, log) = scene();
        let root = s.root();
        let group = s.create_container();
        s.add_child(root, group).unwrap();
        sprite(&mut s, group, 0.0, 0.0);
        s.node_mut(group)
            .unwrap()
            .set_mask(Some(Rc::new(ScissorMask::new(Viewport::sized(50, 50)))));

        s.frame(16.0);
        assert_eq!(log.count(|c| *c == GpuCall::Capability(Capability::ScissorTest, true)), 1);
        assert_eq!(log.count(|c| *c == GpuCall::Capability(Capability::ScissorTest, false)), 1);
        assert!(s.render_context().state.mask().is_none());
    }

    #[test]
    fn sum_color_reaches_the_cache() {
        let (mut s, log) = scene();
        let root = s.root();
        let group = s.create_container();
        s.add_child(root, group).unwrap();
        let a = sprite(&mut s, group, 0.0, 0.0);
        s.node_mut(group).unwrap().set_alpha(0.5);
        s.node_mut(a).unwrap().set_color(Some(Color::new(1.0, 0.0, 0.0, 1.0)));

        s.frame(16.0);
        assert_eq!(log.count(|c| *c == GpuCall::Color(Color::new(1.0, 0.0, 0.0, 0.5))), 1);
    }
}
