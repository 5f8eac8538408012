use slotmap::{new_key_type, SlotMap};

use crate::animate::Manipulator;
use crate::coords::{Rect, Vec2};
use crate::device::GpuBackend;
use crate::paint::Color;
use crate::render::{DebugFlags, RenderContext, RenderStateCache, RenderStats};

use super::derived::Derived;
use super::handle::NodeMut;
use super::order::PaintOrder;
use super::queue::{ActionQueue, ActionSender};
use super::space::NodeSpace;
use super::{Drawable, InvalidateFlags, Result, SceneConfig, SceneError, TransformNode};

new_key_type! {
    /// Handle to a node owned by a `Scene`.
    pub struct NodeId;
}

/// What a node may do in the tree.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GraphRole {
    /// The scene itself. Holds children, contributes no transform.
    Root,
    Container,
    Leaf,
}

impl GraphRole {
    #[inline]
    pub fn can_hold_children(self) -> bool {
        !matches!(self, GraphRole::Leaf)
    }
}

/// Handle to a manipulator attached to a node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ManipulatorKey(u64);

/// Bits that make a node's own cached matrix/bounds stale.
const GEOMETRY: InvalidateFlags = InvalidateFlags::LAYOUT.difference(InvalidateFlags::CHILDREN);

pub(crate) struct Slot {
    pub(crate) node: TransformNode,
    pub(crate) role: GraphRole,
    pub(crate) parent: Option<NodeId>,
    /// Insertion order. This list is the only ownership edge.
    pub(crate) children: Vec<NodeId>,
    pub(crate) order: PaintOrder,
    pub(crate) manipulators: Vec<(ManipulatorKey, Box<dyn Manipulator>)>,
    pub(crate) drawable: Option<Box<dyn Drawable>>,
    pub(crate) space: Derived<NodeSpace>,
    pub(crate) tint: Derived<Color>,
}

impl Slot {
    fn new(node: TransformNode, role: GraphRole) -> Self {
        Self {
            node,
            role,
            parent: None,
            children: Vec::new(),
            order: PaintOrder::default(),
            manipulators: Vec::new(),
            drawable: None,
            space: Derived::new(NodeSpace::default()),
            tint: Derived::new(Color::WHITE),
        }
    }
}

/// Arena-owned display tree plus the render context that draws it.
///
/// Nodes are addressed by `NodeId`. Parents are non-owning back-references;
/// a node appears in at most one child list, and holds a parent exactly
/// while it is in that parent's list.
pub struct Scene {
    pub(crate) nodes: SlotMap<NodeId, Slot>,
    root: NodeId,
    pub(crate) ctx: RenderContext,
    pub(crate) config: SceneConfig,
    pub(crate) actions: ActionQueue,
    pub(crate) redraw_requested: bool,
    pub(crate) frame_index: u64,
    stamp: u64,
    next_manipulator: u64,
}

impl Scene {
    pub fn new(backend: Box<dyn GpuBackend>, config: SceneConfig) -> Self {
        let mut state = RenderStateCache::new(backend);
        state.set_default_blend_func(config.default_blend);

        let mut ctx = RenderContext::new(state, config.size);
        ctx.debug = config.debug;

        let mut root_node = TransformNode::new();
        let _ = root_node.set_size(config.size);

        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Slot::new(root_node, GraphRole::Root));

        let mut scene = Self {
            nodes,
            root,
            ctx,
            config,
            actions: ActionQueue::new(),
            redraw_requested: true,
            frame_index: 0,
            stamp: 0,
            next_manipulator: 0,
        };
        scene.apply_culling();

        log::debug!(
            "scene created ({}x{}, {:?})",
            scene.config.size.x,
            scene.config.size.y,
            scene.config.projection
        );
        scene
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.config.size
    }

    /// Number of live nodes, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    #[inline]
    pub fn render_context(&self) -> &RenderContext {
        &self.ctx
    }

    #[inline]
    pub fn render_context_mut(&mut self) -> &mut RenderContext {
        &mut self.ctx
    }

    #[inline]
    pub fn render_stats(&self) -> RenderStats {
        self.ctx.state.stats()
    }

    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub(crate) fn slot(&self, id: NodeId) -> Result<&Slot> {
        self.nodes.get(id).ok_or(SceneError::StaleNode(id))
    }

    pub(crate) fn slot_mut(&mut self, id: NodeId) -> Result<&mut Slot> {
        self.nodes.get_mut(id).ok_or(SceneError::StaleNode(id))
    }

    pub fn node(&self, id: NodeId) -> Result<&TransformNode> {
        Ok(&self.slot(id)?.node)
    }

    /// Mutable handle for setters.
    ///
    /// The node must be attached: its parent chain has to reach the root.
    /// The root itself has no transform and is refused.
    pub fn node_mut(&mut self, id: NodeId) -> Result<NodeMut<'_>> {
        self.slot(id)?;
        if id == self.root {
            return Err(SceneError::RootNode);
        }
        if !self.is_attached(id) {
            return Err(SceneError::Detached(id));
        }
        Ok(NodeMut::new(self, id))
    }

    /// `true` if `id` is the root or its parent chain reaches the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if n == self.root {
                return true;
            }
            cur = self.nodes.get(n).and_then(|slot| slot.parent);
        }
        false
    }

    pub fn role(&self, id: NodeId) -> Result<GraphRole> {
        Ok(self.slot(id)?.role)
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.slot(id)?.parent)
    }

    /// Children in insertion order.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.slot(id)?.children)
    }

    /// Children in paint order (z, then insertion).
    pub fn children_in_paint_order(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        let Scene { nodes, .. } = self;
        let slot = nodes.get(id).ok_or(SceneError::StaleNode(id))?;
        let zs: Vec<f32> = slot.children.iter().map(|&c| nodes[c].node.z()).collect();
        let children = slot.children.clone();
        let slot = &mut nodes[id];
        Ok(slot
            .order
            .indices(zs.len(), |i| zs[i])
            .iter()
            .map(|&i| children[i])
            .collect())
    }

    /// Total nodes below `id` (children, grandchildren, ...).
    pub fn count_descendants(&self, id: NodeId) -> Result<usize> {
        let slot = self.slot(id)?;
        let mut n = slot.children.len();
        for &c in &slot.children {
            n += self.count_descendants(c)?;
        }
        Ok(n)
    }

    // ── creation ──────────────────────────────────────────────────────────

    fn create(&mut self, role: GraphRole) -> NodeId {
        let id = self.nodes.insert(Slot::new(TransformNode::new(), role));
        log::trace!("node {id:?} created as {role:?}");
        id
    }

    /// New detached leaf.
    pub fn create_node(&mut self) -> NodeId {
        self.create(GraphRole::Leaf)
    }

    /// New detached container.
    pub fn create_container(&mut self) -> NodeId {
        self.create(GraphRole::Container)
    }

    /// New detached leaf drawn by `drawable`.
    pub fn create_drawable(&mut self, drawable: impl Drawable + 'static) -> NodeId {
        let id = self.create(GraphRole::Leaf);
        self.nodes[id].drawable = Some(Box::new(drawable));
        id
    }

    pub fn set_drawable(&mut self, id: NodeId, drawable: impl Drawable + 'static) -> Result<()> {
        self.slot_mut(id)?.drawable = Some(Box::new(drawable));
        self.invalidate_unchecked(id, InvalidateFlags::empty());
        Ok(())
    }

    pub fn take_drawable(&mut self, id: NodeId) -> Result<Option<Box<dyn Drawable>>> {
        let taken = self.slot_mut(id)?.drawable.take();
        if taken.is_some() {
            self.invalidate_unchecked(id, InvalidateFlags::empty());
        }
        Ok(taken)
    }

    // ── structure ─────────────────────────────────────────────────────────

    /// Appends `child` to `parent`'s child list.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.add_child_at(parent, child, usize::MAX)
    }

    /// Inserts `child` at `index` (clamped to the child count).
    pub fn add_child_at(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<()> {
        self.check_attach(parent, child)?;

        let slot = &mut self.nodes[parent];
        let at = index.min(slot.children.len());
        slot.children.insert(at, child);
        slot.order.mark_dirty();

        let c = &mut self.nodes[child];
        c.parent = Some(parent);
        c.space.invalidate();
        c.tint.invalidate();

        self.mark(child, InvalidateFlags::BOUNDS);
        self.mark(parent, InvalidateFlags::CHILDREN | InvalidateFlags::BOUNDS);

        log::trace!("node {child:?} added to {parent:?} at {at}");
        Ok(())
    }

    fn check_attach(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let p = self.slot(parent)?;
        let c = self.slot(child)?;
        if child == self.root {
            return Err(SceneError::RootNode);
        }
        if !p.role.can_hold_children() {
            return Err(SceneError::NotAContainer(parent));
        }
        if let Some(existing) = c.parent {
            return Err(SceneError::AlreadyAttached {
                child,
                parent: existing,
            });
        }
        let mut cur = Some(parent);
        while let Some(id) = cur {
            if id == child {
                return Err(SceneError::Cycle { child, parent });
            }
            cur = self.nodes[id].parent;
        }
        Ok(())
    }

    /// Detaches `child` from `parent`. The child stays alive and keeps its
    /// transform; its pending flags are cleared.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.slot(parent)?;
        let c = self.slot(child)?;
        if child == self.root {
            return Err(SceneError::RootNode);
        }
        if c.parent != Some(parent) {
            return Err(SceneError::NotAChild { child, parent });
        }

        let slot = &mut self.nodes[parent];
        if let Some(at) = slot.children.iter().position(|&x| x == child) {
            slot.children.remove(at);
        }
        slot.order.mark_dirty();

        self.on_removed(child);
        self.mark(parent, InvalidateFlags::CHILDREN | InvalidateFlags::BOUNDS);

        log::trace!("node {child:?} removed from {parent:?}");
        Ok(())
    }

    /// Detaches `child` from whatever holds it. Returns `false` if it was
    /// already detached.
    pub fn remove_from_parent(&mut self, child: NodeId) -> Result<bool> {
        match self.slot(child)?.parent {
            Some(parent) => self.remove_child(parent, child).map(|_| true),
            None => Ok(false),
        }
    }

    /// Detaches every child of `parent`. Returns how many were removed.
    pub fn remove_all_children(&mut self, parent: NodeId) -> Result<usize> {
        let slot = self.slot_mut(parent)?;
        let children = std::mem::take(&mut slot.children);
        slot.order.mark_dirty();

        for &c in &children {
            self.on_removed(c);
        }
        if !children.is_empty() {
            self.mark(parent, InvalidateFlags::CHILDREN | InvalidateFlags::BOUNDS);
        }
        Ok(children.len())
    }

    fn on_removed(&mut self, child: NodeId) {
        let c = &mut self.nodes[child];
        c.parent = None;
        c.node.clear_flags();
        c.space.invalidate();
        c.tint.invalidate();
    }

    /// Detaches `id` and frees it together with its whole subtree.
    /// Manipulators are unbound on the way out.
    pub fn destroy(&mut self, id: NodeId) -> Result<()> {
        self.slot(id)?;
        if id == self.root {
            return Err(SceneError::RootNode);
        }
        self.remove_from_parent(id)?;

        let mut stack = vec![id];
        let mut freed = 0usize;
        while let Some(cur) = stack.pop() {
            if let Some(mut slot) = self.nodes.remove(cur) {
                for (_, m) in slot.manipulators.iter_mut() {
                    m.unbind();
                }
                stack.extend(slot.children.iter().copied());
                freed += 1;
            }
        }
        log::debug!("destroyed {id:?} ({freed} nodes)");
        Ok(())
    }

    // ── invalidation ──────────────────────────────────────────────────────

    /// ORs `bits` into the node, drops the derived values they affect and
    /// forwards the node's cumulative bits to every ancestor. Empty `bits`
    /// only requests a repaint.
    pub fn invalidate(&mut self, id: NodeId, bits: InvalidateFlags) -> Result<()> {
        self.slot(id)?;
        self.invalidate_unchecked(id, bits);
        Ok(())
    }

    pub(crate) fn invalidate_unchecked(&mut self, id: NodeId, bits: InvalidateFlags) {
        let slot = &mut self.nodes[id];
        if bits.intersects(GEOMETRY) {
            slot.space.invalidate();
        }
        if bits.intersects(InvalidateFlags::TINT) {
            slot.tint.invalidate();
        }
        self.mark(id, bits);
    }

    /// Raises `bits` on `id` and forwards cumulative bits upward without
    /// touching derived values.
    fn mark(&mut self, id: NodeId, bits: InvalidateFlags) {
        let slot = &mut self.nodes[id];
        slot.node.raise(bits);
        let mut carried = slot.node.flags();
        let mut top = id;
        let mut cur = slot.parent;

        while let Some(p) = cur {
            let slot = &mut self.nodes[p];
            slot.node.raise(carried);
            carried = slot.node.flags();
            top = p;
            cur = slot.parent;
        }

        if top == self.root {
            self.redraw_requested = true;
        }
    }

    /// Clears consumed bits on one node.
    pub fn validate(&mut self, id: NodeId, bits: InvalidateFlags) -> Result<()> {
        self.slot_mut(id)?.node.validate(bits);
        Ok(())
    }

    #[inline]
    pub fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    #[inline]
    pub fn is_redraw_requested(&self) -> bool {
        self.redraw_requested
    }

    #[inline]
    pub(crate) fn next_stamp(&mut self) -> u64 {
        self.stamp += 1;
        self.stamp
    }

    // ── manipulators ──────────────────────────────────────────────────────

    /// Attaches `m` to `id`. Manipulators advance in attachment order.
    pub fn add_manipulator(
        &mut self,
        id: NodeId,
        m: impl Manipulator + 'static,
    ) -> Result<ManipulatorKey> {
        self.slot(id)?;
        if id == self.root {
            return Err(SceneError::RootNode);
        }
        self.next_manipulator += 1;
        let key = ManipulatorKey(self.next_manipulator);

        let mut m: Box<dyn Manipulator> = Box::new(m);
        m.bind(id);
        self.nodes[id].manipulators.push((key, m));
        Ok(key)
    }

    /// Detaches one manipulator. Returns `false` if `key` was not attached here.
    pub fn remove_manipulator(&mut self, id: NodeId, key: ManipulatorKey) -> Result<bool> {
        let list = &mut self.slot_mut(id)?.manipulators;
        match list.iter().position(|(k, _)| *k == key) {
            Some(at) => {
                let (_, mut m) = list.remove(at);
                m.unbind();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove_all_manipulators(&mut self, id: NodeId) -> Result<usize> {
        let list = std::mem::take(&mut self.slot_mut(id)?.manipulators);
        let n = list.len();
        for (_, mut m) in list {
            m.unbind();
        }
        Ok(n)
    }

    pub fn manipulator_count(&self, id: NodeId) -> Result<usize> {
        Ok(self.slot(id)?.manipulators.len())
    }

    // ── deferred actions ──────────────────────────────────────────────────

    /// Thread-safe handle for queueing mutations from other threads.
    pub fn action_sender(&self) -> ActionSender {
        self.actions.sender()
    }

    /// Queues `action` to run at the start of the next frame.
    pub fn queue_action(&self, action: impl FnOnce(&mut Scene) + Send + 'static) {
        self.actions.push(Box::new(action));
    }

    // ── configuration ─────────────────────────────────────────────────────

    /// Changes the logical size (viewport, projection, cull rect, root size).
    pub fn resize(&mut self, width: f32, height: f32) {
        let size = Vec2::new(width, height);
        if self.config.size == size {
            return;
        }
        self.config.size = size;
        self.ctx.scene_size = size;
        if let Some(bits) = self.nodes[self.root].node.set_size(size) {
            self.invalidate_unchecked(self.root, bits);
        }
        self.apply_culling();
        self.redraw_requested = true;
        log::debug!("scene resized to {width}x{height}");
    }

    /// Debug overlays forced on for every node.
    pub fn set_debug_flags(&mut self, flags: DebugFlags) {
        if self.ctx.debug != flags {
            self.ctx.debug = flags;
            self.redraw_requested = true;
        }
    }

    fn apply_culling(&mut self) {
        self.ctx.cull_rect = self
            .config
            .cull_to_viewport
            .then(|| Rect::from_origin_size(Vec2::ZERO, self.config.size));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::RecordingBackend;

    fn scene() -> Scene {
        Scene::new(Box::new(RecordingBackend::new()), SceneConfig::sized(320.0, 240.0))
    }

    // ── structure ──

    #[test]
    fn add_sets_parent_and_appends() {
        let mut s = scene();
        let a = s.create_node();
        let b = s.create_node();
        s.add_child(s.root(), a).unwrap();
        s.add_child_at(s.root(), b, 0).unwrap();

        assert_eq!(s.parent(a).unwrap(), Some(s.root()));
        assert_eq!(s.children(s.root()).unwrap(), &[b, a]);
    }

    #[test]
    fn structural_errors() {
        let mut s = scene();
        let root = s.root();
        let leaf = s.create_node();
        let outer = s.create_container();
        let inner = s.create_container();
        let other = s.create_node();

        assert_eq!(s.add_child(leaf, other), Err(SceneError::NotAContainer(leaf)));
        assert_eq!(s.add_child(outer, root), Err(SceneError::RootNode));
        assert_eq!(s.add_child(outer, outer), Err(SceneError::Cycle { child: outer, parent: outer }));

        s.add_child(outer, inner).unwrap();
        assert_eq!(s.add_child(inner, outer), Err(SceneError::Cycle { child: outer, parent: inner }));
        assert_eq!(
            s.add_child(root, inner),
            Err(SceneError::AlreadyAttached { child: inner, parent: outer })
        );
        assert_eq!(
            s.remove_child(root, inner),
            Err(SceneError::NotAChild { child: inner, parent: root })
        );
        assert!(matches!(s.node_mut(root), Err(SceneError::RootNode)));
        assert_eq!(s.destroy(root), Err(SceneError::RootNode));

        // Nothing was relinked.
        assert_eq!(s.parent(inner).unwrap(), Some(outer));
        assert!(s.children(root).unwrap().is_empty());
    }

    #[test]
    fn stale_ids_are_reported() {
        let mut s = scene();
        let a = s.create_node();
        s.destroy(a).unwrap();
        assert!(!s.contains(a));
        assert_eq!(s.node(a).err(), Some(SceneError::StaleNode(a)));
        assert_eq!(s.add_child(s.root(), a), Err(SceneError::StaleNode(a)));
    }

    #[test]
    fn attach_detach_keeps_parent_and_list_in_sync() {
        let mut s = scene();
        let root = s.root();
        let group = s.create_container();
        let a = s.create_node();
        s.add_child(root, group).unwrap();
        s.add_child(group, a).unwrap();

        assert!(s.remove_from_parent(a).unwrap());
        assert_eq!(s.parent(a).unwrap(), None);
        assert!(s.children(group).unwrap().is_empty());
        assert!(!s.remove_from_parent(a).unwrap());

        s.add_child(root, a).unwrap();
        assert_eq!(s.parent(a).unwrap(), Some(root));
    }

    #[test]
    fn re_add_has_no_residual_flags() {
        let mut s = scene();
        let root = s.root();
        let a = s.create_node();
        s.add_child(root, a).unwrap();
        s.node_mut(a).unwrap().set_position(5.0, 5.0).set_alpha(0.5);
        assert!(s.node(a).unwrap().flags().contains(InvalidateFlags::POSITION));

        s.remove_child(root, a).unwrap();
        assert!(s.node(a).unwrap().flags().is_empty());

        s.add_child(root, a).unwrap();
        assert_eq!(s.node(a).unwrap().flags(), InvalidateFlags::BOUNDS);
    }

    #[test]
    fn container_marked_on_membership_change() {
        let mut s = scene();
        let group = s.create_container();
        let a = s.create_node();
        s.add_child(group, a).unwrap();
        assert!(s
            .node(group)
            .unwrap()
            .flags()
            .contains(InvalidateFlags::CHILDREN | InvalidateFlags::BOUNDS));

        s.validate(group, InvalidateFlags::all()).unwrap();
        s.remove_child(group, a).unwrap();
        assert!(s.node(group).unwrap().flags().contains(InvalidateFlags::CHILDREN));
    }

    #[test]
    fn destroy_frees_subtree_and_counts() {
        let mut s = scene();
        let root = s.root();
        let g1 = s.create_container();
        let g2 = s.create_container();
        let a = s.create_node();
        let b = s.create_node();
        s.add_child(root, g1).unwrap();
        s.add_child(g1, g2).unwrap();
        s.add_child(g1, a).unwrap();
        s.add_child(g2, b).unwrap();

        assert_eq!(s.count_descendants(root).unwrap(), 4);
        assert_eq!(s.count_descendants(g1).unwrap(), 3);

        s.destroy(g1).unwrap();
        assert_eq!(s.len(), 1);
        assert!(s.is_empty());
        assert!(!s.contains(b));
    }

    #[test]
    fn remove_all_children_detaches_each() {
        let mut s = scene();
        let root = s.root();
        let ids: Vec<NodeId> = (0..3).map(|_| s.create_node()).collect();
        for &id in &ids {
            s.add_child(root, id).unwrap();
        }
        assert_eq!(s.remove_all_children(root).unwrap(), 3);
        for id in ids {
            assert_eq!(s.parent(id).unwrap(), None);
        }
    }

    // ── invalidation ──

    #[test]
    fn flags_forward_to_ancestors_and_request_redraw() {
        let mut s = scene();
        let root = s.root();
        let group = s.create_container();
        let a = s.create_node();
        s.add_child(root, group).unwrap();
        s.add_child(group, a).unwrap();
        s.validate(group, InvalidateFlags::all()).unwrap();
        s.validate(root, InvalidateFlags::all()).unwrap();
        s.redraw_requested = false;

        s.node_mut(a).unwrap().set_alpha(0.5);
        assert!(s.node(group).unwrap().flags().contains(InvalidateFlags::ALPHA));
        assert!(s.node(root).unwrap().flags().contains(InvalidateFlags::ALPHA));
        assert!(s.is_redraw_requested());
    }

    #[test]
    fn empty_invalidate_only_requests_redraw() {
        let mut s = scene();
        let a = s.create_node();
        s.add_child(s.root(), a).unwrap();
        s.validate(a, InvalidateFlags::all()).unwrap();
        s.redraw_requested = false;

        s.invalidate(a, InvalidateFlags::empty()).unwrap();
        assert!(s.node(a).unwrap().flags().is_empty());
        assert!(s.is_redraw_requested());
    }

    #[test]
    fn mutating_a_detached_node_is_refused() {
        let mut s = scene();
        let root = s.root();
        let group = s.create_container();
        let a = s.create_node();
        s.add_child(group, a).unwrap();

        assert!(matches!(s.node_mut(a), Err(SceneError::Detached(id)) if id == a));
        assert!(matches!(s.node_mut(group), Err(SceneError::Detached(id)) if id == group));
        assert!(!s.is_attached(a));

        s.add_child(root, group).unwrap();
        s.node_mut(a).unwrap().set_position(3.0, 4.0);
        assert_eq!(s.node(a).unwrap().x(), 3.0);

        s.remove_child(root, group).unwrap();
        assert!(matches!(s.node_mut(a), Err(SceneError::Detached(_))));
        assert_eq!(s.node(a).unwrap().x(), 3.0);
    }

    // ── paint order ──

    #[test]
    fn paint_order_follows_z_then_insertion() {
        let mut s = scene();
        let root = s.root();
        let a = s.create_node();
        let b = s.create_node();
        let c = s.create_node();
        for id in [a, b, c] {
            s.add_child(root, id).unwrap();
        }
        assert_eq!(s.children_in_paint_order(root).unwrap(), vec![a, b, c]);

        s.node_mut(a).unwrap().set_z(1.0);
        assert_eq!(s.children_in_paint_order(root).unwrap(), vec![b, c, a]);
        assert_eq!(s.children(root).unwrap(), &[a, b, c]);
    }
}
