//! Derived spatial and color queries: global matrix, bounds, sum color and
//! local/global point conversion.

use crate::coords::{Matrix, Rect, Vec2};
use crate::paint::Color;

use super::{GraphRole, InvalidateFlags, NodeId, Result, Scene, TransformNode};

/// Which bounds computation to use.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum BoundsPath {
    /// Offset arithmetic when the node has no scale/rotation and the parent
    /// only translates; matrix composition otherwise.
    #[default]
    Auto,
    /// Always compose and map through the full matrix.
    Matrix,
}

/// Global matrix and bounds of one node.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub(crate) struct NodeSpace {
    pub(crate) matrix: Matrix,
    pub(crate) bounds: Rect,
}

/// Computes a node's global matrix and axis-aligned global bounds.
///
/// `parent` is the parent's global matrix, `None` directly under the root.
pub(crate) fn compute_space(
    node: &TransformNode,
    parent: Option<Matrix>,
    path: BoundsPath,
) -> NodeSpace {
    let rect = node.local_rect();
    let fast = path == BoundsPath::Auto
        && !node.has_transform()
        && parent.is_none_or(|m| m.is_translate_only());

    if fast {
        let base = parent.map_or(Vec2::ZERO, |m| m.translation());
        let offset = base + (node.position() - node.origin());
        return NodeSpace {
            matrix: Matrix::translate(offset.x, offset.y),
            bounds: rect.offset(offset),
        };
    }

    let local = node.local_matrix();
    let matrix = match parent {
        Some(p) => p.then(&local),
        None => local,
    };
    NodeSpace {
        matrix,
        bounds: matrix.map_rect(rect),
    }
}

impl Scene {
    /// Parent whose transform counts: the root contributes nothing.
    #[inline]
    fn transform_parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id]
            .parent
            .filter(|&p| self.nodes[p].role != GraphRole::Root)
    }

    /// Brings the cached space of `id` (and its ancestors) up to date and
    /// clears BOUNDS on the way. Returns the value and its stamp.
    pub(crate) fn refresh_space(&mut self, id: NodeId) -> (NodeSpace, u64) {
        let (parent_matrix, parent_stamp) = match self.transform_parent(id) {
            Some(p) => {
                let (space, stamp) = self.refresh_space(p);
                (Some(space.matrix), stamp)
            }
            None => (None, 0),
        };

        let slot = &mut self.nodes[id];
        slot.node.validate(InvalidateFlags::BOUNDS);
        if let Some(hit) = slot.space.get(parent_stamp) {
            return hit;
        }

        let space = compute_space(&slot.node, parent_matrix, BoundsPath::Auto);
        let stamp = self.next_stamp();
        self.nodes[id].space.store(space, stamp, parent_stamp);
        log::trace!("bounds of {id:?} -> {:?}", space.bounds);
        (space, stamp)
    }

    /// Brings the cached sum color of `id` (and its ancestors) up to date.
    pub(crate) fn refresh_tint(&mut self, id: NodeId) -> (Color, u64) {
        let (parent_color, parent_stamp) = match self.transform_parent(id) {
            Some(p) => self.refresh_tint(p),
            None => (Color::WHITE, 0),
        };

        let slot = &self.nodes[id];
        if let Some(hit) = slot.tint.get(parent_stamp) {
            return hit;
        }

        let node = &slot.node;
        let own = node
            .color()
            .unwrap_or(Color::WHITE)
            .with_alpha_scaled(node.alpha());
        let color = own.multiply(parent_color);

        let stamp = self.next_stamp();
        self.nodes[id].tint.store(color, stamp, parent_stamp);
        (color, stamp)
    }

    /// Global bounds of `id`, recomputed only if something on its ancestor
    /// chain changed since the last query.
    pub fn bounds(&mut self, id: NodeId) -> Result<Rect> {
        self.slot(id)?;
        Ok(self.refresh_space(id).0.bounds)
    }

    /// Composed local-to-global matrix of `id`.
    pub fn global_matrix(&mut self, id: NodeId) -> Result<Matrix> {
        self.slot(id)?;
        Ok(self.refresh_space(id).0.matrix)
    }

    /// Uncached bounds computed with an explicit `path`. The parent chain
    /// still comes from the cache.
    pub fn bounds_with(&mut self, id: NodeId, path: BoundsPath) -> Result<Rect> {
        self.slot(id)?;
        let parent = self
            .transform_parent(id)
            .map(|p| self.refresh_space(p).0.matrix);
        Ok(compute_space(&self.nodes[id].node, parent, path).bounds)
    }

    /// `(color or white) * alpha`, multiplied by every ancestor's sum color.
    pub fn sum_color(&mut self, id: NodeId) -> Result<Color> {
        self.slot(id)?;
        Ok(self.refresh_tint(id).0)
    }

    /// Offset that `local_to_global` adds: the node's position plus, for each
    /// ancestor below the root, its position minus its origin.
    fn global_offset(&self, id: NodeId) -> Vec2 {
        let mut offset = self.nodes[id].node.position();
        let mut cur = self.transform_parent(id);
        while let Some(p) = cur {
            let n = &self.nodes[p].node;
            offset += n.position() - n.origin();
            cur = self.transform_parent(p);
        }
        offset
    }

    /// Converts a point relative to the node's position into scene space.
    ///
    /// Only translation is composed: scale and rotation are not applied.
    pub fn local_to_global(&self, id: NodeId, local: Vec2) -> Result<Vec2> {
        self.slot(id)?;
        Ok(local + self.global_offset(id))
    }

    /// In-place form of `local_to_global`.
    pub fn local_to_global_into(&self, id: NodeId, local: Vec2, out: &mut Vec2) -> Result<()> {
        *out = self.local_to_global(id, local)?;
        Ok(())
    }

    /// Inverse of `local_to_global`.
    pub fn global_to_local(&self, id: NodeId, global: Vec2) -> Result<Vec2> {
        self.slot(id)?;
        Ok(global - self.global_offset(id))
    }

    /// In-place form of `global_to_local`.
    pub fn global_to_local_into(&self, id: NodeId, global: Vec2, out: &mut Vec2) -> Result<()> {
        *out = self.global_to_local(id, global)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::RecordingBackend;
    use crate::scene::SceneConfig;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn approx_color(a: Color, b: Color) -> bool {
        approx_eq(a.r, b.r) && approx_eq(a.g, b.g) && approx_eq(a.b, b.b) && approx_eq(a.a, b.a)
    }

    fn scene() -> Scene {
        Scene::new(Box::new(RecordingBackend::new()), SceneConfig::sized(800.0, 600.0))
    }

    /// root -> g1 -> g2 -> leaf
    fn chain(s: &mut Scene) -> [NodeId; 3] {
        let root = s.root();
        let g1 = s.create_container();
        let g2 = s.create_container();
        let leaf = s.create_node();
        s.add_child(root, g1).unwrap();
        s.add_child(g1, g2).unwrap();
        s.add_child(g2, leaf).unwrap();
        [g1, g2, leaf]
    }

    // ── bounds ──

    #[test]
    fn centered_double_scale_bounds() {
        let mut s = scene();
        let a = s.create_node();
        s.add_child(s.root(), a).unwrap();
        let (w, h, x, y) = (30.0, 16.0, 200.0, 120.0);
        s.node_mut(a)
            .unwrap()
            .set_size(w, h)
            .set_origin(w / 2.0, h / 2.0)
            .set_scale(2.0, 2.0)
            .set_position(x, y);

        let b = s.bounds(a).unwrap();
        assert!(approx_eq(b.left, x - w));
        assert!(approx_eq(b.top, y - h));
        assert!(approx_eq(b.right, x + w));
        assert!(approx_eq(b.bottom, y + h));
    }

    #[test]
    fn fast_path_matches_matrix_path_exactly() {
        let mut s = scene();
        let [g1, g2, leaf] = chain(&mut s);
        s.node_mut(g1).unwrap().set_position(13.25, -7.5).set_origin(3.0, 1.0);
        s.node_mut(g2).unwrap().set_position(0.1, 0.2);
        s.node_mut(leaf)
            .unwrap()
            .set_position(101.7, 33.3)
            .set_origin(5.5, 2.25)
            .set_size(17.0, 9.0);

        for id in [g1, g2, leaf] {
            let fast = s.bounds_with(id, BoundsPath::Auto).unwrap();
            let full = s.bounds_with(id, BoundsPath::Matrix).unwrap();
            assert_eq!(fast, full);
            assert_eq!(s.bounds(id).unwrap(), full);
        }
    }

    #[test]
    fn parent_scale_applies_to_child_bounds() {
        let mut s = scene();
        let [g1, _, leaf] = chain(&mut s);
        s.node_mut(g1).unwrap().set_scale(2.0, 3.0);
        s.node_mut(leaf).unwrap().set_position(10.0, 10.0).set_size(5.0, 5.0);

        let b = s.bounds(leaf).unwrap();
        assert!(approx_eq(b.left, 20.0));
        assert!(approx_eq(b.top, 30.0));
        assert!(approx_eq(b.right, 30.0));
        assert!(approx_eq(b.bottom, 45.0));
    }

    #[test]
    fn ancestor_change_invalidates_descendant_bounds() {
        let mut s = scene();
        let [g1, _, leaf] = chain(&mut s);
        s.node_mut(leaf).unwrap().set_size(10.0, 10.0);
        let before = s.bounds(leaf).unwrap();

        s.node_mut(g1).unwrap().move_by(5.0, 0.0);
        let after = s.bounds(leaf).unwrap();
        assert_eq!(after, before.offset(Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn repeated_query_reuses_cache() {
        let mut s = scene();
        let [_, _, leaf] = chain(&mut s);
        let (_, first) = s.refresh_space(leaf);
        let (_, second) = s.refresh_space(leaf);
        assert_eq!(first, second);
        assert!(!s.node(leaf).unwrap().flags().contains(InvalidateFlags::BOUNDS));
    }

    #[test]
    fn rotation_bounds_are_axis_aligned_hull() {
        let mut s = scene();
        let a = s.create_node();
        s.add_child(s.root(), a).unwrap();
        s.node_mut(a)
            .unwrap()
            .set_size(10.0, 10.0)
            .set_origin_at_center()
            .set_rotation_axis(0.0, 0.0, 1.0)
            .set_rotation(45.0)
            .set_position(50.0, 50.0);

        let b = s.bounds(a).unwrap();
        let half = 50.0f32.sqrt();
        assert!(approx_eq(b.left, 50.0 - half));
        assert!(approx_eq(b.right, 50.0 + half));
    }

    // ── sum color ──

    #[test]
    fn sum_color_is_product_of_chain() {
        // root -> g1 -> g2 -> g3 -> leaf
        let mut s = scene();
        let root = s.root();
        let [g1, g2, g3] = [s.create_container(), s.create_container(), s.create_container()];
        let leaf = s.create_node();
        s.add_child(root, g1).unwrap();
        s.add_child(g1, g2).unwrap();
        s.add_child(g2, g3).unwrap();
        s.add_child(g3, leaf).unwrap();

        s.node_mut(g1).unwrap().set_color(Some(Color::new(0.5, 1.0, 1.0, 1.0))).set_alpha(0.8);
        s.node_mut(g2).unwrap().set_color(Some(Color::new(1.0, 0.5, 1.0, 1.0))).set_alpha(0.5);
        s.node_mut(g3).unwrap().set_color(Some(Color::new(1.0, 1.0, 0.5, 0.5))).set_alpha(0.9);
        s.node_mut(leaf).unwrap().set_color(Some(Color::new(0.8, 1.0, 0.5, 1.0)));

        let c = s.sum_color(leaf).unwrap();
        // a: 0.8 * 0.5 * (0.5 * 0.9) * 1.0
        assert!(approx_color(c, Color::new(0.4, 0.5, 0.25, 0.18)));

        // Mid-chain change shows up on the next query.
        s.node_mut(g2).unwrap().set_alpha(1.0);
        let c = s.sum_color(leaf).unwrap();
        assert!(approx_color(c, Color::new(0.4, 0.5, 0.25, 0.36)));
    }

    #[test]
    fn untinted_node_is_white_times_alpha() {
        let mut s = scene();
        let a = s.create_node();
        s.add_child(s.root(), a).unwrap();
        s.node_mut(a).unwrap().set_alpha(0.3);
        assert!(approx_color(s.sum_color(a).unwrap(), Color::new(1.0, 1.0, 1.0, 0.3)));
    }

    #[test]
    fn explicit_invalidate_drops_cached_tint() {
        let mut s = scene();
        let [_, _, leaf] = chain(&mut s);
        let (_, first) = s.refresh_tint(leaf);
        s.invalidate(leaf, InvalidateFlags::ALPHA).unwrap();
        let (_, second) = s.refresh_tint(leaf);
        assert_ne!(first, second);
    }

    // ── coordinates ──

    #[test]
    fn coordinate_round_trip_three_levels() {
        let mut s = scene();
        let [g1, g2, leaf] = chain(&mut s);
        s.node_mut(g1).unwrap().set_position(100.0, 50.0).set_origin(10.0, 5.0);
        s.node_mut(g2).unwrap().set_position(-20.0, 40.0).set_origin(2.0, 2.0);
        s.node_mut(leaf).unwrap().set_position(7.0, 3.0).set_origin(1.0, 1.0);

        let p = Vec2::new(4.5, -2.0);
        let g = s.local_to_global(leaf, p).unwrap();
        // 4.5 + 7 + (-20 - 2) + (100 - 10)
        assert!(approx_eq(g.x, 79.5));
        // -2 + 3 + (40 - 2) + (50 - 5)
        assert!(approx_eq(g.y, 84.0));

        let mut back = Vec2::ZERO;
        s.global_to_local_into(leaf, g, &mut back).unwrap();
        assert!(approx_eq(back.x, p.x));
        assert!(approx_eq(back.y, p.y));
    }
}
