use core::cmp::Ordering;

/// Paint-order key for a child within its container.
///
/// Ordering rules:
/// 1) `z`: ascending (back-to-front)
/// 2) `order`: ascending (insertion order for equal z)
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SortKey {
    /// Depth. Lower values are drawn first (further back).
    pub z: f32,
    /// Position in the container's child list, keeping equal-z children stable.
    pub order: u32,
}

impl SortKey {
    #[inline]
    pub const fn new(z: f32, order: u32) -> Self {
        Self { z, order }
    }
}

impl Eq for SortKey {}

impl Ord for SortKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        match self.z.total_cmp(&other.z) {
            Ordering::Equal => self.order.cmp(&other.order),
            o => o,
        }
    }
}

impl PartialOrd for SortKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cached child paint order: indices into the child list.
///
/// Rebuilt only after membership or a child's z changed; reused across frames
/// otherwise.
#[derive(Debug, Default, Clone)]
pub(crate) struct PaintOrder {
    indices: Vec<usize>,
    dirty: bool,
}

impl PaintOrder {
    #[inline]
    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns the paint order, rebuilding it from `z_of(i)` when dirty.
    pub(crate) fn indices(&mut self, len: usize, z_of: impl Fn(usize) -> f32) -> &[usize] {
        if self.dirty || self.indices.len() != len {
            self.indices.clear();
            self.indices.extend(0..len);
            self.indices
                .sort_by_key(|&i| SortKey::new(z_of(i), i as u32));
            self.dirty = false;
        }
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn z_then_insertion_order() {
        let mut keys = vec![
            SortKey::new(1.0, 0),
            SortKey::new(0.0, 1),
            SortKey::new(1.0, 2),
            SortKey::new(-2.0, 3),
        ];
        keys.sort();
        let order: Vec<u32> = keys.iter().map(|k| k.order).collect();
        assert_eq!(order, vec![3, 1, 0, 2]);
    }

    #[test]
    fn paint_order_rebuilds_only_when_dirty() {
        let mut zs = vec![0.0, 0.0, 0.0];
        let mut po = PaintOrder::default();
        assert_eq!(po.indices(3, |i| zs[i]), &[0, 1, 2]);

        zs[0] = 5.0;
        assert_eq!(po.indices(3, |i| zs[i]), &[0, 1, 2]);

        po.mark_dirty();
        assert_eq!(po.indices(3, |i| zs[i]), &[1, 2, 0]);
    }
}
