use super::Vec2;

/// Axis-aligned rectangle stored as edges.
///
/// Edges are half-open: `[left, right) × [top, bottom)`, so a node of size
/// `w × h` at the origin covers `Rect::new(0, 0, w, h)`.
///
/// No normalization is applied on construction. Negative or NaN extents are
/// kept as-is; callers test [`Rect::is_degenerate`] and skip such rects.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    #[inline]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    #[inline]
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, origin.x + size.x, origin.y + size.y)
    }

    /// Smallest rect containing all four corners.
    pub fn from_corners(corners: [Vec2; 4]) -> Self {
        let mut r = Rect::new(corners[0].x, corners[0].y, corners[0].x, corners[0].y);
        for p in &corners[1..] {
            r.left = r.left.min(p.x);
            r.top = r.top.min(p.y);
            r.right = r.right.max(p.x);
            r.bottom = r.bottom.max(p.y);
        }
        r
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.right, self.bottom)
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new((self.left + self.right) * 0.5, (self.top + self.bottom) * 0.5)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.min().is_finite() && self.max().is_finite()
    }

    /// Zero/negative area or non-finite edges. Such rects are never drawn.
    #[inline]
    pub fn is_degenerate(self) -> bool {
        !self.is_finite() || self.is_empty()
    }

    #[inline]
    pub fn offset(self, d: Vec2) -> Rect {
        Rect::new(self.left + d.x, self.top + d.y, self.right + d.x, self.bottom + d.y)
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        p.x >= self.left && p.y >= self.top && p.x < self.right && p.y < self.bottom
    }

    /// `true` when the two rects share a region of positive area.
    #[inline]
    pub fn intersects(self, other: Rect) -> bool {
        self.intersect(other).is_some()
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let r = Rect::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        if r.is_empty() { None } else { Some(r) }
    }
}
