use std::fmt;
use std::rc::Rc;

use crate::coords::{Matrix, Rect, Vec2};
use crate::paint::{BlendFunc, Color};
use crate::render::{DebugFlags, Maskable};

use super::InvalidateFlags;

/// Default axis for `rotation`: a pseudo-3D flip about Y.
pub const DEFAULT_ROTATION_AXIS: [f32; 3] = [0.0, 1.0, 0.0];

/// Transform and appearance of one display object.
///
/// The node itself is plain data. Setters live on `NodeMut`, which raises the
/// matching `InvalidateFlags` and forwards them to the ancestors; derived
/// values (global matrix, bounds, sum color) are queried through `Scene`.
#[derive(Clone)]
pub struct TransformNode {
    position: Vec2,
    origin: Vec2,
    size: Vec2,
    scale: Vec2,
    rotation: f32,
    rotation_x: f32,
    rotation_y: f32,
    rotation_axis: [f32; 3],
    z: f32,
    alpha: f32,
    color: Option<Color>,
    visible: bool,
    alive: bool,
    blend: Option<BlendFunc>,
    mask: Option<Rc<dyn Maskable>>,
    alpha_test: bool,
    perspective: bool,
    debug: DebugFlags,
    flags: InvalidateFlags,
}

/// Outcome of a field write: `None` when the value was already current,
/// otherwise the bits to raise (possibly empty, meaning repaint only).
pub(crate) type Change = Option<InvalidateFlags>;

#[inline]
fn write<T: PartialEq>(slot: &mut T, value: T, bits: InvalidateFlags) -> Change {
    if *slot == value {
        return None;
    }
    *slot = value;
    Some(bits)
}

const MOVED: InvalidateFlags = InvalidateFlags::POSITION.union(InvalidateFlags::BOUNDS);
const TURNED: InvalidateFlags = InvalidateFlags::ROTATION.union(InvalidateFlags::BOUNDS);

impl TransformNode {
    /// Identity transform, 1x1 size, opaque, visible and alive.
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            origin: Vec2::ZERO,
            size: Vec2::ONE,
            scale: Vec2::ONE,
            rotation: 0.0,
            rotation_x: 0.0,
            rotation_y: 0.0,
            rotation_axis: DEFAULT_ROTATION_AXIS,
            z: 0.0,
            alpha: 1.0,
            color: None,
            visible: true,
            alive: true,
            blend: None,
            mask: None,
            alpha_test: false,
            perspective: false,
            debug: DebugFlags::empty(),
            flags: InvalidateFlags::empty(),
        }
    }

    // ── getters ───────────────────────────────────────────────────────────

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.position.y
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    #[inline]
    pub fn rotation_x(&self) -> f32 {
        self.rotation_x
    }

    #[inline]
    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    #[inline]
    pub fn rotation_axis(&self) -> [f32; 3] {
        self.rotation_axis
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.z
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    #[inline]
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn blend_func(&self) -> Option<BlendFunc> {
        self.blend
    }

    #[inline]
    pub fn mask(&self) -> Option<&Rc<dyn Maskable>> {
        self.mask.as_ref()
    }

    #[inline]
    pub fn is_alpha_test_enabled(&self) -> bool {
        self.alpha_test
    }

    /// Drawn under a perspective projection instead of the scene's.
    #[inline]
    pub fn is_perspective(&self) -> bool {
        self.perspective
    }

    #[inline]
    pub fn debug_flags(&self) -> DebugFlags {
        self.debug
    }

    /// Pending (not yet validated) change bits.
    #[inline]
    pub fn flags(&self) -> InvalidateFlags {
        self.flags
    }

    // ── geometry ──────────────────────────────────────────────────────────

    /// Content rectangle in local space: `[0, 0, w, h]`.
    #[inline]
    pub fn local_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size.x, self.size.y)
    }

    /// `true` when scale or any rotation is set. Without it, the local
    /// transform is a pure offset.
    #[inline]
    pub fn has_transform(&self) -> bool {
        self.scale != Vec2::ONE
            || self.rotation != 0.0
            || self.rotation_x != 0.0
            || self.rotation_y != 0.0
    }

    /// Local-to-parent transform.
    ///
    /// Rotation and scale use `origin` as the fixed point, then the node is
    /// moved by `position - origin`:
    /// `T(position) * S(scale) * R * T(-origin)`.
    pub fn local_matrix(&self) -> Matrix {
        let mut m = Matrix::translate(self.position.x, self.position.y);
        if self.scale != Vec2::ONE {
            m = m.then(&Matrix::scale(self.scale.x, self.scale.y));
        }
        if self.rotation != 0.0 {
            m = m.then(&Matrix::rotate_axis_degrees(self.rotation, self.rotation_axis));
        }
        if self.rotation_x != 0.0 {
            m = m.then(&Matrix::rotate_axis_degrees(self.rotation_x, [1.0, 0.0, 0.0]));
        }
        if self.rotation_y != 0.0 {
            m = m.then(&Matrix::rotate_axis_degrees(self.rotation_y, [0.0, 1.0, 0.0]));
        }
        if !self.origin.is_zero() {
            m = m.then(&Matrix::translate(-self.origin.x, -self.origin.y));
        }
        m
    }

    // ── writes (flag bookkeeping happens in the scene) ────────────────────

    pub(crate) fn set_position(&mut self, p: Vec2) -> Change {
        write(&mut self.position, p, MOVED)
    }

    pub(crate) fn set_origin(&mut self, o: Vec2) -> Change {
        write(
            &mut self.origin,
            o,
            InvalidateFlags::ORIGIN | InvalidateFlags::BOUNDS,
        )
    }

    pub(crate) fn set_size(&mut self, s: Vec2) -> Change {
        write(&mut self.size, s, InvalidateFlags::SIZE | InvalidateFlags::BOUNDS)
    }

    pub(crate) fn set_scale(&mut self, s: Vec2) -> Change {
        write(&mut self.scale, s, InvalidateFlags::SCALE | InvalidateFlags::BOUNDS)
    }

    pub(crate) fn set_rotation(&mut self, degrees: f32) -> Change {
        write(&mut self.rotation, degrees, TURNED)
    }

    pub(crate) fn set_rotation_x(&mut self, degrees: f32) -> Change {
        write(&mut self.rotation_x, degrees, TURNED)
    }

    pub(crate) fn set_rotation_y(&mut self, degrees: f32) -> Change {
        write(&mut self.rotation_y, degrees, TURNED)
    }

    pub(crate) fn set_rotation_axis(&mut self, axis: [f32; 3]) -> Change {
        // The axis only matters while a rotation is applied.
        let bits = if self.rotation != 0.0 { TURNED } else { InvalidateFlags::ROTATION };
        write(&mut self.rotation_axis, axis, bits)
    }

    pub(crate) fn set_z(&mut self, z: f32) -> Change {
        write(&mut self.z, z, InvalidateFlags::POSITION)
    }

    pub(crate) fn set_alpha(&mut self, alpha: f32) -> Change {
        write(&mut self.alpha, alpha, InvalidateFlags::ALPHA)
    }

    pub(crate) fn set_color(&mut self, color: Option<Color>) -> Change {
        write(&mut self.color, color, InvalidateFlags::COLOR)
    }

    pub(crate) fn set_visible(&mut self, visible: bool) -> Change {
        write(&mut self.visible, visible, InvalidateFlags::VISIBILITY)
    }

    pub(crate) fn set_blend_func(&mut self, blend: Option<BlendFunc>) -> Change {
        write(&mut self.blend, blend, InvalidateFlags::BLEND)
    }

    pub(crate) fn set_alpha_test(&mut self, enabled: bool) -> Change {
        write(&mut self.alpha_test, enabled, InvalidateFlags::BLEND)
    }

    pub(crate) fn set_mask(&mut self, mask: Option<Rc<dyn Maskable>>) -> Change {
        let same = match (&self.mask, &mask) {
            (None, None) => true,
            (Some(a), Some(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
            _ => false,
        };
        if same {
            return None;
        }
        self.mask = mask;
        Some(InvalidateFlags::BLEND)
    }

    pub(crate) fn set_perspective(&mut self, perspective: bool) -> Change {
        write(&mut self.perspective, perspective, InvalidateFlags::empty())
    }

    pub(crate) fn set_alive(&mut self, alive: bool) -> Change {
        write(&mut self.alive, alive, InvalidateFlags::empty())
    }

    pub(crate) fn set_debug_flags(&mut self, debug: DebugFlags) -> Change {
        write(&mut self.debug, debug, InvalidateFlags::empty())
    }

    #[inline]
    pub(crate) fn raise(&mut self, bits: InvalidateFlags) {
        self.flags |= bits;
    }

    #[inline]
    pub(crate) fn validate(&mut self, bits: InvalidateFlags) {
        self.flags.remove(bits);
    }

    #[inline]
    pub(crate) fn clear_flags(&mut self) {
        self.flags = InvalidateFlags::empty();
    }
}

impl Default for TransformNode {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TransformNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformNode")
            .field("position", &self.position)
            .field("origin", &self.origin)
            .field("size", &self.size)
            .field("scale", &self.scale)
            .field("rotation", &self.rotation)
            .field("z", &self.z)
            .field("alpha", &self.alpha)
            .field("color", &self.color)
            .field("visible", &self.visible)
            .field("alive", &self.alive)
            .field("masked", &self.mask.is_some())
            .field("perspective", &self.perspective)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}
