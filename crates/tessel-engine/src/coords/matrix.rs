use super::{Rect, Vec2};

/// 2D affine transform (column-vector convention).
///
/// ```text
/// | a  c  tx |   | x |
/// | b  d  ty | * | y |
/// | 0  0  1  |   | 1 |
/// ```
///
/// Composition follows the fixed-function matrix stack: `m.then(&n)` applies
/// `n` first, then `m`, exactly like `glMultMatrix(n)` after loading `m`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Matrix {
    pub const IDENTITY: Self = Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, tx: 0.0, ty: 0.0 };

    #[inline]
    pub const fn translate(x: f32, y: f32) -> Self {
        Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, tx: x, ty: y }
    }

    #[inline]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self { a: sx, b: 0.0, c: 0.0, d: sy, tx: 0.0, ty: 0.0 }
    }

    /// Planar rotation about the Z axis.
    pub fn rotate_degrees(degrees: f32) -> Self {
        Self::rotate_axis_degrees(degrees, [0.0, 0.0, 1.0])
    }

    /// Orthographic footprint of a 3D rotation about `axis`.
    ///
    /// The 3x3 rotation (Rodrigues) is computed and its z row/column dropped,
    /// which is what an orthographic projection of the rotated plane yields.
    /// A rotation about (0,0,1) is the usual planar rotation; about (0,1,0)
    /// the x-axis is foreshortened by `cos(angle)`. A zero axis is identity.
    pub fn rotate_axis_degrees(degrees: f32, axis: [f32; 3]) -> Self {
        let [x, y, z] = axis;
        let len = (x * x + y * y + z * z).sqrt();
        if len == 0.0 || !len.is_finite() {
            return Self::IDENTITY;
        }
        let (x, y, z) = (x / len, y / len, z / len);
        let (s, c) = degrees.to_radians().sin_cos();
        let t = 1.0 - c;

        Self {
            a: c + t * x * x,
            b: t * x * y + s * z,
            c: t * x * y - s * z,
            d: c + t * y * y,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Compose: `self * other`. Applies `other` first, then `self`.
    pub fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            tx: self.a * other.tx + self.c * other.ty + self.tx,
            ty: self.b * other.tx + self.d * other.ty + self.ty,
        }
    }

    /// `true` when the linear part is identity (the matrix only offsets).
    #[inline]
    pub fn is_translate_only(&self) -> bool {
        self.a == 1.0 && self.b == 0.0 && self.c == 0.0 && self.d == 1.0
    }

    #[inline]
    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.tx, self.ty)
    }

    #[inline]
    pub fn map_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    /// Axis-aligned bounds of the four mapped corners of `r`.
    pub fn map_rect(&self, r: Rect) -> Rect {
        Rect::from_corners([
            self.map_point(Vec2::new(r.left, r.top)),
            self.map_point(Vec2::new(r.right, r.top)),
            self.map_point(Vec2::new(r.right, r.bottom)),
            self.map_point(Vec2::new(r.left, r.bottom)),
        ])
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn approx_pt(p: Vec2, x: f32, y: f32) -> bool {
        approx_eq(p.x, x) && approx_eq(p.y, y)
    }

    #[test]
    fn then_applies_right_operand_first() {
        // translate then scale: (0,0) -> (10,0) -> (20,0)
        let m = Matrix::scale(2.0, 2.0).then(&Matrix::translate(10.0, 0.0));
        assert!(approx_pt(m.map_point(Vec2::ZERO), 20.0, 0.0));
    }

    #[test]
    fn z_axis_rotation_is_planar() {
        let m = Matrix::rotate_degrees(90.0);
        assert!(approx_pt(m.map_point(Vec2::new(1.0, 0.0)), 0.0, 1.0));
    }

    #[test]
    fn y_axis_rotation_foreshortens_x() {
        let m = Matrix::rotate_axis_degrees(60.0, [0.0, 1.0, 0.0]);
        let p = m.map_point(Vec2::new(10.0, 7.0));
        assert!(approx_pt(p, 5.0, 7.0));
    }

    #[test]
    fn zero_axis_is_identity() {
        assert_eq!(Matrix::rotate_axis_degrees(45.0, [0.0, 0.0, 0.0]), Matrix::IDENTITY);
    }

    #[test]
    fn map_rect_of_rotation_is_axis_aligned_hull() {
        let r = Matrix::rotate_degrees(90.0).map_rect(Rect::new(0.0, 0.0, 10.0, 4.0));
        assert!(approx_eq(r.left, -4.0));
        assert!(approx_eq(r.top, 0.0));
        assert!(approx_eq(r.right, 0.0));
        assert!(approx_eq(r.bottom, 10.0));
    }
}
