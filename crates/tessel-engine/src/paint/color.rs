/// Straight (non-premultiplied) RGBA tint, components nominally in `[0, 1]`.
///
/// Equality is structural: two colors are the same state when all four
/// channels compare equal, regardless of where they came from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Creates a color from `0`–`255` channel bytes.
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Component-wise product.
    #[inline]
    pub fn multiply(self, other: Color) -> Color {
        Color::new(self.r * other.r, self.g * other.g, self.b * other.b, self.a * other.a)
    }

    /// Same color with alpha multiplied by `alpha`.
    #[inline]
    pub fn with_alpha_scaled(self, alpha: f32) -> Color {
        Color::new(self.r, self.g, self.b, self.a * alpha)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
