/// Source/destination blend factor, mirroring the fixed-function enums.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstColor,
    OneMinusDstColor,
    DstAlpha,
    OneMinusDstAlpha,
    SrcAlphaSaturate,
}

/// Blend function state.
///
/// `alpha == None` means the combined `(src, dst)` call is used for all four
/// channels. `Some((src_alpha, dst_alpha))` selects the separate-alpha call.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BlendFunc {
    pub src: BlendFactor,
    pub dst: BlendFactor,
    pub alpha: Option<(BlendFactor, BlendFactor)>,
}

impl BlendFunc {
    #[inline]
    pub const fn new(src: BlendFactor, dst: BlendFactor) -> Self {
        Self { src, dst, alpha: None }
    }

    #[inline]
    pub const fn separate(
        src: BlendFactor,
        dst: BlendFactor,
        src_alpha: BlendFactor,
        dst_alpha: BlendFactor,
    ) -> Self {
        Self { src, dst, alpha: Some((src_alpha, dst_alpha)) }
    }

    /// Classic straight-alpha interpolation. The default for new scenes.
    #[inline]
    pub const fn interpolate() -> Self {
        Self::new(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha)
    }

    /// Interpolation for textures with premultiplied alpha.
    #[inline]
    pub const fn premultiplied() -> Self {
        Self::new(BlendFactor::One, BlendFactor::OneMinusSrcAlpha)
    }

    #[inline]
    pub const fn add() -> Self {
        Self::new(BlendFactor::SrcAlpha, BlendFactor::One)
    }

    #[inline]
    pub const fn multiply() -> Self {
        Self::new(BlendFactor::DstColor, BlendFactor::OneMinusSrcAlpha)
    }

    #[inline]
    pub const fn screen() -> Self {
        Self::new(BlendFactor::One, BlendFactor::OneMinusSrcColor)
    }

    #[inline]
    pub fn is_separate(&self) -> bool {
        self.alpha.is_some()
    }
}

impl Default for BlendFunc {
    fn default() -> Self {
        Self::interpolate()
    }
}
