use std::rc::Rc;

use crate::coords::Viewport;
use crate::device::{
    Capability, ClientArray, FrameBufferId, GpuBackend, GpuErrorCode, Primitive, Projection,
    TextureId,
};
use crate::geometry::{BufferKey, ColorBuffer, GeometryBuffer, TexCoordBuffer, Vertex};
use crate::paint::{BlendFunc, Color};

use super::mask::{MaskTarget, Maskable};

/// Per-frame counters kept by the state cache.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// State changes requested through `set_*`/`bind_*`.
    pub requested: u32,
    /// State changes that actually reached the backend.
    pub emitted: u32,
    pub draw_calls: u32,
    pub gpu_errors: u32,
}

impl RenderStats {
    /// Requests absorbed by the cache.
    #[inline]
    pub fn saved(&self) -> u32 {
        self.requested - self.emitted
    }
}

/// Shadow copy of GPU-visible fixed-function state.
///
/// Every setter compares against the cached value: equal values return
/// `false` and emit nothing, different values update the cache, emit exactly
/// one backend call and return `true`. The cache owns the backend, so the
/// recorded state cannot drift from the real state.
///
/// `None` fields are unknown: the first request always emits.
pub struct RenderStateCache {
    backend: Box<dyn GpuBackend>,

    frame_buffer: Option<FrameBufferId>,
    texture: Option<TextureId>,
    texture_enabled: Option<bool>,

    vertex_array: Option<bool>,
    tex_coord_array: Option<bool>,
    color_array: Option<bool>,
    alpha_test: Option<bool>,
    depth_test: Option<bool>,

    vertex_buffer: Option<BufferKey>,
    tex_coord_buffer: Option<BufferKey>,
    color_buffer: Option<BufferKey>,

    color: Option<Color>,
    default_blend: BlendFunc,
    blend: Option<BlendFunc>,
    line_width: Option<f32>,
    viewport: Option<Viewport>,
    projection: Option<Projection>,
    /// Projections saved by `push_projection`.
    saved_projections: Vec<Option<Projection>>,
    mask: Option<Rc<dyn Maskable>>,

    max_texture_size: u32,
    stats: RenderStats,
}

impl RenderStateCache {
    /// Wraps a backend whose context was just created.
    pub fn new(backend: Box<dyn GpuBackend>) -> Self {
        let mut cache = Self {
            backend,
            frame_buffer: None,
            texture: None,
            texture_enabled: None,
            vertex_array: None,
            tex_coord_array: None,
            color_array: None,
            alpha_test: None,
            depth_test: None,
            vertex_buffer: None,
            tex_coord_buffer: None,
            color_buffer: None,
            color: None,
            default_blend: BlendFunc::interpolate(),
            blend: None,
            line_width: None,
            viewport: None,
            projection: None,
            saved_projections: Vec::new(),
            mask: None,
            max_texture_size: 0,
            stats: RenderStats::default(),
        };
        cache.reset();
        cache.assume_fresh_context();
        cache
    }

    /// Forgets every cached value so the next request of each kind emits.
    ///
    /// Drains pending GPU errors and re-queries the max texture size. Safe to
    /// call any number of times, on a live context or after it was recreated.
    pub fn reset(&mut self) {
        self.frame_buffer = None;
        self.texture = None;
        self.texture_enabled = None;
        self.vertex_array = None;
        self.tex_coord_array = None;
        self.color_array = None;
        self.alpha_test = None;
        self.depth_test = None;
        self.vertex_buffer = None;
        self.tex_coord_buffer = None;
        self.color_buffer = None;
        self.color = None;
        self.blend = None;
        self.line_width = None;
        self.viewport = None;
        self.projection = None;
        self.saved_projections.clear();
        if let Some(active) = self.mask.take() {
            active.disable_mask(&mut MaskTarget::new(self.backend.as_mut()));
        }
        self.stats = RenderStats::default();

        self.clear_errors();
        self.max_texture_size = self.backend.max_texture_size();

        log::debug!("render state reset (max texture size {})", self.max_texture_size);
    }

    /// A new context starts with everything disabled, the default frame
    /// buffer bound and a white current color.
    fn assume_fresh_context(&mut self) {
        self.frame_buffer = Some(FrameBufferId::DEFAULT);
        self.texture_enabled = Some(false);
        self.vertex_array = Some(false);
        self.tex_coord_array = Some(false);
        self.color_array = Some(false);
        self.alpha_test = Some(false);
        self.depth_test = Some(false);
        self.color = Some(Color::WHITE);
    }

    /// Swaps in a backend for a recreated context and resets. Returns the old one.
    pub fn replace_backend(&mut self, backend: Box<dyn GpuBackend>) -> Box<dyn GpuBackend> {
        let old = std::mem::replace(&mut self.backend, backend);
        // The old context took its scissor state with it.
        self.mask = None;
        self.reset();
        self.assume_fresh_context();
        old
    }

    // ── stats ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    #[inline]
    pub fn reset_stats(&mut self) {
        self.stats = RenderStats::default();
    }

    #[inline]
    fn request(&mut self) {
        self.stats.requested += 1;
    }

    #[inline]
    fn emitted(&mut self) -> bool {
        self.stats.emitted += 1;
        true
    }

    // ── errors ────────────────────────────────────────────────────────────

    /// Next pending GPU error, if any.
    pub fn get_error(&mut self) -> Option<GpuErrorCode> {
        self.backend.take_error()
    }

    /// Drains and discards all pending GPU errors.
    pub fn clear_errors(&mut self) {
        while self.backend.take_error().is_some() {}
    }

    /// Drains pending GPU errors, logging each one. Returns how many were seen.
    pub fn poll_errors(&mut self) -> usize {
        let mut n = 0;
        while let Some(code) = self.backend.take_error() {
            log::warn!("gpu error: {code}");
            n += 1;
        }
        self.stats.gpu_errors += n as u32;
        n
    }

    #[inline]
    pub fn max_texture_size(&self) -> u32 {
        self.max_texture_size
    }

    // ── textures ──────────────────────────────────────────────────────────

    /// Binds `texture` and makes sure texturing is enabled.
    pub fn bind_texture(&mut self, texture: TextureId) -> bool {
        self.request();
        let bound = if self.texture == Some(texture) {
            false
        } else {
            self.texture = Some(texture);
            self.backend.bind_texture(texture);
            self.emitted()
        };
        let enabled = self.set_texture_enabled(true);
        bound || enabled
    }

    /// Forgets the bound texture and disables texturing. No bind call is issued.
    pub fn unbind_texture(&mut self) -> bool {
        let had = self.texture.take().is_some();
        let disabled = self.set_texture_enabled(false);
        had || disabled
    }

    #[inline]
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    pub fn set_texture_enabled(&mut self, enabled: bool) -> bool {
        self.toggle_capability(Capability::Texture2D, enabled)
    }

    #[inline]
    pub fn is_texture_enabled(&self) -> bool {
        self.texture_enabled == Some(true)
    }

    // ── capabilities & client arrays ──────────────────────────────────────

    pub fn set_alpha_test_enabled(&mut self, enabled: bool) -> bool {
        self.toggle_capability(Capability::AlphaTest, enabled)
    }

    #[inline]
    pub fn is_alpha_test_enabled(&self) -> bool {
        self.alpha_test == Some(true)
    }

    pub fn set_depth_test_enabled(&mut self, enabled: bool) -> bool {
        self.toggle_capability(Capability::DepthTest, enabled)
    }

    #[inline]
    pub fn is_depth_test_enabled(&self) -> bool {
        self.depth_test == Some(true)
    }

    pub fn set_vertex_array_enabled(&mut self, enabled: bool) -> bool {
        self.toggle_client(ClientArray::Vertex, enabled)
    }

    #[inline]
    pub fn is_vertex_array_enabled(&self) -> bool {
        self.vertex_array == Some(true)
    }

    pub fn set_tex_coord_array_enabled(&mut self, enabled: bool) -> bool {
        self.toggle_client(ClientArray::TexCoord, enabled)
    }

    #[inline]
    pub fn is_tex_coord_array_enabled(&self) -> bool {
        self.tex_coord_array == Some(true)
    }

    pub fn set_color_array_enabled(&mut self, enabled: bool) -> bool {
        self.toggle_client(ClientArray::Color, enabled)
    }

    #[inline]
    pub fn is_color_array_enabled(&self) -> bool {
        self.color_array == Some(true)
    }

    fn toggle_capability(&mut self, cap: Capability, enabled: bool) -> bool {
        self.request();
        let slot = match cap {
            Capability::Texture2D => &mut self.texture_enabled,
            Capability::AlphaTest => &mut self.alpha_test,
            Capability::DepthTest => &mut self.depth_test,
            // Owned by masks; never cached.
            Capability::ScissorTest => {
                self.backend.set_capability(cap, enabled);
                return self.emitted();
            }
        };
        if *slot == Some(enabled) {
            return false;
        }
        *slot = Some(enabled);
        self.backend.set_capability(cap, enabled);
        self.emitted()
    }

    fn toggle_client(&mut self, array: ClientArray, enabled: bool) -> bool {
        self.request();
        let slot = match array {
            ClientArray::Vertex => &mut self.vertex_array,
            ClientArray::TexCoord => &mut self.tex_coord_array,
            ClientArray::Color => &mut self.color_array,
        };
        if *slot == Some(enabled) {
            return false;
        }
        *slot = Some(enabled);
        self.backend.set_client_state(array, enabled);
        self.emitted()
    }

    // ── array pointers ────────────────────────────────────────────────────

    pub fn set_vertex_buffer(&mut self, buffer: &GeometryBuffer<Vertex>) -> bool {
        self.request();
        let key = buffer.key();
        if self.vertex_buffer == Some(key) {
            return false;
        }
        self.vertex_buffer = Some(key);
        self.backend.vertex_pointer(2, buffer.as_floats());
        self.emitted()
    }

    pub fn set_tex_coord_buffer(&mut self, buffer: &TexCoordBuffer) -> bool {
        self.request();
        let key = buffer.key();
        if self.tex_coord_buffer == Some(key) {
            return false;
        }
        self.tex_coord_buffer = Some(key);
        self.backend.tex_coord_pointer(buffer.as_floats());
        self.emitted()
    }

    pub fn set_color_buffer(&mut self, buffer: &ColorBuffer) -> bool {
        self.request();
        let key = buffer.key();
        if self.color_buffer == Some(key) {
            return false;
        }
        self.color_buffer = Some(key);
        self.backend.color_pointer(buffer.as_floats());
        self.emitted()
    }

    // ── color & blending ──────────────────────────────────────────────────

    pub fn set_color(&mut self, color: Color) -> bool {
        self.request();
        if self.color == Some(color) {
            return false;
        }
        self.color = Some(color);
        self.backend.color(color);
        self.emitted()
    }

    #[inline]
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Blend function applied by `set_blend_func(None)`. Does not emit.
    pub fn set_default_blend_func(&mut self, func: BlendFunc) {
        self.default_blend = func;
    }

    #[inline]
    pub fn default_blend_func(&self) -> BlendFunc {
        self.default_blend
    }

    /// Applies `func`, or the default blend function for `None`.
    pub fn set_blend_func(&mut self, func: Option<BlendFunc>) -> bool {
        self.request();
        let func = func.unwrap_or(self.default_blend);
        if self.blend == Some(func) {
            return false;
        }
        self.blend = Some(func);
        match func.alpha {
            None => self.backend.blend_func(func.src, func.dst),
            Some((src_alpha, dst_alpha)) => {
                self.backend
                    .blend_func_separate(func.src, func.dst, src_alpha, dst_alpha)
            }
        }
        self.emitted()
    }

    #[inline]
    pub fn blend_func(&self) -> Option<BlendFunc> {
        self.blend
    }

    // ── misc state ────────────────────────────────────────────────────────

    pub fn set_line_width(&mut self, width: f32) -> bool {
        self.request();
        if self.line_width == Some(width) {
            return false;
        }
        self.line_width = Some(width);
        self.backend.line_width(width);
        self.emitted()
    }

    #[inline]
    pub fn line_width(&self) -> Option<f32> {
        self.line_width
    }

    pub fn bind_frame_buffer(&mut self, fb: FrameBufferId) -> bool {
        self.request();
        if self.frame_buffer == Some(fb) {
            return false;
        }
        self.frame_buffer = Some(fb);
        self.backend.bind_frame_buffer(fb);
        self.emitted()
    }

    #[inline]
    pub fn frame_buffer(&self) -> Option<FrameBufferId> {
        self.frame_buffer
    }

    pub fn set_viewport(&mut self, rect: Viewport) -> bool {
        self.request();
        if self.viewport == Some(rect) {
            return false;
        }
        self.viewport = Some(rect);
        self.backend.viewport(rect);
        self.emitted()
    }

    #[inline]
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn set_projection(&mut self, projection: Projection) -> bool {
        self.request();
        if self.projection == Some(projection) {
            return false;
        }
        self.projection = Some(projection);
        self.backend.projection(projection);
        self.emitted()
    }

    #[inline]
    pub fn projection(&self) -> Option<Projection> {
        self.projection
    }

    /// Applies `projection` until the matching `pop_projection`.
    pub fn push_projection(&mut self, projection: Projection) -> bool {
        self.saved_projections.push(self.projection);
        self.set_projection(projection)
    }

    /// Restores the projection saved by the last `push_projection`. If it was
    /// unknown the cache forgets the current one instead.
    pub fn pop_projection(&mut self) -> bool {
        match self.saved_projections.pop() {
            Some(Some(previous)) => self.set_projection(previous),
            Some(None) => {
                self.projection = None;
                false
            }
            None => {
                log::warn!("pop_projection without a matching push");
                false
            }
        }
    }

    // ── masking ───────────────────────────────────────────────────────────

    /// Switches the active mask. The previous mask is disabled before the new
    /// one is enabled. Masks compare by identity.
    pub fn set_mask(&mut self, mask: Option<Rc<dyn Maskable>>) -> bool {
        self.request();
        let same = match (&self.mask, &mask) {
            (None, None) => true,
            (Some(a), Some(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
            _ => false,
        };
        if same {
            return false;
        }

        let mut target = MaskTarget::new(self.backend.as_mut());
        if let Some(prev) = &self.mask {
            prev.disable_mask(&mut target);
        }
        if let Some(next) = &mask {
            next.enable_mask(&mut target);
        }
        self.mask = mask;
        self.emitted()
    }

    #[inline]
    pub fn mask(&self) -> Option<Rc<dyn Maskable>> {
        self.mask.clone()
    }

    // ── pass-through (not state) ──────────────────────────────────────────

    #[inline]
    pub fn clear(&mut self, color: Color) {
        self.backend.clear(color);
    }

    #[inline]
    pub fn push_matrix(&mut self) {
        self.backend.push_matrix();
    }

    #[inline]
    pub fn pop_matrix(&mut self) {
        self.backend.pop_matrix();
    }

    #[inline]
    pub fn load_identity(&mut self) {
        self.backend.load_identity();
    }

    #[inline]
    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.backend.translate(x, y, z);
    }

    #[inline]
    pub fn scale(&mut self, x: f32, y: f32) {
        self.backend.scale(x, y);
    }

    #[inline]
    pub fn rotate(&mut self, degrees: f32, axis: [f32; 3]) {
        self.backend.rotate(degrees, axis);
    }

    pub fn draw_arrays(&mut self, primitive: Primitive, first: usize, count: usize) {
        self.stats.draw_calls += 1;
        self.backend.draw_arrays(primitive, first, count);
    }

    pub fn draw_elements(&mut self, primitive: Primitive, indices: &[u16]) {
        self.stats.draw_calls += 1;
        self.backend.draw_elements(primitive, indices);
    }
}
