use crate::coords::Viewport;
use crate::paint::{BlendFactor, Color};

use super::GpuErrorCode;

/// Opaque texture handle issued by the asset layer. Compared by identity only.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(pub u32);

/// Frame buffer object handle. `0` is the window-system frame buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct FrameBufferId(pub u32);

impl FrameBufferId {
    pub const DEFAULT: Self = Self(0);
}

/// Server-side capabilities toggled with enable/disable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Capability {
    Texture2D,
    AlphaTest,
    DepthTest,
    ScissorTest,
}

/// Client-side vertex arrays.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ClientArray {
    Vertex,
    TexCoord,
    Color,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Primitive {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Axis system of the projection.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum ProjectionMode {
    /// Orthographic, origin at bottom-left, +Y up.
    #[default]
    BottomLeft,
    /// Orthographic, origin at top-left, +Y down.
    TopLeft,
    /// Perspective camera looking at the screen plane, sized so one unit is one
    /// pixel at z = 0.
    Perspective,
}

/// Projection parameters as last applied.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Projection {
    pub mode: ProjectionMode,
    pub width: i32,
    pub height: i32,
}

impl Projection {
    #[inline]
    pub const fn new(mode: ProjectionMode, width: i32, height: i32) -> Self {
        Self { mode, width, height }
    }
}

/// Fixed-function GPU binding layer.
///
/// Implementations issue the native call for every method; no diffing happens
/// here. The engine talks to a backend exclusively through
/// `RenderStateCache`, which owns it.
pub trait GpuBackend {
    fn bind_texture(&mut self, texture: TextureId);
    fn set_capability(&mut self, cap: Capability, enabled: bool);
    fn set_client_state(&mut self, array: ClientArray, enabled: bool);

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor);
    fn blend_func_separate(
        &mut self,
        src: BlendFactor,
        dst: BlendFactor,
        src_alpha: BlendFactor,
        dst_alpha: BlendFactor,
    );

    fn color(&mut self, color: Color);
    fn line_width(&mut self, width: f32);
    fn bind_frame_buffer(&mut self, fb: FrameBufferId);
    fn viewport(&mut self, rect: Viewport);
    fn projection(&mut self, projection: Projection);
    fn scissor(&mut self, rect: Viewport);
    fn clear(&mut self, color: Color);

    // Model-view matrix stack.
    fn push_matrix(&mut self);
    fn pop_matrix(&mut self);
    fn load_identity(&mut self);
    fn translate(&mut self, x: f32, y: f32, z: f32);
    fn scale(&mut self, x: f32, y: f32);
    fn rotate(&mut self, degrees: f32, axis: [f32; 3]);

    // Array pointers. Data is interleaved-free, tightly packed floats.
    fn vertex_pointer(&mut self, components: u8, data: &[f32]);
    fn tex_coord_pointer(&mut self, data: &[f32]);
    fn color_pointer(&mut self, data: &[f32]);

    fn draw_arrays(&mut self, primitive: Primitive, first: usize, count: usize);
    fn draw_elements(&mut self, primitive: Primitive, indices: &[u16]);

    fn max_texture_size(&mut self) -> u32;

    /// Pops the oldest pending error, `None` once the queue is empty.
    fn take_error(&mut self) -> Option<GpuErrorCode>;
}
