use crate::coords::{Rect, Vec2};
use crate::geometry::{Geometry, VertexBuffer};
use crate::paint::Color;

use super::{DebugFlags, RenderStateCache};

/// Outline color for `DebugFlags::LOCAL_SHAPE`.
pub const DEBUG_SHAPE_COLOR: Color = Color::new(1.0, 0.0, 0.0, 1.0);
/// Outline color for `DebugFlags::GLOBAL_BOUNDS`.
pub const DEBUG_BOUNDS_COLOR: Color = Color::new(0.0, 1.0, 0.0, 1.0);

/// Render-facing context threaded through the draw traversal.
///
/// Owns the state cache (and through it the backend). One per scene; there
/// is no global render state.
pub struct RenderContext {
    pub state: RenderStateCache,
    /// Overlays forced on for every node, in addition to per-node flags.
    pub debug: DebugFlags,
    /// Logical scene size in pixels.
    pub scene_size: Vec2,
    /// Scene-space rect outside of which leaf content is skipped.
    pub cull_rect: Option<Rect>,
}

impl RenderContext {
    #[inline]
    pub fn new(state: RenderStateCache, scene_size: Vec2) -> Self {
        Self {
            state,
            debug: DebugFlags::empty(),
            scene_size,
            cull_rect: None,
        }
    }

    /// `true` when `bounds` lies entirely outside the cull rect.
    #[inline]
    pub fn is_culled(&self, bounds: Rect) -> bool {
        match self.cull_rect {
            Some(cull) => !cull.intersects(bounds),
            None => false,
        }
    }

    /// Draws a 1px outline of `rect` in the current model-view space.
    pub fn draw_debug_rect(&mut self, rect: Rect, color: Color) {
        let state = &mut self.state;
        state.unbind_texture();
        state.set_tex_coord_array_enabled(false);
        state.set_color_array_enabled(false);
        state.set_line_width(1.0);
        state.set_color(color);
        VertexBuffer::outline(rect).draw(state);
    }

    /// Draws an outline of `rect` in scene space, ignoring the current
    /// model-view matrix.
    pub fn draw_debug_rect_global(&mut self, rect: Rect, color: Color) {
        self.state.push_matrix();
        self.state.load_identity();
        self.draw_debug_rect(rect, color);
        self.state.pop_matrix();
    }
}
