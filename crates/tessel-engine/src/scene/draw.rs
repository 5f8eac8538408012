//! Draw strategies attached to nodes.
//!
//! The traversal has already applied the node's transform, blend, color and
//! mask by the time `Drawable::draw` runs. A strategy only sets the array and
//! texture state it needs, then issues its draw call through the cache.

use crate::coords::{Rect, Vec2};
use crate::geometry::{default_quad_tex_coords, ColorBuffer, Geometry, TexCoordBuffer, VertexBuffer};
use crate::render::{RenderContext, RenderStateCache, Texture};

use super::{NodeId, Scene, TransformNode};

/// Content drawn in a node's local space.
pub trait Drawable {
    fn draw(&mut self, ctx: &mut RenderContext, node: &TransformNode);
}

/// Binds `texture` (or unbinds) and sets the texcoord array to match.
fn apply_texture(state: &mut RenderStateCache, texture: Option<Texture>, coords: Option<&TexCoordBuffer>) {
    match (texture, coords) {
        (Some(t), Some(coords)) => {
            state.bind_texture(t.id);
            state.set_tex_coord_array_enabled(true);
            state.set_tex_coord_buffer(coords);
        }
        (Some(t), None) => {
            state.bind_texture(t.id);
            state.set_tex_coord_array_enabled(false);
        }
        (None, _) => {
            state.unbind_texture();
            state.set_tex_coord_array_enabled(false);
        }
    }
}

// ── sprite ────────────────────────────────────────────────────────────────

/// Textured (or flat-colored) quad covering the node's size.
#[derive(Debug, Clone)]
pub struct Sprite {
    texture: Option<Texture>,
    quad: VertexBuffer,
    tex_coords: TexCoordBuffer,
    quad_size: Vec2,
}

impl Sprite {
    pub fn new(texture: Option<Texture>) -> Self {
        Self {
            texture,
            quad: VertexBuffer::quad(Rect::new(0.0, 0.0, 1.0, 1.0)),
            tex_coords: default_quad_tex_coords(),
            quad_size: Vec2::ONE,
        }
    }

    #[inline]
    pub fn texture(&self) -> Option<Texture> {
        self.texture
    }

    pub fn set_texture(&mut self, texture: Option<Texture>) {
        self.texture = texture;
    }

    /// Replaces the default full-texture coordinates (e.g. for an atlas region).
    pub fn set_tex_coords(&mut self, coords: TexCoordBuffer) {
        self.tex_coords = coords;
    }
}

impl Drawable for Sprite {
    fn draw(&mut self, ctx: &mut RenderContext, node: &TransformNode) {
        if node.size() != self.quad_size {
            self.quad.set_quad(node.local_rect());
            self.quad_size = node.size();
        }

        let state = &mut ctx.state;
        apply_texture(state, self.texture, Some(&self.tex_coords));
        state.set_color_array_enabled(false);
        self.quad.draw(state);
    }
}

// ── mesh ──────────────────────────────────────────────────────────────────

/// Arbitrary geometry with optional texture, texcoords and per-vertex colors.
///
/// The geometry is drawn as-is; it does not follow the node's size.
pub struct Mesh<G: Geometry> {
    pub geometry: G,
    pub texture: Option<Texture>,
    pub tex_coords: Option<TexCoordBuffer>,
    pub colors: Option<ColorBuffer>,
}

impl<G: Geometry> Mesh<G> {
    pub fn new(geometry: G) -> Self {
        Self {
            geometry,
            texture: None,
            tex_coords: None,
            colors: None,
        }
    }

    pub fn with_texture(mut self, texture: Texture, coords: TexCoordBuffer) -> Self {
        self.texture = Some(texture);
        self.tex_coords = Some(coords);
        self
    }

    pub fn with_colors(mut self, colors: ColorBuffer) -> Self {
        self.colors = Some(colors);
        self
    }
}

impl<G: Geometry> Drawable for Mesh<G> {
    fn draw(&mut self, ctx: &mut RenderContext, _node: &TransformNode) {
        let state = &mut ctx.state;
        apply_texture(state, self.texture, self.tex_coords.as_ref());
        match &self.colors {
            Some(colors) => {
                state.set_color_array_enabled(true);
                state.set_color_buffer(colors);
            }
            None => {
                state.set_color_array_enabled(false);
            }
        }
        self.geometry.draw(state);
    }
}

impl Scene {
    /// New detached sprite leaf, sized to `texture` when one is given.
    pub fn create_sprite(&mut self, texture: Option<Texture>) -> NodeId {
        let id = self.create_drawable(Sprite::new(texture));
        if let Some(t) = texture {
            let size = t.size();
            let _ = self.nodes[id].node.set_size(size);
        }
        id
    }
}
