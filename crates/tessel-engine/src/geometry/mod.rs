//! Vertex, index, texture-coordinate and color buffers.
//!
//! Buffers own no hierarchy logic. They hand packed floats to the
//! render-state cache, which diffs array pointers by `BufferKey`.

mod buffer;
mod quad_mesh;

pub use buffer::{
    default_quad_tex_coords, quad_vertices, BufferId, BufferKey, ColorBuffer, GeometryBuffer,
    TexCoord, TexCoordBuffer, Vertex, VertexBuffer, VertexColor,
};
pub use quad_mesh::{QuadMesh, INDICES_PER_CELL, VERTICES_PER_CELL};

use crate::render::RenderStateCache;

/// Something that can issue its own draw call through the state cache.
pub trait Geometry {
    fn draw(&mut self, state: &mut RenderStateCache);
}
