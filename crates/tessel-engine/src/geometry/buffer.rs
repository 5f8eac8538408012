//! Flat numeric buffers handed to the fixed-function array pointers.

use std::sync::atomic::{AtomicU64, Ordering};

use bytemuck::{Pod, Zeroable};

use crate::coords::Rect;
use crate::device::Primitive;
use crate::paint::Color;
use crate::render::RenderStateCache;

use super::Geometry;

// ── identity ──────────────────────────────────────────────────────────────

static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique buffer identity.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferId(u64);

impl BufferId {
    fn next() -> Self {
        Self(NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identity plus content revision. Two equal keys always describe the same
/// bytes, so the state cache can skip re-pointing an array.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferKey {
    pub id: BufferId,
    pub revision: u64,
}

// ── element types ─────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
}

impl Vertex {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct TexCoord {
    pub u: f32,
    pub v: f32,
}

impl TexCoord {
    #[inline]
    pub const fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct VertexColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl From<Color> for VertexColor {
    fn from(c: Color) -> Self {
        Self { r: c.r, g: c.g, b: c.b, a: c.a }
    }
}

// ── generic buffer ────────────────────────────────────────────────────────

/// Owned, tightly packed element buffer with a content revision.
///
/// Every mutation bumps the revision, so a pointer bound from an older
/// revision is never mistaken for the current contents.
#[derive(Debug)]
pub struct GeometryBuffer<T: Pod> {
    id: BufferId,
    revision: u64,
    data: Vec<T>,
}

impl<T: Pod> GeometryBuffer<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            id: BufferId::next(),
            revision: 0,
            data,
        }
    }

    #[inline]
    pub fn key(&self) -> BufferKey {
        BufferKey {
            id: self.id,
            revision: self.revision,
        }
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Elements reinterpreted as packed floats.
    #[inline]
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data;
        self.revision += 1;
    }

    /// Replaces `values.len()` elements starting at `start`.
    ///
    /// # Panics
    ///
    /// Panics if `start + values.len()` exceeds `len()`.
    pub fn write_at(&mut self, start: usize, values: &[T]) {
        self.data[start..start + values.len()].copy_from_slice(values);
        self.revision += 1;
    }
}

impl<T: Pod> Clone for GeometryBuffer<T> {
    fn clone(&self) -> Self {
        Self {
            id: BufferId::next(),
            revision: self.revision,
            data: self.data.clone(),
        }
    }
}

impl<T: Pod> Default for GeometryBuffer<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

pub type TexCoordBuffer = GeometryBuffer<TexCoord>;
pub type ColorBuffer = GeometryBuffer<VertexColor>;

/// Texture coordinates matching `quad_vertices`: full texture, top row first.
pub fn default_quad_tex_coords() -> TexCoordBuffer {
    GeometryBuffer::new(vec![
        TexCoord::new(0.0, 0.0),
        TexCoord::new(0.0, 1.0),
        TexCoord::new(1.0, 0.0),
        TexCoord::new(1.0, 1.0),
    ])
}

/// Triangle-strip corners of `r`: top-left, bottom-left, top-right,
/// bottom-right in bottom-left axis terms (`bottom` is the larger y).
pub fn quad_vertices(r: Rect) -> [Vertex; 4] {
    [
        Vertex::new(r.left, r.bottom),
        Vertex::new(r.left, r.top),
        Vertex::new(r.right, r.bottom),
        Vertex::new(r.right, r.top),
    ]
}

// ── vertex buffer ─────────────────────────────────────────────────────────

/// Positions plus an optional index list, drawn with a single primitive.
#[derive(Debug, Clone)]
pub struct VertexBuffer {
    pub primitive: Primitive,
    pub vertices: GeometryBuffer<Vertex>,
    pub indices: Option<Vec<u16>>,
}

impl VertexBuffer {
    pub fn new(primitive: Primitive, vertices: Vec<Vertex>) -> Self {
        Self {
            primitive,
            vertices: GeometryBuffer::new(vertices),
            indices: None,
        }
    }

    pub fn with_indices(mut self, indices: Vec<u16>) -> Self {
        self.indices = Some(indices);
        self
    }

    /// Unit-less quad covering `r`, drawn as a triangle strip.
    pub fn quad(r: Rect) -> Self {
        Self::new(Primitive::TriangleStrip, quad_vertices(r).to_vec())
    }

    /// Closed outline of `r`, drawn as a line loop.
    pub fn outline(r: Rect) -> Self {
        Self::new(
            Primitive::LineLoop,
            vec![
                Vertex::new(r.left, r.top),
                Vertex::new(r.right, r.top),
                Vertex::new(r.right, r.bottom),
                Vertex::new(r.left, r.bottom),
            ],
        )
    }

    pub fn set_quad(&mut self, r: Rect) {
        self.vertices.set_data(quad_vertices(r).to_vec());
    }
}

impl Geometry for VertexBuffer {
    fn draw(&mut self, state: &mut RenderStateCache) {
        if self.vertices.is_empty() {
            return;
        }
        state.set_vertex_array_enabled(true);
        state.set_vertex_buffer(&self.vertices);
        match &self.indices {
            Some(indices) => state.draw_elements(self.primitive, indices),
            None => state.draw_arrays(self.primitive, 0, self.vertices.len()),
        }
    }
}
