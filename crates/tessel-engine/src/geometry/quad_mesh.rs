use crate::coords::Rect;
use crate::device::Primitive;
use crate::render::RenderStateCache;

use super::{Geometry, GeometryBuffer, Vertex};

pub const VERTICES_PER_CELL: usize = 4;
pub const INDICES_PER_CELL: usize = 6;

/// Grid of independent quads drawn with one indexed triangle call.
///
/// Cell edits go to a staging copy and are uploaded on `validate` (called by
/// `draw`), so many edits per frame cost a single pointer re-bind.
#[derive(Debug, Clone)]
pub struct QuadMesh {
    staging: Vec<Vertex>,
    vertices: GeometryBuffer<Vertex>,
    indices: Vec<u16>,
    cells: usize,
    dirty: bool,
}

impl QuadMesh {
    pub fn new(cells: usize) -> Self {
        let mut mesh = Self {
            staging: Vec::new(),
            vertices: GeometryBuffer::default(),
            indices: Vec::new(),
            cells: 0,
            dirty: false,
        };
        mesh.set_cell_count(cells);
        mesh
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells
    }

    /// Resizes the mesh. Growing reallocates and clears all cells; shrinking
    /// keeps storage and draws fewer cells.
    pub fn set_cell_count(&mut self, cells: usize) {
        if cells > self.capacity() {
            self.staging = vec![Vertex::default(); cells * VERTICES_PER_CELL];
            self.indices = Self::build_indices(cells);
            self.dirty = true;
        }
        self.cells = cells;
    }

    fn capacity(&self) -> usize {
        self.indices.len() / INDICES_PER_CELL
    }

    /// Two triangles per cell: `[0,1,2]` and `[2,1,3]` offset by the cell base.
    fn build_indices(cells: usize) -> Vec<u16> {
        let mut out = Vec::with_capacity(cells * INDICES_PER_CELL);
        for cell in 0..cells {
            let base = (cell * VERTICES_PER_CELL) as u16;
            out.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
        }
        out
    }

    #[inline]
    pub fn indices(&self) -> &[u16] {
        &self.indices[..self.cells * INDICES_PER_CELL]
    }

    pub fn set_rect_at(&mut self, index: usize, r: Rect) {
        self.set_values_at(
            index,
            [
                Vertex::new(r.left, r.bottom),
                Vertex::new(r.left, r.top),
                Vertex::new(r.right, r.bottom),
                Vertex::new(r.right, r.top),
            ],
        );
    }

    /// Same as `set_rect_at` with the cell mirrored top to bottom.
    pub fn set_rect_flip_vertical_at(&mut self, index: usize, r: Rect) {
        self.set_values_at(
            index,
            [
                Vertex::new(r.left, r.top),
                Vertex::new(r.left, r.bottom),
                Vertex::new(r.right, r.top),
                Vertex::new(r.right, r.bottom),
            ],
        );
    }

    pub fn set_values_at(&mut self, index: usize, corners: [Vertex; 4]) {
        let start = index * VERTICES_PER_CELL;
        self.staging[start..start + VERTICES_PER_CELL].copy_from_slice(&corners);
        self.dirty = true;
    }

    /// Uploads pending cell edits. No-op when nothing changed.
    pub fn validate(&mut self) {
        if self.dirty {
            self.vertices.set_data(self.staging.clone());
            self.dirty = false;
        }
    }

    #[inline]
    pub fn vertices(&self) -> &GeometryBuffer<Vertex> {
        &self.vertices
    }
}

impl Geometry for QuadMesh {
    fn draw(&mut self, state: &mut RenderStateCache) {
        self.validate();
        if self.cells == 0 {
            return;
        }
        state.set_vertex_array_enabled(true);
        state.set_vertex_buffer(&self.vertices);
        let count = self.cells * INDICES_PER_CELL;
        state.draw_elements(Primitive::Triangles, &self.indices[..count]);
    }
}
