use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::coords::Viewport;
use crate::paint::{BlendFactor, Color};

use super::{
    Capability, ClientArray, FrameBufferId, GpuBackend, GpuErrorCode, Primitive, Projection,
    TextureId,
};

/// One recorded backend call. Queries (`max_texture_size`, `take_error`) are
/// not recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum GpuCall {
    BindTexture(TextureId),
    Capability(Capability, bool),
    ClientState(ClientArray, bool),
    BlendFunc(BlendFactor, BlendFactor),
    BlendFuncSeparate(BlendFactor, BlendFactor, BlendFactor, BlendFactor),
    Color(Color),
    LineWidth(f32),
    BindFrameBuffer(FrameBufferId),
    Viewport(Viewport),
    Projection(Projection),
    Scissor(Viewport),
    Clear(Color),
    PushMatrix,
    PopMatrix,
    LoadIdentity,
    Translate(f32, f32, f32),
    Scale(f32, f32),
    Rotate(f32, [f32; 3]),
    VertexPointer { components: u8, len: usize },
    TexCoordPointer { len: usize },
    ColorPointer { len: usize },
    DrawArrays(Primitive, usize, usize),
    DrawElements(Primitive, usize),
}

impl GpuCall {
    /// `true` for calls that change cached render state (everything except
    /// clears, the matrix stack and draw calls).
    pub fn is_state_change(&self) -> bool {
        !matches!(
            self,
            GpuCall::Clear(..)
                | GpuCall::PushMatrix
                | GpuCall::PopMatrix
                | GpuCall::LoadIdentity
                | GpuCall::Translate(..)
                | GpuCall::Scale(..)
                | GpuCall::Rotate(..)
                | GpuCall::DrawArrays(..)
                | GpuCall::DrawElements(..)
        )
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, GpuCall::DrawArrays(..) | GpuCall::DrawElements(..))
    }
}

#[derive(Debug, Default)]
struct LogInner {
    calls: Vec<GpuCall>,
    pending_errors: VecDeque<GpuErrorCode>,
}

/// Shared view of what a `RecordingBackend` has received.
///
/// Cloning shares the same log, so a test (or the studio) can keep a handle
/// after moving the backend into the render-state cache.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    inner: Rc<RefCell<LogInner>>,
}

impl CallLog {
    /// Snapshot of all calls recorded so far.
    pub fn calls(&self) -> Vec<GpuCall> {
        self.inner.borrow().calls.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of recorded calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&GpuCall) -> bool) -> usize {
        self.inner.borrow().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().calls.clear();
    }

    /// Queues an error code to be returned by the next `take_error`.
    pub fn push_error(&self, code: GpuErrorCode) {
        self.inner.borrow_mut().pending_errors.push_back(code);
    }

    fn record(&self, call: GpuCall) {
        log::trace!("gpu: {call:?}");
        self.inner.borrow_mut().calls.push(call);
    }
}

/// Backend that performs no rendering and records every call.
///
/// Matrix stack depth is tracked so unbalanced pops surface as
/// `StackUnderflow`, as a real driver would report.
#[derive(Debug)]
pub struct RecordingBackend {
    log: CallLog,
    max_texture_size: u32,
    matrix_depth: usize,
}

impl RecordingBackend {
    pub const DEFAULT_MAX_TEXTURE_SIZE: u32 = 2048;

    pub fn new() -> Self {
        Self::with_max_texture_size(Self::DEFAULT_MAX_TEXTURE_SIZE)
    }

    pub fn with_max_texture_size(max_texture_size: u32) -> Self {
        Self {
            log: CallLog::default(),
            max_texture_size,
            matrix_depth: 0,
        }
    }

    /// Handle to the shared call log.
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuBackend for RecordingBackend {
    fn bind_texture(&mut self, texture: TextureId) {
        self.log.record(GpuCall::BindTexture(texture));
    }

    fn set_capability(&mut self, cap: Capability, enabled: bool) {
        self.log.record(GpuCall::Capability(cap, enabled));
    }

    fn set_client_state(&mut self, array: ClientArray, enabled: bool) {
        self.log.record(GpuCall::ClientState(array, enabled));
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.log.record(GpuCall::BlendFunc(src, dst));
    }

    fn blend_func_separate(
        &mut self,
        src: BlendFactor,
        dst: BlendFactor,
        src_alpha: BlendFactor,
        dst_alpha: BlendFactor,
    ) {
        self.log
            .record(GpuCall::BlendFuncSeparate(src, dst, src_alpha, dst_alpha));
    }

    fn color(&mut self, color: Color) {
        self.log.record(GpuCall::Color(color));
    }

    fn line_width(&mut self, width: f32) {
        self.log.record(GpuCall::LineWidth(width));
    }

    fn bind_frame_buffer(&mut self, fb: FrameBufferId) {
        self.log.record(GpuCall::BindFrameBuffer(fb));
    }

    fn viewport(&mut self, rect: Viewport) {
        self.log.record(GpuCall::Viewport(rect));
    }

    fn projection(&mut self, projection: Projection) {
        self.log.record(GpuCall::Projection(projection));
    }

    fn scissor(&mut self, rect: Viewport) {
        self.log.record(GpuCall::Scissor(rect));
    }

    fn clear(&mut self, color: Color) {
        self.log.record(GpuCall::Clear(color));
    }

    fn push_matrix(&mut self) {
        self.matrix_depth += 1;
        self.log.record(GpuCall::PushMatrix);
    }

    fn pop_matrix(&mut self) {
        if self.matrix_depth == 0 {
            self.log.push_error(GpuErrorCode::StackUnderflow);
        } else {
            self.matrix_depth -= 1;
        }
        self.log.record(GpuCall::PopMatrix);
    }

    fn load_identity(&mut self) {
        self.log.record(GpuCall::LoadIdentity);
    }

    fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.log.record(GpuCall::Translate(x, y, z));
    }

    fn scale(&mut self, x: f32, y: f32) {
        self.log.record(GpuCall::Scale(x, y));
    }

    fn rotate(&mut self, degrees: f32, axis: [f32; 3]) {
        self.log.record(GpuCall::Rotate(degrees, axis));
    }

    fn vertex_pointer(&mut self, components: u8, data: &[f32]) {
        self.log.record(GpuCall::VertexPointer {
            components,
            len: data.len(),
        });
    }

    fn tex_coord_pointer(&mut self, data: &[f32]) {
        self.log.record(GpuCall::TexCoordPointer { len: data.len() });
    }

    fn color_pointer(&mut self, data: &[f32]) {
        self.log.record(GpuCall::ColorPointer { len: data.len() });
    }

    fn draw_arrays(&mut self, primitive: Primitive, first: usize, count: usize) {
        self.log.record(GpuCall::DrawArrays(primitive, first, count));
    }

    fn draw_elements(&mut self, primitive: Primitive, indices: &[u16]) {
        self.log
            .record(GpuCall::DrawElements(primitive, indices.len()));
    }

    fn max_texture_size(&mut self) -> u32 {
        self.max_texture_size
    }

    fn take_error(&mut self) -> Option<GpuErrorCode> {
        self.log.inner.borrow_mut().pending_errors.pop_front()
    }
}
