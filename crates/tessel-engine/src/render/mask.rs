use crate::coords::Viewport;
use crate::device::{Capability, GpuBackend};

/// Narrow backend view handed to masks while they switch on or off.
pub struct MaskTarget<'a> {
    backend: &'a mut dyn GpuBackend,
}

impl<'a> MaskTarget<'a> {
    pub(crate) fn new(backend: &'a mut dyn GpuBackend) -> Self {
        Self { backend }
    }

    pub fn set_scissor_enabled(&mut self, enabled: bool) {
        self.backend.set_capability(Capability::ScissorTest, enabled);
    }

    pub fn scissor(&mut self, rect: Viewport) {
        self.backend.scissor(rect);
    }
}

/// Capability for anything that can restrict drawing to a region.
///
/// Masks are shared (`Rc`) between nodes and compared by identity.
pub trait Maskable {
    fn enable_mask(&self, target: &mut MaskTarget<'_>);
    fn disable_mask(&self, target: &mut MaskTarget<'_>);
}

/// Window-space scissor rectangle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScissorMask {
    pub rect: Viewport,
}

impl ScissorMask {
    pub fn new(rect: Viewport) -> Self {
        Self { rect }
    }
}

impl Maskable for ScissorMask {
    fn enable_mask(&self, target: &mut MaskTarget<'_>) {
        target.set_scissor_enabled(true);
        target.scissor(self.rect);
    }

    fn disable_mask(&self, target: &mut MaskTarget<'_>) {
        target.set_scissor_enabled(false);
    }
}
