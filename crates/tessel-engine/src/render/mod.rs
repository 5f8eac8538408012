//! Fixed-function rendering support.
//!
//! `RenderStateCache` is the only writer to the GPU backend; everything else
//! (scene traversal, drawables, geometry) asks it for state deltas.
//!
//! Convention:
//! - scene geometry is in logical pixels; the projection decides the axis system
//! - the model-view matrix stack mirrors the node hierarchy during a draw

mod ctx;
mod debug;
mod mask;
mod state;
mod texture;

pub use ctx::{RenderContext, DEBUG_BOUNDS_COLOR, DEBUG_SHAPE_COLOR};
pub use debug::DebugFlags;
pub use mask::{MaskTarget, Maskable, ScissorMask};
pub use state::{RenderStateCache, RenderStats};
pub use texture::Texture;
