//! GPU binding layer.
//!
//! This module is responsible for:
//! - the `GpuBackend` trait every fixed-function binding implements
//! - handle and enum types shared with the render-state cache
//! - a recording backend for headless runs and tests

mod backend;
mod error;
mod recording;

pub use backend::{
    Capability, ClientArray, FrameBufferId, GpuBackend, Primitive, Projection, ProjectionMode,
    TextureId,
};
pub use error::GpuErrorCode;
pub use recording::{CallLog, GpuCall, RecordingBackend};
