//! Frame timing.
//!
//! One `FrameClock` per render loop; call `tick()` once per frame and pass
//! `FrameTime::delta_ms` to `Scene::frame`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
