use crate::coords::Vec2;
use crate::device::ProjectionMode;
use crate::paint::{BlendFunc, Color};
use crate::render::DebugFlags;

/// Scene configuration.
///
/// Keep this structure small. Every field here is read once at construction
/// (or on `Scene::resize`) and copied into the live scene.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Logical scene size in pixels. Also the viewport and projection size.
    pub size: Vec2,

    /// Axis system applied at the start of each drawn frame.
    pub projection: ProjectionMode,

    /// Blend function used by nodes without an override.
    pub default_blend: BlendFunc,

    /// Refresh global bounds during the update pass for nodes whose layout
    /// changed. Required for viewport culling.
    pub auto_update_bounds: bool,

    /// Skip drawing leaves whose global bounds fall outside the scene rect.
    pub cull_to_viewport: bool,

    /// Debug overlays forced on for every node.
    pub debug: DebugFlags,

    /// Color the frame buffer is cleared to before drawing. `None` skips the clear.
    pub clear_color: Option<Color>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(480.0, 800.0),
            projection: ProjectionMode::BottomLeft,
            default_blend: BlendFunc::interpolate(),
            auto_update_bounds: false,
            cull_to_viewport: false,
            debug: DebugFlags::empty(),
            clear_color: Some(Color::BLACK),
        }
    }
}

impl SceneConfig {
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            ..Self::default()
        }
    }
}
