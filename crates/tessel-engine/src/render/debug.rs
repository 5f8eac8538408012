use bitflags::bitflags;

bitflags! {
    /// Debug overlays drawn by the scene traversal.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DebugFlags: u8 {
        /// Outline of the node's local rectangle, in node space.
        const LOCAL_SHAPE   = 0b01;
        /// Outline of the node's global bounds, in scene space.
        const GLOBAL_BOUNDS = 0b10;
    }
}
