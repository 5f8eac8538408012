use bitflags::bitflags;

bitflags! {
    /// Pending-change bits carried by every node.
    ///
    /// A node may be dirty in several dimensions at once. Bits raised on a node
    /// are forwarded (cumulatively) to its ancestors.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct InvalidateFlags: u16 {
        const POSITION   = 1 << 0;
        const ORIGIN     = 1 << 1;
        const SIZE       = 1 << 2;
        const SCALE      = 1 << 3;
        const ROTATION   = 1 << 4;
        const COLOR      = 1 << 5;
        const ALPHA      = 1 << 6;
        /// Blend function, mask or alpha-test state.
        const BLEND      = 1 << 7;
        const VISIBILITY = 1 << 8;
        /// Global bounds need recomputing.
        const BOUNDS     = 1 << 9;
        /// Child membership or paint order changed.
        const CHILDREN   = 1 << 10;

        /// Everything that moves or resizes a node's footprint.
        const LAYOUT = Self::POSITION.bits()
            | Self::ORIGIN.bits()
            | Self::SIZE.bits()
            | Self::SCALE.bits()
            | Self::ROTATION.bits()
            | Self::BOUNDS.bits()
            | Self::CHILDREN.bits();

        /// Everything consumed by a draw pass.
        const VISUAL = Self::POSITION.bits()
            | Self::ORIGIN.bits()
            | Self::SIZE.bits()
            | Self::SCALE.bits()
            | Self::ROTATION.bits()
            | Self::COLOR.bits()
            | Self::ALPHA.bits()
            | Self::BLEND.bits()
            | Self::VISIBILITY.bits()
            | Self::CHILDREN.bits();

        /// Bits that change the sum color.
        const TINT = Self::COLOR.bits() | Self::ALPHA.bits();
    }
}
