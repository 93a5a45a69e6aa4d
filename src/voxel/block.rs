/// Block cell contents.
/// One byte per voxel; the enclosed flag rides along with solid cells.

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Block {
    #[default]
    Empty,
    /// `enclosed` is set when the cell directly above is also solid, so the
    /// top face can never be exposed.
    Solid { enclosed: bool },
}

impl Block {
    pub const SOLID: Block = Block::Solid { enclosed: false };

    #[inline]
    pub const fn is_solid(self) -> bool {
        matches!(self, Block::Solid { .. })
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        matches!(self, Block::Empty)
    }

    #[inline]
    pub const fn is_enclosed(self) -> bool {
        matches!(self, Block::Solid { enclosed: true })
    }

    /// Same occupancy with the enclosed flag replaced. Empty stays empty.
    #[inline]
    pub const fn with_enclosed(self, enclosed: bool) -> Self {
        match self {
            Block::Empty => Block::Empty,
            Block::Solid { .. } => Block::Solid { enclosed },
        }
    }

    /// Compact tag: 0 empty, 1 solid, 2 solid and enclosed.
    #[inline]
    pub const fn tag(self) -> u8 {
        match self {
            Block::Empty => 0,
            Block::Solid { enclosed: false } => 1,
            Block::Solid { enclosed: true } => 2,
        }
    }

    /// Convert from a compact tag. Unknown tags read as empty.
    #[inline]
    pub const fn from_tag(tag: u8) -> Self {
        match tag {
            1 => Block::Solid { enclosed: false },
            2 => Block::Solid { enclosed: true },
            _ => Block::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for block in [Block::Empty, Block::SOLID, Block::Solid { enclosed: true }] {
            assert_eq!(Block::from_tag(block.tag()), block);
        }
        assert_eq!(Block::from_tag(9), Block::Empty);
    }

    #[test]
    fn enclosed_flag_only_applies_to_solids() {
        assert_eq!(Block::Empty.with_enclosed(true), Block::Empty);
        assert!(Block::SOLID.with_enclosed(true).is_enclosed());
        assert!(Block::Solid { enclosed: true }.is_solid());
    }
}
