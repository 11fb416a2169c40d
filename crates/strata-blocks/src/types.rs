/// Registry key of a block type.
pub type BlockId = u16;

/// Reserved id of the empty block. Always present in a registry.
pub const EMPTY: BlockId = 0;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct MaterialId(pub u16);
