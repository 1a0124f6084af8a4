//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! Block types are interned: a block array stores only the small integer ID,
//! and everything else (per-side color data, names) is looked up in the
//! fixed registry built into the binary.

use num_derive::FromPrimitive;

use super::{BlockDescriptor, BlockId, BLOCK_REGISTRY};

/// Enumerates all possible block types in the voxel world.
///
/// The discriminant doubles as the block ID stored in chunk block arrays,
/// so `AIR` must stay at 0: a zero entry means "no block here".
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// An air block, which is non-solid and never rendered.
    AIR,

    /// A basic dirt block, the filler below the terrain surface.
    DIRT,

    /// A grass block capping the terrain surface; green on top,
    /// grass-over-dirt on the sides, plain dirt underneath.
    GRASS,

    /// A wooden block, placeable by the player.
    WOOD,

    /// A plain white block, handy for testing and markers.
    WHITE,
}

impl BlockType {
    /// Converts a stored block ID back to its `BlockType`.
    ///
    /// # Panics
    /// Panics if the ID doesn't correspond to a registered block type —
    /// a corrupted block array is a programming error, not a runtime
    /// condition to recover from.
    pub fn from_block_id(id: BlockId) -> Self {
        num::FromPrimitive::from_u8(id).unwrap()
    }

    /// The interned ID of this block type.
    #[inline]
    pub fn block_id(self) -> BlockId {
        self as BlockId
    }

    /// Whether blocks of this type occupy space and occlude faces.
    #[inline]
    pub fn is_solid(self) -> bool {
        self != BlockType::AIR
    }

    /// Looks up this type's registry entry (per-side color data).
    pub fn descriptor(self) -> &'static BlockDescriptor {
        &BLOCK_REGISTRY[self as usize]
    }
}
