//! # Block Module
//!
//! Block type definitions, the per-side color registry, and the direction
//! table. Blocks themselves are just IDs in a chunk's block array; the
//! registry here is a process-wide immutable table built into the binary,
//! so it can be read from any thread without synchronization.

use block_side::BlockSide;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to store block types in block arrays
/// and boundary layers. 0 always means "air".
pub type BlockId = u8;

/// Number of floats written per triangle into the vertex and color
/// buffers: 3 vertices x (x, y, z) or (r, g, b).
pub const FLOATS_PER_TRIANGLE: usize = 9;

/// The registry entry for one block type: a flat RGB color per side, plus
/// a parallel highlighted variant used for cursor feedback.
pub struct BlockDescriptor {
    /// Human-readable name, mostly for logs and debugging.
    pub name: &'static str,
    /// Per-side base color, indexed by `BlockSide`.
    pub face_colors: [[f32; 3]; 6],
    /// Per-side highlighted color, indexed by `BlockSide`.
    pub highlight_colors: [[f32; 3]; 6],
}

impl BlockDescriptor {
    /// Expands one side's color into the 9-float run written for a single
    /// triangle (the same RGB repeated for its 3 vertices).
    pub fn color_run(&self, side: BlockSide, highlighted: bool) -> [f32; FLOATS_PER_TRIANGLE] {
        let [r, g, b] = if highlighted {
            self.highlight_colors[side.index()]
        } else {
            self.face_colors[side.index()]
        };
        [r, g, b, r, g, b, r, g, b]
    }

    /// All six per-side color runs at once, in side-index order.
    pub fn color_runs(&self, highlighted: bool) -> [[f32; FLOATS_PER_TRIANGLE]; 6] {
        let mut runs = [[0.0; FLOATS_PER_TRIANGLE]; 6];
        for side in BlockSide::all() {
            runs[side.index()] = self.color_run(side, highlighted);
        }
        runs
    }
}

/// Maps each block type to its per-side color data.
///
/// Indexed by `BlockType` as a `usize`; the side order within each entry is
/// [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]. The AIR entry exists only so
/// the indices line up; nothing ever renders it.
pub static BLOCK_REGISTRY: [BlockDescriptor; 5] = [
    BlockDescriptor {
        name: "air",
        face_colors: [[0.0; 3]; 6],
        highlight_colors: [[0.0; 3]; 6],
    },
    BlockDescriptor {
        name: "dirt",
        face_colors: [[0.42, 0.28, 0.16]; 6],
        highlight_colors: [[0.58, 0.42, 0.27]; 6],
    },
    BlockDescriptor {
        name: "grass",
        face_colors: [
            [0.35, 0.43, 0.19], // front: grass over dirt
            [0.35, 0.43, 0.19], // back
            [0.42, 0.28, 0.16], // bottom: plain dirt
            [0.27, 0.56, 0.22], // top: green
            [0.35, 0.43, 0.19], // left
            [0.35, 0.43, 0.19], // right
        ],
        highlight_colors: [
            [0.50, 0.60, 0.31],
            [0.50, 0.60, 0.31],
            [0.58, 0.42, 0.27],
            [0.41, 0.74, 0.35],
            [0.50, 0.60, 0.31],
            [0.50, 0.60, 0.31],
        ],
    },
    BlockDescriptor {
        name: "wood",
        face_colors: [[0.36, 0.25, 0.13]; 6],
        highlight_colors: [[0.51, 0.38, 0.23]; 6],
    },
    BlockDescriptor {
        name: "white",
        face_colors: [[0.92, 0.92, 0.92]; 6],
        highlight_colors: [[1.0, 1.0, 0.85]; 6],
    },
];
