//! # Meshing Module
//!
//! The from-scratch geometry builder: given one chunk's block array and a
//! boundary snapshot for each of its six neighbors, it computes the full
//! set of visible faces and produces the chunk's face table. This path
//! runs in the geometry worker context when a chunk first passes its
//! readiness gate; all later edits go through the face table's incremental
//! operations on the main context instead.

use cgmath::Point3;

use crate::voxels::block::block_side::BlockSide;
use crate::voxels::block::block_type::BlockType;
use crate::voxels::chunk::coordinates::{block_index, block_position, position_is_within_chunk};
use crate::voxels::chunk::face_table::FaceTable;
use crate::voxels::chunk::{BlockArray, SideLayer, CHUNK_VOLUME};

pub mod face;
pub mod tasks;

/// What the builder knows about the blocks on the far side of one chunk
/// boundary.
///
/// An unloaded neighbor is reported as `Solid`: no face is ever emitted at
/// the edge of an unknown region, so nothing can expose a seam into
/// unrendered space. (With the world's readiness gate in front of the
/// builder this arm also stands in for a fully solid loaded layer, which
/// needs no per-block data either.)
pub enum NeighborBoundary {
    /// Every cell on the far side is occupied — or unknown, which is
    /// treated the same way.
    Solid,
    /// Every cell on the far side is empty (an air-only neighbor).
    Empty,
    /// Per-cell snapshot of the neighbor's facing boundary layer.
    Layer(Box<SideLayer>),
}

impl NeighborBoundary {
    /// Whether the neighbor cell at the given flattened layer index
    /// occludes a face.
    #[inline]
    pub fn is_solid_at(&self, layer_index: usize) -> bool {
        match self {
            NeighborBoundary::Solid => true,
            NeighborBoundary::Empty => false,
            NeighborBoundary::Layer(layer) => layer[layer_index] != 0,
        }
    }
}

/// One chunk's worth of input to the geometry builder.
pub struct ChunkGeometryInput {
    /// The chunk coordinate being built.
    pub position: Point3<i32>,
    /// The chunk's block array (air-only chunks are never submitted).
    pub blocks: BlockArray,
    /// Boundary data for each of the six neighbors, indexed by side.
    pub neighbor_sides: [NeighborBoundary; 6],
}

/// One chunk's worth of builder output.
pub struct ChunkGeometry {
    /// The chunk coordinate this geometry belongs to.
    pub position: Point3<i32>,
    /// The complete face table: live vertex/color buffers plus the four
    /// face-buffer index structures.
    pub faces: FaceTable,
}

/// Computes the full set of visible faces for one chunk.
///
/// Visits every occupied block in ascending index order and its six sides
/// in slot order; a face is emitted exactly when the adjacent cell —
/// in-chunk lookup or neighbor snapshot — is empty. The emission order is
/// not semantically required but is stable, which keeps builds
/// reproducible. Output buffers are trimmed to power-of-two face capacity
/// so future in-place growth is bounded without per-face reallocation.
pub fn build_chunk_geometry(input: &ChunkGeometryInput) -> FaceTable {
    let mut faces = FaceTable::new();

    for index in 0..CHUNK_VOLUME {
        let id = input.blocks[index];
        if id == 0 {
            continue;
        }
        let block_type = BlockType::from_block_id(id);
        let position = block_position(index);

        for side in BlockSide::all() {
            let adjacent = side.adjacent_position(position);
            let occluded = if position_is_within_chunk(adjacent) {
                input.blocks[block_index(adjacent)] != 0
            } else {
                input.neighbor_sides[side.index()].is_solid_at(side.layer_index(adjacent))
            };

            if !occluded {
                faces.create_face(
                    index,
                    side,
                    &block_type.descriptor().color_run(side, false),
                    &face::side_vertices(position, side),
                );
            }
        }
    }

    faces.trim();
    faces
}
