//! # Terrain Generation Module
//!
//! Deterministic terrain generation: a pure function from chunk coordinate
//! to block data. The same fixed noise seed is used every run, so results
//! are reproducible and independent of request order — which is what lets
//! the generator run in its own worker context with no shared state.

use cgmath::Point3;
use noise::{NoiseFn, Perlin};

use super::block::block_side::BlockSide;
use super::block::block_type::BlockType;
use super::block::BlockId;
use super::chunk::coordinates::block_index;
use super::chunk::{BlockArray, SideLayer, CHUNK_DIMENSION, CHUNK_PLANE_SIZE, CHUNK_VOLUME};

/// Seed for the world's elevation noise field.
pub const TERRAIN_SEED: u32 = 0;

/// Scale of the fine elevation octave (world units per noise unit).
const FINE_SCALE: f64 = 1.0 / 64.0;
/// Amplitude of the fine octave, in blocks.
const FINE_AMPLITUDE: f64 = 8.0;
/// Scale of the coarse elevation octave.
const COARSE_SCALE: f64 = 1.0 / 256.0;
/// Amplitude of the coarse octave, in blocks.
const COARSE_AMPLITUDE: f64 = 64.0;

/// The terrain produced for one chunk coordinate.
///
/// `blocks` is `None` when the column heights imply no solid block anywhere
/// in the chunk's vertical range — an air-only chunk carries no block data
/// at all, and `sides`/`sides_are_solid` are absent with it.
pub struct ChunkTerrain {
    /// The chunk coordinate this terrain belongs to.
    pub position: Point3<i32>,
    /// Block IDs, or `None` for an air-only chunk.
    pub blocks: Option<BlockArray>,
    /// Boundary-layer snapshots for each of the six sides.
    pub sides: Option<Box<[SideLayer; 6]>>,
    /// Whether each boundary layer is fully solid.
    pub sides_are_solid: [bool; 6],
}

/// Generates the terrain for one chunk.
///
/// Per column, the surface elevation is the sum of two 2-D Perlin octaves
/// (fine and coarse), shifted down by the chunk's vertical offset. Columns
/// fill up to that elevation, capped with grass for the top two layers and
/// dirt below. Elevations outside the chunk's vertical range are clamped
/// by the fill loop, never an error.
pub fn generate_chunk_terrain(position: Point3<i32>) -> ChunkTerrain {
    let perlin = Perlin::new(TERRAIN_SEED);
    let mut blocks: BlockArray = Box::new([0; CHUNK_VOLUME]);
    let mut contains_blocks = false;

    for bx in 0..CHUNK_DIMENSION {
        for bz in 0..CHUNK_DIMENSION {
            let wx = (position.x * CHUNK_DIMENSION + bx) as f64;
            let wz = (position.z * CHUNK_DIMENSION + bz) as f64;
            let elevation = ((perlin.get([wx * FINE_SCALE, wz * FINE_SCALE]) / 2.0 + 0.5)
                * FINE_AMPLITUDE)
                .floor() as i32
                + ((perlin.get([wx * COARSE_SCALE, wz * COARSE_SCALE]) / 2.0 + 0.5)
                    * COARSE_AMPLITUDE)
                    .floor() as i32
                - position.y * CHUNK_DIMENSION;

            let mut by = 0;
            while by < CHUNK_DIMENSION && by <= elevation {
                let block_type = if by >= elevation - 1 {
                    BlockType::GRASS
                } else {
                    BlockType::DIRT
                };
                blocks[block_index(Point3::new(bx, by, bz))] = block_type.block_id();
                contains_blocks = true;
                by += 1;
            }
        }
    }

    if !contains_blocks {
        return ChunkTerrain {
            position,
            blocks: None,
            sides: None,
            sides_are_solid: [false; 6],
        };
    }

    let (sides, sides_are_solid) = extract_boundary_layers(&blocks);
    ChunkTerrain {
        position,
        blocks: Some(blocks),
        sides: Some(sides),
        sides_are_solid,
    }
}

/// Flattens each of the six boundary layers of a block array into a 16x16
/// snapshot, noting whether the layer is fully solid.
pub fn extract_boundary_layers(
    blocks: &[BlockId; CHUNK_VOLUME],
) -> (Box<[SideLayer; 6]>, [bool; 6]) {
    let mut sides = Box::new([[0; CHUNK_PLANE_SIZE]; 6]);
    let mut sides_are_solid = [true; 6];

    for side in BlockSide::all() {
        for u in 0..CHUNK_DIMENSION {
            for v in 0..CHUNK_DIMENSION {
                let position = side.boundary_position(u, v);
                let id = blocks[block_index(position)];
                if id == 0 {
                    sides_are_solid[side.index()] = false;
                }
                sides[side.index()][side.layer_index(position)] = id;
            }
        }
    }

    (sides, sides_are_solid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let position = Point3::new(3, 0, -2);
        let a = generate_chunk_terrain(position);
        let b = generate_chunk_terrain(position);
        assert_eq!(a.blocks.is_some(), b.blocks.is_some());
        if let (Some(a), Some(b)) = (&a.blocks, &b.blocks) {
            assert!(a.iter().eq(b.iter()));
        }
    }

    #[test]
    fn deep_chunks_are_fully_solid() {
        // Elevation is at least 16 once the chunk sits a level below the
        // surface band, so every cell must be filled.
        let terrain = generate_chunk_terrain(Point3::new(0, -2, 0));
        let blocks = terrain.blocks.expect("deep chunk should contain blocks");
        assert!(blocks.iter().all(|&b| b != 0));
        assert_eq!(terrain.sides_are_solid, [true; 6]);
    }

    #[test]
    fn sky_chunks_are_air_only() {
        // The two octaves sum to at most 8 + 64 blocks of elevation.
        let terrain = generate_chunk_terrain(Point3::new(0, 6, 0));
        assert!(terrain.blocks.is_none());
        assert!(terrain.sides.is_none());
    }

    #[test]
    fn boundary_layers_mirror_the_block_array() {
        let terrain = generate_chunk_terrain(Point3::new(0, 2, 0));
        let Some(blocks) = &terrain.blocks else {
            // Surface band varies with the noise field; nothing to check
            // for an air-only result.
            return;
        };
        let sides = terrain.sides.as_ref().unwrap();
        for side in BlockSide::all() {
            for u in 0..CHUNK_DIMENSION {
                for v in 0..CHUNK_DIMENSION {
                    let position = side.boundary_position(u, v);
                    assert_eq!(
                        sides[side.index()][side.layer_index(position)],
                        blocks[block_index(position)]
                    );
                }
            }
        }
    }
}
