//! Integration tests for incremental face-buffer mutations on a live
//! chunk: constant-time face creation and swap-with-last removal, group
//! compaction, highlight rewrites, and capacity growth.

use std::collections::HashSet;

use cgmath::Point3;
use voxel_engine_core::meshing::face::side_vertices;
use voxel_engine_core::meshing::{build_chunk_geometry, ChunkGeometryInput, NeighborBoundary};
use voxel_engine_core::voxels::chunk::coordinates::block_index;
use voxel_engine_core::voxels::chunk::face_table::{FaceTable, FLOATS_PER_SIDE};
use voxel_engine_core::voxels::chunk::{BlockArray, CHUNK_VOLUME};
use voxel_engine_core::voxels::terrain::{extract_boundary_layers, ChunkTerrain};
use voxel_engine_core::{BlockSide, BlockType, Chunk, ChunkState};

fn empty_blocks() -> BlockArray {
    Box::new([0; CHUNK_VOLUME])
}

/// Runs a block array through the normal pipeline stages synchronously,
/// producing a `Live` chunk with its geometry built against all-solid
/// (unloaded-equivalent) boundaries.
fn live_chunk(blocks: BlockArray) -> Chunk {
    let position = Point3::new(0, 0, 0);
    let mut chunk = Chunk::new(position);

    let (sides, sides_are_solid) = extract_boundary_layers(&blocks);
    chunk.install_terrain(ChunkTerrain {
        position,
        blocks: Some(blocks.clone()),
        sides: Some(sides),
        sides_are_solid,
    });
    chunk.mark_geometry_pending();
    chunk.install_geometry(build_chunk_geometry(&ChunkGeometryInput {
        position,
        blocks,
        neighbor_sides: std::array::from_fn(|_| NeighborBoundary::Solid),
    }));
    assert_eq!(chunk.state(), ChunkState::Live);
    chunk
}

fn assert_face_table_invariants(faces: &FaceTable) {
    let mut reachable = 0;
    for block in faces.blocks_with_faces() {
        let slots = faces.group_slots(block).unwrap();
        assert!(slots.iter().any(|&slot| slot != -1));
        for (slot_index, &slot) in slots.iter().enumerate() {
            if slot == -1 {
                continue;
            }
            reachable += 1;
            assert_eq!(faces.block_index_for_face(slot as usize), Some(block));
            assert_eq!(faces.slot_for_face(slot as usize), Some(slot_index));
        }
    }
    assert_eq!(reachable, faces.face_count(), "live region has orphan faces");
}

/// After any amount of compaction, every live face's vertex run must still
/// be the run its (block, side, triangle) coordinates would generate.
fn assert_vertices_match_owners(chunk: &Chunk) {
    let faces = chunk.faces();
    for face in 0..faces.face_count() {
        let block = faces.block_position_for_face(face).unwrap();
        let side = faces.side_for_face(face).unwrap();
        let triangle = faces.slot_for_face(face).unwrap() % 2;
        let expected = side_vertices(block, side);
        assert_eq!(
            &faces.vertices()[face * 9..face * 9 + 9],
            &expected[triangle * 9..(triangle + 1) * 9],
            "face {} carries vertex data for the wrong quad",
            face
        );
    }
}

/// The current visible-face set as unordered (block, side) pairs.
fn face_set(chunk: &Chunk) -> HashSet<(usize, BlockSide)> {
    let faces = chunk.faces();
    let mut set = HashSet::new();
    for block in faces.blocks_with_faces() {
        for side in BlockSide::all() {
            if faces.has_face(block, side) {
                set.insert((block, side));
            }
        }
    }
    set
}

#[test]
fn removing_and_recreating_a_face_restores_the_set() {
    let mut blocks = empty_blocks();
    let center = Point3::new(8, 8, 8);
    blocks[block_index(center)] = BlockType::GRASS.block_id();
    let mut chunk = live_chunk(blocks);

    let before = face_set(&chunk);
    assert_eq!(chunk.faces().face_count(), 12);

    chunk.remove_block_face(center, BlockSide::TOP);
    assert_eq!(chunk.faces().face_count(), 10);
    assert!(!chunk.faces().has_face(block_index(center), BlockSide::TOP));
    assert_face_table_invariants(chunk.faces());
    assert_vertices_match_owners(&chunk);

    chunk.create_block_face(center, BlockSide::TOP, BlockType::GRASS, false);
    assert_eq!(face_set(&chunk), before);
    assert_face_table_invariants(chunk.faces());
    assert_vertices_match_owners(&chunk);
}

#[test]
fn removing_every_face_of_the_only_block_empties_the_table() {
    let mut blocks = empty_blocks();
    let center = Point3::new(3, 4, 5);
    blocks[block_index(center)] = BlockType::DIRT.block_id();
    let mut chunk = live_chunk(blocks);

    for side in BlockSide::all() {
        chunk.remove_block_face(center, side);
    }

    let faces = chunk.faces();
    assert_eq!(faces.face_count(), 0);
    assert_eq!(faces.group_count(), 0);
    assert_eq!(faces.blocks_with_faces().count(), 0);
    for index in 0..CHUNK_VOLUME {
        assert_eq!(faces.group_offset_for_block(index), None);
    }
}

#[test]
fn compaction_relocates_survivors_correctly() {
    // Two isolated blocks; removing a face of the first forces faces of
    // the second to move into the vacated buffer positions.
    let mut blocks = empty_blocks();
    let a = Point3::new(2, 2, 2);
    let b = Point3::new(12, 12, 12);
    blocks[block_index(a)] = BlockType::DIRT.block_id();
    blocks[block_index(b)] = BlockType::WOOD.block_id();
    let mut chunk = live_chunk(blocks);
    assert_eq!(chunk.faces().face_count(), 24);

    chunk.remove_block_face(a, BlockSide::FRONT);
    assert_eq!(chunk.faces().face_count(), 22);
    assert_face_table_invariants(chunk.faces());
    assert_vertices_match_owners(&chunk);

    // Remove the rest of A; B's group must survive the group compaction.
    for side in [
        BlockSide::BACK,
        BlockSide::BOTTOM,
        BlockSide::TOP,
        BlockSide::LEFT,
        BlockSide::RIGHT,
    ] {
        chunk.remove_block_face(a, side);
    }
    assert_eq!(chunk.faces().face_count(), 12);
    assert_eq!(chunk.faces().group_count(), 1);
    assert_eq!(chunk.faces().group_offset_for_block(block_index(a)), None);
    for side in BlockSide::all() {
        assert!(chunk.faces().has_face(block_index(b), side));
    }
    assert_face_table_invariants(chunk.faces());
    assert_vertices_match_owners(&chunk);
}

#[test]
fn random_mutation_sequences_keep_the_table_compact() {
    fastrand::seed(0x5EED);

    // Blocks on an even lattice are never adjacent, so every side of every
    // block can toggle independently.
    let mut blocks = empty_blocks();
    let mut lattice = Vec::new();
    for x in (0..16).step_by(2) {
        for y in (0..16).step_by(2) {
            for z in (0..16).step_by(2) {
                let position = Point3::new(x, y, z);
                blocks[block_index(position)] = BlockType::DIRT.block_id();
                lattice.push(position);
            }
        }
    }
    let mut chunk = live_chunk(blocks);
    let mut visible = face_set(&chunk);

    for step in 0..2000 {
        let position = lattice[fastrand::usize(..lattice.len())];
        let side = BlockSide::all()[fastrand::usize(..6)];
        let key = (block_index(position), side);

        if visible.contains(&key) {
            chunk.remove_block_face(position, side);
            visible.remove(&key);
        } else {
            chunk.create_block_face(position, side, BlockType::DIRT, false);
            visible.insert(key);
        }

        assert_eq!(
            chunk.faces().face_count(),
            visible.len() * 2,
            "live face count diverged at step {}",
            step
        );
        if step % 100 == 0 {
            assert_face_table_invariants(chunk.faces());
            assert_vertices_match_owners(&chunk);
            assert_eq!(face_set(&chunk), visible);
        }
    }

    assert_face_table_invariants(chunk.faces());
    assert_vertices_match_owners(&chunk);
}

#[test]
fn highlight_rewrites_are_idempotent() {
    let mut blocks = empty_blocks();
    let center = Point3::new(8, 8, 8);
    let other = Point3::new(2, 8, 8);
    blocks[block_index(center)] = BlockType::GRASS.block_id();
    blocks[block_index(other)] = BlockType::DIRT.block_id();
    let mut chunk = live_chunk(blocks);

    let base = chunk.faces().colors().to_vec();

    chunk.set_block_highlight(center, true);
    let highlighted_once = chunk.faces().colors().to_vec();
    assert_ne!(base, highlighted_once);

    chunk.set_block_highlight(center, true);
    assert_eq!(
        chunk.faces().colors(),
        highlighted_once.as_slice(),
        "re-applying the same highlight must be byte-identical"
    );

    chunk.set_block_highlight(center, false);
    assert_eq!(chunk.faces().colors(), base.as_slice());
}

#[test]
fn highlight_leaves_other_blocks_untouched() {
    let mut blocks = empty_blocks();
    let center = Point3::new(8, 8, 8);
    let other = Point3::new(2, 8, 8);
    blocks[block_index(center)] = BlockType::GRASS.block_id();
    blocks[block_index(other)] = BlockType::DIRT.block_id();
    let mut chunk = live_chunk(blocks);

    let snapshot = |chunk: &Chunk| {
        let faces = chunk.faces();
        let mut runs = Vec::new();
        for face in 0..faces.face_count() {
            if faces.block_index_for_face(face) == Some(block_index(other)) {
                runs.push(faces.colors()[face * 9..face * 9 + 9].to_vec());
            }
        }
        runs
    };

    let before = snapshot(&chunk);
    chunk.set_block_highlight(center, true);
    assert_eq!(snapshot(&chunk), before);
}

#[test]
fn boundary_snapshots_follow_block_mutations() {
    // A fully solid chunk advertises solid layers; clearing an edge block
    // must downgrade that side to a per-cell layer with a hole in it.
    let blocks: BlockArray = Box::new([BlockType::DIRT.block_id(); CHUNK_VOLUME]);
    let mut chunk = live_chunk(blocks);

    assert!(matches!(
        chunk.boundary_toward(BlockSide::FRONT),
        NeighborBoundary::Solid
    ));

    let edge = Point3::new(0, 8, 8);
    chunk.set_block(edge, 0);
    match chunk.boundary_toward(BlockSide::FRONT) {
        NeighborBoundary::Layer(layer) => {
            assert_eq!(layer[BlockSide::FRONT.layer_index(edge)], 0);
            assert!(layer.iter().filter(|&&b| b == 0).count() == 1);
        }
        _ => panic!("cleared edge block should demote the solid layer"),
    }

    // Refilling it restores the fully solid advertisement.
    chunk.set_block(edge, BlockType::DIRT.block_id());
    assert!(matches!(
        chunk.boundary_toward(BlockSide::FRONT),
        NeighborBoundary::Solid
    ));
}

#[test]
fn face_buffers_grow_by_powers_of_two() {
    let mut table = FaceTable::new();
    let color = [0.5; 9];
    let corners = [0.0; FLOATS_PER_SIDE];

    table.create_face(0, BlockSide::TOP, &color, &corners);
    assert_eq!(table.face_count(), 2);
    assert_eq!(table.vertex_capacity(), 2 * 9);

    for block in 1..64 {
        table.create_face(block, BlockSide::TOP, &color, &corners);
    }
    assert_eq!(table.face_count(), 128);
    assert_eq!(table.vertex_capacity(), 128 * 9);

    // One more side crosses the boundary and doubles the allocation.
    table.create_face(64, BlockSide::TOP, &color, &corners);
    assert_eq!(table.vertex_capacity(), 256 * 9);
}

#[test]
fn dirty_flags_track_mutations() {
    let mut blocks = empty_blocks();
    let center = Point3::new(8, 8, 8);
    blocks[block_index(center)] = BlockType::GRASS.block_id();
    let mut chunk = live_chunk(blocks);

    // Freshly installed geometry needs an initial upload.
    assert!(chunk.take_vertices_dirty());
    assert!(chunk.take_colors_dirty());
    assert!(!chunk.take_vertices_dirty());

    chunk.set_block_highlight(center, true);
    assert!(!chunk.take_vertices_dirty());
    assert!(chunk.take_colors_dirty());

    chunk.remove_block_face(center, BlockSide::TOP);
    assert!(chunk.take_vertices_dirty());
    assert!(chunk.take_colors_dirty());
}
