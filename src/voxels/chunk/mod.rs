//! # Chunk Module
//!
//! This module provides the `Chunk` struct for managing one 16x16x16 region
//! of voxel data together with its visible-face geometry. A chunk moves
//! through a small lifecycle as its data arrives from the generators:
//!
//! `Unpopulated -> TerrainPending -> TerrainReady -> GeometryPending -> Live`
//!
//! Terrain and geometry are produced off-thread; once a chunk is `Live` it
//! is mutated strictly in place. Placing or destroying a block touches only
//! the faces that actually changed, through the face table's constant-time
//! create/remove operations — a live chunk is never rebuilt from scratch.

use cgmath::Point3;

use crate::meshing::face::side_vertices;
use crate::meshing::NeighborBoundary;
use crate::voxels::block::block_side::BlockSide;
use crate::voxels::block::block_type::BlockType;
use crate::voxels::block::BlockId;
use crate::voxels::terrain::ChunkTerrain;

use face_table::FaceTable;

pub mod coordinates;
pub mod face_table;

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of blocks in a single 16x16 boundary layer of a chunk.
pub const CHUNK_PLANE_SIZE: usize = (CHUNK_DIMENSION * CHUNK_DIMENSION) as usize;
/// The total number of blocks in a chunk.
pub const CHUNK_VOLUME: usize = CHUNK_PLANE_SIZE * CHUNK_DIMENSION as usize;

/// A chunk's block storage: one block ID per cell, indexed by the
/// coordinate codec. Boxed so chunks stay cheap to move around.
pub type BlockArray = Box<[BlockId; CHUNK_VOLUME]>;

/// A flattened 16x16 snapshot of the blocks on one chunk boundary layer.
pub type SideLayer = [BlockId; CHUNK_PLANE_SIZE];

/// Lifecycle state of a chunk. See the module docs for the transitions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// Just created; no terrain request issued yet.
    Unpopulated,
    /// A terrain request naming this chunk is in flight.
    TerrainPending,
    /// Terrain data has arrived; waiting on the readiness gate.
    TerrainReady,
    /// A geometry request naming this chunk is in flight.
    GeometryPending,
    /// Geometry installed; the chunk renders and accepts mutations.
    Live,
}

/// Represents a 16x16x16 collection of voxel blocks in the world.
///
/// Owns the block array, the six boundary-layer snapshots handed to
/// neighbors' geometry builds, the face table holding its visible
/// geometry, and the neighbor count driving the readiness gate.
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block
    /// coordinates).
    pub position: Point3<i32>,

    state: ChunkState,

    /// Block IDs, or `None` while unpopulated — and permanently `None` for
    /// an air-only chunk, which never has geometry built.
    blocks: Option<BlockArray>,

    /// Boundary-layer snapshots indexed by side, kept in sync with
    /// `blocks` when a boundary block mutates.
    sides: Option<Box<[SideLayer; 6]>>,

    /// Whether each boundary layer is fully solid, indexed by side. Lets
    /// the world skip copying a layer a neighbor's build cannot see
    /// through anyway.
    sides_are_solid: [bool; 6],

    faces: FaceTable,

    /// How many of the six adjacent chunks currently have terrain. The
    /// readiness gate: geometry may only be built once this reaches 6.
    loaded_neighbors: u8,

    vertices_dirty: bool,
    colors_dirty: bool,
}

impl Chunk {
    /// Creates a chunk shell at `position` with nothing loaded.
    pub fn new(position: Point3<i32>) -> Self {
        Chunk {
            position,
            state: ChunkState::Unpopulated,
            blocks: None,
            sides: None,
            sides_are_solid: [false; 6],
            faces: FaceTable::new(),
            loaded_neighbors: 0,
            vertices_dirty: false,
            colors_dirty: false,
        }
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> ChunkState {
        self.state
    }

    /// Whether this chunk accepts block mutations.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.state == ChunkState::Live
    }

    /// Whether terrain data has arrived (air-only chunks included).
    #[inline]
    pub fn has_terrain(&self) -> bool {
        matches!(
            self.state,
            ChunkState::TerrainReady | ChunkState::GeometryPending | ChunkState::Live
        )
    }

    /// Whether this chunk contains any solid block at all.
    #[inline]
    pub fn has_blocks(&self) -> bool {
        self.blocks.is_some()
    }

    /// Marks the chunk as named in an in-flight terrain request.
    pub fn set_terrain_pending(&mut self) {
        debug_assert_eq!(self.state, ChunkState::Unpopulated);
        self.state = ChunkState::TerrainPending;
    }

    /// Installs a terrain result, transitioning to `TerrainReady`.
    pub fn install_terrain(&mut self, terrain: ChunkTerrain) {
        debug_assert!(matches!(
            self.state,
            ChunkState::Unpopulated | ChunkState::TerrainPending
        ));
        debug_assert_eq!(terrain.position, self.position);
        self.blocks = terrain.blocks;
        self.sides = terrain.sides;
        self.sides_are_solid = terrain.sides_are_solid;
        self.state = ChunkState::TerrainReady;
    }

    /// Marks the chunk as named in an in-flight geometry request.
    pub fn mark_geometry_pending(&mut self) {
        debug_assert_eq!(self.state, ChunkState::TerrainReady);
        self.state = ChunkState::GeometryPending;
    }

    /// Installs a built face table, transitioning to `Live`.
    pub fn install_geometry(&mut self, faces: FaceTable) {
        debug_assert_eq!(self.state, ChunkState::GeometryPending);
        self.faces = faces;
        self.state = ChunkState::Live;
        self.vertices_dirty = true;
        self.colors_dirty = true;
    }

    /// How many adjacent chunks currently have terrain.
    #[inline]
    pub fn loaded_neighbors(&self) -> u8 {
        self.loaded_neighbors
    }

    /// Records that an adjacent chunk's terrain arrived.
    pub fn add_loaded_neighbor(&mut self) {
        debug_assert!(self.loaded_neighbors < 6);
        self.loaded_neighbors += 1;
    }

    /// Records that an adjacent chunk was unloaded.
    pub fn remove_loaded_neighbor(&mut self) {
        debug_assert!(self.loaded_neighbors > 0);
        self.loaded_neighbors -= 1;
    }

    /// The block ID at an in-chunk position; 0 for air and for chunks
    /// without block data.
    pub fn block_at(&self, local: Point3<i32>) -> BlockId {
        match &self.blocks {
            Some(blocks) => blocks[coordinates::block_index(local)],
            None => 0,
        }
    }

    /// Writes a block slot (0 clears it) and refreshes any boundary-layer
    /// snapshot the position sits on, so geometry requests assembled for
    /// neighbors later never see stale data.
    pub fn set_block(&mut self, local: Point3<i32>, id: BlockId) {
        let index = coordinates::block_index(local);
        let blocks = self
            .blocks
            .as_mut()
            .expect("block mutation on a chunk without block data");
        blocks[index] = id;

        if let Some(sides) = self.sides.as_mut() {
            for side in BlockSide::all() {
                let axis_value = match side {
                    BlockSide::FRONT | BlockSide::BACK => local.x,
                    BlockSide::BOTTOM | BlockSide::TOP => local.y,
                    BlockSide::LEFT | BlockSide::RIGHT => local.z,
                };
                if axis_value != side.boundary_coordinate() {
                    continue;
                }
                let layer = &mut sides[side.index()];
                layer[side.layer_index(local)] = id;
                self.sides_are_solid[side.index()] = if id == 0 {
                    false
                } else {
                    self.sides_are_solid[side.index()] || layer.iter().all(|&b| b != 0)
                };
            }
        }
    }

    /// Creates the visible face of `block_type` at `local` toward `side`.
    ///
    /// The quad is written at the live end of the buffers with the block
    /// type's per-side color data (the highlighted variant when
    /// `highlighted` is set).
    pub fn create_block_face(
        &mut self,
        local: Point3<i32>,
        side: BlockSide,
        block_type: BlockType,
        highlighted: bool,
    ) {
        let color_run = block_type.descriptor().color_run(side, highlighted);
        self.faces.create_face(
            coordinates::block_index(local),
            side,
            &color_run,
            &side_vertices(local, side),
        );
        self.vertices_dirty = true;
        self.colors_dirty = true;
    }

    /// Removes the visible face at `local` toward `side`, compacting the
    /// buffers. A no-op when no such face is visible.
    pub fn remove_block_face(&mut self, local: Point3<i32>, side: BlockSide) {
        self.faces.remove_face(coordinates::block_index(local), side);
        self.vertices_dirty = true;
        self.colors_dirty = true;
    }

    /// Rewrites every visible face of the block at `local` with its normal
    /// or highlighted color data and flags the color buffer dirty.
    pub fn set_block_highlight(&mut self, local: Point3<i32>, highlighted: bool) {
        let id = self.block_at(local);
        if id == 0 {
            return;
        }
        let runs = BlockType::from_block_id(id).descriptor().color_runs(highlighted);
        if self
            .faces
            .rewrite_colors(coordinates::block_index(local), &runs)
        {
            self.colors_dirty = true;
        }
    }

    /// The boundary data a neighbor's geometry build should see on the
    /// given side of this chunk: `Empty` for an air-only chunk, `Solid`
    /// when the whole layer is solid (no need to copy what cannot be seen
    /// through), otherwise a copy of the layer.
    pub fn boundary_toward(&self, side: BlockSide) -> NeighborBoundary {
        let Some(sides) = &self.sides else {
            return NeighborBoundary::Empty;
        };
        if self.sides_are_solid[side.index()] {
            return NeighborBoundary::Solid;
        }
        NeighborBoundary::Layer(Box::new(sides[side.index()]))
    }

    /// A copy of the block array for a geometry request, or `None` for an
    /// air-only chunk.
    pub fn blocks_cloned(&self) -> Option<BlockArray> {
        self.blocks.clone()
    }

    /// The chunk's face table (geometry buffers plus index structures).
    pub fn faces(&self) -> &FaceTable {
        &self.faces
    }

    /// The in-chunk position of the block owning a face index, as reported
    /// by a renderer hit test.
    pub fn block_position_for_face(&self, face: usize) -> Option<Point3<i32>> {
        self.faces.block_position_for_face(face)
    }

    /// The side a face index belongs to.
    pub fn side_for_face(&self, face: usize) -> Option<BlockSide> {
        self.faces.side_for_face(face)
    }

    /// World-space coordinate of this chunk's origin block.
    pub fn world_origin(&self) -> Point3<i32> {
        coordinates::world_position(self.position, Point3::new(0, 0, 0))
    }

    /// Takes and clears the vertex-buffer dirty flag. The renderer calls
    /// this once per frame to decide whether to re-upload.
    pub fn take_vertices_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.vertices_dirty, false)
    }

    /// Takes and clears the color-buffer dirty flag.
    pub fn take_colors_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.colors_dirty, false)
    }
}
