//! # World Module
//!
//! The `World` owns every loaded chunk, keyed by chunk coordinate, and
//! coordinates the two generator contexts around them. It is the only
//! mutator of chunk state and runs entirely on the main thread; the
//! per-tick [`World::step`] hook drains generator responses, so callers
//! never block on generation.
//!
//! ## Readiness gate
//!
//! A chunk becomes eligible for a geometry build exactly when terrain has
//! arrived for all six of its neighbors (`loaded_neighbors == 6`) and the
//! chunk itself contains blocks. That guarantees every boundary-face
//! decision in the builder sees real neighbor data rather than a
//! placeholder, at the cost of deferring the build — never by building
//! speculatively and patching later.
//!
//! ## Mutation requests
//!
//! Block mutations race chunk streaming by nature (the player aims at
//! whatever is on screen), so a request addressed at a chunk that is not
//! `Live` — not built yet, or already unloaded — is a silent no-op rather
//! than an error.

use std::collections::HashMap;

use cgmath::Point3;
use log::{debug, info};

use crate::meshing::{ChunkGeometry, ChunkGeometryInput, NeighborBoundary};
use crate::task_management::TaskManager;
use crate::voxels::block::block_side::BlockSide;
use crate::voxels::block::block_type::BlockType;
use crate::voxels::block::BlockId;
use crate::voxels::chunk::coordinates::{
    chunk_coordinate_for_position, chunk_relative_position, world_position,
};
use crate::voxels::chunk::{Chunk, ChunkState};
use crate::voxels::tasks::chunk_generation_task::ChunkGenerationTask;
use crate::voxels::terrain::ChunkTerrain;

/// What the world knows about one world-space block position.
enum BlockSample {
    /// The position lies in a chunk with no terrain yet (or no chunk at
    /// all); unknown space is treated as solid.
    Unknown,
    /// The position is covered by terrain data; 0 means air.
    Present(BlockId),
}

/// Represents a voxel world composed of streamed chunks.
///
/// Chunks are stored sparsely and loaded on demand; each generator context
/// gets a single-worker task manager so one batch is always processed
/// fully before the next begins.
pub struct World {
    chunks: HashMap<Point3<i32>, Chunk>,
    terrain_tasks: TaskManager,
    mesh_tasks: TaskManager,
}

impl World {
    /// Creates an empty world with its two generator contexts running.
    pub fn new() -> Self {
        World {
            chunks: HashMap::new(),
            terrain_tasks: TaskManager::new(1),
            mesh_tasks: TaskManager::new(1),
        }
    }

    /// Per-tick update hook; the render loop calls this once per frame
    /// before drawing.
    ///
    /// Terrain results are applied before any geometry eligibility is
    /// evaluated, and geometry results are applied before this tick's
    /// rendering — both guaranteed by the drain order here.
    pub fn step(&mut self) {
        let results = self.terrain_tasks.drain_completed();
        for result in results {
            for task in result.handle_result(self) {
                self.mesh_tasks.publish_task(task);
            }
        }

        let results = self.mesh_tasks.drain_completed();
        for result in results {
            for task in result.handle_result(self) {
                self.mesh_tasks.publish_task(task);
            }
        }

        self.terrain_tasks.process_queued_tasks();
        self.mesh_tasks.process_queued_tasks();
    }

    /// Requests terrain for every position not already loaded, as one
    /// batch.
    pub fn load_chunks(&mut self, positions: &[Point3<i32>]) {
        let fresh: Vec<Point3<i32>> = positions
            .iter()
            .copied()
            .filter(|position| !self.chunks.contains_key(position))
            .collect();
        if fresh.is_empty() {
            return;
        }

        for &position in &fresh {
            let mut chunk = Chunk::new(position);
            chunk.set_terrain_pending();
            self.chunks.insert(position, chunk);
        }

        info!("requesting terrain for {} chunks", fresh.len());
        self.terrain_tasks
            .publish_task(Box::new(ChunkGenerationTask::new(fresh)));
    }

    /// Unloads every chunk in `positions` that is currently loaded.
    pub fn unload_chunks(&mut self, positions: &[Point3<i32>]) {
        for &position in positions {
            self.unload_chunk(position);
        }
    }

    fn unload_chunk(&mut self, position: Point3<i32>) {
        let Some(chunk) = self.chunks.remove(&position) else {
            return;
        };

        // Neighbors only ever counted this chunk once its terrain arrived.
        if chunk.has_terrain() {
            for side in BlockSide::all() {
                let adjacent = side.adjacent_position(position);
                if let Some(neighbor) = self.chunks.get_mut(&adjacent) {
                    if neighbor.has_terrain() {
                        neighbor.remove_loaded_neighbor();
                    }
                }
            }
        }

        debug!("unloaded chunk at {:?}", position);
        // Buffers are released with the chunk here; a terrain or geometry
        // result still in flight for it will be discarded on arrival.
    }

    /// Installs one chunk's terrain result, links neighbor counts both
    /// ways, and appends every chunk that just became geometry-eligible
    /// (the new chunk included) to `ready`, marking it `GeometryPending`.
    pub(crate) fn apply_terrain_result(
        &mut self,
        terrain: ChunkTerrain,
        ready: &mut Vec<Point3<i32>>,
    ) {
        let position = terrain.position;
        match self.chunks.get_mut(&position) {
            Some(chunk) if !chunk.has_terrain() => chunk.install_terrain(terrain),
            // Unloaded, or unloaded and re-requested while the first batch
            // was still in flight; either way this result is stale.
            _ => {
                debug!("discarding terrain result for chunk {:?}", position);
                return;
            }
        }

        let mut linked = 0;
        for side in BlockSide::all() {
            let adjacent = side.adjacent_position(position);
            if let Some(neighbor) = self.chunks.get_mut(&adjacent) {
                if neighbor.has_terrain() {
                    neighbor.add_loaded_neighbor();
                    linked += 1;
                }
            }
        }
        let chunk = self.chunks.get_mut(&position).unwrap();
        for _ in 0..linked {
            chunk.add_loaded_neighbor();
        }

        self.collect_if_ready(position, ready);
        for side in BlockSide::all() {
            self.collect_if_ready(side.adjacent_position(position), ready);
        }
    }

    /// Moves a chunk through the readiness gate if it qualifies.
    fn collect_if_ready(&mut self, position: Point3<i32>, ready: &mut Vec<Point3<i32>>) {
        let Some(chunk) = self.chunks.get_mut(&position) else {
            return;
        };
        if chunk.state() == ChunkState::TerrainReady
            && chunk.has_blocks()
            && chunk.loaded_neighbors() == 6
        {
            chunk.mark_geometry_pending();
            ready.push(position);
        }
    }

    /// Assembles the geometry-request payload for an eligible chunk: its
    /// block array plus each neighbor's boundary snapshot facing it.
    pub(crate) fn make_geometry_input(
        &self,
        position: Point3<i32>,
    ) -> Option<ChunkGeometryInput> {
        let chunk = self.chunks.get(&position)?;
        let blocks = chunk.blocks_cloned()?;
        let neighbor_sides = std::array::from_fn(|index| {
            let side = BlockSide::from_index(index);
            match self.chunks.get(&side.adjacent_position(position)) {
                Some(neighbor) => neighbor.boundary_toward(side.opposite()),
                // Unreachable behind the readiness gate, but an unknown
                // region always reads as solid.
                None => NeighborBoundary::Solid,
            }
        });
        Some(ChunkGeometryInput {
            position,
            blocks,
            neighbor_sides,
        })
    }

    /// Installs one chunk's built geometry, or discards it when the chunk
    /// was unloaded while the batch was in flight.
    pub(crate) fn apply_geometry_result(&mut self, geometry: ChunkGeometry) {
        match self.chunks.get_mut(&geometry.position) {
            Some(chunk) if chunk.state() == ChunkState::GeometryPending => {
                debug!(
                    "chunk {:?} live with {} faces",
                    geometry.position,
                    geometry.faces.face_count()
                );
                chunk.install_geometry(geometry.faces);
            }
            _ => debug!(
                "discarding geometry for unloaded chunk {:?}",
                geometry.position
            ),
        }
    }

    /// Places a block of `block_type` at a world position.
    ///
    /// For each of the six adjacent cells: a solid neighbor loses the face
    /// it showed toward this cell, and an empty neighbor cell gains a face
    /// on the new block's side, created highlighted (new blocks render
    /// highlighted until the cursor moves off them). No-op unless the
    /// target chunk is `Live` and the cell is empty.
    pub fn place_block(&mut self, position: Point3<i32>, block_type: BlockType) {
        if !block_type.is_solid() {
            return;
        }
        let coordinate = chunk_coordinate_for_position(position);
        let local = chunk_relative_position(position);
        match self.chunks.get(&coordinate) {
            Some(chunk) if chunk.is_live() && chunk.block_at(local) == 0 => {}
            _ => return,
        }

        self.chunks
            .get_mut(&coordinate)
            .unwrap()
            .set_block(local, block_type.block_id());

        for side in BlockSide::all() {
            let adjacent = side.adjacent_position(position);
            match self.sample_block(adjacent) {
                // Unloaded space counts as solid: no face on this side,
                // and nothing out there to update.
                BlockSample::Unknown => {}
                BlockSample::Present(id) if id != 0 => {
                    let neighbor_coordinate = chunk_coordinate_for_position(adjacent);
                    let neighbor = self.chunks.get_mut(&neighbor_coordinate).unwrap();
                    if neighbor.is_live() {
                        neighbor.remove_block_face(
                            chunk_relative_position(adjacent),
                            side.opposite(),
                        );
                    }
                }
                BlockSample::Present(_) => {
                    self.chunks
                        .get_mut(&coordinate)
                        .unwrap()
                        .create_block_face(local, side, block_type, true);
                }
            }
        }
    }

    /// Destroys the block at a world position.
    ///
    /// Each solid neighbor gains a face toward the vacated cell (in its
    /// own, non-highlighted colors); each empty neighbor direction loses
    /// this block's face. Finally the cell is cleared. No-op unless the
    /// target chunk is `Live` and the cell is occupied.
    pub fn destroy_block(&mut self, position: Point3<i32>) {
        let coordinate = chunk_coordinate_for_position(position);
        let local = chunk_relative_position(position);
        match self.chunks.get(&coordinate) {
            Some(chunk) if chunk.is_live() && chunk.block_at(local) != 0 => {}
            _ => return,
        }

        for side in BlockSide::all() {
            let adjacent = side.adjacent_position(position);
            match self.sample_block(adjacent) {
                // No face was ever shown toward unloaded space.
                BlockSample::Unknown => {}
                BlockSample::Present(id) if id != 0 => {
                    let neighbor_coordinate = chunk_coordinate_for_position(adjacent);
                    let neighbor = self.chunks.get_mut(&neighbor_coordinate).unwrap();
                    if neighbor.is_live() {
                        neighbor.create_block_face(
                            chunk_relative_position(adjacent),
                            side.opposite(),
                            BlockType::from_block_id(id),
                            false,
                        );
                    }
                }
                BlockSample::Present(_) => {
                    self.chunks
                        .get_mut(&coordinate)
                        .unwrap()
                        .remove_block_face(local, side);
                }
            }
        }

        self.chunks.get_mut(&coordinate).unwrap().set_block(local, 0);
    }

    /// Places a block against the face a renderer hit test reported:
    /// resolves the face's owning chunk, block, and side, then places
    /// adjacent to it.
    pub fn place_block_on_chunk_face(
        &mut self,
        position: Point3<i32>,
        face_index: usize,
        block_type: BlockType,
    ) {
        let Some((block, side)) = self.resolve_face(position, face_index) else {
            return;
        };
        self.place_block(side.adjacent_position(block), block_type);
    }

    /// Destroys the block owning the given face index.
    pub fn destroy_block_with_face(&mut self, position: Point3<i32>, face_index: usize) {
        let Some((block, _)) = self.resolve_face(position, face_index) else {
            return;
        };
        self.destroy_block(block);
    }

    /// The world position of the block owning a face index, or `None` for
    /// a stale chunk or out-of-range face.
    pub fn get_block_position_for_face_index(
        &self,
        position: Point3<i32>,
        face_index: usize,
    ) -> Option<Point3<i32>> {
        self.resolve_face(position, face_index)
            .map(|(block, _)| block)
    }

    /// The block ID at a world position; 0 for air and unloaded space.
    pub fn get_block_at_position(&self, position: Point3<i32>) -> BlockId {
        match self.sample_block(position) {
            BlockSample::Present(id) => id,
            BlockSample::Unknown => 0,
        }
    }

    /// Switches the highlight state of every visible face of the block at
    /// a world position. No-op on a chunk that is not `Live`.
    pub fn set_block_highlight(&mut self, position: Point3<i32>, highlighted: bool) {
        let coordinate = chunk_coordinate_for_position(position);
        if let Some(chunk) = self.chunks.get_mut(&coordinate) {
            if chunk.is_live() {
                chunk.set_block_highlight(chunk_relative_position(position), highlighted);
            }
        }
    }

    /// Resolves a face index, in the chunk containing `position`, to the
    /// owning block's world position and the face's side.
    fn resolve_face(
        &self,
        position: Point3<i32>,
        face_index: usize,
    ) -> Option<(Point3<i32>, BlockSide)> {
        let chunk = self.chunks.get(&chunk_coordinate_for_position(position))?;
        if !chunk.is_live() {
            return None;
        }
        let local = chunk.block_position_for_face(face_index)?;
        let side = chunk.side_for_face(face_index)?;
        Some((world_position(chunk.position, local), side))
    }

    fn sample_block(&self, position: Point3<i32>) -> BlockSample {
        match self.chunks.get(&chunk_coordinate_for_position(position)) {
            Some(chunk) if chunk.has_terrain() => {
                BlockSample::Present(chunk.block_at(chunk_relative_position(position)))
            }
            _ => BlockSample::Unknown,
        }
    }

    /// The chunk at a chunk coordinate, if loaded.
    pub fn chunk(&self, coordinate: Point3<i32>) -> Option<&Chunk> {
        self.chunks.get(&coordinate)
    }

    /// Iterates over every loaded chunk.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Number of loaded chunks (in any state).
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Whether both generator contexts are idle: no batch queued, in
    /// flight, or waiting to be drained.
    pub fn is_idle(&self) -> bool {
        self.terrain_tasks.is_idle() && self.mesh_tasks.is_idle()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
