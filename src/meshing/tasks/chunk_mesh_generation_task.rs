//! # Chunk Mesh Generation Task
//!
//! The batched geometry request: carries each eligible chunk's block array
//! and neighbor boundary data to the geometry worker, and brings back the
//! built face tables. Buffers in the result are moved onto their chunks —
//! never copied — when the result is handled on the main thread.

use crate::meshing::{build_chunk_geometry, ChunkGeometry, ChunkGeometryInput};
use crate::task_management::task::{Task, TaskResult};
use crate::voxels::world::World;

/// A task that builds face-buffer geometry for a batch of chunks.
pub struct ChunkMeshGenerationTask {
    chunks: Vec<ChunkGeometryInput>,
}

impl ChunkMeshGenerationTask {
    /// Creates a geometry request from pre-assembled per-chunk inputs.
    pub fn new(chunks: Vec<ChunkGeometryInput>) -> Self {
        ChunkMeshGenerationTask { chunks }
    }
}

impl Task for ChunkMeshGenerationTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let chunks = self
            .chunks
            .iter()
            .map(|input| ChunkGeometry {
                position: input.position,
                faces: build_chunk_geometry(input),
            })
            .collect();
        Box::new(ChunkMeshGenerationTaskResult { chunks })
    }
}

/// The geometry worker's response: one built face table per chunk.
pub struct ChunkMeshGenerationTaskResult {
    chunks: Vec<ChunkGeometry>,
}

impl TaskResult for ChunkMeshGenerationTaskResult {
    /// Installs each face table on its chunk. A chunk unloaded while the
    /// batch was in flight simply has its late geometry discarded.
    fn handle_result(self: Box<Self>, world: &mut World) -> Vec<Box<dyn Task + Send>> {
        let result = *self;
        for geometry in result.chunks {
            world.apply_geometry_result(geometry);
        }
        Vec::new()
    }
}
