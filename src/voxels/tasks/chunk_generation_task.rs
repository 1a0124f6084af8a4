//! # Chunk Generation Task
//!
//! The batched terrain request: carries a list of chunk coordinates to the
//! terrain worker and brings back one `ChunkTerrain` per coordinate. Its
//! result installs the terrain on the main thread and schedules a geometry
//! build for every chunk that just passed the readiness gate.

use cgmath::Point3;
use log::debug;

use crate::meshing::tasks::chunk_mesh_generation_task::ChunkMeshGenerationTask;
use crate::task_management::task::{Task, TaskResult};
use crate::voxels::terrain::{generate_chunk_terrain, ChunkTerrain};
use crate::voxels::world::World;

/// A task that generates terrain for a batch of chunk coordinates.
pub struct ChunkGenerationTask {
    positions: Vec<Point3<i32>>,
}

impl ChunkGenerationTask {
    /// Creates a terrain request for the given chunk coordinates.
    pub fn new(positions: Vec<Point3<i32>>) -> Self {
        ChunkGenerationTask { positions }
    }
}

impl Task for ChunkGenerationTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let chunks = self
            .positions
            .iter()
            .map(|&position| generate_chunk_terrain(position))
            .collect();
        Box::new(ChunkGenerationTaskResult { chunks })
    }
}

/// The terrain worker's response: one entry per requested coordinate.
pub struct ChunkGenerationTaskResult {
    chunks: Vec<ChunkTerrain>,
}

impl TaskResult for ChunkGenerationTaskResult {
    /// Installs each chunk's terrain, links neighbor counts, and batches
    /// every chunk that became geometry-eligible into a single mesh
    /// generation task.
    fn handle_result(self: Box<Self>, world: &mut World) -> Vec<Box<dyn Task + Send>> {
        let result = *self;
        let mut ready = Vec::new();
        for terrain in result.chunks {
            world.apply_terrain_result(terrain, &mut ready);
        }

        if ready.is_empty() {
            return Vec::new();
        }

        let inputs = ready
            .iter()
            .filter_map(|&position| world.make_geometry_input(position))
            .collect::<Vec<_>>();
        debug!("requesting geometry for {} chunks", inputs.len());
        vec![Box::new(ChunkMeshGenerationTask::new(inputs))]
    }
}
