//! # Voxels Module
//!
//! Everything that models the voxel world: block types and the direction
//! table, chunks with their face-buffer geometry, deterministic terrain
//! generation, and the world-level chunk lifecycle.

pub mod block;
pub mod chunk;
pub mod tasks;
pub mod terrain;
pub mod world;
