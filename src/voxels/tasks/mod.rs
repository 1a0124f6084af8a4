//! Background tasks owned by the voxel subsystem.

pub mod chunk_generation_task;
