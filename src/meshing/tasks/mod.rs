//! Background tasks owned by the meshing subsystem.

pub mod chunk_mesh_generation_task;
