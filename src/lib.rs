#![warn(missing_docs)]

//! # Voxel Engine Core
//!
//! The chunk face-buffer engine behind an effectively infinite voxel
//! terrain: 16x16x16 chunks of typed blocks, with only the faces adjacent
//! to empty space ever emitted as geometry.
//!
//! The hard part this crate owns is not terrain generation or drawing —
//! it is keeping a chunk's geometry buffers compact and consistent while
//! individual faces are added, removed, and relocated in constant time as
//! blocks are placed and destroyed, and while whole chunks stream in and
//! out through asynchronous generator contexts.
//!
//! ## Key Modules
//!
//! * `voxels` - block registry, chunks and their face tables, terrain
//!   generation, and the world-level chunk lifecycle
//! * `meshing` - the from-scratch geometry builder that runs in the
//!   geometry worker context
//! * `task_management` - the worker-thread channels both generator
//!   contexts run on
//!
//! ## Driving the engine
//!
//! ```no_run
//! use cgmath::Point3;
//! use voxel_engine_core::World;
//!
//! let mut world = World::new();
//! world.load_chunks(&[Point3::new(0, 0, 0)]);
//!
//! // Once per frame, before drawing:
//! world.step();
//! ```
//!
//! Rendering, input, collision, and process bootstrap are collaborators,
//! not residents: the engine only exposes buffer views (and dirty flags)
//! for a renderer to upload, and world-position/face-index entry points
//! for an input layer to call.

pub mod meshing;
pub mod task_management;
pub mod voxels;

pub use voxels::block::block_side::BlockSide;
pub use voxels::block::block_type::BlockType;
pub use voxels::chunk::{Chunk, ChunkState};
pub use voxels::world::World;
