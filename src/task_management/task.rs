//! # Task System Core Traits
//!
//! The two halves of the generator protocol: a `Task` is a batched request
//! that runs to completion on a worker thread, and a `TaskResult` is its
//! response, applied on the main thread.
//!
//! Tasks own their entire input batch and results own their entire output —
//! nothing is shared with the main context while a batch is in flight, and
//! the buffers inside a result are moved (not copied) into the world when
//! it is handled. A worker processes one batch fully before replying;
//! there is no partial response and no cancellation, so a result may
//! arrive for state that no longer exists and must then be discarded by
//! its handler.

use crate::voxels::world::World;

/// A unit of work that runs on a worker thread.
pub trait Task: Send {
    /// Processes the task and returns its result.
    ///
    /// Runs on a worker thread; must touch nothing but the task's own
    /// data, so it stays a pure function of its input batch.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// The result of processing a `Task`, applied on the main thread.
pub trait TaskResult: Send {
    /// Applies this result to the world and returns any follow-up tasks to
    /// schedule (the terrain generator's results spawn geometry builds
    /// this way).
    ///
    /// Runs exclusively on the main thread — the only mutator of world
    /// state — so no locking is involved anywhere in the handoff.
    fn handle_result(self: Box<Self>, world: &mut World) -> Vec<Box<dyn Task + Send>>;
}
