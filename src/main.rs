//! Headless smoke demo for the engine core.
//!
//! Loads a small region around the origin, pumps the world until both
//! generator contexts drain, then reports what got built. Useful for
//! eyeballing the pipeline with `RUST_LOG=debug cargo run`.

use std::time::{Duration, Instant};

use cgmath::Point3;
use log::info;

use voxel_engine_core::{ChunkState, World};

fn main() {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    let mut world = World::new();

    let mut positions = Vec::new();
    for x in -3..=3 {
        for y in -2..=5 {
            for z in -3..=3 {
                positions.push(Point3::new(x, y, z));
            }
        }
    }
    world.load_chunks(&positions);

    let started = Instant::now();
    loop {
        world.step();
        if world.is_idle() {
            break;
        }
        std::thread::sleep(Duration::from_millis(1));
    }

    let live = world
        .chunks()
        .filter(|chunk| chunk.state() == ChunkState::Live)
        .count();
    let faces: usize = world.chunks().map(|chunk| chunk.faces().face_count()).sum();
    info!(
        "{} chunks loaded, {} live, {} visible faces, in {:?}",
        world.chunk_count(),
        live,
        faces,
        started.elapsed()
    );
}
