//! # Coordinate Codec
//!
//! Helper functions for switching between block positions and flat block
//! indices, and between world coordinates and (chunk coordinate, in-chunk
//! coordinate) pairs. Pure arithmetic, no state.
//!
//! A block index packs the three 4-bit in-chunk coordinates as
//! `(x << 8) | (y << 4) | z`, so ascending index order walks z fastest,
//! then y, then x.

use cgmath::Point3;

use super::{CHUNK_DIMENSION, CHUNK_VOLUME};

/// Packs an in-chunk block position into its flat index (0..4096).
///
/// # Panics
/// Panics if any coordinate is outside `[0, 16)`. An out-of-range in-chunk
/// coordinate is a caller bug that would silently corrupt the face-buffer
/// index structures, so it fails loudly instead.
#[inline]
pub fn block_index(position: Point3<i32>) -> usize {
    assert!(
        position_is_within_chunk(position),
        "in-chunk coordinate out of range: ({}, {}, {})",
        position.x,
        position.y,
        position.z
    );
    ((position.x as usize) << 8) | ((position.y as usize) << 4) | position.z as usize
}

/// Unpacks a flat block index back into its in-chunk position.
#[inline]
pub fn block_position(index: usize) -> Point3<i32> {
    debug_assert!(index < CHUNK_VOLUME);
    Point3::new(
        (index >> 8) as i32,
        ((index >> 4) & 0xF) as i32,
        (index & 0xF) as i32,
    )
}

/// Checks that all three axes of a position lie in `[0, 16)`.
#[inline]
pub fn position_is_within_chunk(position: Point3<i32>) -> bool {
    (0..CHUNK_DIMENSION).contains(&position.x)
        && (0..CHUNK_DIMENSION).contains(&position.y)
        && (0..CHUNK_DIMENSION).contains(&position.z)
}

/// The coordinate of the chunk containing a world-space block position.
///
/// Uses euclidean division so negative world coordinates land in the
/// correct chunk (world -1 belongs to chunk -1, not chunk 0).
#[inline]
pub fn chunk_coordinate_for_position(world: Point3<i32>) -> Point3<i32> {
    Point3::new(
        world.x.div_euclid(CHUNK_DIMENSION),
        world.y.div_euclid(CHUNK_DIMENSION),
        world.z.div_euclid(CHUNK_DIMENSION),
    )
}

/// The in-chunk position of a world-space block position.
#[inline]
pub fn chunk_relative_position(world: Point3<i32>) -> Point3<i32> {
    Point3::new(
        world.x.rem_euclid(CHUNK_DIMENSION),
        world.y.rem_euclid(CHUNK_DIMENSION),
        world.z.rem_euclid(CHUNK_DIMENSION),
    )
}

/// Rebuilds a world-space block position from a chunk coordinate and an
/// in-chunk position.
#[inline]
pub fn world_position(chunk: Point3<i32>, local: Point3<i32>) -> Point3<i32> {
    Point3::new(
        chunk.x * CHUNK_DIMENSION + local.x,
        chunk.y * CHUNK_DIMENSION + local.y,
        chunk.z * CHUNK_DIMENSION + local.z,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_index_round_trips() {
        for index in 0..CHUNK_VOLUME {
            assert_eq!(block_index(block_position(index)), index);
        }
    }

    #[test]
    fn negative_world_positions_wrap_into_their_chunk() {
        let world = Point3::new(-1, 0, 17);
        assert_eq!(chunk_coordinate_for_position(world), Point3::new(-1, 0, 1));
        assert_eq!(chunk_relative_position(world), Point3::new(15, 0, 1));
        assert_eq!(
            world_position(
                chunk_coordinate_for_position(world),
                chunk_relative_position(world)
            ),
            world
        );
    }

    #[test]
    #[should_panic]
    fn out_of_range_coordinate_panics() {
        block_index(Point3::new(16, 0, 0));
    }
}
