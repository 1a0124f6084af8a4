//! Per-side corner tables for emitting a block face as two triangles.
//!
//! Every visible side of a block becomes one quad: 6 vertices, 18 floats,
//! in chunk-local coordinates. The corner order is fixed so that both
//! triangles wind counter-clockwise when viewed from outside the block
//! (geometric normal = the side's direction vector).

use cgmath::Point3;

use crate::voxels::block::block_side::BlockSide;
use crate::voxels::chunk::face_table::FLOATS_PER_SIDE;

/// Builds the 18-float vertex run for one side of the block at `position`.
///
/// The run is two triangles over the quad corners (lower-left, lower-right,
/// upper-right, upper-left): `[ll, lr, ur]` then `[ll, ur, ul]`.
pub fn side_vertices(position: Point3<i32>, side: BlockSide) -> [f32; FLOATS_PER_SIDE] {
    let x = position.x as f32;
    let y = position.y as f32;
    let z = position.z as f32;

    match side {
        BlockSide::FRONT => quad(
            [x, y, z],
            [x, y, z + 1.0],
            [x, y + 1.0, z + 1.0],
            [x, y + 1.0, z],
        ),
        BlockSide::BACK => quad(
            [x + 1.0, y, z + 1.0],
            [x + 1.0, y, z],
            [x + 1.0, y + 1.0, z],
            [x + 1.0, y + 1.0, z + 1.0],
        ),
        BlockSide::BOTTOM => quad(
            [x, y, z],
            [x + 1.0, y, z],
            [x + 1.0, y, z + 1.0],
            [x, y, z + 1.0],
        ),
        BlockSide::TOP => quad(
            [x, y + 1.0, z],
            [x, y + 1.0, z + 1.0],
            [x + 1.0, y + 1.0, z + 1.0],
            [x + 1.0, y + 1.0, z],
        ),
        BlockSide::LEFT => quad(
            [x + 1.0, y, z],
            [x, y, z],
            [x, y + 1.0, z],
            [x + 1.0, y + 1.0, z],
        ),
        BlockSide::RIGHT => quad(
            [x, y, z + 1.0],
            [x + 1.0, y, z + 1.0],
            [x + 1.0, y + 1.0, z + 1.0],
            [x, y + 1.0, z + 1.0],
        ),
    }
}

fn quad(ll: [f32; 3], lr: [f32; 3], ur: [f32; 3], ul: [f32; 3]) -> [f32; FLOATS_PER_SIDE] {
    [
        ll[0], ll[1], ll[2], lr[0], lr[1], lr[2], ur[0], ur[1], ur[2], //
        ll[0], ll[1], ll[2], ur[0], ur[1], ur[2], ul[0], ul[1], ul[2],
    ]
}
