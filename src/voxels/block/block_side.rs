//! # Block Side Module
//!
//! This module defines the six axis-aligned faces of a voxel block. Every
//! per-side slot in the face buffers is addressed through the stable index
//! carried by these variants, so the order here is load-bearing: a block's
//! 12-slot face group stores side `s` at slots `2*s` and `2*s + 1`.

use cgmath::{Point3, Vector3};

use num_derive::FromPrimitive;

/// Represents the six possible faces of a voxel block.
///
/// Each variant is assigned a stable integer value used to address
/// per-side slots in the face buffers and the boundary-layer arrays.
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, FromPrimitive)]
pub enum BlockSide {
    /// The front face (facing negative X)
    FRONT = 0,

    /// The back face (facing positive X)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative Z)
    LEFT = 4,

    /// The right face (facing positive Z)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in slot order.
    ///
    /// This is the iteration order used everywhere a block's sides are
    /// visited, which keeps face emission reproducible.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// The stable slot index of this side (0..6).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Recovers a side from its stable index.
    ///
    /// # Panics
    /// Panics if `index` is not in `0..6`.
    pub fn from_index(index: usize) -> Self {
        num::FromPrimitive::from_usize(index).unwrap()
    }

    /// The unit vector pointing out of this face.
    pub fn vector(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(-1, 0, 0),
            BlockSide::BACK => Vector3::new(1, 0, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::LEFT => Vector3::new(0, 0, -1),
            BlockSide::RIGHT => Vector3::new(0, 0, 1),
        }
    }

    /// The side facing the opposite way.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::FRONT => BlockSide::BACK,
            BlockSide::BACK => BlockSide::FRONT,
            BlockSide::BOTTOM => BlockSide::TOP,
            BlockSide::TOP => BlockSide::BOTTOM,
            BlockSide::LEFT => BlockSide::RIGHT,
            BlockSide::RIGHT => BlockSide::LEFT,
        }
    }

    /// The position one step from `position` in this side's direction.
    ///
    /// Works for both in-chunk and world coordinates; callers decide how to
    /// interpret a result that leaves the chunk.
    pub fn adjacent_position(self, position: Point3<i32>) -> Point3<i32> {
        position + self.vector()
    }

    /// The coordinate, on this side's axis, of the chunk's boundary layer
    /// facing this way: 15 for positive sides, 0 for negative sides.
    pub fn boundary_coordinate(self) -> i32 {
        match self {
            BlockSide::BACK | BlockSide::TOP | BlockSide::RIGHT => 0xF,
            BlockSide::FRONT | BlockSide::BOTTOM | BlockSide::LEFT => 0,
        }
    }

    /// Builds the block position on this side's boundary layer from the two
    /// in-plane coordinates `(u, v)`.
    ///
    /// The `(u, v)` ordering matches [`BlockSide::layer_index`], so
    /// `layer_index(boundary_position(u, v)) == (u << 4) | v`.
    pub fn boundary_position(self, u: i32, v: i32) -> Point3<i32> {
        let edge = self.boundary_coordinate();
        match self {
            BlockSide::FRONT | BlockSide::BACK => Point3::new(edge, u, v),
            BlockSide::BOTTOM | BlockSide::TOP => Point3::new(u, edge, v),
            BlockSide::LEFT | BlockSide::RIGHT => Point3::new(u, v, edge),
        }
    }

    /// Flattens a position onto this side's 16x16 boundary layer.
    ///
    /// Only the two axes orthogonal to this side are read, so the position
    /// may lie outside the chunk on this side's own axis (the usual case
    /// when resolving an adjacent position that crossed the boundary).
    pub fn layer_index(self, position: Point3<i32>) -> usize {
        let (u, v) = match self {
            BlockSide::FRONT | BlockSide::BACK => (position.y, position.z),
            BlockSide::BOTTOM | BlockSide::TOP => (position.x, position.z),
            BlockSide::LEFT | BlockSide::RIGHT => (position.x, position.y),
        };
        debug_assert!((0..16).contains(&u) && (0..16).contains(&v));
        ((u as usize) << 4) | v as usize
    }
}
