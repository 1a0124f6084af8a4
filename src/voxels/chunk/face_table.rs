//! # Face Table Module
//!
//! The face table is the engine that keeps a chunk's visible-face geometry
//! buffers compact under arbitrary insertions and removals. It owns the
//! vertex and color buffers together with four index structures that are
//! only ever mutated in lockstep:
//!
//! - `block_face_buffer`: 12-slot groups (6 sides x 2 triangles), one group
//!   per block that currently has at least one visible face. A slot holds a
//!   face index, or -1 when that particular triangle is not visible.
//! - `bfb_offsets_for_blocks`: block index -> offset of its group in
//!   `block_face_buffer`, or -1 when the block has no visible faces.
//! - `bfb_indices_for_faces`: face index -> its slot (0..12) within the
//!   owning block's group.
//! - `block_indices_for_faces`: face index -> the flat index of the block
//!   owning it.
//!
//! A fifth array, `block_indices_for_groups`, maps each group back to its
//! block so groups themselves can be compacted swap-with-last when a block
//! loses its last face.
//!
//! A "face" here is one 9-float triangle run; a visible block side always
//! occupies two of them, but after compaction the pair may live anywhere in
//! the live region. Removal copies the last live triangle's vertex and
//! color runs into the vacated slot and patches the three face-indexed
//! entries plus the owning group's slot, so the live region `[0,
//! face_count)` never contains a hole.

use cgmath::Point3;

use crate::voxels::block::block_side::BlockSide;
use crate::voxels::block::FLOATS_PER_TRIANGLE;

use super::coordinates;
use super::CHUNK_VOLUME;

/// Slots per block-face group: 6 sides x 2 triangles.
pub const GROUP_SLOTS: usize = 12;

/// Floats written per visible block side (two triangles).
pub const FLOATS_PER_SIDE: usize = 2 * FLOATS_PER_TRIANGLE;

/// The compact face-buffer store for one chunk.
///
/// Constructed empty and grown one side at a time, either by the geometry
/// builder during a from-scratch build or by a live chunk's incremental
/// mutations. All five internal arrays are private; every mutation goes
/// through [`FaceTable::create_face`] / [`FaceTable::remove_face`], which
/// maintain the cross-structure invariants as a unit.
pub struct FaceTable {
    vertices: Vec<f32>,
    colors: Vec<f32>,
    block_face_buffer: Vec<i32>,
    block_indices_for_groups: Vec<i32>,
    bfb_offsets_for_blocks: Box<[i32; CHUNK_VOLUME]>,
    bfb_indices_for_faces: Vec<i32>,
    block_indices_for_faces: Vec<i32>,
    face_count: usize,
}

impl FaceTable {
    /// Creates an empty face table with no capacity reserved.
    pub fn new() -> Self {
        FaceTable {
            vertices: Vec::new(),
            colors: Vec::new(),
            block_face_buffer: Vec::new(),
            block_indices_for_groups: Vec::new(),
            bfb_offsets_for_blocks: Box::new([-1; CHUNK_VOLUME]),
            bfb_indices_for_faces: Vec::new(),
            block_indices_for_faces: Vec::new(),
            face_count: 0,
        }
    }

    /// Number of live faces (9-float triangles) in the buffers.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.face_count
    }

    /// Number of blocks that currently own a face group.
    #[inline]
    pub fn group_count(&self) -> usize {
        self.block_indices_for_groups.len()
    }

    /// The live region of the vertex buffer.
    pub fn vertices(&self) -> &[f32] {
        &self.vertices[..self.face_count * FLOATS_PER_TRIANGLE]
    }

    /// The live region of the color buffer.
    pub fn colors(&self) -> &[f32] {
        &self.colors[..self.face_count * FLOATS_PER_TRIANGLE]
    }

    /// The live vertex region as raw bytes, for handing to a renderer.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.vertices())
    }

    /// The live color region as raw bytes, for handing to a renderer.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.colors())
    }

    /// Allocated capacity of the vertex buffer, in floats. Kept at a
    /// power-of-two face count so growth cost is amortized.
    pub fn vertex_capacity(&self) -> usize {
        self.vertices.capacity()
    }

    /// The group offset for a block, or `None` when the block currently
    /// has no visible faces.
    pub fn group_offset_for_block(&self, block_index: usize) -> Option<usize> {
        match self.bfb_offsets_for_blocks[block_index] {
            -1 => None,
            offset => Some(offset as usize),
        }
    }

    /// A block's 12 face slots, or `None` when it has no group. Slot values
    /// are face indices, -1 for sides/triangles that are not visible.
    pub fn group_slots(&self, block_index: usize) -> Option<&[i32]> {
        let offset = self.group_offset_for_block(block_index)?;
        Some(&self.block_face_buffer[offset..offset + GROUP_SLOTS])
    }

    /// The flat index of the block owning a face, or `None` for a face
    /// index outside the live region.
    pub fn block_index_for_face(&self, face: usize) -> Option<usize> {
        if face >= self.face_count {
            return None;
        }
        Some(self.block_indices_for_faces[face] as usize)
    }

    /// The in-chunk position of the block owning a face.
    pub fn block_position_for_face(&self, face: usize) -> Option<Point3<i32>> {
        self.block_index_for_face(face).map(coordinates::block_position)
    }

    /// The slot (0..12) a face occupies within its owning block's group.
    pub fn slot_for_face(&self, face: usize) -> Option<usize> {
        if face >= self.face_count {
            return None;
        }
        Some(self.bfb_indices_for_faces[face] as usize)
    }

    /// The side a face belongs to (its slot divided by two).
    pub fn side_for_face(&self, face: usize) -> Option<BlockSide> {
        Some(BlockSide::from_index(self.slot_for_face(face)? / 2))
    }

    /// Whether the block currently has a visible face on `side`.
    pub fn has_face(&self, block_index: usize, side: BlockSide) -> bool {
        match self.group_slots(block_index) {
            Some(slots) => slots[side.index() * 2] != -1,
            None => false,
        }
    }

    /// Iterates over the blocks that currently own a face group.
    pub fn blocks_with_faces(&self) -> impl Iterator<Item = usize> + '_ {
        self.block_indices_for_groups.iter().map(|&b| b as usize)
    }

    /// Appends one visible side (two triangles) for `block_index`.
    ///
    /// Allocates the block's 12-slot group if it has none, writes the quad
    /// at the live end of the vertex/color buffers, records the four index
    /// entries for both new faces, and advances the live length. Buffer
    /// capacity grows to the next power of two when exceeded; this is a
    /// capacity-management event, not an error.
    ///
    /// # Panics
    /// Debug-asserts that the side is not already visible for this block —
    /// callers decide visibility, the table only records it.
    pub fn create_face(
        &mut self,
        block_index: usize,
        side: BlockSide,
        color_run: &[f32; FLOATS_PER_TRIANGLE],
        corners: &[f32; FLOATS_PER_SIDE],
    ) {
        debug_assert!(block_index < CHUNK_VOLUME);
        self.ensure_face_capacity(2);

        let offset = match self.group_offset_for_block(block_index) {
            Some(offset) => offset,
            None => {
                let offset = self.block_face_buffer.len();
                self.block_face_buffer.extend_from_slice(&[-1; GROUP_SLOTS]);
                self.block_indices_for_groups.push(block_index as i32);
                self.bfb_offsets_for_blocks[block_index] = offset as i32;
                offset
            }
        };

        for triangle in 0..2 {
            let face = self.face_count;
            let slot = side.index() * 2 + triangle;
            debug_assert_eq!(
                self.block_face_buffer[offset + slot], -1,
                "side already visible for block {}",
                block_index
            );
            self.block_face_buffer[offset + slot] = face as i32;
            self.bfb_indices_for_faces.push(slot as i32);
            self.block_indices_for_faces.push(block_index as i32);
            self.vertices.extend_from_slice(
                &corners[triangle * FLOATS_PER_TRIANGLE..(triangle + 1) * FLOATS_PER_TRIANGLE],
            );
            self.colors.extend_from_slice(color_run);
            self.face_count += 1;
        }
    }

    /// Removes the (up to two) faces a block shows on `side`.
    ///
    /// Each removed triangle is compacted swap-with-last: the last live
    /// triangle's vertex and color runs move into the vacated position and
    /// its three face-indexed entries plus owning-group slot are repointed.
    /// When the block's group ends up entirely empty it is released, itself
    /// by swap-with-last compaction of the group array.
    ///
    /// Removing a side that is not visible is a no-op.
    pub fn remove_face(&mut self, block_index: usize, side: BlockSide) {
        let Some(offset) = self.group_offset_for_block(block_index) else {
            return;
        };

        for triangle in 0..2 {
            let slot = side.index() * 2 + triangle;
            // Re-read every iteration: removing the first triangle may have
            // moved the second one into a different face index.
            let face = self.block_face_buffer[offset + slot];
            if face == -1 {
                continue;
            }
            self.block_face_buffer[offset + slot] = -1;
            self.remove_face_at(face as usize);
        }

        let group = &self.block_face_buffer[offset..offset + GROUP_SLOTS];
        if group.iter().all(|&slot| slot == -1) {
            self.release_group(block_index, offset);
        }
    }

    /// Swap-with-last removal of a single live triangle.
    fn remove_face_at(&mut self, face: usize) {
        debug_assert!(face < self.face_count);
        let last = self.face_count - 1;

        if face != last {
            let src = last * FLOATS_PER_TRIANGLE;
            let dst = face * FLOATS_PER_TRIANGLE;
            self.vertices.copy_within(src..src + FLOATS_PER_TRIANGLE, dst);
            self.colors.copy_within(src..src + FLOATS_PER_TRIANGLE, dst);

            let moved_block = self.block_indices_for_faces[last];
            let moved_slot = self.bfb_indices_for_faces[last];
            self.block_indices_for_faces[face] = moved_block;
            self.bfb_indices_for_faces[face] = moved_slot;

            let moved_offset = self.bfb_offsets_for_blocks[moved_block as usize] as usize;
            self.block_face_buffer[moved_offset + moved_slot as usize] = face as i32;
        }

        self.face_count = last;
        self.vertices.truncate(last * FLOATS_PER_TRIANGLE);
        self.colors.truncate(last * FLOATS_PER_TRIANGLE);
        self.block_indices_for_faces.truncate(last);
        self.bfb_indices_for_faces.truncate(last);
    }

    /// Releases an all-empty group, moving the last group into its place.
    fn release_group(&mut self, block_index: usize, offset: usize) {
        let last_group = self.block_indices_for_groups.len() - 1;
        let last_offset = last_group * GROUP_SLOTS;

        if offset != last_offset {
            self.block_face_buffer
                .copy_within(last_offset..last_offset + GROUP_SLOTS, offset);
            let moved_block = self.block_indices_for_groups[last_group];
            self.block_indices_for_groups[offset / GROUP_SLOTS] = moved_block;
            self.bfb_offsets_for_blocks[moved_block as usize] = offset as i32;
        }

        self.block_face_buffer.truncate(last_offset);
        self.block_indices_for_groups.truncate(last_group);
        self.bfb_offsets_for_blocks[block_index] = -1;
    }

    /// Rewrites the color runs of every currently visible face of a block.
    ///
    /// `runs` is indexed by side; each visible slot's 9-float color run is
    /// overwritten in place. Returns whether anything was written, so the
    /// caller knows to flag the color buffer dirty.
    pub fn rewrite_colors(
        &mut self,
        block_index: usize,
        runs: &[[f32; FLOATS_PER_TRIANGLE]; 6],
    ) -> bool {
        let Some(offset) = self.group_offset_for_block(block_index) else {
            return false;
        };
        let mut written = false;
        for slot in 0..GROUP_SLOTS {
            let face = self.block_face_buffer[offset + slot];
            if face == -1 {
                continue;
            }
            let dst = face as usize * FLOATS_PER_TRIANGLE;
            self.colors[dst..dst + FLOATS_PER_TRIANGLE].copy_from_slice(&runs[slot / 2]);
            written = true;
        }
        written
    }

    /// Trims allocated capacity down to the next power of two above the
    /// live face count. The geometry builder calls this after a
    /// from-scratch build so freshly generated chunks don't ship the
    /// worst-case scratch allocation.
    pub fn trim(&mut self) {
        let faces = self.face_count.next_power_of_two();
        self.vertices.shrink_to(faces * FLOATS_PER_TRIANGLE);
        self.colors.shrink_to(faces * FLOATS_PER_TRIANGLE);
        self.bfb_indices_for_faces.shrink_to(faces);
        self.block_indices_for_faces.shrink_to(faces);
        self.block_face_buffer
            .shrink_to(self.group_count().next_power_of_two() * GROUP_SLOTS);
        self.block_indices_for_groups
            .shrink_to(self.group_count().next_power_of_two());
    }

    /// Grows the face-indexed buffers to a power-of-two face capacity that
    /// fits `additional` more faces.
    fn ensure_face_capacity(&mut self, additional: usize) {
        let needed = self.face_count + additional;
        if needed * FLOATS_PER_TRIANGLE <= self.vertices.capacity() {
            return;
        }
        let target = needed.next_power_of_two();
        self.vertices
            .reserve_exact(target * FLOATS_PER_TRIANGLE - self.vertices.len());
        self.colors
            .reserve_exact(target * FLOATS_PER_TRIANGLE - self.colors.len());
        self.bfb_indices_for_faces
            .reserve_exact(target - self.bfb_indices_for_faces.len());
        self.block_indices_for_faces
            .reserve_exact(target - self.block_indices_for_faces.len());
    }
}

impl Default for FaceTable {
    fn default() -> Self {
        Self::new()
    }
}
