//! Memory layout constants.
//!
//! These do not depend on any toggle. Object layout code, the allocator, and
//! the compiler backend read them directly.

use serde::{Deserialize, Serialize};

/// One kibibyte.
pub const KB: usize = 1024;
/// One mebibyte.
pub const MB: usize = KB * KB;
/// One gibibyte.
pub const GB: usize = KB * KB * KB;

/// Bits in a byte.
pub const BITS_PER_BYTE: usize = 8;
/// log2 of [`BITS_PER_BYTE`].
pub const BITS_PER_BYTE_LOG2: usize = 3;
/// Width of a native pointer in bits.
pub const BITS_PER_INTPTR: usize = std::mem::size_of::<usize>() * BITS_PER_BYTE;

/// Required stack alignment in bytes.
pub const STACK_ALIGNMENT: usize = 16;

/// System page size in bytes.
///
/// A compile-time default so generated code can fold it. Process bootstrap
/// is expected to compare it with the page size the OS reports.
pub const PAGE_SIZE: usize = 4096;

/// log2 of the required object alignment.
pub const OBJECT_ALIGNMENT_SHIFT: usize = 3;
/// Required object alignment in bytes.
pub const OBJECT_ALIGNMENT: usize = 1 << OBJECT_ALIGNMENT_SHIFT;
/// Alignment of objects in the large object space.
pub const LARGE_OBJECT_ALIGNMENT: usize = PAGE_SIZE;

/// Size in bytes of a reference stored in the heap (compressed, possibly poisoned).
pub const HEAP_REFERENCE_SIZE: usize = std::mem::size_of::<u32>();

const _: () = assert!(BITS_PER_BYTE == 1 << BITS_PER_BYTE_LOG2);
const _: () = assert!(OBJECT_ALIGNMENT.is_power_of_two());
const _: () = assert!(LARGE_OBJECT_ALIGNMENT % OBJECT_ALIGNMENT == 0);
const _: () = assert!(PAGE_SIZE.is_power_of_two());
const _: () = assert!(STACK_ALIGNMENT.is_power_of_two());

/// Returns whether the given memory offset can be used for generating an
/// implicit null check.
///
/// A load or store at `null + offset` faults in the unmapped first page only
/// while `offset` stays below the page size.
#[inline]
pub const fn can_do_implicit_null_check_on(offset: usize) -> bool {
    offset < PAGE_SIZE
}

/// Snapshot of the layout constants, for dumps and comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Layout {
    /// See [`BITS_PER_BYTE`].
    pub bits_per_byte: usize,
    /// See [`BITS_PER_BYTE_LOG2`].
    pub bits_per_byte_log2: usize,
    /// See [`BITS_PER_INTPTR`].
    pub bits_per_intptr: usize,
    /// See [`STACK_ALIGNMENT`].
    pub stack_alignment: usize,
    /// See [`PAGE_SIZE`].
    pub page_size: usize,
    /// See [`OBJECT_ALIGNMENT_SHIFT`].
    pub object_alignment_shift: usize,
    /// See [`OBJECT_ALIGNMENT`].
    pub object_alignment: usize,
    /// See [`LARGE_OBJECT_ALIGNMENT`].
    pub large_object_alignment: usize,
    /// See [`HEAP_REFERENCE_SIZE`].
    pub heap_reference_size: usize,
}

impl Layout {
    /// The layout of the build this crate is compiled into.
    pub const NATIVE: Self = Self {
        bits_per_byte: BITS_PER_BYTE,
        bits_per_byte_log2: BITS_PER_BYTE_LOG2,
        bits_per_intptr: BITS_PER_INTPTR,
        stack_alignment: STACK_ALIGNMENT,
        page_size: PAGE_SIZE,
        object_alignment_shift: OBJECT_ALIGNMENT_SHIFT,
        object_alignment: OBJECT_ALIGNMENT,
        large_object_alignment: LARGE_OBJECT_ALIGNMENT,
        heap_reference_size: HEAP_REFERENCE_SIZE,
    };

    /// Round `size` up to the object alignment, or `None` if that overflows.
    pub const fn align_object_size(&self, size: usize) -> Option<usize> {
        let mask = self.object_alignment - 1;
        match size.checked_add(mask) {
            Some(padded) => Some(padded & !mask),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_alignment_from_shift() {
        assert_eq!(OBJECT_ALIGNMENT, 8);
        assert_eq!(OBJECT_ALIGNMENT, 1usize << OBJECT_ALIGNMENT_SHIFT);
    }

    #[test]
    fn large_object_alignment_is_page_size() {
        assert_eq!(LARGE_OBJECT_ALIGNMENT, 4096);
        assert_eq!(LARGE_OBJECT_ALIGNMENT, PAGE_SIZE);
        assert_eq!(LARGE_OBJECT_ALIGNMENT % OBJECT_ALIGNMENT, 0);
    }

    #[test]
    fn sizes() {
        assert_eq!(HEAP_REFERENCE_SIZE, 4);
        assert_eq!(STACK_ALIGNMENT, 16);
        assert_eq!(BITS_PER_INTPTR, usize::BITS as usize);
        assert_eq!(GB, 1 << 30);
    }

    #[test]
    fn implicit_null_check_range() {
        assert!(can_do_implicit_null_check_on(0));
        assert!(can_do_implicit_null_check_on(4095));
        assert!(!can_do_implicit_null_check_on(4096));
        assert!(!can_do_implicit_null_check_on(usize::MAX));
    }

    #[test]
    fn native_snapshot_matches_constants() {
        let layout = Layout::NATIVE;
        assert_eq!(layout.page_size, PAGE_SIZE);
        assert_eq!(layout.object_alignment, 8);
        assert_eq!(layout.heap_reference_size, 4);
    }

    #[test]
    fn align_object_size() {
        let layout = Layout::NATIVE;
        assert_eq!(layout.align_object_size(0), Some(0));
        assert_eq!(layout.align_object_size(1), Some(8));
        assert_eq!(layout.align_object_size(8), Some(8));
        assert_eq!(layout.align_object_size(13), Some(16));
    }

    #[test]
    fn align_object_size_near_max() {
        let layout = Layout::NATIVE;
        let last_aligned = usize::MAX & !(OBJECT_ALIGNMENT - 1);
        assert_eq!(layout.align_object_size(last_aligned), Some(last_aligned));
        assert_eq!(layout.align_object_size(last_aligned + 1), None);
        assert_eq!(layout.align_object_size(usize::MAX - 2), None);
        assert_eq!(layout.align_object_size(usize::MAX), None);
    }
}
