//! Allocator round-trip tests for result handles.
//!
//! Every handle returned by an `fs_compute*` call is released exactly once,
//! and a compute/release cycle must leave the heap where it started.

use std::ptr;

use fast_stats_ffi::{fs_compute, fs_compute_row_major, fs_release, FsResultSet, FsStatus};

fn compute_handle(flat: &[f32], count: usize, length: usize) -> *mut FsResultSet {
    let mut handle: *mut FsResultSet = ptr::null_mut();
    let status = unsafe { fs_compute_row_major(flat.as_ptr(), count, length, &mut handle) };
    assert_eq!(status, FsStatus::Ok);
    handle
}

// ==================== Release Pairing ====================

#[test]
fn allocation_every_handle_releases_once() {
    let flat: Vec<f32> = (0..96).map(|i| i as f32 * 0.5).collect();
    let handles: Vec<_> = (1..=12).map(|n| compute_handle(&flat[..n * 8], n, 8)).collect();

    for &handle in &handles {
        assert_eq!(fs_release(handle), FsStatus::Ok);
    }
    for &handle in &handles {
        assert_eq!(fs_release(handle), FsStatus::InvalidHandle);
    }
}

#[test]
fn allocation_failed_compute_allocates_no_handle() {
    let row = [1.0_f32, 2.0];
    let ptrs = [row.as_ptr(), row.as_ptr()];
    let mut handle: *mut FsResultSet = ptr::null_mut();
    let status = unsafe { fs_compute(ptrs.as_ptr(), 2, 0, &mut handle) };
    assert_eq!(status, FsStatus::InvalidArgument);
    assert!(handle.is_null());
}

// ==================== DHAT Heap Tests ====================
// These tests use dhat to verify that released handles return every byte.
//
// IMPORTANT: Run dhat tests single-threaded to avoid global allocator conflicts:
//   cargo test -p fast-stats-ffi --features dhat-heap --test allocation_tests dhat_tests -- --test-threads=1

#[cfg(feature = "dhat-heap")]
mod dhat_tests {
    use super::*;

    #[global_allocator]
    static ALLOC: dhat::Alloc = dhat::Alloc;

    #[test]
    fn dhat_compute_release_cycle_is_balanced() {
        let _profiler = dhat::Profiler::builder().testing().build();
        let flat: Vec<f32> = (0..4096).map(|i| (i % 97) as f32).collect();

        // Keep one handle live so the registry's own storage stays allocated
        let anchor = compute_handle(&flat[..64], 1, 64);
        let before = dhat::HeapStats::get();

        for count in [1_usize, 4, 7, 64] {
            let handle = compute_handle(&flat[..count * 64], count, 64);
            assert_eq!(fs_release(handle), FsStatus::Ok);
        }

        let after = dhat::HeapStats::get();
        assert!(after.total_blocks > before.total_blocks, "cycles did not allocate");
        assert_eq!(
            after.curr_blocks, before.curr_blocks,
            "released handles leaked {} blocks",
            after.curr_blocks.saturating_sub(before.curr_blocks)
        );
        assert_eq!(after.curr_bytes, before.curr_bytes);

        assert_eq!(fs_release(anchor), FsStatus::Ok);
    }

    #[test]
    fn dhat_double_release_frees_nothing() {
        let _profiler = dhat::Profiler::builder().testing().build();
        let flat = [1.0_f32, 2.0, 3.0, 4.0];

        let anchor = compute_handle(&flat, 1, 4);
        let handle = compute_handle(&flat, 2, 2);
        assert_eq!(fs_release(handle), FsStatus::Ok);
        let before = dhat::HeapStats::get();

        assert_eq!(fs_release(handle), FsStatus::InvalidHandle);

        let after = dhat::HeapStats::get();
        assert_eq!(after.curr_blocks, before.curr_blocks);
        assert_eq!(after.total_blocks, before.total_blocks);

        assert_eq!(fs_release(anchor), FsStatus::Ok);
    }
}
