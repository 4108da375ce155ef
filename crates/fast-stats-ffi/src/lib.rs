//! C ABI for the fast-stats engine.
//!
//! Results cross the boundary as opaque [`FsResultSet`] handles. A handle is
//! issued by one of the `fs_compute*` functions and must be released exactly
//! once with [`fs_release`]; the records are allocated and freed inside this
//! crate, so the allocator that frees a result is always the one that
//! created it.
//!
//! A handle is an id into a process-wide registry that owns the records.
//! Ids count up and are never reissued, so releasing a handle twice, or a
//! value that no `fs_compute*` call returned, is reported as
//! [`FsStatus::InvalidHandle`] and frees nothing, even after newer results
//! have been allocated. The read functions consult the same registry, so a
//! released handle reads as empty rather than dangling.
//!
//! The matching C declarations are in `include/fast_stats.h`.
//!
//! # Example
//!
//! ```
//! use fast_stats_ffi::{fs_compute_row_major, fs_release, fs_result_len, FsResultSet, FsStatus};
//!
//! let data = [1.0_f32, 3.0, 3.0, 4.0, 1.0, 6.0, 3.0, 4.0];
//! let mut handle: *mut FsResultSet = std::ptr::null_mut();
//! unsafe {
//!     assert_eq!(fs_compute_row_major(data.as_ptr(), 2, 4, &mut handle), FsStatus::Ok);
//!     assert_eq!(fs_result_len(handle), 2);
//!     assert_eq!(fs_release(handle), FsStatus::Ok);
//!     assert_eq!(fs_release(handle), FsStatus::InvalidHandle);
//! }
//! ```

#![deny(unsafe_op_in_unsafe_fn)]

use std::collections::BTreeMap;
use std::ptr;
use std::slice;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use fast_stats::batch::Batch;
use fast_stats::traits::{storage_len, validate_length};
use fast_stats::{Backend, Engine, Error, ResultSet, StatsRecord};
use tracing::{debug, warn};

/// Status code returned by every fallible `fs_*` function.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsStatus {
    /// `FS_OK`: the call succeeded.
    Ok = 0,
    /// `FS_NULL_POINTER`: a required pointer argument was null.
    NullPointer = 1,
    /// `FS_INVALID_ARGUMENT`: the batch shape was rejected.
    InvalidArgument = 2,
    /// `FS_INVALID_HANDLE`: the handle is not a live result set.
    InvalidHandle = 3,
    /// `FS_OUT_OF_RANGE`: the record index is past the end of the result set.
    OutOfRange = 4,
}

/// One record as seen from C: five consecutive `float`s.
pub type FsStatsRecord = StatsRecord;

/// Opaque result set handle.
///
/// A handle is a registry id, not an address: it is never dereferenced, and
/// an id is never issued twice, so a stale handle cannot alias a newer one.
#[derive(Debug)]
pub struct FsResultSet {
    _opaque: [u8; 0],
}

type Registry = BTreeMap<usize, Box<[StatsRecord]>>;

static NEXT_HANDLE: AtomicUsize = AtomicUsize::new(1);
static LIVE_HANDLES: Mutex<Registry> = Mutex::new(BTreeMap::new());

// The map stays consistent even if a holder panicked
fn registry() -> MutexGuard<'static, Registry> {
    LIVE_HANDLES.lock().unwrap_or_else(PoisonError::into_inner)
}

fn register(results: ResultSet) -> *mut FsResultSet {
    let id = NEXT_HANDLE.fetch_add(1, Ordering::Relaxed);
    registry().insert(id, results.into_boxed_slice());
    id as *mut FsResultSet
}

/// Runs `f` on the records behind `handle` while the registry is locked.
fn with_records<R>(handle: *const FsResultSet, f: impl FnOnce(&[StatsRecord]) -> R) -> Option<R> {
    registry().get(&(handle as usize)).map(|records| f(records))
}

// Every engine error is a shape problem from the C side
fn status_of(err: &Error) -> FsStatus {
    warn!(error = %err, invalid_argument = err.is_invalid_argument(), "rejected batch");
    FsStatus::InvalidArgument
}

/// Stores a successful result behind `out`; leaves `out` untouched on error.
///
/// # Safety
///
/// `out` must be non-null and valid for writes.
unsafe fn finish(result: fast_stats::Result<ResultSet>, out: *mut *mut FsResultSet) -> FsStatus {
    match result {
        Ok(results) => {
            let records = results.len();
            let handle = register(results);
            debug!(records, handle = handle as usize, "allocated result set");
            // SAFETY: checked non-null by the caller, valid for writes per contract
            unsafe { out.write(handle) };
            FsStatus::Ok
        }
        Err(err) => status_of(&err),
    }
}

/// Shared body of the pointer-array entry points.
///
/// # Safety
///
/// See [`fs_compute`].
unsafe fn compute_pointer_array(
    sequences: *const *const f32,
    count: usize,
    length: usize,
    out: *mut *mut FsResultSet,
    backend: Backend,
) -> FsStatus {
    if out.is_null() || (count > 0 && sequences.is_null()) {
        return FsStatus::NullPointer;
    }
    if let Err(err) = validate_length(length).and_then(|()| storage_len::<f32>(count, length)) {
        return status_of(&err);
    }

    let pointers: &[*const f32] = if count == 0 {
        &[]
    } else {
        // SAFETY: non-null, and the caller guarantees `count` readable pointers
        unsafe { slice::from_raw_parts(sequences, count) }
    };
    if pointers.iter().any(|p| p.is_null()) {
        return FsStatus::NullPointer;
    }
    let rows: Vec<&[f32]> = pointers
        .iter()
        // SAFETY: each pointer is non-null and the caller guarantees `length`
        // readable values behind it; the byte size was checked above
        .map(|&p| unsafe { slice::from_raw_parts(p, length) })
        .collect();

    let result = Batch::new(&rows).and_then(|batch| Engine::new().backend(backend).compute(&batch));
    // SAFETY: `out` checked non-null above
    unsafe { finish(result, out) }
}

/// Computes statistics for `count` sequences of `length` values each, given
/// as an array of `count` pointers, with the vectorized backend.
///
/// On `FS_OK`, `*out` receives a handle that must be released with
/// [`fs_release`]. On any other status `*out` is left untouched.
///
/// A zero `length` is `FS_INVALID_ARGUMENT` even when `count` is zero.
///
/// # Safety
///
/// - `out` must be null or valid for writes.
/// - If `count > 0`, `sequences` must point to `count` readable pointers, each
///   of which is null or points to `length` readable `f32` values.
#[no_mangle]
pub unsafe extern "C" fn fs_compute(
    sequences: *const *const f32,
    count: usize,
    length: usize,
    out: *mut *mut FsResultSet,
) -> FsStatus {
    // SAFETY: forwarded caller contract
    unsafe { compute_pointer_array(sequences, count, length, out, Backend::Vectorized) }
}

/// Same as [`fs_compute`], using the scalar backend for every sequence.
///
/// # Safety
///
/// See [`fs_compute`].
#[no_mangle]
pub unsafe extern "C" fn fs_compute_scalar(
    sequences: *const *const f32,
    count: usize,
    length: usize,
    out: *mut *mut FsResultSet,
) -> FsStatus {
    // SAFETY: forwarded caller contract
    unsafe { compute_pointer_array(sequences, count, length, out, Backend::Scalar) }
}

/// Computes statistics for `count` rows of `length` values stored
/// contiguously at `data`, with the vectorized backend.
///
/// # Safety
///
/// - `out` must be null or valid for writes.
/// - If `count * length > 0`, `data` must point to that many readable `f32`
///   values.
#[no_mangle]
pub unsafe extern "C" fn fs_compute_row_major(
    data: *const f32,
    count: usize,
    length: usize,
    out: *mut *mut FsResultSet,
) -> FsStatus {
    if out.is_null() {
        return FsStatus::NullPointer;
    }
    let values = match validate_length(length).and_then(|()| storage_len::<f32>(count, length)) {
        Ok(values) => values,
        Err(err) => return status_of(&err),
    };
    let data: &[f32] = if values == 0 {
        &[]
    } else if data.is_null() {
        return FsStatus::NullPointer;
    } else {
        // SAFETY: non-null, caller guarantees `values` readable floats, and
        // the byte size fits in isize
        unsafe { slice::from_raw_parts(data, values) }
    };

    // SAFETY: `out` checked non-null above
    unsafe { finish(fast_stats::compute_row_major(data, count, length), out) }
}

/// Number of records in a result set; 0 for null or released handles.
#[no_mangle]
pub extern "C" fn fs_result_len(handle: *const FsResultSet) -> usize {
    with_records(handle, <[StatsRecord]>::len).unwrap_or(0)
}

/// Borrowed pointer to the first of [`fs_result_len`] contiguous records.
///
/// The pointer is valid until the handle is released. Returns null for null
/// or released handles.
#[no_mangle]
pub extern "C" fn fs_result_records(handle: *const FsResultSet) -> *const FsStatsRecord {
    with_records(handle, <[StatsRecord]>::as_ptr).unwrap_or(ptr::null())
}

/// Copies record `index` of a result set into `*out`.
///
/// # Safety
///
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn fs_result_get(
    handle: *const FsResultSet,
    index: usize,
    out: *mut FsStatsRecord,
) -> FsStatus {
    if handle.is_null() || out.is_null() {
        return FsStatus::NullPointer;
    }
    let Some(record) = with_records(handle, |records| records.get(index).copied()) else {
        warn!(handle = handle as usize, "read from a handle that is not live");
        return FsStatus::InvalidHandle;
    };
    match record {
        Some(record) => {
            // SAFETY: checked non-null, valid for writes per contract
            unsafe { out.write(record) };
            FsStatus::Ok
        }
        None => FsStatus::OutOfRange,
    }
}

/// Releases a result set returned by an `fs_compute*` function.
///
/// Each handle is released exactly once. A second release, or a value that
/// was never returned by `fs_compute*`, returns `FS_INVALID_HANDLE` and frees
/// nothing. Record pointers from [`fs_result_records`] dangle afterwards.
#[no_mangle]
pub extern "C" fn fs_release(handle: *mut FsResultSet) -> FsStatus {
    if handle.is_null() {
        return FsStatus::NullPointer;
    }
    let Some(records) = registry().remove(&(handle as usize)) else {
        warn!(handle = handle as usize, "release of a handle that is not live");
        return FsStatus::InvalidHandle;
    };
    drop(records);
    debug!(handle = handle as usize, "released result set");
    FsStatus::Ok
}
