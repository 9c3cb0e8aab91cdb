//! Core data-plumbing primitives for processing large geospatial
//! datasets: a growable store indexed by sparse integer ids, and a
//! move-only task wrapper for handing work to worker threads.
//!
//! This crate is compatible with `#![no_std]` and only requires `alloc`.
//!
//! # Usage
//!
//! [`SparseStore`] maps raw integer ids (node ids, way ids, ...) to
//! small fixed-size values such as packed coordinates or file offsets.
//! Id spaces of real datasets are huge but unevenly populated, so the
//! store pays for populated slots only, plus about one bit per vacant
//! slot, and grows itself in whole increments as ids are written. See
//! the [`index`] module documentation for the storage engine seam and
//! the empty-sentinel convention.
//!
//! [`Task`] carries one unit of deferred work, or a stop signal,
//! through the queue between a producer and its worker threads. The
//! `bool` returned by [`Task::invoke`] is the entire shutdown
//! handshake; see the [`task`] module documentation.
//!
//! The two pieces compose into the usual pipeline shape: a reader
//! thread populates a store while decode work is spread over workers,
//! and once the input is exhausted the store is shared read-only and
//! the workers are stopped through their queue.
//!
//! # Validation
//!
//! The functions in [`debug_utils`] check the externally observable
//! invariants of a store. They walk the whole id range and are meant
//! for tests and fuzzing, not for production paths.
//!
//! # Feature flags
//!
//! - `std`: enables `SparseStore::write_dump` for writing packed
//!   dumps to `std::io` sinks. The rest of the crate never needs it.
//! - `trace-log`: routes detailed growth and clear events through the
//!   [`log`] crate at trace level.

#![no_std]
#![warn(rust_2018_idioms, missing_docs)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::doc_markdown
)]
#![warn(
    clippy::explicit_iter_loop,
    clippy::range_plus_one,
    clippy::map_unwrap_or,
    clippy::cloned_instead_of_copied,
    clippy::semicolon_if_nothing_returned,
    clippy::must_use_candidate,
    clippy::uninlined_format_args,
    clippy::ignored_unit_patterns
)]

extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

// Even when trace logging is disabled, the trace macro has a measurable
// cost on hot write paths, so it compiles away unless the feature is
// enabled.
macro_rules! trace {
    ($($tt:tt)*) => {
        if cfg!(feature = "trace-log") {
            ::log::trace!($($tt)*);
        }
    };
}

pub mod debug_utils;
pub mod index;
pub mod task;

pub use index::{
    EmptyValue, NotFound, SparseArray, SparseId, SparseStore, SparseTable, DEFAULT_GROW_INCREMENT,
};
pub use task::Task;
