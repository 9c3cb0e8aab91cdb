//! Sparse id-keyed storage.
//!
//! This module provides the store used to index pipeline entities by
//! their raw integer ids:
//! - [`SparseStore`] is the id-to-value associative array, with
//!   automatic growth and packed byte dumps.
//! - [`SparseTable`] is its default storage engine, paying about one
//!   bit per vacant slot.
//! - [`SparseArray`] is the engine seam for callers that want a
//!   different storage layout under the same store contract.
//! - [`SparseId`] abstracts over the integer type carrying ids.
//! - [`EmptyValue`] binds each value type to its reserved empty
//!   sentinel.

pub mod empty;
pub mod id;
pub mod store;
pub mod table;

pub use empty::EmptyValue;
pub use id::SparseId;
pub use store::{NotFound, SparseStore, DEFAULT_GROW_INCREMENT};
pub use table::{SparseArray, SparseTable};
