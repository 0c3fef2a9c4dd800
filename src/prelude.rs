//! Prelude module shared by the runtime.
//!
//! Re-exports the collection and sharing types used throughout the crate so
//! every module reaches for the same hasher and the same reference types.

pub use core::{
    cell::{Cell, Ref, RefCell, RefMut},
    fmt,
};

pub use std::rc::{Rc, Weak};

// ═══════════════════════════════════════════════════════════════════════════════
// Hash maps - FxHasher for the flat global/static-function tables
// ═══════════════════════════════════════════════════════════════════════════════

pub use rustc_hash::{FxHashMap, FxHashSet};

// ═══════════════════════════════════════════════════════════════════════════════
// IndexMap - object slots keep insertion order for enumeration
// ═══════════════════════════════════════════════════════════════════════════════

pub type IndexMap<K, V> =
    indexmap::IndexMap<K, V, core::hash::BuildHasherDefault<rustc_hash::FxHasher>>;

/// Create an empty IndexMap
#[inline]
pub fn index_map_new<K, V>() -> IndexMap<K, V>
where
    K: core::hash::Hash + Eq,
{
    indexmap::IndexMap::with_hasher(Default::default())
}

/// Create an IndexMap with the given capacity
#[inline]
pub fn index_map_with_capacity<K, V>(capacity: usize) -> IndexMap<K, V>
where
    K: core::hash::Hash + Eq,
{
    indexmap::IndexMap::with_capacity_and_hasher(capacity, Default::default())
}
