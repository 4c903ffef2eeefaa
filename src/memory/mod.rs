//! Fully in-memory filesystem: an arena-backed path tree behind one
//! coarse readers-writer lock, with commit-on-close write handles and
//! snapshot-based read handles.

mod fs;
mod read_handle;
mod tree;
mod write_handle;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use fs::MemFs;
use tree::Tree;

// Nothing panics while the lock is held, so a poisoned guard still holds a
// consistent tree; recover it instead of propagating the panic.
pub(crate) fn read_lock(tree: &RwLock<Tree>) -> RwLockReadGuard<'_, Tree> {
    tree.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_lock(tree: &RwLock<Tree>) -> RwLockWriteGuard<'_, Tree> {
    tree.write().unwrap_or_else(PoisonError::into_inner)
}
