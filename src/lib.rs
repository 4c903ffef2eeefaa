//! Uniform, path-addressed filesystem abstraction with two backends: a
//! fully in-memory path tree and a thin adapter over real storage.
//!
//! Both backends satisfy the same contract (`FileSystem` plus its handle
//! traits) and the same error taxonomy, verified by the conformance battery
//! in [`conformance`].

pub mod conformance;
pub mod disk;
pub mod fs;
pub mod memory;

pub use disk::DiskFs;
pub use fs::{DirEntry, FileSystem, FsError, Handle, WriteHandle};
pub use memory::MemFs;
