//! Disk-backed adapter: delegates to native file I/O under a root
//! directory, translating native "not found" conditions into the common
//! taxonomy.

mod fs;

pub use fs::DiskFs;
