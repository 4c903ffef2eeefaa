use std::path::Path;
use std::sync::{Arc, RwLock};

use snafu::prelude::*;
use tracing::debug;

use crate::fs::error::{NotADirectorySnafu, NotAFileSnafu, NotFoundSnafu};
use crate::fs::{DirEntry, FileSystem, FsError, Handle, WriteHandle};
use crate::memory::read_handle::{MemDirHandle, MemFileHandle};
use crate::memory::tree::Tree;
use crate::memory::write_handle::MemWriteHandle;
use crate::memory::{read_lock, write_lock};

/// In-memory filesystem.
///
/// Owns the path tree and the single coarse readers-writer lock guarding it;
/// both are fully initialized by `new`. Read operations take the lock in
/// shared mode, and the only exclusive acquisition is the commit swap inside
/// a write handle's close, so a reader never observes a half-applied update.
pub struct MemFs {
    tree: Arc<RwLock<Tree>>,
}

impl MemFs {
    pub fn new() -> Self {
        MemFs {
            tree: Arc::new(RwLock::new(Tree::new())),
        }
    }

    /// Creates or replaces the file at `path` with `bytes` in one call.
    pub fn set_bytes(&self, path: &Path, bytes: &[u8]) -> Result<(), FsError> {
        let mut handle = self.create(path)?;
        handle.write(bytes)?;
        handle.close()
    }

    /// Copy of the file content at `path`, or `None` if the path is absent
    /// or names a directory.
    pub fn get_bytes(&self, path: &Path) -> Option<Vec<u8>> {
        let tree = read_lock(&self.tree);
        let id = tree.resolve(path)?;
        tree.content(id).map(<[u8]>::to_vec)
    }

    /// Whether `path` names an existing file.
    pub fn has_file(&self, path: &Path) -> bool {
        self.get_bytes(path).is_some()
    }

    /// Total number of content bytes held across all files.
    pub fn size(&self) -> usize {
        let tree = read_lock(&self.tree);
        tree.files().map(|(_, content)| content.len()).sum()
    }

    /// The largest file in the store, as its full path and a content copy.
    pub fn top(&self) -> Option<(String, Vec<u8>)> {
        let tree = read_lock(&self.tree);
        tree.files()
            .max_by_key(|(_, content)| content.len())
            .map(|(id, content)| (tree.full_path(id), content.to_vec()))
    }
}

impl Default for MemFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MemFs {
    fn create(&self, path: &Path) -> Result<Box<dyn WriteHandle>, FsError> {
        debug!("Creating write handle for '{}'", path.display());
        Ok(Box::new(MemWriteHandle::replacing(
            Arc::clone(&self.tree),
            path.to_path_buf(),
        )))
    }

    fn append(&self, path: &Path) -> Result<Box<dyn WriteHandle>, FsError> {
        debug!("Creating append handle for '{}'", path.display());
        // Snapshot the current content now; a commit racing in between this
        // and the handle's close is overwritten, last committer wins.
        let base = {
            let tree = read_lock(&self.tree);
            match tree.resolve(path) {
                Some(id) => tree
                    .content(id)
                    .context(NotAFileSnafu {
                        path: path.display().to_string(),
                    })?
                    .to_vec(),
                None => Vec::new(),
            }
        };
        Ok(Box::new(MemWriteHandle::appending(
            Arc::clone(&self.tree),
            path.to_path_buf(),
            base,
        )))
    }

    fn open(&self, path: &Path) -> Result<Box<dyn Handle>, FsError> {
        debug!("Opening '{}'", path.display());
        let tree = read_lock(&self.tree);
        let id = tree.resolve(path).context(NotFoundSnafu {
            path: path.display().to_string(),
        })?;
        match tree.content(id) {
            Some(content) => Ok(Box::new(MemFileHandle::new(
                path.display().to_string(),
                content.to_vec(),
            ))),
            None => Ok(Box::new(MemDirHandle::new(
                Arc::clone(&self.tree),
                path.to_path_buf(),
            ))),
        }
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>, FsError> {
        let tree = read_lock(&self.tree);
        let id = tree.resolve(path).context(NotFoundSnafu {
            path: path.display().to_string(),
        })?;
        tree.entries(id).context(NotADirectorySnafu {
            path: path.display().to_string(),
        })
    }

    fn list_files(&self, path: &Path) -> Result<Vec<String>, FsError> {
        Ok(self
            .read_dir(path)?
            .into_iter()
            .filter(|entry| !entry.is_dir)
            .map(|entry| entry.name)
            .collect())
    }
}
