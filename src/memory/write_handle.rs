use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::fs::{FsError, WriteHandle};
use crate::memory::tree::Tree;
use crate::memory::write_lock;

/// Buffered writer whose bytes reach the tree only at close.
///
/// `base` is the content snapshot the commit is applied on top of: empty for
/// a create handle, the file's content at call time for an append handle.
/// Writes extend the private buffer with no lock held; the write lock is
/// taken once, for the publish swap. Whichever handle closes last on a path
/// wins outright.
pub(crate) struct MemWriteHandle {
    tree: Arc<RwLock<Tree>>,
    path: PathBuf,
    base: Vec<u8>,
    buf: Vec<u8>,
}

impl MemWriteHandle {
    /// Handle that replaces the target's content wholesale on close.
    pub(crate) fn replacing(tree: Arc<RwLock<Tree>>, path: PathBuf) -> Self {
        Self::appending(tree, path, Vec::new())
    }

    /// Handle that commits on top of `base`, the content snapshot taken when
    /// the append was requested.
    pub(crate) fn appending(tree: Arc<RwLock<Tree>>, path: PathBuf, base: Vec<u8>) -> Self {
        MemWriteHandle {
            tree,
            path,
            base,
            buf: Vec::new(),
        }
    }
}

impl WriteHandle for MemWriteHandle {
    fn write(&mut self, buf: &[u8]) -> Result<usize, FsError> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn close(self: Box<Self>) -> Result<(), FsError> {
        let MemWriteHandle {
            tree,
            path,
            mut base,
            buf,
        } = *self;
        // Assemble the published content outside the lock; only the
        // get-or-create walk and the swap run under it.
        base.extend_from_slice(&buf);

        let total = base.len();
        let mut tree = write_lock(&tree);
        let id = tree.get_or_create_file(&path)?;
        tree.set_content(id, base);
        debug!("Committed {} bytes to '{}'", total, path.display());
        Ok(())
    }
}
