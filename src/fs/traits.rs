use std::path::Path;

use crate::fs::{DirEntry, FsError};

/// A path-addressed filesystem.
///
/// All paths are relative to the backend's root and split on the native
/// separator. A `.` segment resolves to the current node and a `..` segment
/// to its parent; no further normalization is applied.
pub trait FileSystem {
    /// Produces a write handle whose close replaces the content at `path`
    /// wholesale, creating intermediate directories as needed.
    fn create(&self, path: &Path) -> Result<Box<dyn WriteHandle>, FsError>;

    /// Produces a write handle whose close appends to a snapshot of the
    /// file's content taken now. A missing path behaves exactly as `create`.
    fn append(&self, path: &Path) -> Result<Box<dyn WriteHandle>, FsError>;

    /// Opens the node at `path` for reading. The returned handle serves
    /// content reads for a file and paginated listings for a directory.
    fn open(&self, path: &Path) -> Result<Box<dyn Handle>, FsError>;

    /// Lists the direct children of the directory at `path`, sorted
    /// ascending by name. A directory with no direct children yields an
    /// empty vector, not an error.
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>, FsError>;

    /// Like `read_dir`, but returns only the base names of direct file
    /// children; subdirectories are excluded.
    fn list_files(&self, path: &Path) -> Result<Vec<String>, FsError>;
}

/// A read handle polymorphic over the file/directory capability split.
pub trait Handle {
    /// Reads sequential content bytes into `buf`, returning the number of
    /// bytes read and `Ok(0)` once the content is consumed.
    ///
    /// Fails with `NotAFile` on a directory handle.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError>;

    /// Reads the next page of directory entries.
    ///
    /// For `n < 0` the entire remainder is returned in one call, even when
    /// empty. For `n >= 0` up to `n` entries are returned and the cursor
    /// advances; once nothing remains the call fails with `Exhausted`, the
    /// normal end-of-sequence marker.
    ///
    /// Fails with `NotADirectory` on a file handle.
    fn read_dir(&mut self, n: isize) -> Result<Vec<DirEntry>, FsError>;

    /// Drains the remaining content into a vector.
    fn read_to_end(&mut self) -> Result<Vec<u8>, FsError> {
        let mut out = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = self.read(&mut chunk)?;
            if n == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&chunk[..n]);
        }
    }
}

/// A writer whose full effect is guaranteed in place once close succeeds.
///
/// Close consumes the handle, so writing after close and closing twice are
/// unrepresentable.
pub trait WriteHandle {
    /// Writes all of `buf` and returns its length; a successful return
    /// never leaves part of the buffer behind. When the bytes become
    /// visible to readers is backend-defined, but no later than `close`;
    /// the in-memory backend defers everything to close.
    fn write(&mut self, buf: &[u8]) -> Result<usize, FsError>;

    /// Publishes the buffered bytes. For in-memory backends this is a single
    /// atomic swap; disk backends propagate native I/O errors.
    fn close(self: Box<Self>) -> Result<(), FsError>;
}
