use std::fs::{self, File, OpenOptions};
use std::io::Read as _;
use std::path::{Path, PathBuf};

use snafu::prelude::*;
use tracing::debug;

use crate::fs::error::{NotADirectorySnafu, NotAFileSnafu};
use crate::fs::{DirEntry, FileSystem, FsError, Handle, ListingCursor, WriteHandle};

/// Filesystem backed by a directory on real storage.
///
/// Every operation joins the given path under the root and delegates to
/// `std::fs`. Writes reach the disk as they happen; commit-on-close is a
/// property of the in-memory backend, not of this adapter.
pub struct DiskFs {
    root: PathBuf,
}

impl DiskFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DiskFs { root: root.into() }
    }

    fn full_path(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    fn ensure_parent(&self, full: &Path, shown: &Path) -> Result<(), FsError> {
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|err| FsError::from_io(err, shown))?;
        }
        Ok(())
    }
}

impl FileSystem for DiskFs {
    fn create(&self, path: &Path) -> Result<Box<dyn WriteHandle>, FsError> {
        debug!("Creating '{}' under '{}'", path.display(), self.root.display());
        let full = self.full_path(path);
        self.ensure_parent(&full, path)?;
        let file = File::create(&full).map_err(|err| FsError::from_io(err, path))?;
        Ok(Box::new(DiskWriteHandle {
            file,
            path: path.to_path_buf(),
        }))
    }

    fn append(&self, path: &Path) -> Result<Box<dyn WriteHandle>, FsError> {
        debug!(
            "Appending to '{}' under '{}'",
            path.display(),
            self.root.display()
        );
        let full = self.full_path(path);
        self.ensure_parent(&full, path)?;
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&full)
            .map_err(|err| FsError::from_io(err, path))?;
        Ok(Box::new(DiskWriteHandle {
            file,
            path: path.to_path_buf(),
        }))
    }

    fn open(&self, path: &Path) -> Result<Box<dyn Handle>, FsError> {
        let full = self.full_path(path);
        let metadata = fs::metadata(&full).map_err(|err| FsError::from_io(err, path))?;
        if metadata.is_dir() {
            Ok(Box::new(DiskDirHandle {
                full,
                path: path.to_path_buf(),
                cursor: None,
            }))
        } else {
            let file = File::open(&full).map_err(|err| FsError::from_io(err, path))?;
            Ok(Box::new(DiskFileHandle {
                file,
                path: path.to_path_buf(),
            }))
        }
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>, FsError> {
        read_listing(&self.full_path(path), path)
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

/// Reads the direct children of `full`, sorted ascending by name. Error
/// messages show `shown`, the caller's root-relative path.
fn read_listing(full: &Path, shown: &Path) -> Result<Vec<DirEntry>, FsError> {
    let metadata = fs::metadata(full).map_err(|err| FsError::from_io(err, shown))?;
    ensure!(
        metadata.is_dir(),
        NotADirectorySnafu {
            path: shown.display().to_string(),
        }
    );

    let mut entries = Vec::new();
    for entry in fs::read_dir(full).map_err(|err| FsError::from_io(err, shown))? {
        let entry = entry.map_err(|err| FsError::from_io(err, shown))?;
        let is_dir = entry
            .file_type()
            .map_err(|err| FsError::from_io(err, shown))?
            .is_dir();
        entries.push(DirEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
        });
    }
    entries.sort_unstable_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

struct DiskWriteHandle {
    file: File,
    path: PathBuf,
}

impl WriteHandle for DiskWriteHandle {
    fn write(&mut self, buf: &[u8]) -> Result<usize, FsError> {
        // A plain write may stop short without an error; the contract is
        // all-or-error, so drive the whole buffer through.
        std::io::Write::write_all(&mut self.file, buf)
            .map_err(|err| FsError::from_io(err, &self.path))?;
        Ok(buf.len())
    }

    fn close(self: Box<Self>) -> Result<(), FsError> {
        self.file
            .sync_all()
            .map_err(|err| FsError::from_io(err, &self.path))
    }
}

struct DiskFileHandle {
    file: File,
    path: PathBuf,
}

impl Handle for DiskFileHandle {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError> {
        self.file
            .read(buf)
            .map_err(|err| FsError::from_io(err, &self.path))
    }

    fn read_dir(&mut self, _n: isize) -> Result<Vec<DirEntry>, FsError> {
        NotADirectorySnafu {
            path: self.path.display().to_string(),
        }
        .fail()
    }
}

/// Directory handle that snapshots the sorted native listing on the first
/// page and paginates from the snapshot, matching the in-memory backend's
/// contract exactly.
struct DiskDirHandle {
    full: PathBuf,
    path: PathBuf,
    cursor: Option<ListingCursor>,
}

impl Handle for DiskDirHandle {
    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, FsError> {
        NotAFileSnafu {
            path: self.path.display().to_string(),
        }
        .fail()
    }

    fn read_dir(&mut self, n: isize) -> Result<Vec<DirEntry>, FsError> {
        let mut cursor = match self.cursor.take() {
            Some(cursor) => cursor,
            None => ListingCursor::new(read_listing(&self.full, &self.path)?),
        };
        let page = cursor.next_page(n);
        self.cursor = Some(cursor);
        page
    }
}
