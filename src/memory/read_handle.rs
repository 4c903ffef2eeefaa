use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use snafu::prelude::*;

use crate::fs::error::{NotADirectorySnafu, NotAFileSnafu, NotFoundSnafu};
use crate::fs::{DirEntry, FsError, Handle, ListingCursor};
use crate::memory::read_lock;
use crate::memory::tree::Tree;

/// Sequential reader over a content snapshot taken at open time.
///
/// Mutations committed to the underlying node afterwards are invisible here.
pub(crate) struct MemFileHandle {
    path: String,
    content: Vec<u8>,
    pos: usize,
}

impl MemFileHandle {
    pub(crate) fn new(path: String, content: Vec<u8>) -> Self {
        MemFileHandle {
            path,
            content,
            pos: 0,
        }
    }
}

impl Handle for MemFileHandle {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError> {
        let n = buf.len().min(self.content.len() - self.pos);
        buf[..n].copy_from_slice(&self.content[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn read_dir(&mut self, _n: isize) -> Result<Vec<DirEntry>, FsError> {
        NotADirectorySnafu { path: &self.path }.fail()
    }
}

/// Paginated listing over a directory.
///
/// Existence is checked at open; the entry snapshot is taken lazily on the
/// first `read_dir` call and cached for the handle's lifetime, so later
/// mutations never shift an in-progress pagination.
pub(crate) struct MemDirHandle {
    tree: Arc<RwLock<Tree>>,
    path: PathBuf,
    cursor: Option<ListingCursor>,
}

impl MemDirHandle {
    pub(crate) fn new(tree: Arc<RwLock<Tree>>, path: PathBuf) -> Self {
        MemDirHandle {
            tree,
            path,
            cursor: None,
        }
    }

    fn snapshot(&self) -> Result<Vec<DirEntry>, FsError> {
        let shown = self.path.display().to_string();
        let tree = read_lock(&self.tree);
        let id = tree
            .resolve(&self.path)
            .context(NotFoundSnafu { path: &shown })?;
        tree.entries(id).context(NotADirectorySnafu { path: shown })
    }
}

impl Handle for MemDirHandle {
    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, FsError> {
        NotAFileSnafu {
            path: self.path.display().to_string(),
        }
        .fail()
    }

    fn read_dir(&mut self, n: isize) -> Result<Vec<DirEntry>, FsError> {
        let mut cursor = match self.cursor.take() {
            Some(cursor) => cursor,
            None => ListingCursor::new(self.snapshot()?),
        };
        let page = cursor.next_page(n);
        self.cursor = Some(cursor);
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::write_lock;
    use rstest::*;
    use std::path::Path;

    fn tree_with(paths: &[&str]) -> Arc<RwLock<Tree>> {
        let tree = Arc::new(RwLock::new(Tree::new()));
        {
            let mut guard = write_lock(&tree);
            for path in paths {
                guard.get_or_create_file(Path::new(path)).unwrap();
            }
        }
        tree
    }

    #[test]
    fn file_handle_reads_its_snapshot_sequentially() {
        let mut handle = MemFileHandle::new("file".into(), vec![1, 2, 3, 4, 5]);
        let mut buf = [0u8; 2];

        assert_eq!(handle.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, [1, 2]);
        assert_eq!(handle.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, [3, 4]);
        assert_eq!(handle.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 5);
        assert_eq!(handle.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn file_handle_rejects_directory_listing() {
        let mut handle = MemFileHandle::new("file".into(), vec![1]);
        assert!(matches!(
            handle.read_dir(-1),
            Err(FsError::NotADirectory { .. })
        ));
    }

    #[test]
    fn dir_handle_rejects_content_reads() {
        let tree = tree_with(&["dir/file"]);
        let mut handle = MemDirHandle::new(tree, PathBuf::from("dir"));
        let mut buf = [0u8; 4];
        assert!(matches!(
            handle.read(&mut buf),
            Err(FsError::NotAFile { .. })
        ));
    }

    #[rstest]
    #[case(-1)]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(5)]
    fn pagination_concatenates_to_the_sorted_listing(#[case] n: isize) {
        let tree = tree_with(&["dir/b", "dir/a", "dir/sub/nested"]);
        let mut handle = MemDirHandle::new(tree, PathBuf::from("dir"));

        let mut got = Vec::new();
        loop {
            match handle.read_dir(n) {
                Ok(page) => {
                    got.extend(page);
                    if n < 0 {
                        break;
                    }
                }
                Err(FsError::Exhausted) => break,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(
            got,
            vec![
                DirEntry::file("a"),
                DirEntry::file("b"),
                DirEntry::dir("sub"),
            ]
        );
    }

    #[test]
    fn snapshot_is_taken_on_first_page_and_then_frozen() {
        let tree = tree_with(&["dir/a"]);
        let mut handle = MemDirHandle::new(Arc::clone(&tree), PathBuf::from("dir"));

        assert_eq!(handle.read_dir(1).unwrap(), vec![DirEntry::file("a")]);

        // A file committed mid-pagination must not appear in this handle.
        write_lock(&tree)
            .get_or_create_file(Path::new("dir/z"))
            .unwrap();

        assert!(matches!(handle.read_dir(1), Err(FsError::Exhausted)));

        // A fresh handle sees the new child.
        let mut fresh = MemDirHandle::new(tree, PathBuf::from("dir"));
        assert_eq!(
            fresh.read_dir(-1).unwrap(),
            vec![DirEntry::file("a"), DirEntry::file("z")]
        );
    }

    #[test]
    fn two_handles_over_one_directory_have_independent_cursors() {
        let tree = tree_with(&["dir/a", "dir/b"]);
        let mut first = MemDirHandle::new(Arc::clone(&tree), PathBuf::from("dir"));
        let mut second = MemDirHandle::new(tree, PathBuf::from("dir"));

        assert_eq!(first.read_dir(1).unwrap(), vec![DirEntry::file("a")]);
        assert_eq!(second.read_dir(1).unwrap(), vec![DirEntry::file("a")]);
        assert_eq!(first.read_dir(1).unwrap(), vec![DirEntry::file("b")]);
        assert_eq!(second.read_dir(1).unwrap(), vec![DirEntry::file("b")]);
    }

    #[test]
    fn later_reads_reuse_the_read_lock_free_snapshot() {
        let tree = tree_with(&["dir/a"]);
        let mut handle = MemDirHandle::new(Arc::clone(&tree), PathBuf::from("dir"));
        assert_eq!(handle.read_dir(-1).unwrap().len(), 1);

        // Holding the write lock does not block a handle that already
        // snapshotted.
        let _guard = write_lock(&tree);
        assert_eq!(handle.read_dir(-1).unwrap(), vec![]);
    }
}
