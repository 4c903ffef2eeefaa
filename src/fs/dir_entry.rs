use derive_more::Display;

/// A detached snapshot describing one direct child of a directory.
///
/// The name is only the final path segment, never the full path. Entries are
/// independent of the live tree: mutating the backend after a listing was
/// produced does not change entries already handed out.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{}({name})", if *is_dir { "dir" } else { "file" })]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn file(name: impl Into<String>) -> Self {
        DirEntry {
            name: name.into(),
            is_dir: false,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        DirEntry {
            name: name.into(),
            is_dir: true,
        }
    }
}
