//! The operation set every backend satisfies, together with the shared
//! error taxonomy and the detached directory-entry snapshot type.

mod dir_entry;
pub(crate) mod error;
mod listing;
mod traits;

pub use dir_entry::DirEntry;
pub use error::FsError;
pub(crate) use listing::ListingCursor;
pub use traits::{FileSystem, Handle, WriteHandle};
