use crate::fs::error::ExhaustedSnafu;
use crate::fs::{DirEntry, FsError};
use snafu::prelude::*;

/// Cursor over a directory-entry snapshot, shared by every directory handle.
///
/// The snapshot is immutable for the cursor's lifetime; two cursors over the
/// same directory never interfere with each other.
#[derive(Debug)]
pub(crate) struct ListingCursor {
    entries: Vec<DirEntry>,
    pos: usize,
}

impl ListingCursor {
    pub(crate) fn new(entries: Vec<DirEntry>) -> Self {
        ListingCursor { entries, pos: 0 }
    }

    /// Returns the next page of at most `n` entries.
    ///
    /// A negative `n` drains the remainder in one call and always succeeds,
    /// even when the remainder is empty. A non-negative `n` advances the
    /// cursor by the count actually returned and signals `Exhausted` once
    /// nothing remains.
    pub(crate) fn next_page(&mut self, n: isize) -> Result<Vec<DirEntry>, FsError> {
        let remaining = self.entries.len() - self.pos;

        if n < 0 {
            let page = self.entries[self.pos..].to_vec();
            self.pos = self.entries.len();
            return Ok(page);
        }

        ensure!(remaining > 0, ExhaustedSnafu);

        let take = remaining.min(n as usize);
        let page = self.entries[self.pos..self.pos + take].to_vec();
        self.pos += take;
        Ok(page)
    }
}
