use snafu::Snafu;

/// Error taxonomy shared by every backend.
///
/// `Exhausted` is not a failure: it is the normal end-of-sequence marker for
/// paginated directory reads and must be matched by the caller, never retried
/// or surfaced to a user as an error.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FsError {
    #[snafu(display("no entry at '{}'", path))]
    NotFound { path: String },

    #[snafu(display("'{}' is not a directory", path))]
    NotADirectory { path: String },

    #[snafu(display("'{}' is not a file", path))]
    NotAFile { path: String },

    #[snafu(display("directory listing exhausted"))]
    Exhausted,

    #[snafu(display("i/o error at '{}'", path))]
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl FsError {
    /// Translates a native filesystem error for `path`, mapping the "path
    /// does not exist" condition into `NotFound` and passing everything else
    /// through unchanged.
    pub(crate) fn from_io(err: std::io::Error, path: &std::path::Path) -> Self {
        let path = path.display().to_string();
        if err.kind() == std::io::ErrorKind::NotFound {
            FsError::NotFound { path }
        } else {
            FsError::Io { path, source: err }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn native_not_found_translates_to_not_found() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let translated = FsError::from_io(err, Path::new("some/file"));
        assert!(matches!(translated, FsError::NotFound { .. }));
    }

    #[test]
    fn other_native_errors_pass_through_as_io() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let translated = FsError::from_io(err, Path::new("some/file"));
        assert!(matches!(translated, FsError::Io { .. }));
    }

    #[test]
    fn display_includes_the_offending_path() {
        let err = FsError::NotFound {
            path: "dir/missing".to_string(),
        };
        assert!(err.to_string().contains("dir/missing"));
    }
}
