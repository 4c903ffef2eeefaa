use std::path::Path;

use crate::conformance::{Runner, ScenarioFailure};
use crate::fs::{DirEntry, FileSystem, FsError};

/// Runs the fixed conformance battery against `fs` and returns every
/// recorded failure; an empty vector means the backend conforms.
///
/// Scenarios build on each other (the overwrite scenario targets the file
/// the create scenario made), so they run in a fixed order against a backend
/// that starts out empty.
pub fn run_battery(fs: &dyn FileSystem) -> Vec<ScenarioFailure> {
    let mut runner = Runner::new();

    runner.scenario("open missing file", || match fs.open(Path::new("file.txt")) {
        Err(FsError::NotFound { .. }) => Ok(()),
        Err(other) => Err(format!("wrong error returned: {other}")),
        Ok(_) => Err("a handle was returned for a missing path".to_string()),
    });

    runner.scenario("create and read back", || {
        write_file(fs, "file1", &[11, 12, 13])?;
        assert_contents(fs, "file1", &[11, 12, 13])
    });

    runner.scenario("overwrite replaces content", || {
        write_file(fs, "file1", &[12, 13, 14])?;
        assert_contents(fs, "file1", &[12, 13, 14])
    });

    runner.scenario("files are independent", || {
        write_file(fs, "file2", &[21, 22, 23])?;
        assert_contents(fs, "file1", &[12, 13, 14])?;
        assert_contents(fs, "file2", &[21, 22, 23])
    });

    runner.scenario("append to existing file", || {
        append_file(fs, "file1", &[15, 16])?;
        assert_contents(fs, "file1", &[12, 13, 14, 15, 16])
    });

    runner.scenario("append to missing file", || {
        append_file(fs, "file3", &[31, 32, 33])?;
        assert_contents(fs, "file3", &[31, 32, 33])
    });

    runner.scenario("empty file", || {
        write_file(fs, "empty", &[])?;
        assert_contents(fs, "empty", &[])
    });

    runner.scenario("directory fixture", || {
        for name in [
            "dir1/file1A",
            "dir1/file1B",
            "dir2/file2A",
            "dir2/file2B",
            // A subdirectory inside dir2 checks that listings do not
            // recurse.
            "dir2/dir3/file3A",
            "dir2/dir3/file3B",
            // A directory holding only a nested subdirectory checks that
            // listing a directory with no direct files is not NotFound.
            "dir4/dir5/file",
        ] {
            write_file(fs, name, &[])?;
        }
        Ok(())
    });

    runner.scenario("paginated listing", || {
        for n in [-1isize, 1, 2, 3, 4, 5] {
            for (dir, want) in expected_listings() {
                let mut handle = fs
                    .open(Path::new(dir))
                    .map_err(|err| format!("open({dir}): {err}"))?;
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
                        Err(other) => {
                            return Err(format!("read_dir({n}) on '{dir}': {other}"));
                        }
                    }
                }
                if got != want {
                    return Err(format!(
                        "read_dir({n}) on '{dir}' returned {got:?}, want {want:?}"
                    ));
                }
            }
        }
        Ok(())
    });

    runner.scenario("read_dir", || {
        for (dir, want) in expected_listings() {
            let got = fs
                .read_dir(Path::new(dir))
                .map_err(|err| format!("read_dir({dir}): {err}"))?;
            if got != want {
                return Err(format!("read_dir({dir}) returned {got:?}, want {want:?}"));
            }
        }
        Ok(())
    });

    runner.scenario("read_dir on a file", || {
        match fs.read_dir(Path::new("file1")) {
            Err(FsError::NotADirectory { .. }) => Ok(()),
            Err(other) => Err(format!("wrong error returned: {other}")),
            Ok(_) => Err("listing a file did not fail".to_string()),
        }
    });

    runner.scenario("paginated listing on a file handle", || {
        let mut handle = fs
            .open(Path::new("file1"))
            .map_err(|err| format!("open(file1): {err}"))?;
        match handle.read_dir(-1) {
            Err(FsError::NotADirectory { .. }) => Ok(()),
            Err(other) => Err(format!("wrong error returned: {other}")),
            Ok(_) => Err("listing through a file handle did not fail".to_string()),
        }
    });

    runner.scenario("read_dir on missing directory", || {
        match fs.read_dir(Path::new("non-existent-dir")) {
            Err(FsError::NotFound { .. }) => Ok(()),
            Err(other) => Err(format!("wrong error returned: {other}")),
            Ok(_) => Err("listing a missing directory did not fail".to_string()),
        }
    });

    runner.scenario("list_files excludes subdirectories", || {
        let got = fs
            .list_files(Path::new("dir2"))
            .map_err(|err| format!("list_files(dir2): {err}"))?;
        if got != ["file2A", "file2B"] {
            return Err(format!("list_files(dir2) returned {got:?}"));
        }
        // No direct files at all is an empty success, never NotFound.
        let got = fs
            .list_files(Path::new("dir4"))
            .map_err(|err| format!("list_files(dir4): {err}"))?;
        if !got.is_empty() {
            return Err(format!("list_files(dir4) returned {got:?}, want []"));
        }
        Ok(())
    });

    runner.into_failures()
}

fn expected_listings() -> Vec<(&'static str, Vec<DirEntry>)> {
    vec![
        (
            "dir1",
            vec![DirEntry::file("file1A"), DirEntry::file("file1B")],
        ),
        (
            "dir2",
            vec![
                DirEntry::dir("dir3"),
                DirEntry::file("file2A"),
                DirEntry::file("file2B"),
            ],
        ),
        (
            "dir2/dir3",
            vec![DirEntry::file("file3A"), DirEntry::file("file3B")],
        ),
        ("dir4", vec![DirEntry::dir("dir5")]),
    ]
}

fn write_file(fs: &dyn FileSystem, name: &str, contents: &[u8]) -> Result<(), String> {
    let mut handle = fs
        .create(Path::new(name))
        .map_err(|err| format!("create({name}): {err}"))?;
    if !contents.is_empty() {
        handle
            .write(contents)
            .map_err(|err| format!("write({name}): {err}"))?;
    }
    handle.close().map_err(|err| format!("close({name}): {err}"))
}

fn append_file(fs: &dyn FileSystem, name: &str, contents: &[u8]) -> Result<(), String> {
    let mut handle = fs
        .append(Path::new(name))
        .map_err(|err| format!("append({name}): {err}"))?;
    handle
        .write(contents)
        .map_err(|err| format!("write({name}): {err}"))?;
    handle.close().map_err(|err| format!("close({name}): {err}"))
}

fn assert_contents(fs: &dyn FileSystem, name: &str, want: &[u8]) -> Result<(), String> {
    let mut handle = fs
        .open(Path::new(name))
        .map_err(|err| format!("open({name}): {err}"))?;
    let got = handle
        .read_to_end()
        .map_err(|err| format!("read({name}): {err}"))?;
    if got != want {
        return Err(format!("'{name}': wrong contents {got:?}, want {want:?}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::DiskFs;
    use crate::memory::MemFs;
    use tempfile::TempDir;

    #[test]
    fn the_memory_backend_passes_the_battery() {
        let failures = run_battery(&MemFs::new());
        assert_eq!(failures, vec![]);
    }

    #[test]
    fn the_disk_backend_passes_the_battery() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let failures = run_battery(&DiskFs::new(dir.path()));
        assert_eq!(failures, vec![]);
    }
}
