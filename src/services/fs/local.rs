use super::backend::{FsBackend, FsEntry, FsEntryType};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Local filesystem backend over `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFsBackend;

impl LocalFsBackend {
    pub fn new() -> Self {
        Self
    }
}

impl FsBackend for LocalFsBackend {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>> {
        let mut entries = Vec::new();

        for dir_entry in fs::read_dir(path)? {
            // An entry can vanish between the listing and its stat
            let Some(dir_entry) = skip_vanished(dir_entry, path) else {
                continue;
            };
            // The entry type comes from the directory listing itself, so a
            // symlink to a directory stays a (non-expandable) symlink.
            let Some(file_type) = skip_vanished(dir_entry.file_type(), path) else {
                continue;
            };
            let entry_type = if file_type.is_dir() {
                FsEntryType::Directory
            } else if file_type.is_symlink() {
                FsEntryType::Symlink
            } else {
                FsEntryType::File
            };

            entries.push(FsEntry::new(
                dir_entry.path(),
                dir_entry.file_name().to_string_lossy().into_owned(),
                entry_type,
            ));
        }

        Ok(entries)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

fn skip_vanished<T>(result: io::Result<T>, dir: &Path) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("Skipping unreadable entry in {:?}: {}", dir, e);
            None
        }
    }
}
