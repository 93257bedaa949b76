// In-memory filesystem backend

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use treepick::services::fs::{FsBackend, FsEntry, FsEntryType};

/// Backend over a path map; `None` marks a directory
///
/// Listings come back in path order, which keeps generated trees
/// deterministic.
#[derive(Debug, Default)]
pub struct MemFsBackend {
    entries: Mutex<BTreeMap<PathBuf, Option<Vec<u8>>>>,
}

impl MemFsBackend {
    pub fn new(root: &Path) -> Self {
        let backend = Self::default();
        backend.add_dir(root);
        backend
    }

    pub fn add_dir(&self, path: &Path) {
        self.entries.lock().unwrap().insert(path.to_path_buf(), None);
    }

    pub fn add_file(&self, path: &Path, content: &[u8]) {
        self.entries
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), Some(content.to_vec()));
    }

    /// Remove a path and everything below it
    pub fn remove(&self, path: &Path) {
        self.entries
            .lock()
            .unwrap()
            .retain(|p, _| !p.starts_with(path));
    }
}

impl FsBackend for MemFsBackend {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>> {
        let entries = self.entries.lock().unwrap();
        match entries.get(path) {
            Some(None) => {}
            Some(Some(_)) => {
                return Err(io::Error::new(io::ErrorKind::InvalidInput, "not a directory"))
            }
            None => return Err(io::Error::new(io::ErrorKind::NotFound, "no such directory")),
        }

        Ok(entries
            .iter()
            .filter(|(p, _)| p.parent() == Some(path))
            .map(|(p, content)| {
                let entry_type = if content.is_none() {
                    FsEntryType::Directory
                } else {
                    FsEntryType::File
                };
                FsEntry::from_path(p.clone(), entry_type)
            })
            .collect())
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        if self.entries.lock().unwrap().contains_key(path) {
            Ok(path.to_path_buf())
        } else {
            Err(io::Error::new(io::ErrorKind::NotFound, "no such path"))
        }
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        match self.entries.lock().unwrap().get(path) {
            Some(Some(content)) => Ok(content.clone()),
            Some(None) => Err(io::Error::new(io::ErrorKind::InvalidInput, "is a directory")),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "no such file")),
        }
    }
}
