use std::io;
use std::path::{Path, PathBuf};

/// Represents a file or directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    pub path: PathBuf,
    pub name: String,
    pub entry_type: FsEntryType,
}

impl FsEntry {
    pub fn new(path: PathBuf, name: String, entry_type: FsEntryType) -> Self {
        Self {
            path,
            name,
            entry_type,
        }
    }

    /// Build an entry for a path, naming it after its final component.
    ///
    /// Paths without a final component (such as `/`) are named after the
    /// whole path.
    pub fn from_path(path: PathBuf, entry_type: FsEntryType) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self::new(path, name, entry_type)
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == FsEntryType::Directory
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == FsEntryType::File
    }

    pub fn is_symlink(&self) -> bool {
        self.entry_type == FsEntryType::Symlink
    }
}

/// Type of filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsEntryType {
    File,
    Directory,
    Symlink,
}

/// Filesystem backend trait
///
/// Every call is synchronous: the tree is only ever touched from the
/// interactive loop, and directory listings are cheap enough to read inline.
pub trait FsBackend: Send + Sync {
    /// List entries in a directory (non-recursive), in the order the
    /// filesystem returns them.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read (permission denied,
    /// doesn't exist, not a directory, etc.)
    fn read_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>>;

    /// Get canonical (absolute, normalized) path
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Read the full contents of a file
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;
}
