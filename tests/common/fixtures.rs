// Directory tree fixtures

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory populated for one test
pub struct TreeFixture {
    _temp_dir: TempDir,
    /// Canonical root, matching what the file tree reports
    pub root: PathBuf,
}

impl TreeFixture {
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let root = temp_dir.path().canonicalize()?;
        Ok(Self {
            _temp_dir: temp_dir,
            root,
        })
    }

    /// Create a directory (and its parents) below the root
    pub fn dir(self, rel: &str) -> anyhow::Result<Self> {
        fs::create_dir_all(self.root.join(rel))?;
        Ok(self)
    }

    /// Create a file below the root, creating parent directories as needed
    pub fn file(self, rel: &str, content: &str) -> anyhow::Result<Self> {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(self)
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
