// Filesystem abstraction layer
//
// The file tree and the prompt serializer read the disk only through
// `FsBackend`, so tests can swap in failing or instrumented backends.

pub mod backend;
pub mod local;

pub use backend::{FsBackend, FsEntry, FsEntryType};
pub use local::LocalFsBackend;
