// Common test utilities

#[allow(dead_code)]
pub mod fixtures;
#[allow(dead_code)]
pub mod mem_fs;
#[allow(dead_code)]
pub mod tracing;
