//! Storage module for file management
//!
//! Provides the local-disk store backing uploads and downloads:
//! per-user directories under the upload root, exclusive-create streaming
//! writes, and tolerant deletes.

mod local_store;

pub use local_store::DiskStore;
