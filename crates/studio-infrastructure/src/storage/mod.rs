//! Storage backends.
//!
//! - `atomic_file`: tmp-file + rename writes and typed TOML documents
//! - `file_store`: one-file-per-key `KeyValueStore` with an optional quota

pub mod atomic_file;
pub mod file_store;

pub use atomic_file::{AtomicTomlFile, write_atomic};
pub use file_store::FileKeyValueStore;
pub use studio_core::storage::MemoryKeyValueStore;
