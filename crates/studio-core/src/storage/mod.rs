//! Storage domain module.
//!
//! # Module Structure
//!
//! - `key_value`: Raw key/value store trait
//! - `memory`: In-process store with an optional byte quota
//! - `namespaced`: Identity-scoped store with quota recovery
//! - `notice`: User-facing notices for recoverable failures

mod key_value;
mod memory;
mod namespaced;
mod notice;

// Re-export public API
pub use key_value::KeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use namespaced::{KEY_PREFIX, NamespacedStore, WriteStatus};
pub use notice::{NoticeBoard, StudioNotice};
