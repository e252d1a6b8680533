pub mod config_service;
pub mod identity_service;
pub mod paths;
pub mod storage;
pub mod store_persona_repository;

pub use config_service::ConfigService;
pub use identity_service::StoredIdentityService;
pub use paths::StudioPaths;
pub use storage::{FileKeyValueStore, MemoryKeyValueStore};
pub use store_persona_repository::StorePersonaRepository;
