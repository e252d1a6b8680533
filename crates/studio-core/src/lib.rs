pub mod category;
pub mod collection;
pub mod concept;
pub mod config;
pub mod error;
pub mod generation;
pub mod persona;
pub mod selection;
pub mod storage;
pub mod user;
pub mod workflow;

// Re-export common error type
pub use error::{Result, StudioError};
