//! Curated asset collections.
//!
//! # Module Structure
//!
//! - `model`: Library items, selling points, media references
//! - `bounded`: The capped append-front collection shared by all four kinds

mod bounded;
mod model;

// Re-export public API
pub use bounded::BoundedCollection;
pub use model::{
    CollectionEntity, CollectionKind, LibraryItem, LibraryOrigin, MediaRef, NewLibraryItem,
    SellingPoint,
};
