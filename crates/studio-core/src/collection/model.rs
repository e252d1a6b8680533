//! Curated asset models stored in bounded collections.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// The four persisted, selectable collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CollectionKind {
    /// Accepted drafts and manual uploads, used as generation context
    Library,
    /// Reusable selling points
    SellingPoints,
    /// Product photos attached to generations
    ProductPhotos,
    /// Style reference images for the visual
    StyleReferences,
}

impl CollectionKind {
    /// Key of the collection inside a namespace.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Library => "library",
            Self::SellingPoints => "usp",
            Self::ProductPhotos => "products",
            Self::StyleReferences => "style_refs",
        }
    }
}

/// An entity that can live in a bounded collection.
pub trait CollectionEntity: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The entity before an id has been assigned
    type Draft;

    fn id(&self) -> &str;

    /// Builds the stored entity from a draft and a fresh id.
    fn from_draft(id: String, draft: Self::Draft, now: DateTime<Utc>) -> Self;
}

/// A reusable selling point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellingPoint {
    pub id: String,
    pub text: String,
}

impl CollectionEntity for SellingPoint {
    type Draft = String;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, text: String, _now: DateTime<Utc>) -> Self {
        Self { id, text }
    }
}

/// An uploaded image (product photo or style reference).
///
/// `url` is an inline `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub id: String,
    pub url: String,
}

impl CollectionEntity for MediaRef {
    type Draft = String;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, url: String, _now: DateTime<Utc>) -> Self {
        Self { id, url }
    }
}

/// How a library item came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryOrigin {
    /// Uploaded by the user as brand material
    Manual,
    /// Accepted output of a generation
    Generated,
}

/// A library entry before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLibraryItem {
    pub origin: LibraryOrigin,
    pub copy_text: String,
    pub image_url: Option<String>,
    pub interaction_script: Option<String>,
    pub category_label: Option<String>,
}

impl NewLibraryItem {
    /// A manual upload; blank copy falls back to a generic label.
    pub fn manual(copy_text: impl Into<String>, image_url: Option<String>) -> Self {
        let copy_text = copy_text.into();
        let copy_text = if copy_text.trim().is_empty() {
            "Brand material".to_string()
        } else {
            copy_text
        };
        Self {
            origin: LibraryOrigin::Manual,
            copy_text,
            image_url,
            interaction_script: None,
            category_label: Some("Manual upload".to_string()),
        }
    }
}

/// An accepted draft or uploaded material kept for future context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryItem {
    pub id: String,
    pub origin: LibraryOrigin,
    pub copy_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_label: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CollectionEntity for LibraryItem {
    type Draft = NewLibraryItem;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewLibraryItem, now: DateTime<Utc>) -> Self {
        Self {
            id,
            origin: draft.origin,
            copy_text: draft.copy_text,
            image_url: draft.image_url,
            interaction_script: draft.interaction_script,
            category_label: draft.category_label,
            created_at: now,
        }
    }
}
