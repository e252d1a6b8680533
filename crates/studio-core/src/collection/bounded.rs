//! Capped, append-front collections persisted as one snapshot per key.

use chrono::Utc;
use uuid::Uuid;

use super::model::{CollectionEntity, CollectionKind};
use crate::error::Result;
use crate::storage::{NamespacedStore, WriteStatus};

/// An ordered collection, newest first, never longer than its capacity.
///
/// The in-memory list is authoritative for the session. Every mutation writes
/// the whole list back through the namespaced store; if that write is dropped
/// for lack of space the in-memory list keeps the change.
pub struct BoundedCollection<T: CollectionEntity> {
    kind: CollectionKind,
    capacity: usize,
    items: Vec<T>,
    store: NamespacedStore,
}

impl<T: CollectionEntity> BoundedCollection<T> {
    /// Loads the collection for `kind` from `store`.
    ///
    /// A missing key is an empty collection. Unreadable data is logged and
    /// treated as empty; it is replaced on the next write. Snapshots longer than
    /// `capacity` (e.g. after lowering the cap) are trimmed in memory.
    pub fn load(store: NamespacedStore, kind: CollectionKind, capacity: usize) -> Self {
        let mut items = match store.read_json::<Vec<T>>(kind.storage_key()) {
            Ok(Some(items)) => items,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(collection = %kind, error = %e, "Discarding unreadable collection");
                Vec::new()
            }
        };
        items.truncate(capacity);

        Self {
            kind,
            capacity,
            items,
            store,
        }
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All entities, newest first.
    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Assigns a fresh id, prepends the entity and evicts the oldest entries
    /// beyond capacity. Evicted entries are gone for good.
    pub fn add(&mut self, draft: T::Draft) -> Result<T> {
        let entity = T::from_draft(Uuid::new_v4().to_string(), draft, Utc::now());
        self.items.insert(0, entity.clone());

        if self.items.len() > self.capacity {
            let evicted = self.items.len() - self.capacity;
            self.items.truncate(self.capacity);
            tracing::debug!(collection = %self.kind, evicted, "Evicted oldest entries");
        }

        self.persist()?;
        tracing::info!(collection = %self.kind, id = entity.id(), "Added entry");
        Ok(entity)
    }

    /// Removes the entity with `id`, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Result<Option<T>> {
        let Some(index) = self.items.iter().position(|item| item.id() == id) else {
            return Ok(None);
        };
        let removed = self.items.remove(index);
        self.persist()?;
        tracing::info!(collection = %self.kind, id, "Removed entry");
        Ok(Some(removed))
    }

    fn persist(&self) -> Result<WriteStatus> {
        self.store.write_json(self.kind.storage_key(), &self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::model::{LibraryItem, MediaRef, NewLibraryItem, SellingPoint};
    use crate::storage::{MemoryKeyValueStore, NoticeBoard};
    use crate::user::NamespaceToken;
    use std::sync::Arc;

    fn guest_store(backend: Arc<MemoryKeyValueStore>) -> NamespacedStore {
        NamespacedStore::new(backend, NamespaceToken::guest(), NoticeBoard::new())
    }

    #[test]
    fn test_add_prepends_and_assigns_unique_ids() {
        let store = guest_store(Arc::new(MemoryKeyValueStore::new()));
        let mut points: BoundedCollection<SellingPoint> =
            BoundedCollection::load(store, CollectionKind::SellingPoints, 50);

        let first = points.add("Aged five years".to_string()).unwrap();
        let second = points.add("Hand brewed".to_string()).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(points.list()[0], second);
        assert_eq!(points.list()[1], first);
    }

    #[test]
    fn test_library_keeps_thirty_most_recent() {
        let store = guest_store(Arc::new(MemoryKeyValueStore::new()));
        let mut library: BoundedCollection<LibraryItem> =
            BoundedCollection::load(store.clone(), CollectionKind::Library, 30);

        let mut added = Vec::new();
        for i in 0..31 {
            added.push(library.add(NewLibraryItem::manual(format!("item {i}"), None)).unwrap());
        }

        assert_eq!(library.len(), 30);
        assert!(!library.contains(&added[0].id));
        assert_eq!(library.list()[0].id, added[30].id);

        let reloaded: BoundedCollection<LibraryItem> =
            BoundedCollection::load(store, CollectionKind::Library, 30);
        assert_eq!(reloaded.list(), library.list());
    }

    #[test]
    fn test_length_is_min_of_inserts_and_capacity() {
        for (inserts, capacity) in [(0usize, 8usize), (3, 8), (8, 8), (20, 8), (5, 1)] {
            let store = guest_store(Arc::new(MemoryKeyValueStore::new()));
            let mut refs: BoundedCollection<MediaRef> =
                BoundedCollection::load(store, CollectionKind::StyleReferences, capacity);
            let ids: Vec<String> = (0..inserts)
                .map(|i| refs.add(format!("data:image/png;base64,{i}")).unwrap().id)
                .collect();

            assert_eq!(refs.len(), inserts.min(capacity));
            let expected: Vec<&String> = ids.iter().rev().take(capacity).collect();
            let actual: Vec<&String> = refs.list().iter().map(|r| &r.id).collect();
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn test_remove_filters_and_persists() {
        let store = guest_store(Arc::new(MemoryKeyValueStore::new()));
        let mut photos: BoundedCollection<MediaRef> =
            BoundedCollection::load(store.clone(), CollectionKind::ProductPhotos, 12);
        let photo = photos.add("data:image/png;base64,AA".to_string()).unwrap();

        assert_eq!(photos.remove(&photo.id).unwrap(), Some(photo.clone()));
        assert_eq!(photos.remove(&photo.id).unwrap(), None);

        let reloaded: BoundedCollection<MediaRef> =
            BoundedCollection::load(store, CollectionKind::ProductPhotos, 12);
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_dropped_write_keeps_memory_state() {
        let store = guest_store(Arc::new(MemoryKeyValueStore::with_quota(16)));
        let notices = store.notices().clone();
        let mut photos: BoundedCollection<MediaRef> =
            BoundedCollection::load(store.clone(), CollectionKind::ProductPhotos, 12);

        let photo = photos
            .add("data:image/png;base64,a-large-payload".to_string())
            .unwrap();

        assert!(photos.contains(&photo.id));
        assert_eq!(notices.len(), 1);
        let reloaded: BoundedCollection<MediaRef> =
            BoundedCollection::load(store, CollectionKind::ProductPhotos, 12);
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_corrupt_snapshot_loads_empty() {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let store = guest_store(backend);
        store.write("usp", "not json").unwrap();

        let points: BoundedCollection<SellingPoint> =
            BoundedCollection::load(store, CollectionKind::SellingPoints, 50);
        assert!(points.is_empty());
    }
}
