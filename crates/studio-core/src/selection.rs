//! Selection sets over the curated collections.
//!
//! Each selectable collection has one set of chosen ids. Deleting an entity
//! must prune its id in the same step (see [`SelectionSets::prune`]); a set
//! that still references a missing id is a defect and is reported as
//! [`StudioError::DanglingSelection`] when resolved.

use std::collections::{BTreeSet, HashMap};

use crate::collection::{BoundedCollection, CollectionEntity, CollectionKind};
use crate::error::{Result, StudioError};

/// How many entries of a collection can be chosen at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Multiple,
    /// Choosing an entry replaces the previous choice
    Single,
}

impl SelectionMode {
    pub fn for_kind(kind: CollectionKind) -> Self {
        match kind {
            CollectionKind::StyleReferences => Self::Single,
            CollectionKind::Library
            | CollectionKind::SellingPoints
            | CollectionKind::ProductPhotos => Self::Multiple,
        }
    }
}

/// The "currently chosen" ids, one set per collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSets {
    sets: HashMap<CollectionKind, BTreeSet<String>>,
}

impl SelectionSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `id`; returns whether it is selected afterwards.
    pub fn toggle(&mut self, kind: CollectionKind, id: &str) -> bool {
        let set = self.sets.entry(kind).or_default();
        if set.remove(id) {
            return false;
        }
        if SelectionMode::for_kind(kind) == SelectionMode::Single {
            set.clear();
        }
        set.insert(id.to_string());
        true
    }

    pub fn is_selected(&self, kind: CollectionKind, id: &str) -> bool {
        self.sets.get(&kind).is_some_and(|set| set.contains(id))
    }

    /// Selected ids of `kind`, sorted.
    pub fn selected_ids(&self, kind: CollectionKind) -> Vec<String> {
        self.sets
            .get(&kind)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn count(&self, kind: CollectionKind) -> usize {
        self.sets.get(&kind).map_or(0, BTreeSet::len)
    }

    pub fn clear(&mut self, kind: CollectionKind) {
        self.sets.remove(&kind);
    }

    /// Removes `id` from every set that draws from the `kind` collection.
    ///
    /// Called as part of deleting the entity; returns whether any set changed.
    pub fn prune(&mut self, kind: CollectionKind, id: &str) -> bool {
        let mut changed = false;
        for (set_kind, set) in self.sets.iter_mut() {
            if *set_kind == kind {
                changed |= set.remove(id);
            }
        }
        if changed {
            tracing::debug!(collection = %kind, id, "Pruned selection");
        }
        changed
    }

    /// Drops every selected id of `kind` that fails `exists`, e.g. entries a
    /// capped insert just evicted. Returns the dropped ids.
    pub fn sync(&mut self, kind: CollectionKind, exists: impl Fn(&str) -> bool) -> Vec<String> {
        let Some(set) = self.sets.get_mut(&kind) else {
            return Vec::new();
        };
        let stale: Vec<String> = set.iter().filter(|id| !exists(id.as_str())).cloned().collect();
        for id in &stale {
            set.remove(id);
        }
        if !stale.is_empty() {
            tracing::debug!(collection = %kind, count = stale.len(), "Dropped stale selections");
        }
        stale
    }

    /// The selected entities of `collection`, in collection order.
    ///
    /// Fails with `DanglingSelection` if a selected id is missing.
    pub fn resolve<'a, T: CollectionEntity>(
        &self,
        collection: &'a BoundedCollection<T>,
    ) -> Result<Vec<&'a T>> {
        let kind = collection.kind();
        self.verify(kind, |id| collection.contains(id))?;
        Ok(collection
            .list()
            .iter()
            .filter(|item| self.is_selected(kind, item.id()))
            .collect())
    }

    /// Checks that every selected id of `kind` passes `exists`.
    pub fn verify(&self, kind: CollectionKind, exists: impl Fn(&str) -> bool) -> Result<()> {
        if let Some(missing) = self
            .sets
            .get(&kind)
            .and_then(|set| set.iter().find(|id| !exists(id.as_str())))
        {
            tracing::error!(collection = %kind, id = %missing, "Selection references a missing entity");
            return Err(StudioError::dangling_selection(
                kind.storage_key(),
                missing.clone(),
            ));
        }
        Ok(())
    }
}
