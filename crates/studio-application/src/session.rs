//! The logged-in session: every piece of per-identity state in one place.

use std::sync::Arc;
use studio_core::category::ContentCategory;
use studio_core::collection::{
    BoundedCollection, CollectionEntity, CollectionKind, LibraryItem, MediaRef, NewLibraryItem,
    SellingPoint,
};
use studio_core::config::StudioConfig;
use studio_core::error::{Result, StudioError};
use studio_core::generation::{ConceptRequest, ImageGenerator, TextGenerator};
use studio_core::persona::{Persona, PersonaDeletion, PersonaRegistry};
use studio_core::selection::SelectionSets;
use studio_core::storage::{KeyValueStore, NamespacedStore, NoticeBoard, StudioNotice};
use studio_core::user::{Identity, NamespaceToken};
use studio_core::workflow::{Submission, WorkflowController};
use studio_infrastructure::StorePersonaRepository;

/// Per-identity application context.
///
/// Created at login (or for the guest), dropped at logout. Collections,
/// selections and personas are loaded from the identity's namespace; deleting
/// an entity prunes it from the selections in the same call.
pub struct StudioSession {
    identity: Option<Identity>,
    store: NamespacedStore,
    library: BoundedCollection<LibraryItem>,
    selling_points: BoundedCollection<SellingPoint>,
    product_photos: BoundedCollection<MediaRef>,
    style_references: BoundedCollection<MediaRef>,
    personas: PersonaRegistry,
    selections: SelectionSets,
    workflow: WorkflowController,
}

impl StudioSession {
    /// Loads the session state for `identity` (`None` for the guest).
    pub fn open(
        config: &StudioConfig,
        backend: Arc<dyn KeyValueStore>,
        identity: Option<Identity>,
        text: Arc<dyn TextGenerator>,
        image: Arc<dyn ImageGenerator>,
    ) -> Result<Self> {
        let store = NamespacedStore::for_identity(backend, identity.as_ref(), NoticeBoard::new());
        let capacity = config.capacity.clamped();

        let library = BoundedCollection::load(store.clone(), CollectionKind::Library, capacity.library);
        let selling_points = BoundedCollection::load(
            store.clone(),
            CollectionKind::SellingPoints,
            capacity.selling_points,
        );
        let product_photos = BoundedCollection::load(
            store.clone(),
            CollectionKind::ProductPhotos,
            capacity.product_photos,
        );
        let style_references = BoundedCollection::load(
            store.clone(),
            CollectionKind::StyleReferences,
            capacity.style_references,
        );
        let personas = PersonaRegistry::load(Arc::new(StorePersonaRepository::new(store.clone())))?;
        let workflow = WorkflowController::new(text, image, config.loading.clone());

        tracing::info!(
            namespace = %store.namespace(),
            library = library.len(),
            personas = personas.list_saved().len(),
            "Session opened"
        );

        Ok(Self {
            identity,
            store,
            library,
            selling_points,
            product_photos,
            style_references,
            personas,
            selections: SelectionSets::new(),
            workflow,
        })
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn namespace(&self) -> &NamespaceToken {
        self.store.namespace()
    }

    /// Pending notices, oldest first; draining clears them.
    pub fn drain_notices(&self) -> Vec<StudioNotice> {
        self.store.notices().drain()
    }

    pub fn workflow(&self) -> &WorkflowController {
        &self.workflow
    }

    pub fn selections(&self) -> &SelectionSets {
        &self.selections
    }

    // ============================================================================
    // Collections
    // ============================================================================

    pub fn library(&self) -> &[LibraryItem] {
        self.library.list()
    }

    pub fn selling_points(&self) -> &[SellingPoint] {
        self.selling_points.list()
    }

    pub fn product_photos(&self) -> &[MediaRef] {
        self.product_photos.list()
    }

    pub fn style_references(&self) -> &[MediaRef] {
        self.style_references.list()
    }

    pub fn add_library_item(&mut self, item: NewLibraryItem) -> Result<LibraryItem> {
        if item.copy_text.trim().is_empty() && item.image_url.is_none() {
            return Err(StudioError::validation("Library item needs copy or an image"));
        }
        add_synced(&mut self.library, &mut self.selections, item)
    }

    pub fn add_selling_point(&mut self, text: &str) -> Result<SellingPoint> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StudioError::validation("Selling point text is required"));
        }
        add_synced(&mut self.selling_points, &mut self.selections, text.to_string())
    }

    pub fn add_product_photo(&mut self, data_url: &str) -> Result<MediaRef> {
        validate_data_url(data_url)?;
        add_synced(&mut self.product_photos, &mut self.selections, data_url.to_string())
    }

    pub fn add_style_reference(&mut self, data_url: &str) -> Result<MediaRef> {
        validate_data_url(data_url)?;
        add_synced(&mut self.style_references, &mut self.selections, data_url.to_string())
    }

    /// Deletes a library item and its selection. Returns whether it existed.
    pub fn remove_library_item(&mut self, id: &str) -> Result<bool> {
        remove_synced(&mut self.library, &mut self.selections, id)
    }

    pub fn remove_selling_point(&mut self, id: &str) -> Result<bool> {
        remove_synced(&mut self.selling_points, &mut self.selections, id)
    }

    pub fn remove_product_photo(&mut self, id: &str) -> Result<bool> {
        remove_synced(&mut self.product_photos, &mut self.selections, id)
    }

    pub fn remove_style_reference(&mut self, id: &str) -> Result<bool> {
        remove_synced(&mut self.style_references, &mut self.selections, id)
    }

    /// Flips the selection of an existing entity; returns whether it is
    /// selected afterwards.
    pub fn toggle_selection(&mut self, kind: CollectionKind, id: &str) -> Result<bool> {
        let exists = match kind {
            CollectionKind::Library => self.library.contains(id),
            CollectionKind::SellingPoints => self.selling_points.contains(id),
            CollectionKind::ProductPhotos => self.product_photos.contains(id),
            CollectionKind::StyleReferences => self.style_references.contains(id),
        };
        if !exists && !self.selections.is_selected(kind, id) {
            return Err(StudioError::not_found(kind.storage_key(), id));
        }
        Ok(self.selections.toggle(kind, id))
    }

    // ============================================================================
    // Personas
    // ============================================================================

    pub fn personas(&self) -> &PersonaRegistry {
        &self.personas
    }

    pub fn active_persona(&self) -> &Persona {
        self.personas.active()
    }

    pub fn select_persona(&mut self, persona: Persona) {
        self.personas.select(persona);
    }

    pub fn save_persona(&mut self, persona: Persona) -> Result<Persona> {
        self.personas.save(persona)
    }

    /// Deletes a saved persona; if it was active, raises a notice naming the
    /// built-in that replaced it.
    pub fn delete_persona(&mut self, id: &str) -> Result<PersonaDeletion> {
        let deletion = self.personas.delete(id)?;
        if deletion.active_reset {
            self.store.notices().push(StudioNotice::PersonaFallback {
                name: self.personas.active().display_name().to_string(),
            });
        }
        Ok(deletion)
    }

    // ============================================================================
    // Workflow
    // ============================================================================

    /// Builds the text request from the current selections and active persona.
    pub fn build_concept_request(
        &self,
        scenario_text: &str,
        category: ContentCategory,
        reference_image: Option<String>,
    ) -> Result<ConceptRequest> {
        if let Some(image) = &reference_image {
            validate_data_url(image)?;
        }
        let request = ConceptRequest {
            scenario_text: scenario_text.trim().to_string(),
            category,
            persona: self.personas.active().clone(),
            reference_image,
            context_items: cloned(self.selections.resolve(&self.library)?),
            selling_points: cloned(self.selections.resolve(&self.selling_points)?),
            product_photos: cloned(self.selections.resolve(&self.product_photos)?),
        };
        request.validate()?;
        Ok(request)
    }

    /// Runs the text generation with the current selections.
    pub async fn submit_scenario(
        &self,
        scenario_text: &str,
        category: ContentCategory,
        reference_image: Option<String>,
    ) -> Result<Submission> {
        let request = self.build_concept_request(scenario_text, category, reference_image)?;
        let style_references = cloned(self.selections.resolve(&self.style_references)?);
        self.workflow.submit_scenario(request, style_references).await
    }

    pub async fn generate_image(&self) -> Result<Submission> {
        self.workflow.generate_image().await
    }

    /// Keeps the finished result in the library as a generated item.
    pub fn save_final_result(&mut self) -> Result<LibraryItem> {
        let result = self.workflow.final_result().ok_or_else(|| {
            StudioError::invalid_transition("save the result", self.workflow.step())
        })?;
        self.add_library_item(result.to_library_item())
    }

    /// Ends the session: stops any progress run.
    pub fn close(self) {
        self.workflow.shutdown();
        tracing::info!(namespace = %self.store.namespace(), "Session closed");
    }
}

fn add_synced<T: CollectionEntity>(
    collection: &mut BoundedCollection<T>,
    selections: &mut SelectionSets,
    draft: T::Draft,
) -> Result<T> {
    let added = collection.add(draft);
    selections.sync(collection.kind(), |id| collection.contains(id));
    added
}

fn remove_synced<T: CollectionEntity>(
    collection: &mut BoundedCollection<T>,
    selections: &mut SelectionSets,
    id: &str,
) -> Result<bool> {
    let removed = collection.remove(id);
    selections.prune(collection.kind(), id);
    Ok(removed?.is_some())
}

fn validate_data_url(url: &str) -> Result<()> {
    if !url.starts_with("data:") {
        return Err(StudioError::validation("Images must be inline data URLs"));
    }
    Ok(())
}

fn cloned<T: Clone>(items: Vec<&T>) -> Vec<T> {
    items.into_iter().cloned().collect()
}
