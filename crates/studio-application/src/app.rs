//! Application entry point: wires storage, identity and collaborators, and
//! opens sessions.

use std::sync::Arc;
use studio_core::config::StudioConfig;
use studio_core::error::Result;
use studio_core::generation::{ImageGenerator, TextGenerator};
use studio_core::storage::KeyValueStore;
use studio_core::user::{Identity, IdentityService};
use studio_infrastructure::{ConfigService, FileKeyValueStore, StoredIdentityService, StudioPaths};
use studio_interaction::{GeminiClient, GeminiImageGenerator, GeminiTextGenerator};

use crate::session::StudioSession;

/// Long-lived services shared by every session.
///
/// `StudioApp` owns the raw backend and the identity service; each login
/// produces a fresh [`StudioSession`] scoped to the identity's namespace.
///
/// # Responsibilities
///
/// - Building the production stack from a [`StudioConfig`]
/// - Logging in and out (the identity key itself is not namespaced)
/// - Restoring the last identity on start-up
#[derive(Clone)]
pub struct StudioApp {
    config: StudioConfig,
    backend: Arc<dyn KeyValueStore>,
    identity: Arc<dyn IdentityService>,
    text: Arc<dyn TextGenerator>,
    image: Arc<dyn ImageGenerator>,
}

impl StudioApp {
    /// Creates an app over explicit collaborators.
    ///
    /// # Arguments
    ///
    /// * `config` - Capacities and loading timings
    /// * `backend` - Raw key/value store shared by all namespaces
    /// * `text` - Text generation collaborator
    /// * `image` - Image generation collaborator
    pub fn new(
        config: StudioConfig,
        backend: Arc<dyn KeyValueStore>,
        text: Arc<dyn TextGenerator>,
        image: Arc<dyn ImageGenerator>,
    ) -> Self {
        let identity = Arc::new(StoredIdentityService::new(backend.clone()));
        Self {
            config,
            backend,
            identity,
            text,
            image,
        }
    }

    /// Production stack: file-backed store under the data directory and the
    /// Gemini collaborators.
    pub fn from_config(config: StudioConfig, paths: &StudioPaths) -> Result<Self> {
        let quota = config.storage_quota_bytes.map(|bytes| bytes as u64);
        let backend = Arc::new(FileKeyValueStore::open(paths.store_dir()?, quota)?);

        let client = GeminiClient::new(config.gemini.api_key.clone());
        let text = Arc::new(GeminiTextGenerator::new(
            client.clone(),
            config.gemini.text_model.clone(),
        ));
        let image = Arc::new(GeminiImageGenerator::new(
            client,
            config.gemini.image_model.clone(),
            config.gemini.high_quality_image_model.clone(),
        ));

        tracing::info!(
            text_model = %config.gemini.text_model,
            image_model = %config.gemini.image_model,
            "Studio app initialized"
        );
        Ok(Self::new(config, backend, text, image))
    }

    /// Loads (or creates) `config.toml` under `paths` and builds the
    /// production stack from it.
    pub fn bootstrap(paths: &StudioPaths) -> Result<Self> {
        let config = ConfigService::from_paths(paths)?.get_config()?;
        Self::from_config(config, paths)
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// The remembered identity, if any.
    pub fn current_identity(&self) -> Result<Option<Identity>> {
        self.identity.current()
    }

    /// Logs in as `display_name` and opens that identity's session.
    pub fn login(&self, display_name: &str) -> Result<StudioSession> {
        let identity = self.identity.login(display_name)?;
        tracing::info!(user = %identity.display_name, namespace = %identity.namespace(), "Logged in");
        self.open_session(Some(identity))
    }

    /// Opens the session of the remembered identity, or the guest session.
    pub fn resume(&self) -> Result<StudioSession> {
        let identity = self.identity.current()?;
        self.open_session(identity)
    }

    /// Closes `session`, forgets the identity and returns a guest session.
    ///
    /// Data written under the previous namespace stays in the store.
    pub fn logout(&self, session: StudioSession) -> Result<StudioSession> {
        session.close();
        self.identity.logout()?;
        tracing::info!("Logged out");
        self.open_session(None)
    }

    fn open_session(&self, identity: Option<Identity>) -> Result<StudioSession> {
        StudioSession::open(
            &self.config,
            self.backend.clone(),
            identity,
            self.text.clone(),
            self.image.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::io;
    use std::sync::Mutex;
    use studio_core::generation::{ConceptRequest, ConceptResponse, GeneratedImage, ImageRequest};
    use studio_core::StudioError;
    use studio_infrastructure::MemoryKeyValueStore;

    struct Offline;

    #[async_trait]
    impl TextGenerator for Offline {
        async fn generate_concept(&self, _request: &ConceptRequest) -> Result<ConceptResponse> {
            Err(StudioError::generation_failed("offline"))
        }
    }

    #[async_trait]
    impl ImageGenerator for Offline {
        async fn generate_image(&self, _request: &ImageRequest) -> Result<GeneratedImage> {
            Err(StudioError::generation_failed("offline"))
        }
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn count(&self, needle: &str) -> usize {
            String::from_utf8_lossy(&self.0.lock().unwrap())
                .matches(needle)
                .count()
        }
    }

    fn app() -> StudioApp {
        StudioApp::new(
            StudioConfig::default(),
            Arc::new(MemoryKeyValueStore::new()),
            Arc::new(Offline),
            Arc::new(Offline),
        )
    }

    #[test]
    fn test_login_and_logout_log_once() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let app = app();
            let session = app.login("Mei").unwrap();
            app.logout(session).unwrap();
        });

        assert_eq!(captured.count("Logged in"), 1);
        assert_eq!(captured.count("Logged out"), 1);
    }

    #[test]
    fn test_logout_forgets_identity() {
        let app = app();
        app.login("Mei").unwrap();
        assert!(app.current_identity().unwrap().is_some());

        let session = app.resume().unwrap();
        let guest = app.logout(session).unwrap();

        assert!(guest.identity().is_none());
        assert!(app.current_identity().unwrap().is_none());
    }
}
