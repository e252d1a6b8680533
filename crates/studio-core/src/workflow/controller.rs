//! The step state machine and its collaborator calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

use super::progress::{LoadingProgress, ProgressSimulator};
use super::step::{LoadingKind, WorkflowStep};
use crate::collection::MediaRef;
use crate::concept::{Concept, ConceptEditor, FinalResult};
use crate::config::LoadingSettings;
use crate::error::{Result, StudioError};
use crate::generation::{ConceptRequest, ImageGenerator, TextGenerator};

/// Outcome of a submission that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The collaborator answered and the workflow moved on
    Completed,
    /// Another call was in flight; nothing was sent
    Rejected,
    /// The workflow was reset while waiting; the answer was thrown away
    Discarded,
}

#[derive(Default)]
struct WorkflowState {
    step: WorkflowStep,
    editor: Option<ConceptEditor>,
    final_result: Option<FinalResult>,
    last_error: Option<String>,
    /// Bumped by every reset so late answers can be recognised
    epoch: u64,
}

/// Drives `ScenarioInput -> ConceptReview -> FinalGeneration` (plus `Library`).
///
/// All methods take `&self`; at most one collaborator call runs at a time.
/// A second submission while one is in flight returns
/// [`Submission::Rejected`] without being queued.
pub struct WorkflowController {
    text: Arc<dyn TextGenerator>,
    image: Arc<dyn ImageGenerator>,
    timing: LoadingSettings,
    loading: AtomicBool,
    state: Mutex<WorkflowState>,
    progress: ProgressSimulator,
}

/// Holds the loading flag for one call.
struct LoadingGate<'a>(&'a AtomicBool);

impl<'a> LoadingGate<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for LoadingGate<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl WorkflowController {
    pub fn new(
        text: Arc<dyn TextGenerator>,
        image: Arc<dyn ImageGenerator>,
        timing: LoadingSettings,
    ) -> Self {
        let progress = ProgressSimulator::new(timing.progress_tick(), timing.message_rotate());
        Self {
            text,
            image,
            timing,
            loading: AtomicBool::new(false),
            state: Mutex::new(WorkflowState::default()),
            progress,
        }
    }

    fn state(&self) -> MutexGuard<'_, WorkflowState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ============================================================================
    // Observers
    // ============================================================================

    pub fn step(&self) -> WorkflowStep {
        self.state().step
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn progress(&self) -> watch::Receiver<LoadingProgress> {
        self.progress.subscribe()
    }

    pub fn current_progress(&self) -> LoadingProgress {
        self.progress.current()
    }

    /// Message of the last failed submission; cleared by the next one.
    pub fn last_error(&self) -> Option<String> {
        self.state().last_error.clone()
    }

    pub fn editor(&self) -> Option<ConceptEditor> {
        self.state().editor.clone()
    }

    pub fn final_result(&self) -> Option<FinalResult> {
        self.state().final_result.clone()
    }

    /// Applies `edit` to the concept editor.
    pub fn edit<R>(&self, edit: impl FnOnce(&mut ConceptEditor) -> R) -> Result<R> {
        let mut state = self.state();
        let step = state.step;
        state
            .editor
            .as_mut()
            .map(edit)
            .ok_or_else(|| StudioError::invalid_transition("edit the concept", step))
    }

    // ============================================================================
    // Transitions
    // ============================================================================

    /// Runs a text generation and, on success, moves to `ConceptReview`.
    ///
    /// `style_references` are kept with the concept for the image step.
    pub async fn submit_scenario(
        &self,
        request: ConceptRequest,
        style_references: Vec<MediaRef>,
    ) -> Result<Submission> {
        let Some(_gate) = LoadingGate::acquire(&self.loading) else {
            tracing::debug!("Scenario submission rejected, a call is in flight");
            return Ok(Submission::Rejected);
        };
        let epoch = self.begin(WorkflowStep::ScenarioInput, "generate a concept")?;
        request.validate()?;
        self.state().editor = None;

        let _run = self
            .progress
            .start(LoadingKind::Concept, self.timing.concept_estimate());
        let started = Instant::now();
        tracing::info!(category = %request.category, "Requesting concept");

        let outcome = self
            .text
            .generate_concept(&request)
            .await
            .and_then(|response| response.into_drafts())
            .and_then(|drafts| {
                ConceptEditor::new(Concept {
                    drafts,
                    reference_image: request.reference_image.clone(),
                    selected_category: Some(request.category),
                    persona: Some(request.persona.clone()),
                    selected_products: request.product_photos.clone(),
                    style_references,
                })
            });

        let editor = match outcome {
            Ok(editor) => editor,
            Err(e) => return self.fail(epoch, e),
        };
        hold_for_minimum(started, self.timing.concept_min_wait()).await;

        let mut state = self.state();
        if state.epoch != epoch {
            tracing::info!("Workflow reset while generating, concept discarded");
            return Ok(Submission::Discarded);
        }
        tracing::info!(drafts = editor.drafts().len(), "Concept ready");
        state.editor = Some(editor);
        state.step = WorkflowStep::ConceptReview;
        Ok(Submission::Completed)
    }

    /// Generates the visual for the edited draft and moves to `FinalGeneration`.
    pub async fn generate_image(&self) -> Result<Submission> {
        let Some(_gate) = LoadingGate::acquire(&self.loading) else {
            tracing::debug!("Image submission rejected, a call is in flight");
            return Ok(Submission::Rejected);
        };
        let epoch = self.begin(WorkflowStep::ConceptReview, "generate an image")?;
        let editor = self
            .editor()
            .ok_or_else(|| StudioError::internal("Concept review without a concept"))?;
        let request = editor.build_image_request()?;

        let _run = self
            .progress
            .start(LoadingKind::Image, self.timing.image_estimate());
        let started = Instant::now();
        tracing::info!(tier = %request.quality_tier, ratio = %request.aspect_ratio, "Requesting image");

        let image = match self.image.generate_image(&request).await {
            Ok(image) => image,
            Err(e) => return self.fail(epoch, e),
        };
        hold_for_minimum(started, self.timing.image_min_wait()).await;

        let mut state = self.state();
        if state.epoch != epoch {
            tracing::info!("Workflow reset while generating, image discarded");
            return Ok(Submission::Discarded);
        }
        state.final_result = Some(editor.finalize_with_image(&image));
        state.step = WorkflowStep::FinalGeneration;
        tracing::info!("Image ready");
        Ok(Submission::Completed)
    }

    /// Finalizes with text only.
    pub fn skip_image(&self) -> Result<FinalResult> {
        self.ensure_idle("skip the image")?;
        let mut state = self.state();
        if state.step != WorkflowStep::ConceptReview {
            return Err(StudioError::invalid_transition("skip the image", state.step));
        }
        let result = state
            .editor
            .as_ref()
            .map(ConceptEditor::finalize_text_only)
            .ok_or_else(|| StudioError::internal("Concept review without a concept"))?;
        state.final_result = Some(result.clone());
        state.step = WorkflowStep::FinalGeneration;
        tracing::info!("Image skipped");
        Ok(result)
    }

    /// `FinalGeneration -> ConceptReview`, keeping the concept and its edits.
    pub fn back_to_review(&self) -> Result<()> {
        self.ensure_idle("go back to review")?;
        let mut state = self.state();
        if state.step != WorkflowStep::FinalGeneration {
            return Err(StudioError::invalid_transition("go back to review", state.step));
        }
        state.final_result = None;
        state.step = WorkflowStep::ConceptReview;
        tracing::info!("Back to concept review");
        Ok(())
    }

    /// Returns to `ScenarioInput` from any step, clearing concept and output.
    ///
    /// An answer still in flight is discarded when it arrives.
    pub fn reset(&self) {
        let mut state = self.state();
        state.step = WorkflowStep::ScenarioInput;
        state.editor = None;
        state.final_result = None;
        state.last_error = None;
        state.epoch += 1;
        tracing::info!("Workflow reset");
    }

    pub fn open_library(&self) -> Result<()> {
        self.move_between(WorkflowStep::ScenarioInput, WorkflowStep::Library, "open the library")
    }

    pub fn close_library(&self) -> Result<()> {
        self.move_between(WorkflowStep::Library, WorkflowStep::ScenarioInput, "close the library")
    }

    /// Stops any progress run; later runs start cancelled.
    pub fn shutdown(&self) {
        self.progress.shutdown();
    }

    // ============================================================================
    // Helpers
    // ============================================================================

    /// Checks the step and clears the previous error. Returns the epoch.
    fn begin(&self, expected: WorkflowStep, action: &'static str) -> Result<u64> {
        let mut state = self.state();
        if state.step != expected {
            return Err(StudioError::invalid_transition(action, state.step));
        }
        state.last_error = None;
        Ok(state.epoch)
    }

    /// Records a failed call, unless the workflow was reset while it ran.
    fn fail(&self, epoch: u64, error: StudioError) -> Result<Submission> {
        let mut state = self.state();
        if state.epoch != epoch {
            tracing::info!(error = %error, "Workflow reset while generating, failure discarded");
            return Ok(Submission::Discarded);
        }
        tracing::warn!(error = %error, "Generation failed");
        state.last_error = Some(error.user_message());
        Err(error)
    }

    fn ensure_idle(&self, action: &'static str) -> Result<()> {
        if self.is_loading() {
            return Err(StudioError::invalid_transition(action, "loading"));
        }
        Ok(())
    }

    fn move_between(
        &self,
        from: WorkflowStep,
        to: WorkflowStep,
        action: &'static str,
    ) -> Result<()> {
        self.ensure_idle(action)?;
        let mut state = self.state();
        if state.step != from {
            return Err(StudioError::invalid_transition(action, state.step));
        }
        state.step = to;
        tracing::info!(%from, %to, "Workflow step changed");
        Ok(())
    }
}

async fn hold_for_minimum(started: Instant, minimum: Duration) {
    let elapsed = started.elapsed();
    if elapsed < minimum {
        tokio::time::sleep(minimum - elapsed).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::ContentCategory;
    use crate::concept::Draft;
    use crate::generation::{ConceptResponse, GeneratedImage, ImageRequest};
    use crate::persona::built_in_personas;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    struct FakeText {
        delay: Duration,
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for FakeText {
        async fn generate_concept(&self, _request: &ConceptRequest) -> Result<ConceptResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(StudioError::generation_failed("service unavailable"));
            }
            Ok(ConceptResponse {
                drafts: (0..3)
                    .map(|i| Draft {
                        label: format!("Draft {i}"),
                        copy_text: format!("copy {i}"),
                        visual_prompt: format!("prompt {i}"),
                        interaction_script: format!("script {i}"),
                    })
                    .collect(),
            })
        }
    }

    struct FakeImage {
        delay: Duration,
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ImageGenerator for FakeImage {
        async fn generate_image(&self, _request: &ImageRequest) -> Result<GeneratedImage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(StudioError::generation_failed("image service unavailable"));
            }
            Ok(GeneratedImage {
                mime_type: "image/png".to_string(),
                data: "AAAA".to_string(),
            })
        }
    }

    fn controller(text_delay: Duration, fail: bool) -> (WorkflowController, Arc<FakeText>) {
        let text = Arc::new(FakeText {
            delay: text_delay,
            fail,
            calls: AtomicUsize::new(0),
        });
        let image = Arc::new(FakeImage {
            delay: Duration::from_secs(1),
            fail: false,
            calls: AtomicUsize::new(0),
        });
        let controller = WorkflowController::new(text.clone(), image, LoadingSettings::default());
        (controller, text)
    }

    /// A controller already in `ConceptReview`, with a configurable image call.
    async fn reviewing(
        image_delay: Duration,
        image_fail: bool,
    ) -> (WorkflowController, Arc<FakeImage>) {
        let text = Arc::new(FakeText {
            delay: Duration::from_millis(100),
            fail: false,
            calls: AtomicUsize::new(0),
        });
        let image = Arc::new(FakeImage {
            delay: image_delay,
            fail: image_fail,
            calls: AtomicUsize::new(0),
        });
        let controller = WorkflowController::new(text, image.clone(), LoadingSettings::default());
        to_review(&controller).await;
        (controller, image)
    }

    fn request() -> ConceptRequest {
        ConceptRequest {
            scenario_text: "Rainy afternoon tasting".to_string(),
            category: ContentCategory::LifeDaily,
            persona: built_in_personas()[0].clone(),
            reference_image: None,
            context_items: vec![],
            selling_points: vec![],
            product_photos: vec![],
        }
    }

    async fn to_review(controller: &WorkflowController) {
        let outcome = controller.submit_scenario(request(), vec![]).await.unwrap();
        assert_eq!(outcome, Submission::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_early_answer_waits_for_minimum() {
        let (controller, _) = controller(Duration::from_secs(2), false);
        let started = Instant::now();

        to_review(&controller).await;

        assert!(started.elapsed() >= Duration::from_secs(3));
        assert_eq!(controller.step(), WorkflowStep::ConceptReview);
        assert!(!controller.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_answer_transitions_immediately() {
        let (controller, _) = controller(Duration::from_secs(5), false);
        let started = Instant::now();

        to_review(&controller).await;

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(5));
        assert!(elapsed < Duration::from_millis(5_100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_step_does_not_change_before_minimum() {
        let (controller, _) = controller(Duration::from_secs(2), false);
        let probe = async {
            tokio::time::sleep(Duration::from_millis(2_500)).await;
            (controller.step(), controller.is_loading())
        };

        let (outcome, (step_mid_wait, loading_mid_wait)) =
            tokio::join!(controller.submit_scenario(request(), vec![]), probe);

        assert_eq!(outcome.unwrap(), Submission::Completed);
        assert_eq!(step_mid_wait, WorkflowStep::ScenarioInput);
        assert!(loading_mid_wait);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submission_is_rejected_not_queued() {
        let (controller, text) = controller(Duration::from_secs(2), false);

        let (first, second) = tokio::join!(
            controller.submit_scenario(request(), vec![]),
            controller.submit_scenario(request(), vec![])
        );

        assert_eq!(first.unwrap(), Submission::Completed);
        assert_eq!(second.unwrap(), Submission::Rejected);
        assert_eq!(text.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_step_and_records_error() {
        let (controller, _) = controller(Duration::from_millis(500), true);

        let err = controller
            .submit_scenario(request(), vec![])
            .await
            .unwrap_err();

        assert!(err.is_generation_failed());
        assert_eq!(controller.step(), WorkflowStep::ScenarioInput);
        assert!(controller.last_error().is_some());
        assert!(!controller.is_loading());
        assert!(controller.current_progress().is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_during_and_after_loading() {
        let (controller, _) = controller(Duration::from_secs(2), false);
        let mut samples = Vec::new();
        let sampler = async {
            for _ in 0..25 {
                tokio::time::sleep(Duration::from_millis(100)).await;
                if controller.is_loading() {
                    samples.push(controller.current_progress().percent);
                }
            }
        };

        let (outcome, _) = tokio::join!(controller.submit_scenario(request(), vec![]), sampler);
        outcome.unwrap();

        assert!(!samples.is_empty());
        assert!(samples.windows(2).all(|w| w[0] <= w[1]));
        assert!(samples.iter().all(|p| *p <= 98));
        assert_eq!(controller.current_progress(), LoadingProgress::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_flow_with_image_and_back_navigation() {
        let (controller, _) = controller(Duration::from_millis(100), false);
        to_review(&controller).await;

        controller
            .edit(|editor| {
                editor.select_draft(1)?;
                editor.set_edited_copy("final words");
                Ok::<_, StudioError>(())
            })
            .unwrap()
            .unwrap();

        let outcome = controller.generate_image().await.unwrap();
        assert_eq!(outcome, Submission::Completed);
        assert_eq!(controller.step(), WorkflowStep::FinalGeneration);
        let result = controller.final_result().unwrap();
        assert_eq!(result.copy_text, "final words");
        assert_eq!(result.image_url.as_deref(), Some("data:image/png;base64,AAAA"));

        controller.back_to_review().unwrap();
        assert_eq!(controller.step(), WorkflowStep::ConceptReview);
        assert_eq!(controller.editor().unwrap().selected_index(), 1);
        assert!(controller.final_result().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_and_reset() {
        let (controller, _) = controller(Duration::from_millis(100), false);
        to_review(&controller).await;

        let result = controller.skip_image().unwrap();
        assert!(!result.has_image());
        assert_eq!(controller.step(), WorkflowStep::FinalGeneration);

        controller.reset();
        assert_eq!(controller.step(), WorkflowStep::ScenarioInput);
        assert!(controller.editor().is_none());
        assert!(controller.final_result().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_while_loading_discards_answer() {
        let (controller, _) = controller(Duration::from_secs(2), false);
        let resetter = async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            controller.reset();
        };

        let (outcome, _) = tokio::join!(controller.submit_scenario(request(), vec![]), resetter);

        assert_eq!(outcome.unwrap(), Submission::Discarded);
        assert_eq!(controller.step(), WorkflowStep::ScenarioInput);
        assert!(controller.editor().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_while_loading_discards_failure() {
        let (controller, _) = controller(Duration::from_secs(2), true);
        let resetter = async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            controller.reset();
        };

        let (outcome, _) = tokio::join!(controller.submit_scenario(request(), vec![]), resetter);

        assert_eq!(outcome.unwrap(), Submission::Discarded);
        assert_eq!(controller.step(), WorkflowStep::ScenarioInput);
        assert!(controller.last_error().is_none());
        assert!(!controller.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_while_image_loading_discards_failure() {
        let (controller, _) = reviewing(Duration::from_secs(2), true).await;
        let resetter = async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            controller.reset();
        };

        let (outcome, _) = tokio::join!(controller.generate_image(), resetter);

        assert_eq!(outcome.unwrap(), Submission::Discarded);
        assert_eq!(controller.step(), WorkflowStep::ScenarioInput);
        assert!(controller.last_error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_early_image_waits_for_image_minimum() {
        let (controller, _) = reviewing(Duration::from_secs(1), false).await;
        let check = async {
            tokio::time::sleep(Duration::from_millis(3_500)).await;
            controller.step()
        };
        let started = Instant::now();

        let (outcome, step_mid_wait) = tokio::join!(controller.generate_image(), check);

        assert_eq!(outcome.unwrap(), Submission::Completed);
        assert_eq!(step_mid_wait, WorkflowStep::ConceptReview);
        assert!(started.elapsed() >= Duration::from_secs(4));
        assert_eq!(controller.step(), WorkflowStep::FinalGeneration);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_image_request_is_rejected() {
        let (controller, image) = reviewing(Duration::from_secs(2), false).await;

        let (first, second) = tokio::join!(controller.generate_image(), controller.generate_image());

        assert_eq!(first.unwrap(), Submission::Completed);
        assert_eq!(second.unwrap(), Submission::Rejected);
        assert_eq!(image.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_image_failure_keeps_review_and_records_error() {
        let (controller, _) = reviewing(Duration::from_millis(500), true).await;

        let err = controller.generate_image().await.unwrap_err();

        assert!(err.is_generation_failed());
        assert_eq!(controller.step(), WorkflowStep::ConceptReview);
        assert!(controller.editor().is_some());
        assert!(controller.final_result().is_none());
        assert!(controller.last_error().is_some());
        assert!(!controller.is_loading());
        assert!(controller.current_progress().is_idle());
    }

    #[tokio::test]
    async fn test_invalid_transitions() {
        let (controller, _) = controller(Duration::ZERO, false);
        assert!(controller.skip_image().is_err());
        assert!(controller.back_to_review().is_err());
        assert!(controller.close_library().is_err());
        assert!(matches!(
            controller.generate_image().await,
            Err(StudioError::InvalidTransition { .. })
        ));

        controller.open_library().unwrap();
        assert_eq!(controller.step(), WorkflowStep::Library);
        assert!(controller.open_library().is_err());
        controller.close_library().unwrap();
        assert_eq!(controller.step(), WorkflowStep::ScenarioInput);
    }
}
