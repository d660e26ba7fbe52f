use crate::artifact::ModelArtifact;
use crate::config::PipelineConfig;
use crate::engine::{InferenceBackend, OrtEngine};
use crate::error::{Error, Result};
use crate::interpret::interpret;
use crate::models::{ClassificationResult, ImageReference, PipelineState, StateSnapshot};
use crate::preprocess::preprocess;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use uuid::Uuid;

/// Orchestrates preprocess -> infer -> interpret per request and publishes
/// the latest outcome. One request in flight at a time: a `classify` call
/// while another request is running fails fast with `Busy` rather than
/// racing it for the published slot.
pub struct Pipeline<B: InferenceBackend = OrtEngine> {
    inner: Arc<PipelineInner<B>>,
}

impl<B: InferenceBackend> std::fmt::Debug for Pipeline<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").finish_non_exhaustive()
    }
}

impl<B: InferenceBackend> Clone for Pipeline<B> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct PipelineInner<B> {
    backend: B,
    config: PipelineConfig,
    current: Mutex<Option<RequestHandle>>,
    seq: AtomicU64,
    tx: watch::Sender<StateSnapshot>,
}

#[derive(Clone)]
struct RequestHandle {
    id: Uuid,
}

impl Pipeline<OrtEngine> {
    /// Two-phase initialization: load the artifact and build the engine up
    /// front, so every construction failure is a typed error here and no
    /// request is ever accepted by a half-initialized pipeline.
    pub fn initialize(config: PipelineConfig) -> Result<Self> {
        let artifact = ModelArtifact::load(&config.model_path)?;
        let engine = OrtEngine::new(&artifact, &config)?;
        Ok(Self::with_backend(engine, config))
    }
}

impl<B: InferenceBackend> Pipeline<B> {
    /// Build a pipeline around an already-constructed backend.
    pub fn with_backend(backend: B, config: PipelineConfig) -> Self {
        let (tx, _rx) = watch::channel(StateSnapshot::initial());
        Self {
            inner: Arc::new(PipelineInner {
                backend,
                config,
                current: Mutex::new(None),
                seq: AtomicU64::new(0),
                tx,
            }),
        }
    }

    /// Start a classification request. Returns immediately with the
    /// request id; the outcome is delivered through the published state.
    /// Must be called from within a Tokio runtime, since the work is
    /// dispatched to the blocking pool.
    pub fn classify(&self, image: ImageReference) -> Result<Uuid> {
        let mut current = self.inner.current.lock().unwrap();
        if current.is_some() {
            return Err(Error::Busy(
                "Classification already running; wait for it to finish.".into(),
            ));
        }

        let id = Uuid::new_v4();
        *current = Some(RequestHandle { id });
        drop(current);
        self.inner.publish(PipelineState::Running);

        let inner = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let state = match run_once(&inner.backend, &inner.config, &image) {
                Ok(result) => PipelineState::Completed(result),
                Err(err) => {
                    log::warn!("Classification failed for {}: {err}", image.path().display());
                    PipelineState::Failed {
                        message: err.to_string(),
                    }
                }
            };
            // Free the in-flight slot before publishing, so an observer
            // reacting to the settled state can start the next request.
            inner.finish(id);
            inner.publish(state);
        });

        Ok(id)
    }

    /// Subscribe to published state changes. The channel is single-slot:
    /// an observer that falls behind sees only the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<StateSnapshot> {
        self.inner.tx.subscribe()
    }

    pub fn latest(&self) -> StateSnapshot {
        self.inner.tx.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.inner.current.lock().unwrap().is_some()
    }
}

impl<B> PipelineInner<B> {
    fn publish(&self, state: PipelineState) {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        // send only errs when every receiver is gone; the slot still holds
        // the value for later subscribers, so that is not a failure here.
        let _ = self.tx.send(StateSnapshot { seq, state });
    }

    fn finish(&self, id: Uuid) {
        let mut current = self.current.lock().unwrap();
        if let Some(handle) = current.as_ref() {
            if handle.id == id {
                *current = None;
            }
        }
    }
}

/// The whole sequence runs to completion on the blocking task; the only
/// asynchronous boundary is dispatch-and-publish.
fn run_once<B: InferenceBackend>(
    backend: &B,
    config: &PipelineConfig,
    image: &ImageReference,
) -> Result<ClassificationResult> {
    let input = preprocess(image, config)?;
    let scores = backend.run(&input)?;
    interpret(&scores)
}
