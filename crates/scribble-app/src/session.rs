//! Drawing session controller.
//!
//! A [`DrawingSession`] owns everything one drawing surface needs: the stroke
//! store, the capture flag, the injected renderer and classifier, and its
//! listeners. Nothing is shared between sessions.

use crate::classifier::{Classifier, ClassifyError};
use crate::config::ConfigError;
use crate::events::{ListenerId, Listeners, SessionEvent};
use kurbo::Point;
use scribble_core::{InputCapture, PointerEvent, Prediction, PredictRequest, StrokeStore, StrokeStyle};
use scribble_render::{EncodeError, Renderer, RendererError, SurfaceSnapshot, export_data_uri};
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Session setup errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Renderer error: {0}")]
    Renderer(#[from] RendererError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifyError),
}

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Encoding failed: {0}")]
    Encode(#[from] EncodeError),
    #[error("Classification failed: {0}")]
    Classify(#[from] ClassifyError),
    #[error("No async runtime to run the export on")]
    NoRuntime,
    #[error("Export was cancelled")]
    Cancelled,
    #[error("Export task failed: {0}")]
    TaskFailed(String),
}

/// Result type for exports.
pub type ExportResult<T> = Result<T, ExportError>;

/// A running export.
///
/// Dropping the task does not cancel it; call [`ExportTask::abort`].
#[derive(Debug)]
pub struct ExportTask {
    id: Uuid,
    handle: JoinHandle<ExportResult<Prediction>>,
}

impl ExportTask {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Cancel the export. Later exports in the queue still wait for the
    /// earlier ones.
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the outcome.
    pub async fn wait(self) -> ExportResult<Prediction> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => {
                log::warn!("Export {} was cancelled", self.id);
                Err(ExportError::Cancelled)
            }
            Err(e) => Err(ExportError::TaskFailed(e.to_string())),
        }
    }
}

/// Controller for one drawing surface.
pub struct DrawingSession<R: Renderer> {
    id: Uuid,
    strokes: StrokeStore,
    input: InputCapture,
    renderer: R,
    style: StrokeStyle,
    classifier: Arc<dyn Classifier>,
    listeners: Listeners,
    /// Resolves once the most recently queued export is done.
    last_export: Option<oneshot::Receiver<()>>,
}

impl<R: Renderer> DrawingSession<R> {
    /// Create a session drawing onto `renderer` and classifying through
    /// `classifier`.
    pub fn new(renderer: R, classifier: Arc<dyn Classifier>) -> Self {
        let id = Uuid::new_v4();
        let (width, height) = renderer.dimensions();
        log::info!("Session {} created on a {}x{} surface", id, width, height);
        Self {
            id,
            strokes: StrokeStore::new(),
            input: InputCapture::new(),
            renderer,
            style: StrokeStyle::default(),
            classifier,
            listeners: Listeners::new(),
            last_export: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn strokes(&self) -> &StrokeStore {
        &self.strokes
    }

    pub fn is_capturing(&self) -> bool {
        self.input.is_capturing()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Register an observer for session events.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Pen down at surface-local coordinates.
    pub fn press(&mut self, x: f64, y: f64) {
        self.handle_pointer_event(PointerEvent::Down {
            position: Point::new(x, y),
        });
    }

    /// Pen drag. Ignored unless a press is active.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.handle_pointer_event(PointerEvent::Move {
            position: Point::new(x, y),
        });
    }

    /// Pen up.
    pub fn release(&mut self) {
        self.handle_pointer_event(PointerEvent::Up);
    }

    /// Process a pointer event from the presentation layer.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        let was_capturing = self.input.is_capturing();
        let effect = self.input.handle_pointer_event(event, &mut self.strokes);

        match event {
            PointerEvent::Down { .. } if !was_capturing => {
                self.listeners.emit(&SessionEvent::CaptureStarted);
            }
            PointerEvent::Up if was_capturing => {
                self.listeners.emit(&SessionEvent::CaptureEnded);
            }
            _ => {}
        }

        if effect.needs_repaint() {
            self.repaint();
        }
    }

    /// Redraw the surface from the full stroke store.
    pub fn repaint(&mut self) {
        self.renderer.render(&self.strokes, &self.style);
        self.listeners.emit(&SessionEvent::Repainted {
            segments: self.strokes.len(),
        });
    }

    /// Queue position for the next export.
    fn take_ticket(&mut self, runtime: Handle) -> QueueTicket {
        let (done_tx, done_rx) = oneshot::channel();
        QueueTicket {
            previous: self.last_export.replace(done_rx),
            done: Some(done_tx),
            runtime,
        }
    }

    /// Snapshot the surface and submit it for classification.
    ///
    /// The snapshot is taken now; encoding and the request run on the tokio
    /// runtime. Exports from one session are queued and complete in call
    /// order. Failures are logged and reported to listeners; the stroke store
    /// and capture state are never touched.
    pub fn export(&mut self) -> ExportResult<ExportTask> {
        let runtime = Handle::try_current().map_err(|_| {
            log::error!("Session {}: export requires a tokio runtime", self.id);
            ExportError::NoRuntime
        })?;

        let export_id = Uuid::new_v4();
        let snapshot = self.renderer.snapshot();
        let classifier = Arc::clone(&self.classifier);
        let listeners = self.listeners.clone();
        let mut ticket = self.take_ticket(runtime.clone());

        log::info!("Session {} queued export {}", self.id, export_id);
        listeners.emit(&SessionEvent::ExportStarted { export_id });

        let handle = runtime.spawn(async move {
            ticket.wait_turn().await;

            let result = submit(snapshot, classifier.as_ref()).await;
            match &result {
                Ok(prediction) => {
                    log::info!("Prediction: {}", prediction);
                    listeners.emit(&SessionEvent::PredictionReceived {
                        export_id,
                        prediction: prediction.clone(),
                    });
                }
                Err(e) => {
                    log::error!("Export {} failed: {}", export_id, e);
                    listeners.emit(&SessionEvent::ExportFailed {
                        export_id,
                        message: e.to_string(),
                    });
                }
            }

            drop(ticket);
            result
        });

        Ok(ExportTask {
            id: export_id,
            handle,
        })
    }
}

/// One export's place in its session's queue.
///
/// The turn passes to the next export when the ticket is dropped. A ticket
/// dropped before its own turn came (the export was aborted while queued)
/// hands the turn on only once its predecessor is done.
struct QueueTicket {
    previous: Option<oneshot::Receiver<()>>,
    done: Option<oneshot::Sender<()>>,
    runtime: Handle,
}

impl QueueTicket {
    async fn wait_turn(&mut self) {
        if let Some(previous) = self.previous.as_mut() {
            // An error only means the predecessor's ticket was dropped.
            let _ = previous.await;
        }
        self.previous = None;
    }
}

impl Drop for QueueTicket {
    fn drop(&mut self) {
        if let (Some(previous), Some(done)) = (self.previous.take(), self.done.take()) {
            self.runtime.spawn(async move {
                let _ = previous.await;
                drop(done);
            });
        }
    }
}

async fn submit(snapshot: SurfaceSnapshot, classifier: &dyn Classifier) -> ExportResult<Prediction> {
    let image = export_data_uri(&snapshot)?;
    let prediction = classifier.classify(PredictRequest::new(&image)).await?;
    Ok(prediction)
}
