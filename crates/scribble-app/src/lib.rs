//! Scribble application layer.
//!
//! Ties the stroke store, the renderer and the classification client together
//! into a [`DrawingSession`]. The presentation layer feeds it pointer events
//! in surface-local coordinates and subscribes to [`SessionEvent`]s.

pub mod classifier;
pub mod config;
pub mod events;
pub mod session;

#[cfg(test)]
mod test_support;

pub use classifier::{BoxFuture, Classifier, ClassifyError, ClassifyResult, HttpClassifier};
pub use config::{ClassifierConfig, ConfigError};
pub use events::{ListenerId, Listeners, SessionEvent};
pub use session::{DrawingSession, ExportError, ExportResult, ExportTask, SessionError};

use scribble_render::PixmapRenderer;
use std::sync::Arc;

/// Create a session on a fresh CPU surface that classifies through the
/// service at `base_url`.
pub fn create_session(
    width: u32,
    height: u32,
    base_url: &str,
) -> Result<DrawingSession<PixmapRenderer>, SessionError> {
    let renderer = PixmapRenderer::new(width, height)?;
    let config = ClassifierConfig::from_base_url(base_url)?;
    let classifier = HttpClassifier::new(config)?;
    Ok(DrawingSession::new(renderer, Arc::new(classifier)))
}
