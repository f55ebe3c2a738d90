//! Renderer trait abstraction.

use crate::export::SurfaceSnapshot;
use kurbo::Line;
use scribble_core::stroke::{StrokeStore, StrokeStyle};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid surface size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// A raster surface strokes are drawn onto.
///
/// Backends supply the drawing primitives; the replay of a [`StrokeStore`]
/// is shared by all of them through [`Renderer::render`].
pub trait Renderer {
    /// Surface size in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Reset every pixel to transparent.
    fn clear(&mut self);

    /// Stroke a single line with round joins.
    fn stroke_line(&mut self, line: Line, style: &StrokeStyle);

    /// Copy of the visible pixels.
    fn snapshot(&self) -> SurfaceSnapshot;

    /// Repaint the whole surface from the stroke store.
    ///
    /// Clears first, then strokes every segment independently. Output depends
    /// only on the store and the style.
    fn render(&mut self, strokes: &StrokeStore, style: &StrokeStyle) {
        self.clear();
        for line in strokes.lines() {
            self.stroke_line(line, style);
        }
    }
}
