//! Pointer input capture.
//!
//! Translates press/move/release events into [`StrokeStore`] appends and
//! tracks whether a stroke is currently being captured.

use crate::stroke::{StrokeSegment, StrokeStore};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer event in surface-local coordinates.
///
/// Translating device-global positions into surface space is the job of the
/// presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up,
}

/// What an event did to the stroke store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEffect {
    /// A segment was appended; the surface must be repainted.
    Appended,
    /// Capture state may have changed, the store did not.
    Unchanged,
}

impl InputEffect {
    /// Whether the surface needs a repaint.
    pub fn needs_repaint(self) -> bool {
        matches!(self, InputEffect::Appended)
    }
}

/// Drawing state for one surface.
#[derive(Debug, Clone, Default)]
pub struct InputCapture {
    is_capturing: bool,
}

impl InputCapture {
    /// Create a capture that is not drawing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a press has been seen without a matching release.
    pub fn is_capturing(&self) -> bool {
        self.is_capturing
    }

    /// Pen down: start a new disconnected stroke.
    ///
    /// A press while already capturing also starts a new stroke.
    pub fn press(&mut self, position: Point, strokes: &mut StrokeStore) -> InputEffect {
        if self.is_capturing {
            log::debug!("Press while capturing, starting a new stroke");
        }
        self.is_capturing = true;
        strokes.push(StrokeSegment::start(position));
        InputEffect::Appended
    }

    /// Pen drag: extend the current stroke. Ignored when not capturing.
    pub fn move_to(&mut self, position: Point, strokes: &mut StrokeStore) -> InputEffect {
        if !self.is_capturing {
            return InputEffect::Unchanged;
        }
        strokes.push(StrokeSegment::continuation(position));
        InputEffect::Appended
    }

    /// Pen up.
    pub fn release(&mut self) -> InputEffect {
        self.is_capturing = false;
        InputEffect::Unchanged
    }

    /// Process a pointer event.
    pub fn handle_pointer_event(
        &mut self,
        event: PointerEvent,
        strokes: &mut StrokeStore,
    ) -> InputEffect {
        match event {
            PointerEvent::Down { position } => self.press(position, strokes),
            PointerEvent::Move { position } => self.move_to(position, strokes),
            PointerEvent::Up => self.release(),
        }
    }
}
