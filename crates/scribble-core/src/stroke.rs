//! Stroke store and stroke style.

use kurbo::{Line, Point, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Default stroke color (`#FF5733`).
pub const STROKE_COLOR: Color = Color::from_rgba8(0xFF, 0x57, 0x33, 0xFF);

/// Default stroke width in surface pixels.
pub const STROKE_WIDTH: f64 = 3.0;

/// Offset applied to the start of an isolated segment so a single click still
/// leaves a visible dot.
const DOT_NUDGE: Vec2 = Vec2::new(-1.0, 0.0);

/// One recorded point plus whether it connects to the previous point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeSegment {
    /// Surface-local position.
    pub point: Point,
    /// `false` starts a new disconnected stroke (pen down), `true` continues
    /// the previous segment (pen drag).
    pub continues_prior: bool,
}

impl StrokeSegment {
    /// A segment that starts a new stroke.
    pub fn start(point: Point) -> Self {
        Self {
            point,
            continues_prior: false,
        }
    }

    /// A segment that continues the previous one.
    pub fn continuation(point: Point) -> Self {
        Self {
            point,
            continues_prior: true,
        }
    }
}

/// Ordered, append-only record of captured segments.
///
/// Insertion order is drawing order. There is no way to remove or edit a
/// segment once recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeStore {
    segments: Vec<StrokeSegment>,
}

impl StrokeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment.
    pub fn push(&mut self, segment: StrokeSegment) {
        self.segments.push(segment);
    }

    /// Number of recorded segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// All segments in drawing order.
    pub fn segments(&self) -> &[StrokeSegment] {
        &self.segments
    }

    /// The most recently recorded segment.
    pub fn last(&self) -> Option<&StrokeSegment> {
        self.segments.last()
    }

    /// Line geometry implied by the store, one line per segment.
    ///
    /// A continuing segment is joined to its predecessor. Any other segment
    /// (including a continuation at index 0) becomes a one-pixel line ending at
    /// its own point.
    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.segments.iter().enumerate().map(|(i, segment)| {
            let start = match i.checked_sub(1) {
                Some(prev) if segment.continues_prior => self.segments[prev].point,
                _ => segment.point + DOT_NUDGE,
            };
            Line::new(start, segment.point)
        })
    }
}

/// Fixed style every line segment is stroked with.
///
/// Joins are always round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: STROKE_COLOR,
            width: STROKE_WIDTH,
        }
    }
}
