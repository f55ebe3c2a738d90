//! Scribble Core Library
//!
//! Platform-agnostic stroke capture and the classification wire contract.

pub mod input;
pub mod predict;
pub mod stroke;

pub use input::{InputCapture, InputEffect, PointerEvent};
pub use kurbo::Point;
pub use predict::{
    DataUri, DataUriError, ErrorResponse, PNG_MIME, PREDICT_PATH, Prediction, PredictRequest,
    PredictResponse,
};
pub use stroke::{StrokeSegment, StrokeStore, StrokeStyle};
