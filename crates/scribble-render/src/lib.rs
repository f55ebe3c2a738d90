//! Scribble Render Library
//!
//! Renderer abstraction, a CPU implementation, and the bitmap export used for
//! classification requests.

pub mod export;
mod pixmap;
mod renderer;

pub use export::{
    EXPORT_SIZE, EncodeError, EncodeResult, ExportBuffer, SurfaceSnapshot, collapse_pixel,
    export_data_uri,
};
pub use pixmap::PixmapRenderer;
pub use renderer::{RenderResult, Renderer, RendererError};
