//! CPU renderer backed by a tiny-skia pixmap.

use crate::export::SurfaceSnapshot;
use crate::renderer::{RenderResult, Renderer, RendererError};
use kurbo::Line;
use scribble_core::stroke::StrokeStyle;
use tiny_skia::{Color, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Drawing surface rendered on the CPU.
pub struct PixmapRenderer {
    pixmap: Pixmap,
}

impl PixmapRenderer {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(RendererError::InvalidSize { width, height })?;
        Ok(Self { pixmap })
    }

    /// The underlying pixmap (premultiplied RGBA).
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight-alpha RGBA of a single pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }
}

impl Renderer for PixmapRenderer {
    fn dimensions(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    fn stroke_line(&mut self, line: Line, style: &StrokeStyle) {
        // Closing the two-point path rounds both ends through the join.
        let mut pb = PathBuilder::new();
        pb.move_to(line.p0.x as f32, line.p0.y as f32);
        pb.line_to(line.p1.x as f32, line.p1.y as f32);
        pb.close();
        let Some(path) = pb.finish() else {
            log::trace!("Skipping degenerate line {:?}", line);
            return;
        };

        let rgba = style.color.to_rgba8();
        let mut paint = Paint::default();
        paint.set_color_rgba8(rgba.r, rgba.g, rgba.b, rgba.a);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: style.width as f32,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    fn snapshot(&self) -> SurfaceSnapshot {
        SurfaceSnapshot::from_premultiplied(
            self.pixmap.width(),
            self.pixmap.height(),
            self.pixmap.data().to_vec(),
        )
        .unwrap_or_else(|| SurfaceSnapshot::blank(self.pixmap.width(), self.pixmap.height()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use scribble_core::stroke::{StrokeSegment, StrokeStore};

    fn sample_strokes() -> StrokeStore {
        let mut strokes = StrokeStore::new();
        strokes.push(StrokeSegment::start(Point::new(20.0, 20.0)));
        strokes.push(StrokeSegment::continuation(Point::new(60.0, 40.0)));
        strokes.push(StrokeSegment::continuation(Point::new(80.0, 90.0)));
        strokes.push(StrokeSegment::start(Point::new(150.0, 30.0)));
        strokes
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            PixmapRenderer::new(0, 10),
            Err(RendererError::InvalidSize { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_new_surface_is_transparent() {
        let renderer = PixmapRenderer::new(16, 16).unwrap();
        assert_eq!(renderer.pixel(8, 8), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_line_paints_stroke_color() {
        let mut renderer = PixmapRenderer::new(100, 100).unwrap();
        renderer.stroke_line(Line::new((10.0, 50.5), (90.0, 50.5)), &StrokeStyle::default());

        let [r, g, b, a] = renderer.pixel(50, 50).unwrap();
        assert_eq!(a, 255);
        assert_eq!((r, g, b), (0xFF, 0x57, 0x33));
        assert_eq!(renderer.pixel(50, 10), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_dot_marks_isolated_click() {
        let mut strokes = StrokeStore::new();
        strokes.push(StrokeSegment::start(Point::new(30.0, 30.0)));

        let mut renderer = PixmapRenderer::new(64, 64).unwrap();
        renderer.render(&strokes, &StrokeStyle::default());

        let [.., a] = renderer.pixel(29, 29).unwrap();
        assert!(a > 0);
    }

    #[test]
    fn test_render_is_idempotent() {
        let strokes = sample_strokes();
        let mut renderer = PixmapRenderer::new(200, 120).unwrap();

        renderer.render(&strokes, &StrokeStyle::default());
        let first = renderer.pixmap().data().to_vec();
        renderer.render(&strokes, &StrokeStyle::default());
        let second = renderer.pixmap().data().to_vec();

        assert_eq!(first, second);
    }

    #[test]
    fn test_render_clears_previous_content() {
        let mut renderer = PixmapRenderer::new(64, 64).unwrap();
        renderer.stroke_line(Line::new((0.0, 10.0), (64.0, 10.0)), &StrokeStyle::default());

        renderer.render(&StrokeStore::new(), &StrokeStyle::default());

        assert!(renderer.pixmap().data().iter().all(|&byte| byte == 0));
    }

    #[test]
    fn test_out_of_bounds_clips_silently() {
        let mut strokes = StrokeStore::new();
        strokes.push(StrokeSegment::start(Point::new(-100.0, -100.0)));
        strokes.push(StrokeSegment::continuation(Point::new(5000.0, -80.0)));

        let mut renderer = PixmapRenderer::new(32, 32).unwrap();
        renderer.render(&strokes, &StrokeStyle::default());

        assert!(renderer.pixmap().data().iter().all(|&byte| byte == 0));
    }

    #[test]
    fn test_snapshot_matches_surface() {
        let mut renderer = PixmapRenderer::new(40, 30).unwrap();
        renderer.render(&sample_strokes(), &StrokeStyle::default());

        let snapshot = renderer.snapshot();
        assert_eq!(snapshot.dimensions(), (40, 30));
    }
}
