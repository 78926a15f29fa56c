use crate::application::ports::OverlaySurface;
use crate::domain::{
    geometry::Rect,
    overlay::{DisplayList, DrawOp, Rgba, Segment, StrokeStyle, FONT, MONO_ADVANCE},
};

/// Records draw calls instead of rasterizing them; the display surface replays them.
impl OverlaySurface for DisplayList {
    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear { width: self.width, height: self.height });
    }

    fn stroke_path(&mut self, segments: &[Segment], stroke: StrokeStyle) {
        self.ops.push(DrawOp::Path { segments: segments.to_vec(), stroke });
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: StrokeStyle) {
        self.ops.push(DrawOp::StrokeRect { rect, stroke });
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: Rgba) {
        self.ops.push(DrawOp::Text { text: text.to_string(), x, y, color, font: FONT.to_string() });
    }

    fn measure_text(&self, text: &str) -> f64 {
        text.chars().count() as f64 * MONO_ADVANCE
    }
}
