use serde::{Deserialize, Serialize};

use super::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

pub const GREEN: Rgba = Rgba::new(0, 255, 0, 1.0);
pub const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);
pub const BLACK: Rgba = Rgba::new(0, 0, 0, 1.0);
pub const LABEL_CHIP: Rgba = Rgba::new(0, 255, 0, 0.8);
pub const DISTANCE_CHIP: Rgba = Rgba::new(0, 0, 0, 0.5);
pub const DISTANCE_TEXT: Rgba = Rgba::new(0, 255, 0, 0.8);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub line_width: f64,
    /// Shadow blur radius in pixels; the glow always uses the overlay green.
    pub glow: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

/// Every text on the overlay uses this one font.
pub const FONT: &str = "12px monospace";

/// One draw primitive of a render cycle, in surface pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Clear { width: f64, height: f64 },
    Path { segments: Vec<Segment>, stroke: StrokeStyle },
    StrokeRect { rect: Rect, stroke: StrokeStyle },
    FillRect { rect: Rect, color: Rgba },
    Text { text: String, x: f64, y: f64, color: Rgba, font: String },
}

/// Horizontal advance of one glyph of `FONT` (0.6 em).
pub const MONO_ADVANCE: f64 = 7.2;

/// The draw primitives of one render cycle, ready to ship to a display surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the recorded ops, leaving the list empty for the next cycle.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }
}
