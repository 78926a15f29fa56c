use serde::{Deserialize, Serialize};

use super::detection::DetectionBox;

/// Resolution the upstream detector expresses its coordinates in.
pub const SOURCE_FRAME: FrameSize = FrameSize { width: 1280.0, height: 1080.0 };

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn has_extent(&self) -> bool {
        self.width != 0.0 && self.height != 0.0
    }
}

/// Per-axis factors from source-frame units to surface pixels. Both are always > 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderScale {
    pub scale_x: f64,
    pub scale_y: f64,
}

impl RenderScale {
    /// Independent ratios per axis, no aspect lock. `None` while the display has no extent.
    pub fn recompute(display_width: f64, display_height: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(display_width) || !valid(display_height) {
            return None;
        }
        Some(Self {
            scale_x: display_width / SOURCE_FRAME.width,
            scale_y: display_height / SOURCE_FRAME.height,
        })
    }

    pub fn map(&self, b: &DetectionBox) -> Rect {
        Rect {
            x: b.x * self.scale_x,
            y: b.y * self.scale_y,
            width: b.width * self.scale_x,
            height: b.height * self.scale_y,
        }
    }
}

/// What the render loop needs to know about the displayed video box:
/// the overlay surface size (always matching the video) and the scale, if any.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub surface: FrameSize,
    pub scale: Option<RenderScale>,
}

impl Viewport {
    /// Resizes the overlay to the displayed video box and recomputes the scale in one step.
    pub fn fit(display_width: f64, display_height: f64) -> Self {
        let clamp = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self {
            surface: FrameSize { width: clamp(display_width), height: clamp(display_height) },
            scale: RenderScale::recompute(display_width, display_height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bx(x: f64, y: f64, w: f64, h: f64) -> DetectionBox {
        DetectionBox { x, y, width: w, height: h, label: None }
    }

    #[test]
    fn scale_is_exact_ratio_per_axis() {
        for (w, h) in [(1280.0, 1080.0), (640.0, 540.0), (1920.0, 1080.0), (333.0, 777.0), (1.0, 1.0)] {
            let s = RenderScale::recompute(w, h).unwrap();
            assert_eq!(s.scale_x, w / 1280.0);
            assert_eq!(s.scale_y, h / 1080.0);
        }
    }

    #[test]
    fn native_size_is_identity() {
        assert_eq!(RenderScale::recompute(1280.0, 1080.0), Some(RenderScale { scale_x: 1.0, scale_y: 1.0 }));
    }

    #[test]
    fn resize_to_half_scales_boxes_by_half() {
        let s = RenderScale::recompute(640.0, 540.0).unwrap();
        assert_eq!(s, RenderScale { scale_x: 0.5, scale_y: 0.5 });
        assert_eq!(s.map(&bx(100.0, 50.0, 40.0, 30.0)), Rect::new(50.0, 25.0, 20.0, 15.0));
    }

    #[test]
    fn non_uniform_stretch_is_preserved() {
        let s = RenderScale::recompute(2560.0, 540.0).unwrap();
        assert_eq!(s.map(&bx(10.0, 10.0, 10.0, 10.0)), Rect::new(20.0, 5.0, 20.0, 5.0));
    }

    #[test]
    fn zero_or_bogus_extent_defers_scale() {
        assert_eq!(RenderScale::recompute(0.0, 1080.0), None);
        assert_eq!(RenderScale::recompute(640.0, 0.0), None);
        assert_eq!(RenderScale::recompute(-5.0, 10.0), None);
        assert_eq!(RenderScale::recompute(f64::NAN, 10.0), None);

        let vp = Viewport::fit(0.0, 0.0);
        assert_eq!(vp.surface, FrameSize { width: 0.0, height: 0.0 });
        assert!(vp.scale.is_none());
    }

    #[test]
    fn viewport_matches_video_box() {
        let vp = Viewport::fit(800.0, 450.0);
        assert_eq!(vp.surface, FrameSize { width: 800.0, height: 450.0 });
        assert_eq!(vp.scale, RenderScale::recompute(800.0, 450.0));
    }
}
