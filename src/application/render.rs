use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::application::{
    dto::{OverlayFrame, StatusReport},
    feed_store::{FeedSnapshot, FeedStateStore},
    ports::OverlaySurface,
};
use crate::domain::{
    geometry::{Rect, RenderScale, Viewport},
    overlay::{
        DisplayList, Segment, StrokeStyle, BLACK, DISTANCE_CHIP, DISTANCE_TEXT, GREEN, LABEL_CHIP, WHITE,
    },
};

const CROSSHAIR_HALF: f64 = 20.0;
const CHIP_HEIGHT: f64 = 16.0;
const CHIP_PADDING: f64 = 4.0;

const CROSSHAIR_GLOW: StrokeStyle = StrokeStyle { color: GREEN, line_width: 3.0, glow: 10.0 };
const CROSSHAIR_CORE: StrokeStyle = StrokeStyle { color: WHITE, line_width: 1.0, glow: 0.0 };
const BOX_STROKE: StrokeStyle = StrokeStyle { color: GREEN, line_width: 2.0, glow: 5.0 };

/// One full paint of the overlay. Clears first; everything after depends on that.
pub fn render_cycle<S: OverlaySurface + ?Sized>(
    surface: &mut S,
    snapshot: &FeedSnapshot,
    scale: Option<RenderScale>,
) {
    surface.clear();
    draw_crosshair(surface);

    // Without a scale (zero-sized display) boxes have nowhere meaningful to go.
    let Some(scale) = scale else { return };
    for b in snapshot.boxes.iter() {
        let r = scale.map(b);
        surface.stroke_rect(r, BOX_STROKE);

        if let Some(label) = b.visible_label() {
            let w = surface.measure_text(label);
            surface.fill_rect(Rect::new(r.x, r.y - 20.0, w + 2.0 * CHIP_PADDING, CHIP_HEIGHT), LABEL_CHIP);
            surface.fill_text(label, r.x + CHIP_PADDING, r.y - 8.0, BLACK);
        }

        if let Some(distance) = snapshot.ultrasonic {
            if r.has_extent() {
                draw_distance(surface, r, distance);
            }
        }
    }
}

fn draw_crosshair<S: OverlaySurface + ?Sized>(surface: &mut S) {
    let cx = surface.width() / 2.0;
    let cy = surface.height() / 2.0;
    let arms = [
        Segment { from: (cx - CROSSHAIR_HALF, cy), to: (cx + CROSSHAIR_HALF, cy) },
        Segment { from: (cx, cy - CROSSHAIR_HALF), to: (cx, cy + CROSSHAIR_HALF) },
    ];
    surface.stroke_path(&arms, CROSSHAIR_GLOW);
    surface.stroke_path(&arms, CROSSHAIR_CORE);
}

fn draw_distance<S: OverlaySurface + ?Sized>(surface: &mut S, r: Rect, distance: f64) {
    let text = format!("{distance}");
    let w = surface.measure_text(&text);
    let baseline = r.y + r.height + 20.0;
    surface.fill_rect(
        Rect::new(r.x, baseline - CHIP_HEIGHT, w + 2.0 * CHIP_PADDING, CHIP_HEIGHT),
        DISTANCE_CHIP,
    );
    surface.fill_text(&text, r.x + CHIP_PADDING, baseline - CHIP_PADDING, DISTANCE_TEXT);
}

/// Continuously repaints the overlay and hands each frame to the display surfaces.
pub struct RenderLoop {
    store: Arc<FeedStateStore>,
    viewport: watch::Receiver<Viewport>,
    playing: watch::Receiver<bool>,
    frames: broadcast::Sender<Arc<OverlayFrame>>,
    period: Duration,
}

impl RenderLoop {
    pub fn new(
        store: Arc<FeedStateStore>,
        viewport: watch::Receiver<Viewport>,
        playing: watch::Receiver<bool>,
        frames: broadcast::Sender<Arc<OverlayFrame>>,
        refresh_hz: u32,
    ) -> Self {
        let period = Duration::from_secs_f64(1.0 / f64::from(refresh_hz.max(1)));
        Self { store, viewport, playing, frames, period }
    }

    /// Waits for the video to show frames, then never returns.
    pub async fn run(mut self) {
        if self.playing.wait_for(|p| *p).await.is_err() {
            return;
        }
        info!("🎯 Video is playing, render loop started ({:?} per frame)", self.period);

        let mut pacer = tokio::time::interval(self.period);
        pacer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut surface = DisplayList::new();
        let mut seq: u64 = 0;

        loop {
            let frame = self.paint(&mut surface, seq);
            if self.frames.receiver_count() > 0 {
                let _ = self.frames.send(Arc::new(frame));
            }
            seq = seq.wrapping_add(1);
            if seq % 600 == 0 {
                debug!("Rendered {} overlay frames", seq);
            }
            pacer.tick().await;
        }
    }

    fn paint(&self, surface: &mut DisplayList, seq: u64) -> OverlayFrame {
        let viewport = *self.viewport.borrow();
        surface.resize(viewport.surface.width, viewport.surface.height);
        render_cycle(surface, &self.store.current_snapshot(), viewport.scale);
        OverlayFrame {
            seq,
            width: surface.width(),
            height: surface.height(),
            ops: surface.take_ops(),
            status: StatusReport::from_store(&self.store),
        }
    }
}
