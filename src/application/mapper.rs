use tokio::sync::watch;
use tracing::debug;

use crate::domain::geometry::{RenderScale, Viewport};

/// Keeps the overlay surface locked to the displayed video box.
/// Written by the display surface's geometry events, read by the render loop.
pub struct CoordinateMapper {
    viewport: watch::Sender<Viewport>,
}

impl CoordinateMapper {
    pub fn new() -> Self {
        Self { viewport: watch::Sender::new(Viewport::fit(0.0, 0.0)) }
    }

    /// Resizes the overlay to `display_width` x `display_height` and recomputes the scale.
    /// Surface size and scale are published together so no cycle sees one without the other.
    pub fn recompute(&self, display_width: f64, display_height: f64) -> Option<RenderScale> {
        let next = Viewport::fit(display_width, display_height);
        self.viewport.send_if_modified(|vp| {
            if *vp == next {
                return false;
            }
            *vp = next;
            true
        });
        debug!("Viewport {}x{} -> {:?}", display_width, display_height, next.scale);
        next.scale
    }

    pub fn current(&self) -> Viewport {
        *self.viewport.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Viewport> {
        self.viewport.subscribe()
    }
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self::new()
    }
}
