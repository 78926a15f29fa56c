use std::sync::Arc;
use tokio::sync::broadcast;

use crate::application::{dto::OverlayFrame, surface::SurfaceContext};
use crate::domain::config::{FeedEndpoints, ObserverConfig};

/// Shared state of the Axum handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Store, mapper and video sessions every display surface connection shares.
    pub surface: SurfaceContext,
    /// Render loop output, fanned out to every connected display surface.
    pub frames: broadcast::Sender<Arc<OverlayFrame>>,
    pub config: ObserverConfig,
    pub endpoints: FeedEndpoints,
}
