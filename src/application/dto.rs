use serde::{Deserialize, Serialize};

use crate::application::feed_store::FeedStateStore;
use crate::domain::{
    config::{FeedEndpoints, ObserverConfig},
    geometry::Viewport,
    overlay::DrawOp,
    sensor::gyro_readout,
    status::{indicator_text, ConnectionStatus, FeedKind, TransportState},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedIndicator {
    pub feed: FeedKind,
    pub status: ConnectionStatus,
    pub text: String,
}

/// Everything the status bar shows besides the overlay itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub indicators: Vec<FeedIndicator>,
    pub gyro: Option<f64>,
    pub gyro_readout: String,
}

impl StatusReport {
    pub fn from_store(store: &FeedStateStore) -> Self {
        let indicators = FeedKind::ALL
            .iter()
            .map(|&feed| {
                let status = store.status(feed);
                FeedIndicator { feed, status, text: indicator_text(feed, status) }
            })
            .collect();
        let gyro = store.gyro();
        let sensors_failed = store.status(FeedKind::Sensors) == ConnectionStatus::Failed;
        Self { indicators, gyro, gyro_readout: gyro_readout(gyro, sensors_failed) }
    }
}

/// Status bar plus the geometry the overlay is currently locked to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub report: StatusReport,
    pub viewport: Viewport,
}

/// One render cycle as shipped to display surfaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayFrame {
    pub seq: u64,
    pub width: f64,
    pub height: f64,
    pub ops: Vec<DrawOp>,
    pub status: StatusReport,
}

/// Messages a display surface sends about its media element and peer connection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceInbound {
    Offer { sdp: String },
    Ice { state: TransportState },
    Playing { width: f64, height: f64 },
    Metadata { width: f64, height: f64 },
    Resize { width: f64, height: f64 },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceOutbound<'a> {
    Answer { sdp: &'a str },
    /// The offer could not be negotiated; no answer will follow.
    Error { message: &'a str },
    Frame(&'a OverlayFrame),
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigResponse {
    pub config: ObserverConfig,
    pub endpoints: FeedEndpoints,
}
