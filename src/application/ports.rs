use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{
    config::ObserverConfig,
    errors::DomainResult,
    geometry::Rect,
    overlay::{Rgba, Segment, StrokeStyle},
};

#[async_trait]
pub trait ConfigSourcePort: Send + Sync {
    async fn fetch(&self) -> DomainResult<ObserverConfig>;
}

/// Offer/answer exchange of the video transport.
#[async_trait]
pub trait SignalingPort: Send + Sync {
    async fn exchange(&self, offer_sdp: &str) -> DomainResult<String>;
}

/// What an open message channel delivers to its supervisor, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Opened,
    Message(String),
    Error(String),
    Closed,
}

#[async_trait]
pub trait MessageChannelPort: Send + Sync {
    /// Starts connecting to `url`. Every outcome, including a failed connect,
    /// arrives as events on the returned receiver.
    async fn open(&self, url: &str) -> mpsc::Receiver<ChannelEvent>;
}

/// Drawing target of the render loop.
pub trait OverlaySurface {
    fn resize(&mut self, width: f64, height: f64);
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn clear(&mut self);
    fn stroke_path(&mut self, segments: &[Segment], stroke: StrokeStyle);
    fn stroke_rect(&mut self, rect: Rect, stroke: StrokeStyle);
    fn fill_rect(&mut self, rect: Rect, color: Rgba);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: Rgba);
    fn measure_text(&self, text: &str) -> f64;
}
