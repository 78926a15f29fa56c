use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::application::{feed_store::FeedStateStore, ports::ChannelEvent};
use crate::domain::{
    detection::DetectionMessage,
    errors::DomainResult,
    sensor::SensorReading,
    status::{indicator_text, transition, ConnectionStatus, FeedKind, LinkEvent},
};

/// Exclusive writer of one feed's status indicator.
pub struct StatusIndicator {
    feed: FeedKind,
    store: Arc<FeedStateStore>,
}

impl StatusIndicator {
    /// Claims the indicator for a fresh channel instance, resetting it to `Connecting`.
    pub fn claim(feed: FeedKind, store: Arc<FeedStateStore>) -> Self {
        store.set_status(feed, ConnectionStatus::Connecting);
        Self { feed, store }
    }

    pub fn feed(&self) -> FeedKind {
        self.feed
    }

    pub fn current(&self) -> ConnectionStatus {
        self.store.status(self.feed)
    }

    /// Applies the shared state machine. Returns the new status when it changed.
    pub fn apply(&self, event: LinkEvent) -> Option<ConnectionStatus> {
        let next = transition(self.current(), event)?;
        self.store.set_status(self.feed, next);
        match next {
            ConnectionStatus::Failed => error!("{}", indicator_text(self.feed, next)),
            ConnectionStatus::Disconnected => warn!("{}", indicator_text(self.feed, next)),
            _ => info!("{}", indicator_text(self.feed, next)),
        }
        Some(next)
    }
}

/// Decodes one feed's payloads and writes that feed's slice of the store.
pub trait PayloadHandler: Send + Sync {
    fn feed(&self) -> FeedKind;
    /// What a channel-level error means for this feed's indicator.
    fn error_event(&self) -> LinkEvent {
        LinkEvent::Down
    }
    /// Must not touch the store unless the whole payload decoded.
    fn apply(&self, payload: &str, store: &FeedStateStore) -> DomainResult<()>;
}

#[derive(Debug, Clone, Copy)]
pub struct DetectionPayload;

impl PayloadHandler for DetectionPayload {
    fn feed(&self) -> FeedKind {
        FeedKind::Detections
    }

    fn apply(&self, payload: &str, store: &FeedStateStore) -> DomainResult<()> {
        if let Some(boxes) = DetectionMessage::decode(payload)?.boxes {
            debug!("Received {} boxes", boxes.len());
            store.set_detections(boxes);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SensorPayload;

impl PayloadHandler for SensorPayload {
    fn feed(&self) -> FeedKind {
        FeedKind::Sensors
    }

    /// The sensor indicator has a dedicated error state.
    fn error_event(&self) -> LinkEvent {
        LinkEvent::Failed
    }

    fn apply(&self, payload: &str, store: &FeedStateStore) -> DomainResult<()> {
        let reading = SensorReading::decode(payload)?;
        if reading.is_empty() {
            debug!("Sensor message without readings: {}", payload);
        }
        store.apply_reading(reading);
        Ok(())
    }
}

/// Owns one message channel (detections or sensors) for its whole lifetime.
pub struct ChannelSupervisor<H: PayloadHandler> {
    indicator: StatusIndicator,
    handler: H,
    store: Arc<FeedStateStore>,
}

impl<H: PayloadHandler> ChannelSupervisor<H> {
    pub fn new(handler: H, store: Arc<FeedStateStore>) -> Self {
        let indicator = StatusIndicator::claim(handler.feed(), store.clone());
        Self { indicator, handler, store }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.indicator.current()
    }

    pub fn handle(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Opened => {
                self.indicator.apply(LinkEvent::Up);
            }
            ChannelEvent::Closed => {
                self.indicator.apply(LinkEvent::Down);
            }
            ChannelEvent::Error(reason) => {
                error!("{} channel error: {}", self.indicator.feed().indicator_prefix(), reason);
                self.indicator.apply(self.handler.error_event());
            }
            ChannelEvent::Message(payload) => {
                // A bad message is a data problem, never a connection problem.
                if let Err(e) = self.handler.apply(&payload, &self.store) {
                    warn!(
                        "Invalid JSON from {} server, message dropped: {}",
                        self.indicator.feed().indicator_prefix(),
                        e
                    );
                }
            }
        }
    }

    /// Drains the channel in order until it ends. Returns the final status.
    pub async fn run(mut self, mut events: mpsc::Receiver<ChannelEvent>) -> ConnectionStatus {
        while let Some(event) = events.recv().await {
            self.handle(event);
        }
        // Channel gone without an explicit close still means the link is down.
        self.indicator.apply(LinkEvent::Down);
        self.status()
    }
}
