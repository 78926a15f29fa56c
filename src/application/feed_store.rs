use std::sync::Arc;
use tokio::sync::watch;

use crate::domain::{
    detection::DetectionBox,
    sensor::SensorReading,
    status::{ConnectionStatus, FeedKind},
};

/// What the render loop paints from.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub boxes: Arc<[DetectionBox]>,
    pub ultrasonic: Option<f64>,
}

/// Latest known value of every feed field plus the per-feed status.
///
/// Each field lives in its own `watch` cell: one writer per field, whole-value
/// replacement, and readers never see a half-written detection list.
/// Nothing here is ever removed, only replaced.
pub struct FeedStateStore {
    detections: watch::Sender<Arc<[DetectionBox]>>,
    gyro: watch::Sender<Option<f64>>,
    ultrasonic: watch::Sender<Option<f64>>,
    video: watch::Sender<ConnectionStatus>,
    detections_status: watch::Sender<ConnectionStatus>,
    sensors_status: watch::Sender<ConnectionStatus>,
}

impl FeedStateStore {
    pub fn new() -> Self {
        Self {
            detections: watch::Sender::new(Arc::from(Vec::new())),
            gyro: watch::Sender::new(None),
            ultrasonic: watch::Sender::new(None),
            video: watch::Sender::new(ConnectionStatus::Connecting),
            detections_status: watch::Sender::new(ConnectionStatus::Connecting),
            sensors_status: watch::Sender::new(ConnectionStatus::Connecting),
        }
    }

    pub fn set_detections(&self, boxes: Vec<DetectionBox>) {
        self.detections.send_replace(Arc::from(boxes));
    }

    pub fn set_gyro(&self, value: f64) {
        self.gyro.send_replace(Some(value));
    }

    pub fn set_ultrasonic(&self, value: f64) {
        self.ultrasonic.send_replace(Some(value));
    }

    /// Writes only the fields present in the reading.
    pub fn apply_reading(&self, reading: SensorReading) {
        if let Some(g) = reading.gyro {
            self.set_gyro(g);
        }
        if let Some(u) = reading.ultrasonic {
            self.set_ultrasonic(u);
        }
    }

    pub fn gyro(&self) -> Option<f64> {
        *self.gyro.borrow()
    }

    pub fn current_snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            boxes: self.detections.borrow().clone(),
            ultrasonic: *self.ultrasonic.borrow(),
        }
    }

    fn status_cell(&self, feed: FeedKind) -> &watch::Sender<ConnectionStatus> {
        match feed {
            FeedKind::Video => &self.video,
            FeedKind::Detections => &self.detections_status,
            FeedKind::Sensors => &self.sensors_status,
        }
    }

    pub fn status(&self, feed: FeedKind) -> ConnectionStatus {
        *self.status_cell(feed).borrow()
    }

    /// Only the feed's own supervisor calls this.
    pub fn set_status(&self, feed: FeedKind, status: ConnectionStatus) {
        self.status_cell(feed).send_replace(status);
    }
}

impl Default for FeedStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bx(x: f64, label: &str) -> DetectionBox {
        DetectionBox { x, y: 0.0, width: 10.0, height: 10.0, label: Some(label.into()) }
    }

    #[test]
    fn starts_empty_and_connecting() {
        let store = FeedStateStore::new();
        let snap = store.current_snapshot();
        assert!(snap.boxes.is_empty());
        assert_eq!(snap.ultrasonic, None);
        assert_eq!(store.gyro(), None);
        for feed in FeedKind::ALL {
            assert_eq!(store.status(feed), ConnectionStatus::Connecting);
        }
    }

    #[test]
    fn detections_are_replaced_not_merged() {
        let store = FeedStateStore::new();
        let l1 = vec![bx(1.0, "a"), bx(2.0, "b")];
        let l2 = vec![bx(3.0, "c")];

        store.set_detections(l1);
        store.set_detections(l2.clone());
        assert_eq!(&*store.current_snapshot().boxes, l2.as_slice());

        store.set_detections(Vec::new());
        assert!(store.current_snapshot().boxes.is_empty());

        store.set_detections(l2.clone());
        assert_eq!(&*store.current_snapshot().boxes, l2.as_slice());
    }

    #[test]
    fn earlier_snapshot_is_not_affected_by_later_write() {
        let store = FeedStateStore::new();
        store.set_detections(vec![bx(1.0, "a")]);
        let before = store.current_snapshot();
        store.set_detections(vec![bx(2.0, "b"), bx(3.0, "c")]);
        assert_eq!(before.boxes.len(), 1);
        assert_eq!(before.boxes[0].x, 1.0);
    }

    #[test]
    fn gyro_only_reading_keeps_ultrasonic() {
        for prior in [None, Some(0.0), Some(42.0), Some(-1.5)] {
            let store = FeedStateStore::new();
            if let Some(u) = prior {
                store.set_ultrasonic(u);
            }
            store.apply_reading(SensorReading { gyro: Some(7.0), ultrasonic: None });
            assert_eq!(store.current_snapshot().ultrasonic, prior);
            assert_eq!(store.gyro(), Some(7.0));
        }
    }

    #[test]
    fn ultrasonic_only_reading_keeps_gyro() {
        let store = FeedStateStore::new();
        store.set_gyro(3.0);
        store.apply_reading(SensorReading { gyro: None, ultrasonic: Some(120.0) });
        assert_eq!(store.gyro(), Some(3.0));
        assert_eq!(store.current_snapshot().ultrasonic, Some(120.0));
    }

    #[test]
    fn status_fields_are_independent() {
        let store = FeedStateStore::new();
        store.set_status(FeedKind::Video, ConnectionStatus::Failed);
        assert_eq!(store.status(FeedKind::Detections), ConnectionStatus::Connecting);
        assert_eq!(store.status(FeedKind::Sensors), ConnectionStatus::Connecting);

        store.set_status(FeedKind::Sensors, ConnectionStatus::Connected);
        assert_eq!(store.status(FeedKind::Video), ConnectionStatus::Failed);
        assert_eq!(store.status(FeedKind::Sensors), ConnectionStatus::Connected);
    }
}
