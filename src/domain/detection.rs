use serde::{Deserialize, Serialize};

use super::errors::DomainResult;

/// A detection rectangle in source-frame units (see `geometry::SOURCE_FRAME`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub label: Option<String>,
}

impl DetectionBox {
    /// Label to draw, if any. Empty labels get no chip.
    pub fn visible_label(&self) -> Option<&str> {
        self.label.as_deref().filter(|l| !l.is_empty())
    }
}

/// Inbound message of the detection feed. Only `boxes` matters; anything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionMessage {
    #[serde(default)]
    pub boxes: Option<Vec<DetectionBox>>,
}

impl DetectionMessage {
    pub fn decode(payload: &str) -> DomainResult<Self> {
        Ok(serde_json::from_str(payload)?)
    }
}
