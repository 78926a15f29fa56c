use serde::{Deserialize, Serialize};

/// Feed locations served by the config endpoint. All four fields are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObserverConfig {
    #[serde(rename = "RASPBERRY_IP")]
    pub raspberry_ip: String,
    #[serde(rename = "WEBSOCKET_PORT")]
    pub websocket_port: u16,
    #[serde(rename = "LAB_PC_IP")]
    pub lab_pc_ip: String,
    #[serde(rename = "BOUNDING_BOX_PORT")]
    pub bounding_box_port: u16,
}

impl ObserverConfig {
    /// Used whenever the config endpoint is unreachable or answers garbage.
    pub fn fallback() -> Self {
        Self {
            raspberry_ip: "localhost".into(),
            websocket_port: 8765,
            lab_pc_ip: "localhost".into(),
            bounding_box_port: 8001,
        }
    }

    pub fn endpoints(&self, video_port: u16) -> FeedEndpoints {
        FeedEndpoints {
            video_whep: format!("http://{}:{}/stream/whep", self.raspberry_ip, video_port),
            detections_ws: format!("ws://{}:{}", self.lab_pc_ip, self.bounding_box_port),
            sensors_ws: format!("ws://{}:{}", self.raspberry_ip, self.websocket_port),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEndpoints {
    pub video_whep: String,
    pub detections_ws: String,
    pub sensors_ws: String,
}
