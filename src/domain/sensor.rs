use serde::{Deserialize, Serialize};

use super::errors::DomainResult;

/// One message of the sensor feed. Each field is independent and may be absent.
/// `null` is treated the same as a missing field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    #[serde(default)]
    pub gyro: Option<f64>,
    #[serde(default)]
    pub ultrasonic: Option<f64>,
}

impl SensorReading {
    pub fn decode(payload: &str) -> DomainResult<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn is_empty(&self) -> bool {
        self.gyro.is_none() && self.ultrasonic.is_none()
    }
}

/// Readout line shown for the gyro value. A failed sensor feed replaces any
/// earlier value; a fresh feed instance shows the last known value again.
pub fn gyro_readout(gyro: Option<f64>, sensors_failed: bool) -> String {
    match gyro {
        _ if sensors_failed => "Could not connect to sensor server.".to_string(),
        Some(g) => format!("Geschützneigung: {g}"),
        None => "Geschützneigung: --".to_string(),
    }
}
