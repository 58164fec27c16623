//! Status: latest sensor readings and actuator state.
//!
//! [`Status`] is the internal snapshot, which tracks reading freshness.
//! [`StatusReport`] is the projection served on `GET /status`.

use serde::{Deserialize, Serialize};

use crate::light_mode::LightMode;
use crate::time::Timestamp;

/// A sensor value together with its freshness.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Reading {
    pub value: f64,
    /// When `value` was last read successfully. `None` until the first read.
    pub updated_at: Option<Timestamp>,
    /// Set when the most recent read failed and `value` is retained.
    pub stale: bool,
}

impl Reading {
    /// A value that was just read.
    #[must_use]
    pub fn fresh(value: f64, at: Timestamp) -> Self {
        Self {
            value,
            updated_at: Some(at),
            stale: false,
        }
    }

    /// Keep the previous value but flag it as no longer current.
    #[must_use]
    pub fn into_stale(self) -> Self {
        Self {
            stale: true,
            ..self
        }
    }

    /// Whether the value came from a read in the current tick.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.updated_at.is_some() && !self.stale
    }
}

/// Full controller status, rebuilt on every tick.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Status {
    pub temperature: Reading,
    pub moisture: Reading,
    pub light_on: bool,
    pub pump_on: bool,
    pub light_mode: LightMode,
    /// Time of the last completed tick.
    pub updated_at: Option<Timestamp>,
}

impl Status {
    /// Project onto the public `/status` shape.
    #[must_use]
    pub fn report(&self) -> StatusReport {
        StatusReport {
            temperature: self.temperature.value,
            moisture: self.moisture.value,
            light_on: self.light_on,
            pump_on: self.pump_on,
        }
    }
}

/// Body of `GET /status`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub temperature: f64,
    pub moisture: f64,
    #[serde(rename = "light-on")]
    pub light_on: bool,
    #[serde(rename = "pump-on")]
    pub pump_on: bool,
}
