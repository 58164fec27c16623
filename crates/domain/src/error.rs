//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`SilvanusError`] via `#[from]`.

use std::time::Duration;

use crate::output::Output;

/// Top-level error shared by every layer.
#[derive(Debug, thiserror::Error)]
pub enum SilvanusError {
    #[error("invalid settings")]
    Config(#[from] ConfigError),

    #[error("hardware error")]
    Hardware(#[from] HardwareError),

    #[error("sensor error")]
    Sensor(#[from] SensorError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The controller task is gone (shut down or crashed).
    #[error("controller unavailable")]
    Unavailable,
}

/// Settings rejected by validation or by the schedule.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("lightTime ({light_time} min) exceeds lightInterval ({light_interval} h)")]
    LightTimeExceedsInterval { light_time: i64, light_interval: i64 },

    #[error(
        "one watering event ({per_event} l) exceeds waterAmountPerDay ({amount_per_day} l)"
    )]
    EventExceedsDailyAmount { per_event: f64, amount_per_day: f64 },

    #[error(
        "waterAmountPerDay ({amount_per_day} l) is not a whole number of {per_event} l watering events"
    )]
    UnevenWateringEvents { per_event: f64, amount_per_day: f64 },

    #[error("{events} watering events of {water_time} min do not fit in one day")]
    EventsOverlap { events: u32, water_time: i64 },

    #[error("malformed settings patch: {0}")]
    Malformed(String),
}

/// An actuator write that the hardware did not confirm.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    #[error("failed to switch {output}")]
    Write {
        output: Output,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{output} output is not available")]
    Unavailable { output: Output },
}

/// A sensor read that produced no usable value.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("{sensor} read timed out after {timeout:?}")]
    Timeout {
        sensor: &'static str,
        timeout: Duration,
    },

    #[error("{sensor} returned an implausible value")]
    Garbage { sensor: &'static str },

    #[error("failed to read {sensor}")]
    Read {
        sensor: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl SensorError {
    /// Name of the sensor that failed.
    #[must_use]
    pub fn sensor(&self) -> &'static str {
        match self {
            Self::Timeout { sensor, .. } | Self::Garbage { sensor } | Self::Read { sensor, .. } => {
                sensor
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_wrap_config_error_via_from() {
        let err: SilvanusError = ConfigError::NotPositive {
            field: "lightInterval",
        }
        .into();
        assert!(matches!(
            err,
            SilvanusError::Config(ConfigError::NotPositive { .. })
        ));
    }

    #[test]
    fn should_display_field_name_in_not_positive_error() {
        let err = ConfigError::NotPositive {
            field: "waterTime",
        };
        assert_eq!(err.to_string(), "waterTime must be greater than zero");
    }

    #[test]
    fn should_report_sensor_name() {
        let err = SensorError::Timeout {
            sensor: "temperature",
            timeout: Duration::from_millis(500),
        };
        assert_eq!(err.sensor(), "temperature");
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn should_display_output_in_hardware_error() {
        let err = HardwareError::Unavailable {
            output: Output::Pump,
        };
        assert_eq!(err.to_string(), "pump output is not available");
    }
}
