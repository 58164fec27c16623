//! sysfs-specific error type.

use std::path::PathBuf;

use silvanus_domain::error::{HardwareError, SensorError};
use silvanus_domain::output::Output;

/// Errors originating from sysfs attribute files.
#[derive(Debug, thiserror::Error)]
pub enum SysfsError {
    /// Reading or writing an attribute file failed.
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An attribute file held something other than a number.
    #[error("unexpected content in {path}: {content:?}")]
    Parse { path: PathBuf, content: String },
}

impl SysfsError {
    /// Attribute a failed GPIO write to `output`.
    #[must_use]
    pub fn into_hardware(self, output: Output) -> HardwareError {
        HardwareError::Write {
            output,
            source: Box::new(self),
        }
    }

    /// Attribute a failed attribute read to `sensor`.
    #[must_use]
    pub fn into_sensor(self, sensor: &'static str) -> SensorError {
        SensorError::Read {
            sensor,
            source: Box::new(self),
        }
    }
}
