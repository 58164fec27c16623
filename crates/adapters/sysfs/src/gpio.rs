//! A single output pin under `/sys/class/gpio`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::SysfsError;

/// Attempts made while waiting for an exported pin directory to appear.
const EXPORT_ATTEMPTS: u32 = 10;
const EXPORT_POLL: Duration = Duration::from_millis(20);

/// An exported GPIO configured as an output.
#[derive(Debug, Clone)]
pub struct GpioPin {
    number: u32,
    value_path: PathBuf,
    active_low: bool,
}

impl GpioPin {
    /// Export pin `number` below `root` (if needed) and configure it as an
    /// output that starts off.
    ///
    /// # Errors
    ///
    /// Returns [`SysfsError::Io`] if the pin cannot be exported or configured.
    pub async fn open(root: &Path, number: u32, active_low: bool) -> Result<Self, SysfsError> {
        let dir = root.join(format!("gpio{number}"));
        if !dir.exists() {
            tracing::debug!(pin = number, "exporting gpio");
            write(&root.join("export"), &number.to_string()).await?;
        }

        // udev may need a moment to create and chown the pin directory
        let direction = dir.join("direction");
        let mut attempt = 1;
        loop {
            match write(&direction, "out").await {
                Ok(()) => break,
                Err(err) if attempt >= EXPORT_ATTEMPTS => return Err(err),
                Err(_) => {
                    attempt += 1;
                    tokio::time::sleep(EXPORT_POLL).await;
                }
            }
        }

        let pin = Self {
            number,
            value_path: dir.join("value"),
            active_low,
        };
        pin.set(false).await?;
        Ok(pin)
    }

    /// Drive the pin to the logical level `on`.
    ///
    /// # Errors
    ///
    /// Returns [`SysfsError::Io`] if the value file cannot be written.
    pub async fn set(&self, on: bool) -> Result<(), SysfsError> {
        let level = if on == self.active_low { "0" } else { "1" };
        write(&self.value_path, level).await
    }

    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }
}

async fn write(path: &Path, content: &str) -> Result<(), SysfsError> {
    tokio::fs::write(path, content)
        .await
        .map_err(|source| SysfsError::Io {
            path: path.to_path_buf(),
            source,
        })
}
