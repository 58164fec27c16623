//! # silvanus-adapter-sysfs
//!
//! Linux board adapter that talks to the kernel through sysfs attribute
//! files, so no device-specific userspace library is needed.
//!
//! ## Wiring
//! - Grow-light and pump relays on GPIO outputs (`/sys/class/gpio`),
//!   optionally active-low.
//! - Air temperature from a hwmon `temp*_input` file (millidegrees Celsius).
//! - Soil moisture from an IIO `in_*_raw` file (12-bit ADC counts).
//!
//! ## Dependency rule
//! Depends on `silvanus-app` (port traits) and `silvanus-domain` only.

pub mod error;
pub mod gpio;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use silvanus_app::ports::{Actuators, Sensors};
use silvanus_domain::error::{HardwareError, SensorError};
use silvanus_domain::output::Output;

use crate::error::SysfsError;
use crate::gpio::GpioPin;

/// Largest value the moisture ADC can produce.
pub const MOISTURE_MAX_RAW: f64 = 4095.0;
/// Reads attempted before an out-of-range moisture value is reported.
pub const MOISTURE_ATTEMPTS: u32 = 5;
/// Pause between two moisture reads.
const MOISTURE_RETRY_DELAY: Duration = Duration::from_millis(1);

/// Where the board's pins and sensor attributes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysfsConfig {
    pub gpio_root: PathBuf,
    pub light_gpio: u32,
    pub pump_gpio: u32,
    pub active_low: bool,
    pub temperature_path: PathBuf,
    pub moisture_path: PathBuf,
}

impl Default for SysfsConfig {
    fn default() -> Self {
        Self {
            gpio_root: PathBuf::from("/sys/class/gpio"),
            light_gpio: 26,
            pump_gpio: 20,
            active_low: false,
            temperature_path: PathBuf::from("/sys/class/hwmon/hwmon0/temp1_input"),
            moisture_path: PathBuf::from("/sys/bus/iio/devices/iio:device0/in_voltage0_raw"),
        }
    }
}

/// A board driven through sysfs.
#[derive(Debug)]
pub struct SysfsBoard {
    light: GpioPin,
    pump: GpioPin,
    temperature_path: PathBuf,
    moisture_path: PathBuf,
}

impl SysfsBoard {
    /// Export and configure both output pins, leaving them off.
    ///
    /// # Errors
    ///
    /// Returns [`SysfsError`] if a pin cannot be set up.
    pub async fn open(config: SysfsConfig) -> Result<Self, SysfsError> {
        let light = GpioPin::open(&config.gpio_root, config.light_gpio, config.active_low).await?;
        let pump = GpioPin::open(&config.gpio_root, config.pump_gpio, config.active_low).await?;
        tracing::info!(
            light_gpio = light.number(),
            pump_gpio = pump.number(),
            active_low = config.active_low,
            "sysfs board ready"
        );
        Ok(Self {
            light,
            pump,
            temperature_path: config.temperature_path,
            moisture_path: config.moisture_path,
        })
    }

    fn pin(&self, output: Output) -> &GpioPin {
        match output {
            Output::Light => &self.light,
            Output::Pump => &self.pump,
        }
    }
}

impl Actuators for SysfsBoard {
    fn switch(
        &self,
        output: Output,
        on: bool,
    ) -> impl Future<Output = Result<(), HardwareError>> + Send {
        let pin = self.pin(output).clone();
        async move {
            pin.set(on)
                .await
                .map_err(|err| err.into_hardware(output))
        }
    }
}

impl Sensors for SysfsBoard {
    fn read_temperature(&self) -> impl Future<Output = Result<f64, SensorError>> + Send {
        let path = self.temperature_path.clone();
        async move {
            let millidegrees = read_number(&path)
                .await
                .map_err(|err| err.into_sensor("temperature"))?;
            Ok(millidegrees / 1000.0)
        }
    }

    fn read_moisture(&self) -> impl Future<Output = Result<f64, SensorError>> + Send {
        let path = self.moisture_path.clone();
        async move {
            for attempt in 1..=MOISTURE_ATTEMPTS {
                if attempt > 1 {
                    tokio::time::sleep(MOISTURE_RETRY_DELAY).await;
                }
                let raw = read_number(&path)
                    .await
                    .map_err(|err| err.into_sensor("moisture"))?;
                if (0.0..=MOISTURE_MAX_RAW).contains(&raw) {
                    return Ok(raw);
                }
                tracing::debug!(raw, attempt, "moisture out of range, retrying");
            }
            Err(SensorError::Garbage { sensor: "moisture" })
        }
    }
}

async fn read_number(path: &Path) -> Result<f64, SysfsError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SysfsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    content.trim().parse().map_err(|_| SysfsError::Parse {
        path: path.to_path_buf(),
        content: content.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        dir: tempfile::TempDir,
        config: SysfsConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let gpio_root = dir.path().join("gpio");
            std::fs::create_dir_all(gpio_root.join("gpio26")).unwrap();
            std::fs::create_dir_all(gpio_root.join("gpio20")).unwrap();
            let config = SysfsConfig {
                gpio_root,
                temperature_path: dir.path().join("temp1_input"),
                moisture_path: dir.path().join("in_voltage0_raw"),
                ..SysfsConfig::default()
            };
            Self { dir, config }
        }

        fn write(&self, file: &str, content: &str) {
            std::fs::write(self.dir.path().join(file), content).unwrap();
        }

        fn pin_value(&self, pin: u32) -> String {
            std::fs::read_to_string(self.config.gpio_root.join(format!("gpio{pin}/value")))
                .unwrap()
        }
    }

    #[tokio::test]
    async fn should_switch_light_and_pump_pins() {
        let fx = Fixture::new();
        let board = SysfsBoard::open(fx.config.clone()).await.unwrap();

        board.switch(Output::Light, true).await.unwrap();

        assert_eq!(fx.pin_value(26), "1");
        assert_eq!(fx.pin_value(20), "0");
        board.switch(Output::Pump, true).await.unwrap();
        assert_eq!(fx.pin_value(20), "1");
    }

    #[tokio::test]
    async fn should_report_hardware_error_when_value_file_unwritable() {
        let fx = Fixture::new();
        let board = SysfsBoard::open(fx.config.clone()).await.unwrap();
        std::fs::remove_dir_all(fx.config.gpio_root.join("gpio20")).unwrap();

        let result = board.switch(Output::Pump, true).await;

        assert!(matches!(
            result,
            Err(HardwareError::Write {
                output: Output::Pump,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn should_convert_millidegrees_to_celsius() {
        let fx = Fixture::new();
        fx.write("temp1_input", "23125\n");
        let board = SysfsBoard::open(fx.config.clone()).await.unwrap();

        let value = board.read_temperature().await.unwrap();

        assert!((value - 23.125).abs() < 1e-9);
    }

    #[tokio::test]
    async fn should_read_raw_moisture() {
        let fx = Fixture::new();
        fx.write("in_voltage0_raw", "812\n");
        let board = SysfsBoard::open(fx.config.clone()).await.unwrap();

        let value = board.read_moisture().await.unwrap();

        assert!((value - 812.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_report_garbage_when_moisture_stays_out_of_range() {
        let fx = Fixture::new();
        fx.write("in_voltage0_raw", "65535\n");
        let board = SysfsBoard::open(fx.config.clone()).await.unwrap();

        let result = board.read_moisture().await;

        assert!(matches!(
            result,
            Err(SensorError::Garbage { sensor: "moisture" })
        ));
    }

    #[tokio::test]
    async fn should_pause_between_moisture_attempts() {
        let fx = Fixture::new();
        fx.write("in_voltage0_raw", "65535\n");
        let board = SysfsBoard::open(fx.config.clone()).await.unwrap();

        let started = std::time::Instant::now();
        let _ = board.read_moisture().await;

        assert!(started.elapsed() >= MOISTURE_RETRY_DELAY * (MOISTURE_ATTEMPTS - 1));
    }

    #[tokio::test]
    async fn should_report_read_error_when_attribute_missing() {
        let fx = Fixture::new();
        let board = SysfsBoard::open(fx.config.clone()).await.unwrap();

        let result = board.read_temperature().await;

        assert!(matches!(
            result,
            Err(SensorError::Read {
                sensor: "temperature",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn should_report_read_error_when_attribute_not_numeric() {
        let fx = Fixture::new();
        fx.write("temp1_input", "N/A\n");
        let board = SysfsBoard::open(fx.config.clone()).await.unwrap();

        assert!(board.read_temperature().await.is_err());
    }
}
