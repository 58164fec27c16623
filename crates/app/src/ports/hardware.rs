//! Hardware ports: the board's switched outputs and its sensors.

use std::future::Future;

use silvanus_domain::error::{HardwareError, SensorError};
use silvanus_domain::output::Output;

/// Switched outputs (light relay, pump relay).
pub trait Actuators {
    /// Drive `output` to `on`. Returns only once the write is confirmed.
    fn switch(
        &self,
        output: Output,
        on: bool,
    ) -> impl Future<Output = Result<(), HardwareError>> + Send;
}

/// Raw, unfiltered sensor access.
pub trait Sensors {
    /// Soil temperature in °C.
    fn read_temperature(&self) -> impl Future<Output = Result<f64, SensorError>> + Send;

    /// Soil moisture in the sensor's native unit.
    fn read_moisture(&self) -> impl Future<Output = Result<f64, SensorError>> + Send;
}

impl<T: Actuators + Send + Sync> Actuators for std::sync::Arc<T> {
    fn switch(
        &self,
        output: Output,
        on: bool,
    ) -> impl Future<Output = Result<(), HardwareError>> + Send {
        (**self).switch(output, on)
    }
}

impl<T: Sensors + Send + Sync> Sensors for std::sync::Arc<T> {
    fn read_temperature(&self) -> impl Future<Output = Result<f64, SensorError>> + Send {
        (**self).read_temperature()
    }

    fn read_moisture(&self) -> impl Future<Output = Result<f64, SensorError>> + Send {
        (**self).read_moisture()
    }
}
