//! Actuator driver: idempotent output control.
//!
//! The driver remembers the last state the hardware confirmed for each
//! output. Repeating that state is a no-op; a failed write leaves the
//! confirmed state untouched.

use silvanus_domain::error::HardwareError;
use silvanus_domain::output::Output;

use crate::ports::Actuators;

/// Application service wrapping the [`Actuators`] port.
pub struct ActuatorDriver<A> {
    actuators: A,
    light: Option<bool>,
    pump: Option<bool>,
}

impl<A: Actuators> ActuatorDriver<A> {
    /// Create a driver. Nothing is confirmed yet, so the first command for
    /// each output always reaches the hardware.
    pub fn new(actuators: A) -> Self {
        Self {
            actuators,
            light: None,
            pump: None,
        }
    }

    /// Switch the grow-light.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError`] if the write fails; the confirmed state is
    /// unchanged.
    pub async fn set_light(&mut self, on: bool) -> Result<(), HardwareError> {
        self.set(Output::Light, on).await
    }

    /// Switch the pump.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError`] if the write fails; the confirmed state is
    /// unchanged.
    pub async fn set_pump(&mut self, on: bool) -> Result<(), HardwareError> {
        self.set(Output::Pump, on).await
    }

    /// Last confirmed light state (`false` before the first write).
    #[must_use]
    pub fn light_on(&self) -> bool {
        self.light.unwrap_or(false)
    }

    /// Last confirmed pump state (`false` before the first write).
    #[must_use]
    pub fn pump_on(&self) -> bool {
        self.pump.unwrap_or(false)
    }

    /// Drive both outputs off, attempting both even if the first fails.
    ///
    /// # Errors
    ///
    /// Returns the first [`HardwareError`] encountered.
    pub async fn shutdown(&mut self) -> Result<(), HardwareError> {
        let pump = self.set_pump(false).await;
        let light = self.set_light(false).await;
        pump.and(light)
    }

    async fn set(&mut self, output: Output, on: bool) -> Result<(), HardwareError> {
        let confirmed = match output {
            Output::Light => &mut self.light,
            Output::Pump => &mut self.pump,
        };
        if *confirmed == Some(on) {
            return Ok(());
        }

        match self.actuators.switch(output, on).await {
            Ok(()) => {
                tracing::info!(%output, on, "output switched");
                *confirmed = Some(on);
                Ok(())
            }
            Err(err) => {
                tracing::error!(%output, on, error = %err, "output write failed");
                Err(err)
            }
        }
    }
}
