//! # silvanus-adapter-virtual
//!
//! Simulated board for running the controller without any hardware attached.
//!
//! ## Behaviour
//!
//! | Part | Behaviour |
//! |------|-----------|
//! | Light | Remembers its state; the lamp warms the air by a couple of degrees |
//! | Pump | Remembers its state; wets the soil while running |
//! | Thermometer | Ambient temperature, plus lamp heat while the light is on |
//! | Moisture probe | Rises while the pump runs, dries out slowly otherwise |
//!
//! Faults can be injected per output and for the sensors, which makes the
//! board useful for exercising error paths end to end.
//!
//! ## Dependency rule
//!
//! Depends on `silvanus-app` (port traits) and `silvanus-domain` only.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use silvanus_app::ports::{Actuators, Sensors};
use silvanus_domain::error::{HardwareError, SensorError};
use silvanus_domain::output::Output;

const AMBIENT_TEMPERATURE: f64 = 21.5;
const LAMP_HEAT: f64 = 2.0;
const INITIAL_MOISTURE: f64 = 1800.0;
const MOISTURE_MAX: f64 = 4095.0;
const WETTING_PER_READ: f64 = 25.0;
const DRYING_PER_READ: f64 = 0.5;

#[derive(Debug)]
struct BoardState {
    light: bool,
    pump: bool,
    moisture: f64,
    light_fault: bool,
    pump_fault: bool,
    sensor_fault: bool,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            light: false,
            pump: false,
            moisture: INITIAL_MOISTURE,
            light_fault: false,
            pump_fault: false,
            sensor_fault: false,
        }
    }
}

/// A simulated board implementing both hardware ports.
#[derive(Debug, Default)]
pub struct VirtualBoard {
    state: Mutex<BoardState>,
}

impl VirtualBoard {
    /// Current simulated light state.
    #[must_use]
    pub fn light_on(&self) -> bool {
        self.lock().light
    }

    /// Current simulated pump state.
    #[must_use]
    pub fn pump_on(&self) -> bool {
        self.lock().pump
    }

    /// Make writes to `output` fail until cleared.
    pub fn fail_output(&self, output: Output, failing: bool) {
        let mut state = self.lock();
        match output {
            Output::Light => state.light_fault = failing,
            Output::Pump => state.pump_fault = failing,
        }
    }

    /// Make every sensor read fail until cleared.
    pub fn fail_sensors(&self, failing: bool) {
        self.lock().sensor_fault = failing;
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn switch_now(&self, output: Output, on: bool) -> Result<(), HardwareError> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let (current, fault) = match output {
            Output::Light => (&mut state.light, state.light_fault),
            Output::Pump => (&mut state.pump, state.pump_fault),
        };
        if fault {
            return Err(HardwareError::Unavailable { output });
        }
        *current = on;
        tracing::info!(%output, on, "simulated output switched");
        Ok(())
    }

    fn temperature_now(&self) -> Result<f64, SensorError> {
        let state = self.lock();
        if state.sensor_fault {
            return Err(SensorError::Read {
                sensor: "temperature",
                source: "simulated fault".into(),
            });
        }
        Ok(if state.light {
            AMBIENT_TEMPERATURE + LAMP_HEAT
        } else {
            AMBIENT_TEMPERATURE
        })
    }

    fn moisture_now(&self) -> Result<f64, SensorError> {
        let mut state = self.lock();
        if state.sensor_fault {
            return Err(SensorError::Read {
                sensor: "moisture",
                source: "simulated fault".into(),
            });
        }
        let delta = if state.pump {
            WETTING_PER_READ
        } else {
            -DRYING_PER_READ
        };
        state.moisture = (state.moisture + delta).clamp(0.0, MOISTURE_MAX);
        Ok(state.moisture)
    }
}

impl Actuators for VirtualBoard {
    fn switch(
        &self,
        output: Output,
        on: bool,
    ) -> impl Future<Output = Result<(), HardwareError>> + Send {
        let result = self.switch_now(output, on);
        async { result }
    }
}

impl Sensors for VirtualBoard {
    fn read_temperature(&self) -> impl Future<Output = Result<f64, SensorError>> + Send {
        let result = self.temperature_now();
        async { result }
    }

    fn read_moisture(&self) -> impl Future<Output = Result<f64, SensorError>> + Send {
        let result = self.moisture_now();
        async { result }
    }
}
