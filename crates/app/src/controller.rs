//! Controller: the periodic sense/decide/act loop.
//!
//! A single task owns the sensors, the actuators, the light override and the
//! [`StatusWriter`]. Every tick it reads the sensors, asks the schedule what
//! the outputs should be, drives them, and publishes a fresh [`Status`].
//!
//! Everything else talks to the task through a [`ControllerHandle`]; commands
//! are processed between ticks, so ticks never overlap and the light override
//! has exactly one writer.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::MissedTickBehavior;

use silvanus_domain::error::{SensorError, SilvanusError};
use silvanus_domain::light_mode::LightMode;
use silvanus_domain::schedule::{should_light_be_on, should_pump_be_on};
use silvanus_domain::settings::Settings;
use silvanus_domain::status::{Reading, Status};
use silvanus_domain::time::{Timestamp, now};

use crate::ports::{Actuators, Sensors};
use crate::services::actuator_driver::ActuatorDriver;
use crate::services::sensor_reader::SensorReader;
use crate::status_store::StatusWriter;

const COMMAND_BUFFER: usize = 16;

/// Loop timing and sensor filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub tick_interval: Duration,
    pub sensor_window: usize,
    pub sensor_timeout: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            sensor_window: 5,
            sensor_timeout: Duration::from_millis(500),
        }
    }
}

#[derive(Debug)]
enum Command {
    SetLightMode {
        mode: LightMode,
        reply: oneshot::Sender<Result<Status, SilvanusError>>,
    },
    Retick {
        reply: oneshot::Sender<Status>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Cloneable handle used by the HTTP layer and the daemon.
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    commands: mpsc::Sender<Command>,
}

impl ControllerHandle {
    /// Change the light override and apply it immediately.
    ///
    /// # Errors
    ///
    /// Returns [`SilvanusError::Hardware`] if the light could not be switched
    /// (the mode is still recorded and the next tick retries), or
    /// [`SilvanusError::Unavailable`] if the controller is gone.
    pub async fn set_light_mode(&self, mode: LightMode) -> Result<Status, SilvanusError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::SetLightMode { mode, reply }).await?;
        response.await.map_err(|_| SilvanusError::Unavailable)?
    }

    /// Run a tick now instead of waiting for the next one.
    ///
    /// # Errors
    ///
    /// Returns [`SilvanusError::Unavailable`] if the controller is gone.
    pub async fn retick(&self) -> Result<Status, SilvanusError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Retick { reply }).await?;
        response.await.map_err(|_| SilvanusError::Unavailable)
    }

    /// Stop the loop, turning both outputs off. Resolves once the outputs
    /// have been driven.
    ///
    /// # Errors
    ///
    /// Returns [`SilvanusError::Unavailable`] if the controller is already gone.
    pub async fn shutdown(&self) -> Result<(), SilvanusError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Shutdown { reply }).await?;
        response.await.map_err(|_| SilvanusError::Unavailable)
    }

    /// Resolves when the controller task has stopped.
    pub async fn closed(&self) {
        self.commands.closed().await;
    }

    async fn send(&self, command: Command) -> Result<(), SilvanusError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SilvanusError::Unavailable)
    }
}

/// The control loop. Build it with [`Controller::new`] and drive it with
/// [`Controller::run`].
pub struct Controller<A, S> {
    driver: ActuatorDriver<A>,
    reader: SensorReader<S>,
    settings: watch::Receiver<Settings>,
    status: StatusWriter,
    light_mode: LightMode,
    clock: fn() -> Timestamp,
    tick_interval: Duration,
    commands: mpsc::Receiver<Command>,
}

impl<A: Actuators, S: Sensors> Controller<A, S> {
    /// Create a controller and the handle to talk to it.
    pub fn new(
        actuators: A,
        sensors: S,
        settings: watch::Receiver<Settings>,
        status: StatusWriter,
        config: ControllerConfig,
    ) -> (Self, ControllerHandle) {
        let (sender, commands) = mpsc::channel(COMMAND_BUFFER);
        let controller = Self {
            driver: ActuatorDriver::new(actuators),
            reader: SensorReader::new(sensors, config.sensor_window, config.sensor_timeout),
            settings,
            status,
            light_mode: LightMode::Auto,
            clock: now,
            tick_interval: config.tick_interval,
            commands,
        };
        (controller, ControllerHandle { commands: sender })
    }

    /// Replace the wall clock used for schedule decisions.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> Timestamp) -> Self {
        self.clock = clock;
        self
    }

    /// Run until a shutdown command arrives or every handle is dropped.
    ///
    /// Both outputs are turned off before returning.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!(tick_interval = ?self.tick_interval, "controller started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                command = self.commands.recv() => match command {
                    Some(Command::SetLightMode { mode, reply }) => {
                        let result = self.set_light_mode(mode).await;
                        let _ = reply.send(result);
                    }
                    Some(Command::Retick { reply }) => {
                        let status = self.tick().await;
                        let _ = reply.send(status);
                    }
                    Some(Command::Shutdown { reply }) => {
                        self.stop().await;
                        let _ = reply.send(());
                        return;
                    }
                    None => break,
                },
            }
        }

        self.stop().await;
    }

    async fn tick(&mut self) -> Status {
        let at = (self.clock)();
        let previous = self.status.current();

        let (temperature, moisture) = self.reader.read_all().await;
        let temperature = next_reading(previous.temperature, temperature, at);
        let moisture = next_reading(previous.moisture, moisture, at);

        let settings = self.settings.borrow_and_update().clone();
        let light = should_light_be_on(at, &settings, self.light_mode);
        let pump = match should_pump_be_on(at, &settings) {
            Ok(decision) => {
                if decision.on && !self.driver.pump_on() {
                    tracing::info!(remaining = ?decision.remaining, "watering event started");
                }
                decision.on
            }
            Err(err) => {
                tracing::warn!(error = %err, "no valid watering plan, keeping pump off");
                false
            }
        };

        // failures are logged by the driver and retried next tick
        let _ = self.driver.set_light(light).await;
        let _ = self.driver.set_pump(pump).await;

        let status = Status {
            temperature,
            moisture,
            light_on: self.driver.light_on(),
            pump_on: self.driver.pump_on(),
            light_mode: self.light_mode,
            updated_at: Some(at),
        };
        self.status.publish(status.clone());
        tracing::debug!(?status, "tick");
        status
    }

    async fn set_light_mode(&mut self, mode: LightMode) -> Result<Status, SilvanusError> {
        tracing::info!(%mode, "light mode changed");
        self.light_mode = mode;

        let at = (self.clock)();
        let light = should_light_be_on(at, &self.settings.borrow(), mode);
        let result = self.driver.set_light(light).await;

        let status = Status {
            light_on: self.driver.light_on(),
            light_mode: mode,
            ..self.status.current()
        };
        self.status.publish(status.clone());

        result?;
        Ok(status)
    }

    async fn stop(&mut self) {
        if let Err(err) = self.driver.shutdown().await {
            tracing::error!(error = %err, "failed to turn outputs off");
        }
        let status = Status {
            light_on: self.driver.light_on(),
            pump_on: self.driver.pump_on(),
            ..self.status.current()
        };
        self.status.publish(status);
        tracing::info!("controller stopped");
    }
}

fn next_reading(previous: Reading, sample: Result<f64, SensorError>, at: Timestamp) -> Reading {
    match sample {
        Ok(value) => Reading::fresh(value, at),
        Err(err) => {
            tracing::warn!(sensor = err.sensor(), error = %err, "sensor read failed, keeping last value");
            previous.into_stale()
        }
    }
}
