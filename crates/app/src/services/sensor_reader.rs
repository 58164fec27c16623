//! Sensor reader: bounded, averaged sensor reads.
//!
//! Every raw read runs under a timeout. Good samples feed a moving-average
//! window per sensor; failed or non-finite samples never enter the window.

use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;

use silvanus_domain::error::SensorError;

use crate::ports::Sensors;

const TEMPERATURE: &str = "temperature";
const MOISTURE: &str = "moisture";

/// Fixed-size moving average.
#[derive(Debug)]
pub struct MovingAverage {
    samples: VecDeque<f64>,
    size: usize,
}

impl MovingAverage {
    /// Create a window holding up to `size` samples (at least one).
    #[must_use]
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            samples: VecDeque::with_capacity(size),
            size,
        }
    }

    /// Add a sample and return the mean of the window.
    #[allow(clippy::cast_precision_loss)]
    pub fn push(&mut self, sample: f64) -> f64 {
        if self.samples.len() == self.size {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Number of samples currently in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Averaged view over a [`Sensors`] port.
pub struct SensorReader<S> {
    sensors: S,
    timeout: Duration,
    temperature: MovingAverage,
    moisture: MovingAverage,
}

impl<S: Sensors> SensorReader<S> {
    /// Create a reader with a `window`-sample average and a per-read `timeout`.
    pub fn new(sensors: S, window: usize, timeout: Duration) -> Self {
        Self {
            sensors,
            timeout,
            temperature: MovingAverage::new(window),
            moisture: MovingAverage::new(window),
        }
    }

    /// Averaged temperature in °C.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError`] on timeout, IO failure or a non-finite sample.
    pub async fn read_temperature(&mut self) -> Result<f64, SensorError> {
        let sample = sample(TEMPERATURE, self.timeout, self.sensors.read_temperature()).await?;
        Ok(self.temperature.push(sample))
    }

    /// Averaged soil moisture.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError`] on timeout, IO failure or a non-finite sample.
    pub async fn read_moisture(&mut self) -> Result<f64, SensorError> {
        let sample = sample(MOISTURE, self.timeout, self.sensors.read_moisture()).await?;
        Ok(self.moisture.push(sample))
    }

    /// Read both sensors concurrently, so one slow sensor costs at most one
    /// timeout per tick.
    pub async fn read_all(&mut self) -> (Result<f64, SensorError>, Result<f64, SensorError>) {
        let (temperature, moisture) = tokio::join!(
            sample(TEMPERATURE, self.timeout, self.sensors.read_temperature()),
            sample(MOISTURE, self.timeout, self.sensors.read_moisture()),
        );
        (
            temperature.map(|v| self.temperature.push(v)),
            moisture.map(|v| self.moisture.push(v)),
        )
    }
}

async fn sample<F>(sensor: &'static str, timeout: Duration, read: F) -> Result<f64, SensorError>
where
    F: Future<Output = Result<f64, SensorError>>,
{
    let value = tokio::time::timeout(timeout, read)
        .await
        .map_err(|_| SensorError::Timeout { sensor, timeout })??;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SensorError::Garbage { sensor })
    }
}
