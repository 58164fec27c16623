//! Settings: light cycle and watering configuration.
//!
//! Field names follow the wire format (`lightInterval`, `waterTime`, …) so
//! the same type serves the HTTP contract and persistence.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;
use crate::schedule::WateringPlan;

/// Operator-configurable schedule parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Hours between the starts of two light cycles.
    pub light_interval: i64,
    /// Minutes the light stays on per cycle.
    pub light_time: i64,
    /// Liters delivered per day.
    pub water_amount_per_day: f64,
    /// Pump flow in liters per minute.
    pub water_flow_rate: f64,
    /// Minutes per watering event.
    pub water_time: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            light_interval: 24,
            light_time: 720,
            water_amount_per_day: 1.0,
            water_flow_rate: 0.5,
            water_time: 2,
        }
    }
}

impl Settings {
    /// Check domain invariants, including that the watering plan is
    /// derivable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is not strictly positive, a float
    /// is not finite, the light cycle is longer than its interval, or the
    /// daily water amount cannot be split into whole watering events.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_int("lightInterval", self.light_interval)?;
        positive_int("lightTime", self.light_time)?;
        positive_float("waterAmountPerDay", self.water_amount_per_day)?;
        positive_float("waterFlowRate", self.water_flow_rate)?;
        positive_int("waterTime", self.water_time)?;

        if self.light_time > self.light_interval.saturating_mul(60) {
            return Err(ConfigError::LightTimeExceedsInterval {
                light_time: self.light_time,
                light_interval: self.light_interval,
            });
        }

        WateringPlan::derive(self)?;
        Ok(())
    }

    /// Merge a partial update into a copy of these settings.
    ///
    /// The result is **not** validated; call [`validate`](Self::validate).
    #[must_use]
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        Self {
            light_interval: patch.light_interval.unwrap_or(self.light_interval),
            light_time: patch.light_time.unwrap_or(self.light_time),
            water_amount_per_day: patch
                .water_amount_per_day
                .unwrap_or(self.water_amount_per_day),
            water_flow_rate: patch.water_flow_rate.unwrap_or(self.water_flow_rate),
            water_time: patch.water_time.unwrap_or(self.water_time),
        }
    }
}

/// Partial settings update, as accepted by `PATCH /system/settings`.
///
/// Unknown keys are rejected so typos do not silently succeed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsPatch {
    #[serde(default, deserialize_with = "present")]
    pub light_interval: Option<i64>,
    #[serde(default, deserialize_with = "present")]
    pub light_time: Option<i64>,
    #[serde(default, deserialize_with = "present")]
    pub water_amount_per_day: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    pub water_flow_rate: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    pub water_time: Option<i64>,
}

/// A key that is present must carry a value; `null` is a type error.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl SettingsPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn positive_int(field: &'static str, value: i64) -> Result<(), ConfigError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field })
    }
}

fn positive_float(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field });
    }
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field })
    }
}
