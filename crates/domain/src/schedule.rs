//! Schedule: pure decisions about when the light and the pump run.
//!
//! Decisions depend only on the instant and the [`Settings`].
//!
//! - **Light**: on for `lightTime` minutes at the start of every
//!   `lightInterval`-hour cycle. Cycles are counted from the Unix epoch
//!   (midnight UTC, 1970-01-01), so they run continuously across days.
//! - **Pump**: the daily amount is split into whole watering events of
//!   `waterTime` minutes at `waterFlowRate` l/min, spaced evenly from midnight
//!   UTC of each day.

use std::time::Duration;

use crate::error::ConfigError;
use crate::light_mode::LightMode;
use crate::settings::Settings;
use crate::time::{Timestamp, seconds_since_midnight};

/// Length of the scheduling day.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Relative tolerance when checking that the daily amount is a whole
/// number of watering events.
const VOLUME_TOLERANCE: f64 = 1e-6;

/// Pump decision for a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpDecision {
    pub on: bool,
    /// Time left in the current watering event, zero when off.
    pub remaining: Duration,
}

impl PumpDecision {
    const OFF: Self = Self {
        on: false,
        remaining: Duration::ZERO,
    };
}

/// Watering events derived from [`Settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WateringPlan {
    pub events_per_day: u32,
    /// Distance between the starts of two consecutive events.
    pub spacing: Duration,
    /// Length of one event.
    pub duration: Duration,
}

impl WateringPlan {
    /// Derive the plan from the watering settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a watering value is not strictly positive,
    /// one event delivers more than the daily amount, the daily amount is not
    /// a whole number of events, or the events do not fit in one day.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn derive(settings: &Settings) -> Result<Self, ConfigError> {
        let amount = settings.water_amount_per_day;
        let flow = settings.water_flow_rate;
        let water_time = settings.water_time;

        if !amount.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "waterAmountPerDay",
            });
        }
        if !flow.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "waterFlowRate",
            });
        }
        if amount <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "waterAmountPerDay",
            });
        }
        if flow <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "waterFlowRate",
            });
        }
        if water_time <= 0 {
            return Err(ConfigError::NotPositive { field: "waterTime" });
        }

        let per_event = flow * water_time as f64;
        if per_event > amount * (1.0 + VOLUME_TOLERANCE) {
            return Err(ConfigError::EventExceedsDailyAmount {
                per_event,
                amount_per_day: amount,
            });
        }

        let ratio = amount / per_event;
        let events = ratio.round();
        if (ratio - events).abs() > VOLUME_TOLERANCE * ratio {
            return Err(ConfigError::UnevenWateringEvents {
                per_event,
                amount_per_day: amount,
            });
        }

        let duration_secs = water_time.saturating_mul(60);
        if events * duration_secs as f64 > f64::from(SECONDS_PER_DAY) {
            return Err(ConfigError::EventsOverlap {
                events: events.min(f64::from(u32::MAX)) as u32,
                water_time,
            });
        }

        // Both bounded by SECONDS_PER_DAY after the overlap check.
        let events_per_day = events as u32;
        let spacing = SECONDS_PER_DAY / events_per_day;

        Ok(Self {
            events_per_day,
            spacing: Duration::from_secs(u64::from(spacing)),
            duration: Duration::from_secs(duration_secs as u64),
        })
    }

    /// Pump decision at `seconds` past midnight.
    #[must_use]
    pub fn decision_at(&self, seconds: u32) -> PumpDecision {
        let spacing = self.spacing.as_secs();
        if spacing == 0 {
            return PumpDecision::OFF;
        }
        let seconds = u64::from(seconds);
        let index = seconds / spacing;
        if index >= u64::from(self.events_per_day) {
            return PumpDecision::OFF;
        }
        let offset = Duration::from_secs(seconds % spacing);
        if offset < self.duration {
            PumpDecision {
                on: true,
                remaining: self.duration - offset,
            }
        } else {
            PumpDecision::OFF
        }
    }

    /// Total pump time per day.
    #[must_use]
    pub fn daily_runtime(&self) -> Duration {
        self.duration * self.events_per_day
    }
}

/// Whether the grow-light should be on at `now`.
///
/// A forced [`LightMode`] wins over the schedule.
#[must_use]
pub fn should_light_be_on(now: Timestamp, settings: &Settings, mode: LightMode) -> bool {
    if let Some(forced) = mode.override_state() {
        return forced;
    }

    let interval = settings.light_interval.saturating_mul(3600);
    if interval <= 0 || settings.light_time <= 0 {
        return false;
    }
    now.timestamp().rem_euclid(interval) < settings.light_time.saturating_mul(60)
}

/// Whether the pump should run at `now`, and for how much longer.
///
/// # Errors
///
/// Returns [`ConfigError`] when the watering settings do not produce a valid
/// [`WateringPlan`].
pub fn should_pump_be_on(now: Timestamp, settings: &Settings) -> Result<PumpDecision, ConfigError> {
    let plan = WateringPlan::derive(settings)?;
    Ok(plan.decision_at(seconds_since_midnight(now)))
}
