//! # silvanus-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `Actuators`: switch the light and pump outputs
//!   - `Sensors`: raw temperature and moisture reads
//!   - `SettingsRepository`: load & save settings
//! - Provide the use-case layer:
//!   - `SensorReader`: bounded, averaged sensor reads
//!   - `ActuatorDriver`: idempotent output control with confirmed state
//!   - `SettingsService`: get and patch settings atomically
//!   - `Controller`: the periodic sense/decide/act tick loop
//! - Provide **in-process infrastructure** (status store) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `silvanus-domain` only (plus `tokio` for channels and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod controller;
pub mod ports;
pub mod services;
pub mod status_store;
