//! # silvanus-domain
//!
//! Pure domain model for the Silvanus garden controller.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **Settings** (light cycle and watering configuration) and their
//!   invariants
//! - Define **Status** (latest sensor readings and actuator state)
//! - Define **`LightMode`** (automatic schedule or manual override)
//! - Define the **schedule**: pure decisions about when light and pump run
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod light_mode;
pub mod output;
pub mod schedule;
pub mod settings;
pub mod status;
