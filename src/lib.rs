//! ZoneTherm firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod decode;
pub mod events;
pub mod fsm;
pub mod topics;

mod error;
mod pins;

pub use error::{ActuatorError, CommsError, Error, Result};

// Adapter and driver modules compile on every target; the platform
// implementations are guarded by cfg attributes inside.
pub mod adapters;
pub mod drivers;

#[cfg(target_os = "espidf")]
mod esp_link_shims;
