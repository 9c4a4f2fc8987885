//! Application layer: the hexagonal core and its port traits.

pub mod events;
pub mod ports;
pub mod service;
