//! Outbound application events.
//!
//! The [`ControlService`](super::service::ControlService) emits these
//! through the [`EventSink`](super::ports::EventSink) port. Adapters on the
//! other side decide what to do with them — log to serial, capture in a
//! test, etc. Status topic publishes are NOT routed through here; the
//! gateway publishes those directly so the write-before-publish ordering
//! stays in one place.

use crate::control::outputs::RelayId;
use crate::control::state::ControlState;
use crate::fsm::SessionState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The orchestrator has started (carries initial session state).
    Started(SessionState),

    /// The session state machine transitioned.
    SessionChanged {
        from: SessionState,
        to: SessionState,
    },

    /// The presence "online" notification was published.
    PresenceAnnounced,

    /// A relay changed physical level (emitted once per real transition).
    RelayChanged { relay: RelayId, on: bool },

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time snapshot suitable for logging or transmission.
#[derive(Debug, Clone)]
pub struct TelemetryData {
    pub session: SessionState,
    pub zone: ControlState,
    pub heater_on: bool,
    pub fan_on: bool,
    pub tick_count: u64,
}
