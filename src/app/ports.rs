//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (MQTT client, relay board, event sinks) implement these
//! traits. The [`ControlService`](super::service::ControlService) consumes
//! them via generics, so the domain core never touches hardware or the
//! network directly.
//!
//! The transport adapter additionally delivers inbound occurrences as
//! [`LinkEvent`](crate::events::LinkEvent)s through the serialized queue in
//! [`events`](crate::events) — there is no inbound port trait; the queue IS
//! the inbound boundary.

use crate::error::{ActuatorError, CommsError};
use crate::events::MessageId;

// ───────────────────────────────────────────────────────────────
// Transport port (driven adapter: domain → broker)
// ───────────────────────────────────────────────────────────────

/// MQTT delivery quality of service. Mirrors the broker-side levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum QosLevel {
    AtMostOnce = 0,
    AtLeastOnce = 1,
    ExactlyOnce = 2,
}

/// Write-side transport port: the domain calls this to publish and
/// subscribe. Acks come back asynchronously as `SubAck` / `PubAck` link
/// events carrying the returned [`MessageId`].
pub trait TransportPort {
    /// Publish a payload. `retain` asks the broker to store the message and
    /// hand it to new subscribers immediately.
    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QosLevel,
        retain: bool,
    ) -> Result<MessageId, CommsError>;

    /// Subscribe to a topic. The subscription counts as active only once
    /// its ack arrives.
    fn subscribe(&mut self, topic: &str, qos: QosLevel) -> Result<MessageId, CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Relay port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the two binary actuators. Implementations perform
/// the physical GPIO write; idempotence is the gateway's job, not theirs.
pub trait RelayPort {
    fn set_heater(&mut self, on: bool) -> Result<(), ActuatorError>;
    fn set_fan(&mut self, on: bool) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, test
/// capture, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
