//! Serialized link-event queue.
//!
//! The MQTT client delivers its callbacks on the transport task; the control
//! core runs on the main task. Every transport-side occurrence crosses that
//! boundary as a [`LinkEvent`] pushed into a single bounded channel, and the
//! main loop drains it one event at a time:
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ MQTT task    │────▶│              │     │              │
//! │ WiFi events  │────▶│ Event Queue  │────▶│  Main Loop   │
//! │ Timer tick   │────▶│ (serialized) │     │ (ControlSvc) │
//! │ Shutdown     │────▶│              │     │              │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! This serialization is the concurrency contract of the whole firmware: no
//! two fact decodes or policy evaluations ever run concurrently, so the
//! control and actuator state need no internal locking.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::topics::Topic;

/// Maximum number of pending link events.
const EVENT_QUEUE_CAP: usize = 16;

/// Maximum inbound payload size carried across the queue. The transport
/// adapter drops oversized messages; every payload this firmware decodes
/// is far smaller.
pub const PAYLOAD_MAX: usize = 192;

pub type Payload = heapless::Vec<u8, PAYLOAD_MAX>;

/// Broker-assigned message identifier for acked operations.
pub type MessageId = i32;

/// One occurrence on (or for) the transport link, delivered in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// MQTT session established with the broker.
    Up,
    /// MQTT session dropped (broker or network side).
    Down,
    /// A subscription was acknowledged.
    SubAck(MessageId),
    /// A QoS-1 publish was acknowledged.
    PubAck(MessageId),
    /// An inbound message on a subscribed topic.
    Message { topic: Topic, payload: Payload },
    /// Periodic liveness tick (telemetry, stuck-subscription warnings).
    Tick,
    /// Explicit shutdown request — triggers the best-effort cleanup path.
    Shutdown,
}

static LINK_EVENTS: Channel<CriticalSectionRawMutex, LinkEvent, EVENT_QUEUE_CAP> = Channel::new();

/// Push an event into the queue.
/// Safe to call from the transport callback task.
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: LinkEvent) -> bool {
    LINK_EVENTS.try_send(event).is_ok()
}

/// Pop the next event from the queue.
/// Called from the main loop (single consumer).
/// Returns `None` if the queue is empty.
pub fn pop_event() -> Option<LinkEvent> {
    LINK_EVENTS.try_receive().ok()
}

/// Drain all pending events into a callback, in FIFO order.
pub fn drain_events(mut handler: impl FnMut(LinkEvent)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

/// Check if the event queue is empty.
pub fn queue_is_empty() -> bool {
    LINK_EVENTS.is_empty()
}

/// Number of pending events.
pub fn queue_len() -> usize {
    LINK_EVENTS.len()
}
