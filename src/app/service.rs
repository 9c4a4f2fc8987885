//! Control service — the hexagonal core.
//!
//! [`ControlService`] owns the session state machine, the accumulated zone
//! state, and the actuation gateway. It exposes a single synchronous
//! [`handle_event`](ControlService::handle_event) entry point consumed by
//! the main loop's event drain. All I/O flows through port traits injected
//! at call sites, making the entire service testable with mock adapters.
//!
//! ```text
//!  LinkEvent ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                │     ControlService      │
//!  RelayPort ◀───│  Session FSM · Policy   │───▶ TransportPort
//!                │  ControlState · Gateway │
//!                └────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::control::outputs::OutputGateway;
use crate::control::policy;
use crate::control::state::ControlState;
use crate::decode;
use crate::events::LinkEvent;
use crate::fsm::{SessionFsm, SessionState, Transition};
use crate::topics::{TopicSet, PAYLOAD_OFFLINE, PAYLOAD_ONLINE};

use super::events::{AppEvent, TelemetryData};
use super::ports::{EventSink, QosLevel, RelayPort, TransportPort};

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

/// The control service orchestrates all domain logic for one zone.
pub struct ControlService {
    fsm: SessionFsm,
    zone: ControlState,
    gateway: OutputGateway,
    topics: TopicSet,
    config: SystemConfig,
    tick_count: u64,
    shutdown_requested: bool,
}

impl ControlService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the lifecycle — call [`start`](Self::start) next,
    /// then report join progress via [`note_join_started`](Self::note_join_started)
    /// and [`note_network_up`](Self::note_network_up).
    pub fn new(config: SystemConfig) -> Self {
        let topics = TopicSet::new(config.zone.as_str());
        Self {
            fsm: SessionFsm::new(),
            zone: ControlState::new(),
            gateway: OutputGateway::new(),
            topics,
            config,
            tick_count: 0,
            shutdown_requested: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce startup. The session machine begins `Offline`.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started(self.fsm.state()));
        info!("ControlService started for zone '{}'", self.config.zone);
    }

    /// The network join (WiFi station connect) has been invoked.
    pub fn note_join_started(&mut self, sink: &mut impl EventSink) {
        let transition = self.fsm.begin_join();
        self.emit_transition(transition, sink);
    }

    /// The network layer reports link-up; the MQTT session comes next.
    pub fn note_network_up(&mut self, sink: &mut impl EventSink) {
        let transition = self.fsm.network_up();
        self.emit_transition(transition, sink);
    }

    // ── Event dispatch ────────────────────────────────────────

    /// Process one serialized link event. This is the only entry point that
    /// mutates control or actuator state, which is what makes the
    /// single-thread serialization contract sufficient.
    pub fn handle_event(
        &mut self,
        event: LinkEvent,
        transport: &mut impl TransportPort,
        relays: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) {
        match event {
            LinkEvent::Up => self.on_session_up(transport, sink),

            LinkEvent::Down => {
                // Last-known facts are retained; only the actuation gate
                // closes until the session is re-established.
                let transition = self.fsm.session_down();
                self.emit_transition(transition, sink);
            }

            LinkEvent::SubAck(id) => {
                let became_ready = self.fsm.sub_acked(id);
                if let Some(t) = became_ready {
                    self.emit_transition(Some(t), sink);
                    // Facts accumulated while disconnected take effect now,
                    // in one cycle, not as a burst during the handshake.
                    self.run_cycle(transport, relays, sink);
                }
            }

            LinkEvent::PubAck(id) => debug!("publish acked (msg_id={id})"),

            LinkEvent::Message { topic, payload } => {
                if let Some(fact) = decode::decode(&self.topics, topic.as_str(), &payload) {
                    debug!("fact: {:?}", fact);
                    self.zone.apply(fact);
                    if self.fsm.is_ready() {
                        self.run_cycle(transport, relays, sink);
                    }
                }
            }

            LinkEvent::Tick => self.on_tick(sink),

            LinkEvent::Shutdown => self.on_shutdown(transport),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn session(&self) -> SessionState {
        self.fsm.state()
    }

    pub fn zone_state(&self) -> ControlState {
        self.zone
    }

    pub fn heater_on(&self) -> bool {
        self.gateway.heater_on()
    }

    pub fn fan_on(&self) -> bool {
        self.gateway.fan_on()
    }

    /// Graceful shutdown was requested; the main loop should disconnect
    /// the transport and exit.
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }

    pub fn topics(&self) -> &TopicSet {
        &self.topics
    }

    /// Build a telemetry snapshot from the current state.
    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            session: self.fsm.state(),
            zone: self.zone,
            heater_on: self.gateway.heater_on(),
            fan_on: self.gateway.fan_on(),
            tick_count: self.tick_count,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn on_session_up(&mut self, transport: &mut impl TransportPort, sink: &mut impl EventSink) {
        let transition = self.fsm.session_up();
        self.emit_transition(transition, sink);

        // Presence first: external observers learn we are online before any
        // derived status can change.
        match transport.publish(
            self.topics.presence.as_str(),
            PAYLOAD_ONLINE,
            QosLevel::AtLeastOnce,
            true,
        ) {
            Ok(_) => sink.emit(&AppEvent::PresenceAnnounced),
            Err(e) => warn!("presence publish failed: {e}"),
        }

        let subs = self.topics.subscriptions();
        let total = subs.len();
        let mut issued = 0;
        for topic in subs {
            match transport.subscribe(topic, QosLevel::AtLeastOnce) {
                Ok(id) => {
                    issued += 1;
                    self.fsm.note_subscription(id, issued == total);
                }
                // Non-fatal: the session stays in AwaitingSession and the
                // liveness tick keeps warning until the next session cycle.
                Err(e) => warn!("subscribe '{}' failed: {e}", topic),
            }
        }
    }

    fn on_tick(&mut self, sink: &mut impl EventSink) {
        self.tick_count += 1;
        self.fsm.tick(self.config.sub_ack_warn_ticks());

        let interval = self.config.telemetry_interval_ticks().max(1);
        if self.tick_count % interval == 0 {
            sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
        }
    }

    fn on_shutdown(&mut self, transport: &mut impl TransportPort) {
        info!("shutdown requested — publishing presence offline (best effort)");
        if let Err(e) = transport.publish(
            self.topics.presence.as_str(),
            PAYLOAD_OFFLINE,
            QosLevel::AtLeastOnce,
            true,
        ) {
            warn!("offline publish failed: {e} — last will covers us");
        }
        self.shutdown_requested = true;
    }

    /// One decision cycle: policy evaluation, then idempotent actuation.
    /// Only ever called while `Ready`.
    fn run_cycle(
        &mut self,
        transport: &mut impl TransportPort,
        relays: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) {
        match policy::decide(&self.zone, self.config.deadband_f) {
            Some(desired) => {
                self.gateway
                    .apply(desired, relays, transport, &self.topics, sink);
            }
            None => debug!("policy: temperature unknown — holding relay state"),
        }
    }

    fn emit_transition(&mut self, transition: Option<Transition>, sink: &mut impl EventSink) {
        if let Some((from, to)) = transition {
            sink.emit(&AppEvent::SessionChanged { from, to });
        }
    }
}
