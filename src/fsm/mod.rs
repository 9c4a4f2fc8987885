//! Session lifecycle state machine.
//!
//! ```text
//! Offline ──start──▶ Joining ──network up──▶ AwaitingSession
//!                                              │        ▲
//!                         session up + presence│        │ session down
//!                         + all three sub-acks │        │ (facts still
//!                                              ▼        │  accumulate)
//!                                            Ready ─────┘
//! ```
//!
//! The machine gates actuation: derived relay commands are applied only in
//! `Ready`. Inbound facts keep updating the control state in every state,
//! which is what makes reconnects glitch-free — accumulated facts take
//! effect in one decision cycle the moment `Ready` is re-entered, instead of
//! as a burst of half-informed actuations during the handshake.
//!
//! `Ready` is entered only after the broker has acknowledged all three fact
//! subscriptions. A stuck ack is non-fatal: the liveness tick logs a warning
//! and the machine keeps waiting.

use log::{info, warn};

use crate::events::MessageId;

/// Connectivity/session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    /// No transport activity yet.
    Offline = 0,
    /// Network join (WiFi station connect) in progress.
    Joining = 1,
    /// Network is up; waiting for MQTT session + subscription acks.
    AwaitingSession = 2,
    /// Session live, subscriptions acknowledged — actuation permitted.
    Ready = 3,
}

/// A completed transition, for the orchestrator to report.
pub type Transition = (SessionState, SessionState);

/// Tracks the session lifecycle and outstanding subscription acks.
pub struct SessionFsm {
    state: SessionState,
    /// Message ids of subscriptions awaiting their ack.
    pending_subs: heapless::Vec<MessageId, 3>,
    /// All three subscribe calls were issued successfully this session.
    all_requested: bool,
    /// Ticks spent in `AwaitingSession` since the last session-up.
    ticks_waiting: u64,
    ack_warned: bool,
}

impl SessionFsm {
    pub fn new() -> Self {
        Self {
            state: SessionState::Offline,
            pending_subs: heapless::Vec::new(),
            all_requested: false,
            ticks_waiting: 0,
            ack_warned: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Actuation and derived-command publishing are permitted.
    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    // ── Transition inputs ─────────────────────────────────────

    /// Transport join has been invoked.
    pub fn begin_join(&mut self) -> Option<Transition> {
        match self.state {
            SessionState::Offline => Some(self.transition(SessionState::Joining)),
            _ => None,
        }
    }

    /// The network layer reports link-up; the MQTT session comes next.
    pub fn network_up(&mut self) -> Option<Transition> {
        match self.state {
            SessionState::Joining => Some(self.transition(SessionState::AwaitingSession)),
            _ => None,
        }
    }

    /// MQTT session established. Any subscription state from a previous
    /// session is stale and discarded; the orchestrator re-subscribes.
    pub fn session_up(&mut self) -> Option<Transition> {
        self.pending_subs.clear();
        self.all_requested = false;
        self.ticks_waiting = 0;
        self.ack_warned = false;

        match self.state {
            SessionState::AwaitingSession => None,
            _ => {
                if self.state != SessionState::Joining {
                    warn!("session: unexpected session-up in {:?}", self.state);
                }
                Some(self.transition(SessionState::AwaitingSession))
            }
        }
    }

    /// MQTT session dropped. Control state is retained by the owner; only
    /// the actuation gate closes.
    pub fn session_down(&mut self) -> Option<Transition> {
        self.pending_subs.clear();
        self.all_requested = false;
        self.ticks_waiting = 0;
        self.ack_warned = false;

        match self.state {
            SessionState::Ready => Some(self.transition(SessionState::AwaitingSession)),
            _ => None,
        }
    }

    /// Record a subscription awaiting its ack. `complete` is set once the
    /// orchestrator has issued every required subscribe call.
    pub fn note_subscription(&mut self, id: MessageId, complete: bool) {
        if self.pending_subs.push(id).is_err() {
            warn!("session: more pending subscriptions than topics");
        }
        self.all_requested = complete;
    }

    /// A subscription ack arrived. Returns the `AwaitingSession → Ready`
    /// transition once the last outstanding ack lands.
    pub fn sub_acked(&mut self, id: MessageId) -> Option<Transition> {
        if let Some(pos) = self.pending_subs.iter().position(|&p| p == id) {
            let _ = self.pending_subs.swap_remove(pos);
        }

        if self.state == SessionState::AwaitingSession
            && self.all_requested
            && self.pending_subs.is_empty()
        {
            Some(self.transition(SessionState::Ready))
        } else {
            None
        }
    }

    /// Liveness tick. Logs (once) if the session handshake has been stuck
    /// in `AwaitingSession` longer than `warn_after_ticks` — whether acks
    /// are outstanding or the subscribe round never completed. Non-fatal;
    /// the machine keeps waiting. Returns `true` on the tick that warns.
    pub fn tick(&mut self, warn_after_ticks: u64) -> bool {
        if self.state != SessionState::AwaitingSession {
            return false;
        }
        self.ticks_waiting += 1;
        if self.ticks_waiting >= warn_after_ticks && !self.ack_warned {
            if self.all_requested {
                warn!(
                    "session: {} subscription ack(s) still outstanding after {} ticks",
                    self.pending_subs.len(),
                    self.ticks_waiting
                );
            } else {
                warn!(
                    "session: subscribe round incomplete after {} ticks — waiting for session",
                    self.ticks_waiting
                );
            }
            self.ack_warned = true;
            return true;
        }
        false
    }

    // ── Internal ──────────────────────────────────────────────

    fn transition(&mut self, next: SessionState) -> Transition {
        let from = self.state;
        info!("session: {:?} -> {:?}", from, next);
        self.state = next;
        (from, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_fsm() -> SessionFsm {
        let mut fsm = SessionFsm::new();
        fsm.begin_join();
        fsm.network_up();
        fsm.session_up();
        fsm.note_subscription(1, false);
        fsm.note_subscription(2, false);
        fsm.note_subscription(3, true);
        fsm.sub_acked(1);
        fsm.sub_acked(2);
        fsm.sub_acked(3);
        fsm
    }

    #[test]
    fn happy_path_reaches_ready() {
        let mut fsm = SessionFsm::new();
        assert_eq!(fsm.state(), SessionState::Offline);

        assert_eq!(
            fsm.begin_join(),
            Some((SessionState::Offline, SessionState::Joining))
        );
        assert_eq!(
            fsm.network_up(),
            Some((SessionState::Joining, SessionState::AwaitingSession))
        );
        assert_eq!(fsm.session_up(), None, "already awaiting session");

        fsm.note_subscription(10, false);
        fsm.note_subscription(11, false);
        fsm.note_subscription(12, true);
        assert_eq!(fsm.sub_acked(10), None);
        assert_eq!(fsm.sub_acked(12), None, "acks may arrive out of order");
        assert_eq!(
            fsm.sub_acked(11),
            Some((SessionState::AwaitingSession, SessionState::Ready))
        );
        assert!(fsm.is_ready());
    }

    #[test]
    fn not_ready_until_every_ack() {
        let mut fsm = SessionFsm::new();
        fsm.begin_join();
        fsm.network_up();
        fsm.session_up();
        fsm.note_subscription(1, false);
        fsm.note_subscription(2, true);

        assert_eq!(fsm.sub_acked(1), None);
        assert!(!fsm.is_ready());
        assert!(fsm.sub_acked(2).is_some());
    }

    #[test]
    fn incomplete_subscribe_round_never_readies() {
        let mut fsm = SessionFsm::new();
        fsm.begin_join();
        fsm.network_up();
        fsm.session_up();
        // Third subscribe call failed — round never marked complete.
        fsm.note_subscription(1, false);
        fsm.note_subscription(2, false);

        assert_eq!(fsm.sub_acked(1), None);
        assert_eq!(fsm.sub_acked(2), None);
        assert!(!fsm.is_ready());
    }

    #[test]
    fn session_down_closes_the_gate() {
        let mut fsm = ready_fsm();
        assert!(fsm.is_ready());

        assert_eq!(
            fsm.session_down(),
            Some((SessionState::Ready, SessionState::AwaitingSession))
        );
        assert!(!fsm.is_ready());
    }

    #[test]
    fn reconnect_requires_fresh_acks() {
        let mut fsm = ready_fsm();
        fsm.session_down();
        fsm.session_up();

        // Stale ack ids from the previous session must not count.
        assert_eq!(fsm.sub_acked(1), None);
        assert!(!fsm.is_ready());

        fsm.note_subscription(20, false);
        fsm.note_subscription(21, false);
        fsm.note_subscription(22, true);
        fsm.sub_acked(20);
        fsm.sub_acked(21);
        assert!(fsm.sub_acked(22).is_some());
    }

    #[test]
    fn duplicate_acks_are_harmless() {
        let mut fsm = SessionFsm::new();
        fsm.begin_join();
        fsm.network_up();
        fsm.session_up();
        fsm.note_subscription(1, false);
        fsm.note_subscription(2, true);
        fsm.sub_acked(1);
        // At-least-once delivery: the broker may redeliver an ack.
        assert_eq!(fsm.sub_acked(1), None);
        assert!(fsm.sub_acked(2).is_some());
        assert_eq!(fsm.sub_acked(2), None, "already ready, no re-transition");
    }

    #[test]
    fn down_while_awaiting_stays_awaiting() {
        let mut fsm = SessionFsm::new();
        fsm.begin_join();
        fsm.network_up();
        fsm.session_up();
        assert_eq!(fsm.session_down(), None);
        assert_eq!(fsm.state(), SessionState::AwaitingSession);
    }

    #[test]
    fn tick_warning_does_not_change_state() {
        let mut fsm = SessionFsm::new();
        fsm.begin_join();
        fsm.network_up();
        fsm.session_up();
        fsm.note_subscription(1, true);

        let mut warns = 0;
        for _ in 0..100 {
            if fsm.tick(30) {
                warns += 1;
            }
        }
        assert_eq!(warns, 1, "warning is one-shot");
        assert_eq!(fsm.state(), SessionState::AwaitingSession);
        assert!(fsm.sub_acked(1).is_some(), "late ack still completes");
    }

    #[test]
    fn stalled_handshake_warns_even_with_no_pending_acks() {
        let mut fsm = SessionFsm::new();
        fsm.begin_join();
        fsm.network_up();
        fsm.session_up();
        // Every subscribe call failed: nothing pending, round incomplete.

        let mut warns = 0;
        for _ in 0..100 {
            if fsm.tick(30) {
                warns += 1;
            }
        }
        assert_eq!(warns, 1);
        assert_eq!(fsm.state(), SessionState::AwaitingSession);
    }
}
