//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to the
//! logger (UART / USB-CDC in production). Tests implement the same trait
//! with a capturing sink instead.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_session={:?}", state);
            }
            AppEvent::SessionChanged { from, to } => {
                info!("SESSION | {:?} -> {:?}", from, to);
            }
            AppEvent::PresenceAnnounced => {
                info!("SESSION | presence 'online' published");
            }
            AppEvent::RelayChanged { relay, on } => {
                info!("RELAY | {:?} -> {}", relay, if *on { "ON" } else { "OFF" });
            }
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | session={:?} | ambient={} target={} occupied={} | \
                     heater={} fan={} | tick={}",
                    t.session,
                    t.zone
                        .ambient_f
                        .map_or_else(|| "?".into(), |v| format!("{v:.1}F")),
                    t.zone
                        .target_f
                        .map_or_else(|| "?".into(), |v| format!("{v:.1}F")),
                    t.zone.occupied,
                    if t.heater_on { "ON" } else { "OFF" },
                    if t.fan_on { "ON" } else { "OFF" },
                    t.tick_count,
                );
            }
        }
    }
}
