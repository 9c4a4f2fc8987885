//! ZoneTherm Firmware — Main Entry Point
//!
//! Hexagonal architecture with event-driven execution:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  WifiAdapter        MqttLink          RelayBoardAdapter      │
//! │  (ConnectivityPort) (TransportPort +  (RelayPort)            │
//! │                      link events)     LogEventSink (sink)    │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ────────────────        │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │          ControlService (pure logic)               │      │
//! │  │  Session FSM · ControlState · Policy · Gateway     │      │
//! │  └────────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Startup blocks until the WiFi join succeeds (retried indefinitely at
//! this layer); from then on the system is purely event-reactive — the
//! only periodic work is the liveness tick injected below.
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::{Context, Result};
use log::info;

use zonetherm::adapters::hardware::RelayBoardAdapter;
use zonetherm::adapters::log_sink::LogEventSink;
use zonetherm::adapters::mqtt::MqttLink;
use zonetherm::adapters::wifi::{ConnectivityPort, WifiAdapter};
use zonetherm::app::service::ControlService;
use zonetherm::config::SystemConfig;
use zonetherm::events::{self, LinkEvent};

/// Station credentials are baked in at build time, as on the deployed
/// units. Set `ZONETHERM_WIFI_SSID` / `ZONETHERM_WIFI_PASS` in the build
/// environment.
const WIFI_SSID: &str = match option_env!("ZONETHERM_WIFI_SSID") {
    Some(v) => v,
    None => "",
};
const WIFI_PASS: &str = match option_env!("ZONETHERM_WIFI_PASS") {
    Some(v) => v,
    None => "",
};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("ZoneTherm v{} booting", env!("CARGO_PKG_VERSION"));

    let config = SystemConfig::default();

    // ── 2. Relay board ────────────────────────────────────────
    let mut relays = RelayBoardAdapter::new();
    relays
        .init()
        .map_err(|e| anyhow::anyhow!("relay init failed: {e}"))?;

    // ── 3. Control service ────────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut service = ControlService::new(config.clone());
    service.start(&mut sink);

    // ── 4. Network join (blocks; indefinite retry) ────────────
    let mut wifi = WifiAdapter::new();
    wifi.set_credentials(WIFI_SSID, WIFI_PASS)
        .map_err(|e| anyhow::anyhow!("WiFi credentials: {e}"))?;

    service.note_join_started(&mut sink);
    if wifi.connect().is_err() {
        while !wifi.is_connected() {
            std::thread::sleep(Duration::from_secs(1));
            wifi.poll();
        }
    }
    service.note_network_up(&mut sink);

    // ── 5. MQTT session (last will registered here) ───────────
    let mut mqtt =
        MqttLink::connect(&config, service.topics()).context("MQTT connect failed")?;

    info!("System ready. Entering event loop.");

    // ── 6. Event loop ─────────────────────────────────────────
    let tick = Duration::from_millis(config.tick_interval_ms as u64);
    loop {
        std::thread::sleep(tick);
        let _ = events::push_event(LinkEvent::Tick);

        events::drain_events(|event| {
            service.handle_event(event, &mut mqtt, &mut relays, &mut sink);
        });

        if service.shutdown_requested() {
            break;
        }

        // WiFi reconnection poll (exponential backoff).
        wifi.poll();
    }

    // ── 7. Best-effort cleanup ────────────────────────────────
    // The presence "offline" publish already happened when the service
    // processed the shutdown event; the last will covers the case where
    // it didn't make it out.
    mqtt.disconnect();
    wifi.disconnect();
    info!("Shutdown complete.");
    Ok(())
}
