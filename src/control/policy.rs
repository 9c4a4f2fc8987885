//! Decision policy — pure mapping from zone state to desired relay levels.
//!
//! Occupancy is the first-order gate: an unoccupied zone is always all-off,
//! whatever the temperatures say. When occupied, the zone heats and
//! circulates below the setpoint, circulates only above it, and idles inside
//! the deadband.
//!
//! An unknown temperature yields **no decision** at all: the gateway holds
//! the last applied relay levels until both readings have arrived. A `None`
//! here must never be interpreted as "zero degrees".
//!
//! The deadband half-width defaults to 0.0 in [`SystemConfig`], which makes
//! exact equality the only occupied idle condition — the relays can chatter
//! when the ambient reading hovers at the setpoint. Known limitation; widen
//! `deadband_f` to suppress it.
//!
//! [`SystemConfig`]: crate::config::SystemConfig

use crate::control::state::ControlState;

/// A desired (heater, fan) relay configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayCommand {
    pub heater_on: bool,
    pub fan_on: bool,
}

impl RelayCommand {
    /// Both relays off — the safe configuration.
    pub const ALL_OFF: Self = Self {
        heater_on: false,
        fan_on: false,
    };
}

/// Evaluate the policy. Returns `None` when the zone is occupied but a
/// temperature is still unknown (hold current relay levels).
pub fn decide(state: &ControlState, deadband_f: f32) -> Option<RelayCommand> {
    if !state.occupied {
        return Some(RelayCommand::ALL_OFF);
    }

    let (ambient, target) = match (state.ambient_f, state.target_f) {
        (Some(a), Some(t)) => (a, t),
        _ => return None,
    };

    if ambient < target - deadband_f {
        // Too cold: heat and circulate.
        Some(RelayCommand {
            heater_on: true,
            fan_on: true,
        })
    } else if ambient > target + deadband_f {
        // Too warm: circulate only, no heat.
        Some(RelayCommand {
            heater_on: false,
            fan_on: true,
        })
    } else {
        // Within the band (exact setpoint when deadband is 0): idle.
        Some(RelayCommand::ALL_OFF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(ambient: Option<f32>, target: Option<f32>, occupied: bool) -> ControlState {
        ControlState {
            ambient_f: ambient,
            target_f: target,
            occupied,
        }
    }

    #[test]
    fn unoccupied_is_all_off_regardless_of_temperatures() {
        for (a, t) in [
            (Some(40.0), Some(80.0)),
            (Some(90.0), Some(60.0)),
            (Some(70.0), Some(70.0)),
            (None, Some(70.0)),
            (None, None),
        ] {
            assert_eq!(
                decide(&zone(a, t, false), 0.0),
                Some(RelayCommand::ALL_OFF)
            );
        }
    }

    #[test]
    fn too_cold_heats_and_circulates() {
        assert_eq!(
            decide(&zone(Some(65.0), Some(70.0), true), 0.0),
            Some(RelayCommand {
                heater_on: true,
                fan_on: true
            })
        );
    }

    #[test]
    fn too_warm_circulates_without_heat() {
        assert_eq!(
            decide(&zone(Some(75.0), Some(70.0), true), 0.0),
            Some(RelayCommand {
                heater_on: false,
                fan_on: true
            })
        );
    }

    #[test]
    fn at_setpoint_idles() {
        assert_eq!(
            decide(&zone(Some(70.0), Some(70.0), true), 0.0),
            Some(RelayCommand::ALL_OFF)
        );
    }

    #[test]
    fn unknown_temperature_holds_when_occupied() {
        assert_eq!(decide(&zone(None, Some(70.0), true), 0.0), None);
        assert_eq!(decide(&zone(Some(65.0), None, true), 0.0), None);
        assert_eq!(decide(&zone(None, None, true), 0.0), None);
    }

    #[test]
    fn deadband_widens_the_idle_band() {
        let db = 1.5;
        // Inside the band: idle.
        assert_eq!(
            decide(&zone(Some(69.0), Some(70.0), true), db),
            Some(RelayCommand::ALL_OFF)
        );
        assert_eq!(
            decide(&zone(Some(71.0), Some(70.0), true), db),
            Some(RelayCommand::ALL_OFF)
        );
        // Outside the band: normal branches.
        assert_eq!(
            decide(&zone(Some(68.0), Some(70.0), true), db),
            Some(RelayCommand {
                heater_on: true,
                fan_on: true
            })
        );
        assert_eq!(
            decide(&zone(Some(72.0), Some(70.0), true), db),
            Some(RelayCommand {
                heater_on: false,
                fan_on: true
            })
        );
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_temp() -> impl Strategy<Value = Option<f32>> {
        proptest::option::of(-40.0f32..140.0)
    }

    proptest! {
        #[test]
        fn unoccupied_always_all_off(a in arb_temp(), t in arb_temp(), db in 0.0f32..5.0) {
            let s = ControlState { ambient_f: a, target_f: t, occupied: false };
            prop_assert_eq!(decide(&s, db), Some(RelayCommand::ALL_OFF));
        }

        #[test]
        fn heater_never_on_without_fan(a in arb_temp(), t in arb_temp(), occ: bool, db in 0.0f32..5.0) {
            let s = ControlState { ambient_f: a, target_f: t, occupied: occ };
            if let Some(cmd) = decide(&s, db) {
                prop_assert!(!cmd.heater_on || cmd.fan_on,
                    "heater must never run without circulation");
            }
        }

        #[test]
        fn occupied_with_unknown_temp_always_holds(occ_target in arb_temp()) {
            let s = ControlState { ambient_f: None, target_f: occ_target, occupied: true };
            prop_assert_eq!(decide(&s, 0.0), None);
        }

        #[test]
        fn decision_is_deterministic(a in arb_temp(), t in arb_temp(), occ: bool, db in 0.0f32..5.0) {
            let s = ControlState { ambient_f: a, target_f: t, occupied: occ };
            prop_assert_eq!(decide(&s, db), decide(&s, db));
        }
    }
}
