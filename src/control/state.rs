//! Accumulated control state for one climate zone.
//!
//! Facts arrive partially, out of order, and at their own pace — an
//! occupancy update one minute, an ambient reading the next. `ControlState`
//! is the blackboard they accumulate on: each fact updates exactly one
//! field and never clobbers another. Temperatures stay `None` until a
//! reading has actually arrived, so the policy can tell "unknown" from
//! "zero degrees".

use crate::decode::Fact;

/// Latest known zone facts. Created once at orchestrator start and mutated
/// exclusively by [`apply`](ControlState::apply) on the control thread.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlState {
    /// Latest ambient temperature reading (°F), if any has arrived.
    pub ambient_f: Option<f32>,
    /// Latest target temperature (°F), if any has arrived.
    pub target_f: Option<f32>,
    /// Zone occupancy. Defaults to `false` — unoccupied is the safe default.
    pub occupied: bool,
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one decoded fact into the state.
    pub fn apply(&mut self, fact: Fact) {
        match fact {
            Fact::AmbientTemperature(f) => self.ambient_f = Some(f),
            Fact::TargetTemperature(f) => self.target_f = Some(f),
            Fact::Occupancy(p) => self.occupied = p,
        }
    }

    /// Both temperature readings have arrived.
    pub fn temperatures_known(&self) -> bool {
        self.ambient_f.is_some() && self.target_f.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_safe_defaults() {
        let s = ControlState::new();
        assert_eq!(s.ambient_f, None);
        assert_eq!(s.target_f, None);
        assert!(!s.occupied);
        assert!(!s.temperatures_known());
    }

    #[test]
    fn facts_update_independently() {
        let mut s = ControlState::new();

        s.apply(Fact::AmbientTemperature(65.0));
        assert_eq!(s.ambient_f, Some(65.0));
        assert_eq!(s.target_f, None);
        assert!(!s.occupied);

        s.apply(Fact::Occupancy(true));
        assert_eq!(s.ambient_f, Some(65.0));
        assert!(s.occupied);

        s.apply(Fact::TargetTemperature(70.0));
        assert_eq!(s.ambient_f, Some(65.0));
        assert_eq!(s.target_f, Some(70.0));
        assert!(s.occupied);
        assert!(s.temperatures_known());
    }

    #[test]
    fn newer_fact_replaces_older_same_field() {
        let mut s = ControlState::new();
        s.apply(Fact::AmbientTemperature(65.0));
        s.apply(Fact::AmbientTemperature(66.5));
        assert_eq!(s.ambient_f, Some(66.5));
    }
}
