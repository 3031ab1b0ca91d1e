use serde::{Deserialize, Serialize};

use super::scene::Effects;

/// The four-dimensional player state vector.
///
/// The engine only ever adds effect deltas onto these values. No clamping
/// happens here; [`PlayerStats::clamped`] is a pure helper for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub sleep: i64,
    pub energy: i64,
    pub focus: i64,
    pub stress: i64,
}

impl PlayerStats {
    pub const BASELINE: PlayerStats = PlayerStats {
        sleep: 65,
        energy: 55,
        focus: 70,
        stress: 30,
    };

    /// Add each delta onto the matching stat. Saturates at the `i64` bounds.
    pub fn apply(&mut self, effects: &Effects) {
        self.sleep = self.sleep.saturating_add(effects.sleep);
        self.energy = self.energy.saturating_add(effects.energy);
        self.focus = self.focus.saturating_add(effects.focus);
        self.stress = self.stress.saturating_add(effects.stress);
    }

    /// Copy of these stats with every value clamped into `min..=max`.
    pub fn clamped(&self, min: i64, max: i64) -> PlayerStats {
        PlayerStats {
            sleep: self.sleep.clamp(min, max),
            energy: self.energy.clamp(min, max),
            focus: self.focus.clamp(min, max),
            stress: self.stress.clamp(min, max),
        }
    }
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::BASELINE
    }
}
