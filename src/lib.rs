//! Slice Rush - runtime core of an arcade fruit-slicing game
//!
//! Core modules:
//! - `sim`: Frame-driven session runtime (clock, combo, spawning, power-ups, explosion)
//! - `platform`: Collaborator contracts (presentation, entity service, blade input)
//! - `persistence`: Versioned JSON envelope and atomic file writes
//! - `highscores`: High-score record and stores
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScoreStore, MemoryHighScores};
pub use platform::Services;
pub use sim::{Session, SessionPhase, TickInput, tick};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal frame step used by the headless driver (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest real delta accepted per frame (avoids huge catch-up steps after a stall)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Combo streak window in scaled seconds
    pub const COMBO_WINDOW: f32 = 1.0;
    /// Combo bonus multiplier cap
    pub const MAX_COMBO_BONUS: u32 = 5;

    /// Delay before the first spawn after the spawner is enabled
    pub const SPAWN_INITIAL_DELAY: f32 = 2.0;

    /// Explosion fade-to-white duration (real seconds)
    pub const EXPLOSION_FADE: f32 = 0.5;
    /// Explosion hold at time scale 0 (real seconds)
    pub const EXPLOSION_HOLD: f32 = 1.0;

    /// Time scale while slow motion is active
    pub const SLOW_MOTION_SCALE: f32 = 0.5;
    /// Score multiplier while the 2x power-up is active
    pub const SCORE_MULTIPLIER: f32 = 2.0;
    /// Fruit frenzy spawner overrides
    pub const FRENZY_MIN_DELAY: f32 = 0.1;
    pub const FRENZY_MAX_DELAY: f32 = 0.3;
    pub const FRENZY_BOMB_CHANCE: f32 = 0.01;

    /// Default power-up duration in real seconds
    pub const POWER_UP_DURATION: f32 = 5.0;
}

/// Clamp to [0, 1], mapping NaN to 0
#[inline]
pub fn clamp01(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Linear interpolation between `a` and `b` with `t` clamped to [0, 1]
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * clamp01(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(0.25), 0.25);
        assert_eq!(clamp01(3.0), 1.0);
        assert_eq!(clamp01(f32::NAN), 0.0);
    }

    #[test]
    fn test_lerp_clamps_fraction() {
        assert_eq!(lerp(0.0, 1.0, 0.5), 0.5);
        assert_eq!(lerp(1.0, 0.0, 0.25), 0.75);
        assert_eq!(lerp(0.0, 1.0, 2.0), 1.0);
    }
}
