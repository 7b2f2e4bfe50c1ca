//! Power-up effect engine
//!
//! At most one timed effect is active. Each effect records what it overrode
//! when it starts, and that record is replayed on expiry *and* on
//! cancellation, so activating a new power-up (or starting a new game)
//! always restores the previous effect's globals before anything else runs.
//!
//! Countdowns run on unscaled time and do not advance while the session is
//! paused.

use serde::{Deserialize, Serialize};

use super::clock::{Clock, TimeSource};
use crate::clamp01;
use crate::tuning::{PowerUpTuning, SpawnerConfig};

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    SlowMotion,
    ScoreMultiplier,
    FruitFrenzy,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::SlowMotion,
        PowerUpKind::ScoreMultiplier,
        PowerUpKind::FruitFrenzy,
    ];

    /// Indicator label
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::SlowMotion => "SLOW MOTION",
            PowerUpKind::ScoreMultiplier => "2X POINTS",
            PowerUpKind::FruitFrenzy => "FRUIT FRENZY!",
        }
    }
}

/// Shared state an effect may override
///
/// `time_scale` is whichever slot is authoritative right now: the live clock
/// scale, or the scale saved for resume while the session is paused.
pub struct EffectTargets<'a> {
    pub time_scale: &'a mut f32,
    pub spawner: &'a mut SpawnerConfig,
}

/// What an effect must put back when it ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum Restore {
    TimeScale(f32),
    ScoreMultiplier,
    Spawner {
        min_delay: f32,
        max_delay: f32,
        bomb_chance: f32,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ActivePowerUp {
    kind: PowerUpKind,
    duration: f32,
    remaining: f32,
    restore: Restore,
}

impl ActivePowerUp {
    fn bar(&self) -> f32 {
        if self.duration > 0.0 {
            clamp01(self.remaining / self.duration)
        } else {
            0.0
        }
    }
}

/// Outcome of one frame of the countdown
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PowerUpTick {
    /// Nothing active
    Idle,
    /// Paused; the bar keeps its last value
    Frozen,
    /// Still running, bar value in [0, 1]
    Progress(f32),
    /// Ran out this frame and was restored
    Expired(PowerUpKind),
}

/// The single-slot effect engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpEngine {
    active: Option<ActivePowerUp>,
    score_multiplier: f32,
    tuning: PowerUpTuning,
}

impl PowerUpEngine {
    pub fn new(tuning: PowerUpTuning) -> Self {
        Self {
            active: None,
            score_multiplier: 1.0,
            tuning,
        }
    }

    pub fn active_kind(&self) -> Option<PowerUpKind> {
        self.active.as_ref().map(|a| a.kind)
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.active_kind() == Some(kind)
    }

    /// Multiplier applied to scored points (1 unless 2x points is running)
    pub fn score_multiplier(&self) -> f32 {
        self.score_multiplier
    }

    /// Duration bar value (remaining / duration); 0 when idle
    pub fn bar(&self) -> f32 {
        self.active.as_ref().map_or(0.0, ActivePowerUp::bar)
    }

    /// Remaining real seconds of the active effect
    pub fn remaining(&self) -> Option<f32> {
        self.active.as_ref().map(|a| a.remaining)
    }

    /// Start `kind` for `duration` real seconds, cancelling (and restoring) any current effect
    pub fn activate(&mut self, kind: PowerUpKind, duration: f32, targets: &mut EffectTargets) {
        if let Some(previous) = self.cancel(targets) {
            log::info!("{} interrupted by {}", previous.label(), kind.label());
        }

        let restore = match kind {
            PowerUpKind::SlowMotion => {
                let saved = *targets.time_scale;
                *targets.time_scale = self.tuning.slow_motion_scale;
                Restore::TimeScale(saved)
            }
            PowerUpKind::ScoreMultiplier => {
                self.score_multiplier = self.tuning.score_multiplier;
                Restore::ScoreMultiplier
            }
            PowerUpKind::FruitFrenzy => {
                let spawner = &mut *targets.spawner;
                let restore = Restore::Spawner {
                    min_delay: spawner.min_delay,
                    max_delay: spawner.max_delay,
                    bomb_chance: spawner.bomb_chance,
                };
                spawner.min_delay = self.tuning.frenzy_min_delay;
                spawner.max_delay = self.tuning.frenzy_max_delay;
                spawner.bomb_chance = self.tuning.frenzy_bomb_chance;
                restore
            }
        };

        let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        log::info!("Power-up {} for {:.1}s", kind.label(), duration);
        self.active = Some(ActivePowerUp {
            kind,
            duration,
            remaining: duration,
            restore,
        });
    }

    /// End the active effect now, restoring what it overrode
    pub fn cancel(&mut self, targets: &mut EffectTargets) -> Option<PowerUpKind> {
        let active = self.active.take()?;
        self.restore(active.restore, targets);
        Some(active.kind)
    }

    /// Advance the countdown by this frame's unscaled delta
    pub fn tick(&mut self, clock: &Clock, paused: bool, targets: &mut EffectTargets) -> PowerUpTick {
        let Some(active) = self.active.as_mut() else {
            return PowerUpTick::Idle;
        };
        if paused {
            return PowerUpTick::Frozen;
        }

        active.remaining -= clock.delta(TimeSource::Unscaled);
        if active.remaining > 0.0 {
            return PowerUpTick::Progress(active.bar());
        }

        let kind = active.kind;
        let restore = active.restore;
        self.active = None;
        self.restore(restore, targets);
        log::info!("Power-up {} expired", kind.label());
        PowerUpTick::Expired(kind)
    }

    fn restore(&mut self, restore: Restore, targets: &mut EffectTargets) {
        match restore {
            Restore::TimeScale(saved) => *targets.time_scale = saved,
            Restore::ScoreMultiplier => self.score_multiplier = 1.0,
            Restore::Spawner {
                min_delay,
                max_delay,
                bomb_chance,
            } => {
                targets.spawner.min_delay = min_delay;
                targets.spawner.max_delay = max_delay;
                targets.spawner.bomb_chance = bomb_chance;
            }
        }
    }
}
