//! Session state and player-facing operations
//!
//! The session owns score, combo, pause, the power-up engine, the spawn loop
//! and the live-entity registry. Timed work is advanced by [`super::tick`].

use super::clock::{Clock, TimeSource};
use super::combo::{ComboTracker, combo_text};
use super::explosion::ExplosionSequence;
use super::powerup::{EffectTargets, PowerUpEngine, PowerUpKind};
use super::registry::{EntityId, EntityRegistry};
use super::spawn::{SpawnCategory, SpawnProcess};
use crate::platform::{Hud, HudEvent, Services};
use crate::tuning::{SpawnerConfig, Tuning};

/// Seed used when the tuning does not pin one
pub const DEFAULT_SEED: u64 = 0x5EED_F4A1;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Normal play
    Active,
    /// Time frozen, slicing disabled
    Paused,
    /// Bomb hit, explosion sequence running
    Exploding,
    /// Run ended; waits for a new game
    GameOver,
}

/// What a slice did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SliceOutcome {
    /// Slicing disabled, unknown entity, or already sliced
    Ignored,
    /// Fruit scored this many points after combo and multiplier
    Scored(u64),
    Exploded,
    PowerUp(PowerUpKind),
}

/// A game session
pub struct Session {
    pub(crate) tuning: Tuning,
    /// Live spawner parameters (fruit frenzy overrides these)
    pub(crate) spawner_config: SpawnerConfig,
    pub(crate) clock: Clock,
    pub(crate) phase: SessionPhase,
    pub(crate) score: u64,
    /// Time scale to restore on resume
    pub(crate) saved_time_scale: f32,
    pub(crate) slicing_enabled: bool,
    pub(crate) combo: ComboTracker,
    pub(crate) power_ups: PowerUpEngine,
    pub(crate) spawner: SpawnProcess,
    pub(crate) registry: EntityRegistry,
    pub(crate) explosion: Option<ExplosionSequence>,
    pub(crate) hud: Hud,
    pub(crate) services: Services,
}

impl Session {
    /// Create a session and start the first game
    pub fn new(tuning: Tuning, services: Services) -> Self {
        let seed = tuning.seed.unwrap_or(DEFAULT_SEED);
        let mut session = Self {
            spawner_config: tuning.spawner.clone(),
            clock: Clock::new(),
            phase: SessionPhase::Active,
            score: 0,
            saved_time_scale: 1.0,
            slicing_enabled: false,
            combo: ComboTracker::new(tuning.combo_window),
            power_ups: PowerUpEngine::new(tuning.power_ups),
            spawner: SpawnProcess::new(seed),
            registry: EntityRegistry::new(),
            explosion: None,
            hud: Hud::default(),
            services,
            tuning,
        };
        session.new_game();
        session
    }

    // === Accessors ===

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.phase == SessionPhase::Paused
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo_count(&self) -> u32 {
        self.combo.count()
    }

    /// Current score multiplier (>= 1)
    pub fn score_multiplier(&self) -> f32 {
        self.power_ups.score_multiplier()
    }

    pub fn active_power_up(&self) -> Option<PowerUpKind> {
        self.power_ups.active_kind()
    }

    pub fn power_up_bar(&self) -> f32 {
        self.power_ups.bar()
    }

    pub fn time_scale(&self) -> f32 {
        self.clock.time_scale()
    }

    pub fn saved_time_scale(&self) -> f32 {
        self.saved_time_scale
    }

    pub fn slicing_enabled(&self) -> bool {
        self.slicing_enabled
    }

    pub fn spawning_enabled(&self) -> bool {
        self.spawner.is_enabled()
    }

    pub fn spawner_config(&self) -> &SpawnerConfig {
        &self.spawner_config
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn services_mut(&mut self) -> &mut Services {
        &mut self.services
    }

    pub fn high_score(&self) -> u64 {
        self.services.store.high_score()
    }

    // === Plumbing shared with the tick ===

    /// Push a HUD change to the presentation layer and the local snapshot
    pub(crate) fn push(&mut self, event: HudEvent) {
        self.hud.apply(&event);
        self.services.presentation.push(&event);
    }

    /// The time-scale slot effects should write: saved scale while paused, live scale otherwise
    pub(crate) fn effective_time_scale(&self) -> f32 {
        if self.is_paused() {
            self.saved_time_scale
        } else {
            self.clock.time_scale()
        }
    }

    pub(crate) fn set_effective_time_scale(&mut self, scale: f32) {
        if self.is_paused() {
            self.saved_time_scale = scale;
        } else {
            self.clock.set_time_scale(scale);
        }
    }

    fn set_slicing(&mut self, enabled: bool) {
        self.slicing_enabled = enabled;
        self.services.blade.set_enabled(enabled);
    }

    /// Cancel the active power-up, restoring its overrides, and hide the indicator
    fn cancel_power_up(&mut self) {
        let mut scale = self.effective_time_scale();
        let cancelled = {
            let mut targets = EffectTargets {
                time_scale: &mut scale,
                spawner: &mut self.spawner_config,
            };
            self.power_ups.cancel(&mut targets)
        };
        self.set_effective_time_scale(scale);

        if let Some(kind) = cancelled {
            log::info!("Power-up {} cancelled", kind.label());
            self.push(HudEvent::PowerUp(None));
            self.push(HudEvent::PowerUpBar(0.0));
        }
    }

    // === Operations ===

    /// Reset everything and start a fresh run
    pub fn new_game(&mut self) {
        // Resume first so the time scale is restored consistently
        if self.is_paused() {
            self.toggle_pause();
        }

        self.cancel_power_up();
        self.explosion = None;
        self.clock.set_time_scale(1.0);
        self.saved_time_scale = 1.0;
        self.spawner_config = self.tuning.spawner.clone();

        for id in self.registry.clear() {
            self.services.entities.despawn(id);
        }

        self.set_slicing(true);
        self.spawner.disable();
        self.spawner.enable(&self.spawner_config);

        self.score = 0;
        self.combo.reset();
        self.phase = SessionPhase::Active;

        self.push(HudEvent::Score(0));
        self.push(HudEvent::Combo(None));
        self.push(HudEvent::Overlay(0.0));
        self.push(HudEvent::HideGameOver);
        self.push(HudEvent::PausePanel(false));
        self.push(HudEvent::PowerUp(None));
        self.push(HudEvent::PowerUpBar(0.0));

        log::info!("New game (high score {})", self.high_score());
    }

    /// Pause or resume; ignored while exploding or after game over.
    /// Returns whether the state changed.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            SessionPhase::Active => {
                self.saved_time_scale = self.clock.time_scale();
                self.clock.set_time_scale(0.0);
                self.phase = SessionPhase::Paused;
                self.set_slicing(false);
                self.push(HudEvent::PausePanel(true));
                log::info!("Paused");
                true
            }
            SessionPhase::Paused => {
                self.clock.set_time_scale(self.saved_time_scale);
                self.phase = SessionPhase::Active;
                self.set_slicing(true);
                self.push(HudEvent::PausePanel(false));
                log::info!("Resumed at time scale {}", self.saved_time_scale);
                true
            }
            SessionPhase::Exploding | SessionPhase::GameOver => false,
        }
    }

    /// Score a slice: combo bonus first, then the 2x multiplier (rounded).
    /// Returns the points actually added.
    pub fn increase_score(&mut self, points: u32) -> u64 {
        let now = self.clock.now(TimeSource::Scaled);
        let hit = self.combo.register_slice(now);
        let mut points = points as u64 * hit.bonus as u64;

        if hit.extended {
            log::debug!("Combo x{} (bonus {})", hit.count, hit.bonus);
            self.push(HudEvent::Combo(Some(combo_text(hit.count))));
        } else if self.hud.combo_text.is_some() {
            self.push(HudEvent::Combo(None));
        }

        if self.power_ups.is_active(PowerUpKind::ScoreMultiplier) {
            let scaled = (points as f64 * self.power_ups.score_multiplier() as f64).round();
            points = scaled.max(0.0) as u64;
        }

        self.score = self.score.saturating_add(points);
        self.push(HudEvent::Score(self.score));

        if self.score > self.services.store.high_score() {
            self.services.store.set_high_score(self.score);
            log::debug!("New high score {}", self.score);
        }

        points
    }

    /// Bomb hit: stop input and spawning and start the explosion sequence
    pub fn explode(&mut self) {
        if self.phase != SessionPhase::Active {
            return;
        }

        self.set_slicing(false);
        self.spawner.disable();
        self.cancel_power_up();

        self.explosion = Some(ExplosionSequence::new(self.tuning.explosion));
        self.clock.set_time_scale(1.0);
        self.phase = SessionPhase::Exploding;
        self.push(HudEvent::Overlay(0.0));
        log::info!("Boom! Final score {}", self.score);
    }

    /// Show the game-over panel with final and high score texts
    pub(crate) fn show_game_over(&mut self) {
        let high = self.services.store.high_score();
        self.push(HudEvent::GameOver {
            final_score: format!("Score: {}", self.score),
            high_score: format!("High Score: {high}"),
        });
    }

    /// Start a power-up for `duration` real seconds, replacing any active one
    pub fn activate_power_up(&mut self, kind: PowerUpKind, duration: f32) {
        if matches!(self.phase, SessionPhase::Exploding | SessionPhase::GameOver) {
            return;
        }

        let mut scale = self.effective_time_scale();
        {
            let mut targets = EffectTargets {
                time_scale: &mut scale,
                spawner: &mut self.spawner_config,
            };
            self.power_ups.activate(kind, duration, &mut targets);
        }
        self.set_effective_time_scale(scale);

        self.push(HudEvent::PowerUp(Some(kind)));
        self.push(HudEvent::PowerUpBar(self.power_ups.bar()));
    }

    pub fn activate_slow_motion(&mut self, duration: f32) {
        self.activate_power_up(PowerUpKind::SlowMotion, duration);
    }

    pub fn activate_score_multiplier(&mut self, duration: f32) {
        self.activate_power_up(PowerUpKind::ScoreMultiplier, duration);
    }

    pub fn activate_fruit_frenzy(&mut self, duration: f32) {
        self.activate_power_up(PowerUpKind::FruitFrenzy, duration);
    }

    /// Blade hit on a live entity
    pub fn slice(&mut self, id: EntityId) -> SliceOutcome {
        if !self.slicing_enabled {
            return SliceOutcome::Ignored;
        }
        let Some(category) = self.registry.mark_sliced(id) else {
            return SliceOutcome::Ignored;
        };

        match category {
            SpawnCategory::Fruit { points, .. } => SliceOutcome::Scored(self.increase_score(points)),
            SpawnCategory::Bomb => {
                self.explode();
                SliceOutcome::Exploded
            }
            SpawnCategory::PowerUp { kind, duration } => {
                self.activate_power_up(kind, duration);
                SliceOutcome::PowerUp(kind)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Tuning::default(), Services::headless())
    }

    #[test]
    fn test_new_session_is_active() {
        let session = session();
        assert_eq!(session.phase(), SessionPhase::Active);
        assert!(session.slicing_enabled());
        assert!(session.spawning_enabled());
        assert_eq!(session.time_scale(), 1.0);
        assert_eq!(session.hud().score_text, "0");
    }

    #[test]
    fn test_pause_round_trip() {
        let mut session = session();
        assert!(session.toggle_pause());
        assert!(session.is_paused());
        assert_eq!(session.time_scale(), 0.0);
        assert!(!session.slicing_enabled());
        assert!(session.hud().pause_visible);

        assert!(session.toggle_pause());
        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.time_scale(), 1.0);
        assert!(session.slicing_enabled());
        assert!(!session.hud().pause_visible);
    }

    #[test]
    fn test_pause_keeps_slow_motion_scale() {
        let mut session = session();
        session.activate_slow_motion(5.0);
        session.toggle_pause();
        assert_eq!(session.saved_time_scale(), 0.5);
        session.toggle_pause();
        assert_eq!(session.time_scale(), 0.5);
    }

    #[test]
    fn test_multiplier_applies_after_combo() {
        let mut session = session();
        session.activate_score_multiplier(5.0);
        assert_eq!(session.increase_score(10), 20);
        // Same scaled instant: inside the window, bonus 2 then x2
        assert_eq!(session.increase_score(10), 40);
        assert_eq!(session.score(), 60);
    }

    #[test]
    fn test_high_score_follows_score() {
        let mut session = session();
        session.increase_score(7);
        assert_eq!(session.high_score(), 7);
        session.new_game();
        session.increase_score(3);
        assert_eq!(session.high_score(), 7);
    }

    #[test]
    fn test_explode_only_from_active() {
        let mut session = session();
        session.toggle_pause();
        session.explode();
        assert_eq!(session.phase(), SessionPhase::Paused);
        session.toggle_pause();

        session.explode();
        assert_eq!(session.phase(), SessionPhase::Exploding);
        assert!(!session.slicing_enabled());
        assert!(!session.spawning_enabled());
        assert!(!session.toggle_pause());
    }

    #[test]
    fn test_explode_cancels_power_up() {
        let mut session = session();
        session.activate_fruit_frenzy(5.0);
        session.explode();
        assert_eq!(session.active_power_up(), None);
        assert_eq!(session.spawner_config(), &SpawnerConfig::default());
    }

    #[test]
    fn test_new_game_while_paused_resets_everything() {
        let mut session = session();
        session.activate_slow_motion(5.0);
        session.increase_score(12);
        session.toggle_pause();

        session.new_game();
        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.time_scale(), 1.0);
        assert_eq!(session.saved_time_scale(), 1.0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.combo_count(), 0);
        assert_eq!(session.active_power_up(), None);
        assert!(!session.hud().pause_visible);
        assert!(session.hud().power_up.is_none());
    }

    #[test]
    fn test_unknown_slice_ignored() {
        let mut session = session();
        assert_eq!(session.slice(EntityId(1234)), SliceOutcome::Ignored);
    }
}
