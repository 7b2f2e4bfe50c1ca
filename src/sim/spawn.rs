//! Spawn process
//!
//! A long-lived loop expressed as a countdown on the scaled clock. Each time
//! the countdown elapses it rolls a category (bomb / power-up / fruit), emits
//! a [`SpawnRequest`] with randomized position, tilt and launch force, and
//! arms the next wait. Disabling drops the countdown, which cancels the loop.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::{Clock, Countdown};
use super::powerup::PowerUpKind;
use crate::tuning::{SpawnCatalog, SpawnerConfig};

/// Shortest wait the loop will ever arm, even for a malformed config
const MIN_WAIT: f32 = 0.05;

/// What a spawn request instantiates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpawnCategory {
    /// Fruit prefab at `index` in the catalog
    Fruit { index: usize, points: u32 },
    Bomb,
    PowerUp { kind: PowerUpKind, duration: f32 },
}

/// A request for the entity service to instantiate something
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnRequest {
    pub category: SpawnCategory,
    pub position: Vec3,
    /// Tilt around the z axis (degrees)
    pub angle: f32,
    /// Impulse applied along the entity's up vector
    pub force: f32,
    /// Scaled seconds before automatic removal
    pub lifetime: f32,
}

/// Uniform sample in `[lo, hi]` that never panics
///
/// Degenerate or inverted ranges return the smaller bound; non-finite bounds return 0.
pub(crate) fn uniform<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0;
    }
    if lo < hi {
        rng.random_range(lo..=hi)
    } else {
        lo.min(hi)
    }
}

/// Resolve a uniform roll `r` in [0, 1) to a category
///
/// `r < bomb_chance` is a bomb, the next `power_up_chance` band is a power-up
/// (only if any are configured), everything else is fruit. Returns `None` when
/// the chosen band has nothing to spawn.
pub fn pick_category<R: Rng>(
    r: f32,
    rng: &mut R,
    config: &SpawnerConfig,
    catalog: &SpawnCatalog,
) -> Option<SpawnCategory> {
    if r < config.bomb_chance {
        return catalog.bomb.as_ref().map(|_| SpawnCategory::Bomb);
    }

    if r < config.bomb_chance + config.power_up_chance && !catalog.power_ups.is_empty() {
        let prefab = catalog.power_ups[rng.random_range(0..catalog.power_ups.len())];
        return Some(SpawnCategory::PowerUp {
            kind: prefab.kind,
            duration: prefab.duration,
        });
    }

    if catalog.fruits.is_empty() {
        return None;
    }
    let index = rng.random_range(0..catalog.fruits.len());
    Some(SpawnCategory::Fruit {
        index,
        points: catalog.fruits[index].points,
    })
}

/// The timed spawn loop
#[derive(Debug, Clone)]
pub struct SpawnProcess {
    rng: Pcg32,
    /// Pending wait; `None` while disabled
    wait: Option<Countdown>,
}

impl SpawnProcess {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            wait: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.wait.is_some()
    }

    /// Start the loop (first spawn after the initial delay). No-op if already running.
    pub fn enable(&mut self, config: &SpawnerConfig) {
        if self.wait.is_none() {
            self.wait = Some(Countdown::scaled(config.initial_delay.max(0.0)));
            log::debug!("Spawner enabled, first spawn in {:.2}s", config.initial_delay);
        }
    }

    /// Stop the loop and drop the pending wait
    pub fn disable(&mut self) {
        if self.wait.take().is_some() {
            log::debug!("Spawner disabled");
        }
    }

    /// Advance the loop by one frame; yields at most one request per frame
    pub fn tick(
        &mut self,
        clock: &Clock,
        config: &SpawnerConfig,
        catalog: &SpawnCatalog,
    ) -> Option<SpawnRequest> {
        let wait = self.wait.as_mut()?;
        if !wait.tick(clock) {
            return None;
        }

        let request = if config.is_valid() {
            self.roll(config, catalog)
        } else {
            log::warn!("Spawner config is malformed, skipping spawn");
            None
        };

        let delay = self.next_delay(config);
        self.wait = Some(Countdown::scaled(delay));
        request
    }

    fn roll(&mut self, config: &SpawnerConfig, catalog: &SpawnCatalog) -> Option<SpawnRequest> {
        let r: f32 = self.rng.random();
        let category = pick_category(r, &mut self.rng, config, catalog)?;

        let (min, max) = (config.bounds.min, config.bounds.max);
        let position = Vec3::new(
            uniform(&mut self.rng, min.x, max.x),
            uniform(&mut self.rng, min.y, max.y),
            uniform(&mut self.rng, min.z, max.z),
        );
        let angle = uniform(&mut self.rng, config.min_angle, config.max_angle);
        let force = uniform(&mut self.rng, config.min_force, config.max_force);

        Some(SpawnRequest {
            category,
            position,
            angle,
            force,
            lifetime: config.max_lifetime,
        })
    }

    fn next_delay(&mut self, config: &SpawnerConfig) -> f32 {
        let lo = config.min_delay.min(config.max_delay);
        let hi = config.min_delay.max(config.max_delay);
        uniform(&mut self.rng, lo, hi).max(MIN_WAIT)
    }
}
