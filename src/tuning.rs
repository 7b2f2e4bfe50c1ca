//! Data-driven game balance
//!
//! Spawner parameters, the spawnable catalog and power-up constants. Loaded
//! from JSON; every field has a default so partial files are accepted.

use std::fmt;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::PowerUpKind;

/// Axis-aligned box that spawned entities appear in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for SpawnBounds {
    fn default() -> Self {
        // A strip just below the bottom edge of the play area
        Self {
            min: Vec3::new(-7.0, -6.5, 0.0),
            max: Vec3::new(7.0, -6.0, 0.0),
        }
    }
}

/// Spawner parameters
///
/// Fruit frenzy temporarily overrides `min_delay`, `max_delay` and
/// `bomb_chance`; everything else is fixed for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Shortest wait between spawns (scaled seconds)
    pub min_delay: f32,
    /// Longest wait between spawns (scaled seconds)
    pub max_delay: f32,
    /// Probability that a spawn is a bomb
    pub bomb_chance: f32,
    /// Probability that a spawn is a power-up
    pub power_up_chance: f32,
    /// Launch tilt range around the z axis (degrees)
    pub min_angle: f32,
    pub max_angle: f32,
    /// Launch impulse range
    pub min_force: f32,
    pub max_force: f32,
    /// Seconds before a spawned entity is removed
    pub max_lifetime: f32,
    /// Wait before the first spawn after enabling
    pub initial_delay: f32,
    pub bounds: SpawnBounds,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            min_delay: 0.25,
            max_delay: 1.0,
            bomb_chance: 0.05,
            power_up_chance: 0.08,
            min_angle: -15.0,
            max_angle: 15.0,
            min_force: 18.0,
            max_force: 22.0,
            max_lifetime: 5.0,
            initial_delay: SPAWN_INITIAL_DELAY,
            bounds: SpawnBounds::default(),
        }
    }
}

impl SpawnerConfig {
    /// Whether the config can produce a spawn
    ///
    /// Invalid configs never crash the spawner; it skips the tick instead.
    pub fn is_valid(&self) -> bool {
        let finite = [
            self.min_delay,
            self.max_delay,
            self.bomb_chance,
            self.power_up_chance,
            self.min_angle,
            self.max_angle,
            self.min_force,
            self.max_force,
            self.max_lifetime,
        ]
        .iter()
        .all(|v| v.is_finite())
            && self.bounds.min.is_finite()
            && self.bounds.max.is_finite();

        finite
            && self.min_delay > 0.0
            && self.min_delay <= self.max_delay
            && (0.0..=1.0).contains(&self.bomb_chance)
            && (0.0..=1.0).contains(&self.power_up_chance)
            && self.bomb_chance + self.power_up_chance <= 1.0
            && self.min_angle <= self.max_angle
            && self.min_force <= self.max_force
            && self.bounds.min.cmple(self.bounds.max).all()
    }
}

/// A fruit kind that can be spawned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FruitPrefab {
    pub name: String,
    /// Points awarded for slicing it
    pub points: u32,
}

impl FruitPrefab {
    pub fn new(name: &str, points: u32) -> Self {
        Self {
            name: name.to_string(),
            points,
        }
    }
}

/// A power-up kind that can be spawned
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUpPrefab {
    pub kind: PowerUpKind,
    /// Effect duration in real seconds
    pub duration: f32,
}

/// Everything the spawner may instantiate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnCatalog {
    pub fruits: Vec<FruitPrefab>,
    /// Bomb prefab name; `None` means bomb rolls are skipped
    pub bomb: Option<String>,
    pub power_ups: Vec<PowerUpPrefab>,
}

impl Default for SpawnCatalog {
    fn default() -> Self {
        Self {
            fruits: vec![
                FruitPrefab::new("apple", 1),
                FruitPrefab::new("orange", 1),
                FruitPrefab::new("lemon", 1),
                FruitPrefab::new("kiwi", 1),
                FruitPrefab::new("watermelon", 1),
            ],
            bomb: Some("bomb".to_string()),
            power_ups: vec![
                PowerUpPrefab {
                    kind: PowerUpKind::SlowMotion,
                    duration: POWER_UP_DURATION,
                },
                PowerUpPrefab {
                    kind: PowerUpKind::ScoreMultiplier,
                    duration: POWER_UP_DURATION,
                },
                PowerUpPrefab {
                    kind: PowerUpKind::FruitFrenzy,
                    duration: POWER_UP_DURATION,
                },
            ],
        }
    }
}

/// Explosion sequence timings (real seconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionTiming {
    pub fade: f32,
    pub hold: f32,
}

impl Default for ExplosionTiming {
    fn default() -> Self {
        Self {
            fade: EXPLOSION_FADE,
            hold: EXPLOSION_HOLD,
        }
    }
}

/// Power-up effect strengths
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpTuning {
    pub slow_motion_scale: f32,
    pub score_multiplier: f32,
    pub frenzy_min_delay: f32,
    pub frenzy_max_delay: f32,
    pub frenzy_bomb_chance: f32,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            slow_motion_scale: SLOW_MOTION_SCALE,
            score_multiplier: SCORE_MULTIPLIER,
            frenzy_min_delay: FRENZY_MIN_DELAY,
            frenzy_max_delay: FRENZY_MAX_DELAY,
            frenzy_bomb_chance: FRENZY_BOMB_CHANCE,
        }
    }
}

/// Root balance file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub spawner: SpawnerConfig,
    pub catalog: SpawnCatalog,
    /// Combo window in scaled seconds
    pub combo_window: f32,
    pub explosion: ExplosionTiming,
    pub power_ups: PowerUpTuning,
    /// RNG seed; `None` lets the caller pick one
    pub seed: Option<u64>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawner: SpawnerConfig::default(),
            catalog: SpawnCatalog::default(),
            combo_window: COMBO_WINDOW,
            explosion: ExplosionTiming::default(),
            power_ups: PowerUpTuning::default(),
            seed: None,
        }
    }
}

/// Failure to read or write tuning
#[derive(Debug)]
pub enum TuningError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read tuning file: {err}"),
            Self::Parse(err) => write!(f, "tuning JSON error: {err}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl Tuning {
    /// Parse tuning from a JSON string
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read tuning from a JSON file
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read tuning from a file, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(err) => {
                log::warn!("{err}; using default tuning");
                Self::default()
            }
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
