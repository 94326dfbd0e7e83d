//! Level catalogue: per-level parameters and the weapon table.
//!
//! The catalogue is pure lookup. A level id reachable from the UI without a
//! config entry is a data bug, so `get` returns `ConfigNotFound` and callers
//! refuse level entry instead of substituting a degenerate default. The whole
//! table is validated once at startup.

use std::collections::BTreeMap;
use std::fmt;

use bevy::prelude::*;

/// Immutable parameters for one level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelConfig {
    /// Total targets the level spawns before it ends.
    pub target_count: u32,
    /// Uniform sampling range for each target's speed.
    pub speed_range: (f32, f32),
    /// Visual and collider scale of spawned targets.
    pub target_scale: f32,
    /// Accuracy percentage required to pass.
    pub accuracy_goal: f32,
    /// Targets created per spawn wave.
    pub batch_size: u32,
}

/// Lookup failure: the level id has no entry in the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigNotFound(pub u32);

impl fmt::Display for ConfigNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no level config for level {}", self.0)
    }
}

impl std::error::Error for ConfigNotFound {}

#[derive(Resource, Debug, Clone)]
pub struct LevelCatalog {
    levels: BTreeMap<u32, LevelConfig>,
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::from_levels([
            (
                1,
                LevelConfig {
                    target_count: 10,
                    speed_range: (10.0, 15.0),
                    target_scale: 2.8,
                    accuracy_goal: 50.0,
                    batch_size: 1,
                },
            ),
            (
                2,
                LevelConfig {
                    target_count: 10,
                    speed_range: (15.0, 22.0),
                    target_scale: 2.0,
                    accuracy_goal: 60.0,
                    batch_size: 1,
                },
            ),
            (
                3,
                LevelConfig {
                    target_count: 10,
                    speed_range: (20.0, 28.0),
                    target_scale: 1.8,
                    accuracy_goal: 75.0,
                    batch_size: 1,
                },
            ),
        ])
    }
}

impl LevelCatalog {
    pub fn from_levels(levels: impl IntoIterator<Item = (u32, LevelConfig)>) -> Self {
        Self {
            levels: levels.into_iter().collect(),
        }
    }

    pub fn get(&self, level: u32) -> Result<&LevelConfig, ConfigNotFound> {
        self.levels.get(&level).ok_or(ConfigNotFound(level))
    }

    /// Highest level id present in the catalogue.
    pub fn max_level(&self) -> u32 {
        self.levels.keys().next_back().copied().unwrap_or(0)
    }

    pub fn level_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.levels.keys().copied()
    }

    /// Startup-time sanity check over every entry.
    pub fn validate(&self) -> Result<(), String> {
        for (id, cfg) in &self.levels {
            if cfg.target_count == 0 {
                return Err(format!("level {id}: target_count must be > 0"));
            }
            if cfg.speed_range.0 > cfg.speed_range.1 {
                return Err(format!("level {id}: speed_range min exceeds max"));
            }
            if cfg.target_scale <= 0.0 {
                return Err(format!("level {id}: target_scale must be > 0"));
            }
            if !(0.0..=100.0).contains(&cfg.accuracy_goal) {
                return Err(format!("level {id}: accuracy_goal outside [0, 100]"));
            }
            if cfg.batch_size == 0 {
                return Err(format!("level {id}: batch_size must be >= 1"));
            }
        }
        Ok(())
    }
}

/// Fire interval shared by every weapon. Kept as a per-weapon field below so
/// cadence can diverge per weapon without touching the resolver.
pub const DEFAULT_FIRE_INTERVAL: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeaponKind {
    #[default]
    Pistol,
    Rifle,
    Shotgun,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weapon {
    pub kind: WeaponKind,
    /// Minimum seconds between shots.
    pub fire_interval: f32,
}

impl Default for Weapon {
    fn default() -> Self {
        Self {
            kind: WeaponKind::Pistol,
            fire_interval: DEFAULT_FIRE_INTERVAL,
        }
    }
}

/// Weapon table: one entry per level, pistol for anything unmapped.
pub fn weapon_for(level: u32) -> Weapon {
    let kind = match level {
        2 => WeaponKind::Rifle,
        3 => WeaponKind::Shotgun,
        _ => WeaponKind::Pistol,
    };
    Weapon {
        kind,
        fire_interval: DEFAULT_FIRE_INTERVAL,
    }
}

pub fn plugin(app: &mut App) {
    let catalog = LevelCatalog::default();
    catalog.validate().expect("level catalogue is invalid");
    app.insert_resource(catalog);
}
