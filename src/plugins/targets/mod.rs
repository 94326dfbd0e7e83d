//! Target lifecycle: spawning, motion, escape/hit removal, and the delayed
//! continuation queue that paces the level.
//!
//! # Lifecycle invariant
//! Exactly one of {hit, escape} ends a target. Both paths are guarded by the
//! `alive` flag, mark `PendingDespawn`, and emit `TargetRemoved`; the actual
//! structural despawn happens once, centralized in `PostUpdate`.
//!
//! # Delayed continuations
//! The original pacing ("remove a target, spawn the next one half a second
//! later, end the level one second after the quota is exhausted") is modelled
//! as an explicit queue of scheduled actions rather than ad-hoc callbacks.
//! Every entry is stamped with the session generation at enqueue time;
//! restarting or tearing a level down bumps the generation, so stale entries
//! can never spawn into a session they don't belong to.

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::common::layers::Layer;
use crate::common::state::{GameState, InLevel};
use crate::common::tunables::Tunables;
use crate::plugins::levels::{LevelCatalog, LevelConfig};
use crate::plugins::session::Session;

// Spawn volume, matched to the booth geometry: targets enter low from either
// side wall and drift across.
const SPAWN_Y_MIN: f32 = -8.0;
const SPAWN_Y_MAX: f32 = -2.0;
const SPAWN_Z_MIN: f32 = 15.0;
const SPAWN_Z_MAX: f32 = 25.0;
const CLIMB_JITTER: f32 = 0.2;
const DRIFT_JITTER: f32 = 0.1;

/// A moving gallery target. Owned by the running level; never outlives it.
#[derive(Component, Debug)]
pub struct Target {
    pub velocity: Vec3,
    pub scale: f32,
    /// Cleared by the first terminal transition (hit or escape); everything
    /// downstream checks this before acting.
    pub alive: bool,
}

/// Marker: target should be removed from the world.
///
/// Terminal transitions only mark; one `PostUpdate` system despawns.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingDespawn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalCause {
    Hit,
    Escaped,
}

/// A target left the live set, by hit or by escape.
#[derive(Message, Debug, Clone, Copy)]
pub struct TargetRemoved {
    pub cause: RemovalCause,
    /// Session generation at removal time; stale removals are ignored.
    pub generation: u64,
}

/// Spawn progress for the HUD/observer layer.
#[derive(Message, Debug, Clone, Copy)]
pub struct SpawnProgress {
    pub spawned: u32,
    pub total: u32,
}

/// A hit landed; the render layer plays an impact flash here.
#[derive(Message, Debug, Clone, Copy)]
pub struct ImpactSpawned {
    pub position: Vec3,
    pub scale: f32,
}

/// Seeded RNG for spawn sampling, so headless runs are reproducible.
#[derive(Resource, Debug)]
pub struct SpawnRng(pub ChaCha8Rng);

impl Default for SpawnRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(0x5EED_7A26))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DelayedAction {
    SpawnNext,
    EndLevel,
}

#[derive(Debug)]
struct Scheduled {
    action: DelayedAction,
    timer: Timer,
    generation: u64,
}

/// The delayed-continuation queue driving spawn pacing and level end.
#[derive(Resource, Debug, Default)]
pub struct Spawner {
    pending: Vec<Scheduled>,
    end_scheduled: bool,
}

impl Spawner {
    pub fn schedule_spawn(&mut self, delay: f32, generation: u64) {
        self.pending.push(Scheduled {
            action: DelayedAction::SpawnNext,
            timer: Timer::from_seconds(delay, TimerMode::Once),
            generation,
        });
    }

    /// Idempotent: the level ends once, no matter how many removals trail in
    /// after the quota is exhausted.
    fn schedule_end(&mut self, delay: f32, generation: u64) {
        if self.end_scheduled {
            return;
        }
        self.end_scheduled = true;
        self.pending.push(Scheduled {
            action: DelayedAction::EndLevel,
            timer: Timer::from_seconds(delay, TimerMode::Once),
            generation,
        });
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.end_scheduled = false;
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn end_pending(&self) -> bool {
        self.end_scheduled
    }
}

/// Advance live targets; targets crossing the horizontal bound escape.
///
/// An escape consumes a spawn slot without granting a hit.
pub fn move_targets(
    time: Res<Time>,
    tunables: Res<Tunables>,
    session: Res<Session>,
    mut commands: Commands,
    mut q: Query<(Entity, &mut Transform, &mut Target), Without<PendingDespawn>>,
    mut removed: MessageWriter<TargetRemoved>,
) {
    let dt = time.delta_secs();
    for (e, mut tf, mut target) in &mut q {
        if !target.alive {
            continue;
        }
        tf.translation += target.velocity * dt;
        if tf.translation.x.abs() > tunables.escape_bound_x {
            target.alive = false;
            commands.entity(e).insert(PendingDespawn);
            removed.write(TargetRemoved {
                cause: RemovalCause::Escaped,
                generation: session.generation,
            });
        }
    }
}

/// Every removal from the current generation schedules the next spawn wave
/// after the pacing delay.
pub fn schedule_continuations(
    mut removals: MessageReader<TargetRemoved>,
    session: Res<Session>,
    tunables: Res<Tunables>,
    mut spawner: ResMut<Spawner>,
) {
    for removal in removals.read() {
        if removal.generation != session.generation {
            continue;
        }
        spawner.schedule_spawn(tunables.respawn_delay, removal.generation);
    }
}

/// Tick the continuation queue and run every due action.
///
/// Entries from older generations are dropped without running; a torn-down
/// level can never spawn retroactively.
pub fn tick_scheduled(
    time: Res<Time>,
    mut commands: Commands,
    catalog: Res<LevelCatalog>,
    mut session: ResMut<Session>,
    mut spawner: ResMut<Spawner>,
    mut rng: ResMut<SpawnRng>,
    tunables: Res<Tunables>,
    mut progress: MessageWriter<SpawnProgress>,
    mut next: ResMut<NextState<GameState>>,
) {
    let generation = session.generation;
    let delta = time.delta();

    let mut due = Vec::new();
    spawner.pending.retain_mut(|entry| {
        if entry.generation != generation {
            return false;
        }
        entry.timer.tick(delta);
        if entry.timer.is_finished() {
            due.push(entry.action);
            false
        } else {
            true
        }
    });

    for action in due {
        match action {
            DelayedAction::SpawnNext => {
                let Ok(config) = catalog.get(session.level) else {
                    error!("spawn continuation for unknown level {}", session.level);
                    continue;
                };
                let config = *config;
                spawn_next(
                    &mut commands,
                    &mut session,
                    &mut spawner,
                    &config,
                    &mut rng.0,
                    &tunables,
                    &mut progress,
                );
            }
            DelayedAction::EndLevel => next.set(GameState::LevelEnd),
        }
    }
}

/// Spawn the next wave, or schedule the level end once the quota is done.
fn spawn_next(
    commands: &mut Commands,
    session: &mut Session,
    spawner: &mut Spawner,
    config: &LevelConfig,
    rng: &mut ChaCha8Rng,
    tunables: &Tunables,
    progress: &mut MessageWriter<SpawnProgress>,
) {
    if !session.active {
        return;
    }

    let remaining = config.target_count.saturating_sub(session.targets_spawned);
    if remaining == 0 {
        spawner.schedule_end(tunables.level_end_delay, session.generation);
        return;
    }

    let batch = config.batch_size.min(remaining);
    for _ in 0..batch {
        spawn_one(commands, config, rng, tunables);
    }
    session.targets_spawned += batch;

    progress.write(SpawnProgress {
        spawned: session.targets_spawned,
        total: config.target_count,
    });
}

/// One target: random side, low start height, lateral drift toward the other
/// wall with slight climb/depth jitter, speed sampled from the level range.
fn spawn_one(
    commands: &mut Commands,
    config: &LevelConfig,
    rng: &mut ChaCha8Rng,
    tunables: &Tunables,
) {
    let side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let start = Vec3::new(
        tunables.spawn_edge_x * side,
        rng.gen_range(SPAWN_Y_MIN..=SPAWN_Y_MAX),
        rng.gen_range(SPAWN_Z_MIN..=SPAWN_Z_MAX),
    );
    let direction = Vec3::new(
        -side,
        rng.gen_range(-CLIMB_JITTER..=CLIMB_JITTER),
        rng.gen_range(-DRIFT_JITTER..=DRIFT_JITTER),
    );
    let speed = rng.gen_range(config.speed_range.0..=config.speed_range.1);

    commands.spawn((
        Name::new("Target"),
        Target {
            velocity: direction * speed,
            scale: config.target_scale,
            alive: true,
        },
        Transform::from_translation(start),
        Collider::sphere(0.5 * config.target_scale),
        // Targets never collide with anything; the collider exists for the
        // shot resolver's ray test only.
        CollisionLayers::new(Layer::Target, [] as [Layer; 0]),
        DespawnOnExit(InLevel),
    ));
}

/// Despawn targets marked for removal.
pub fn despawn_removed(mut commands: Commands, q: Query<Entity, With<PendingDespawn>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<Spawner>()
        .init_resource::<SpawnRng>()
        .add_message::<TargetRemoved>()
        .add_message::<SpawnProgress>()
        .add_message::<ImpactSpawned>();

    app.add_systems(
        Update,
        move_targets.run_if(in_state(GameState::Playing)),
    );

    // Removals from this frame's motion pass and shot resolution are both
    // visible before continuations are scheduled and ticked.
    app.add_systems(
        Update,
        (
            schedule_continuations.after(crate::plugins::shooting::resolve_fire),
            tick_scheduled.after(schedule_continuations),
        )
            .run_if(in_state(GameState::Playing)),
    );

    app.add_systems(
        PostUpdate,
        despawn_removed.run_if(in_state(InLevel)),
    );
}
