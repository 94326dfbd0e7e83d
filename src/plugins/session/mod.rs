//! Session state machine: level entry, pause, level end, and progression.
//!
//! All shot/hit bookkeeping lives in the [`Session`] resource; systems mutate
//! it through the operations here and in the targets/shooting plugins, never
//! through ambient globals. Level entry is message-driven (`StartLevelRequest`)
//! so menus and tests share one path, and every entry bumps the session
//! generation so delayed work from a previous run dies with it.

use bevy::prelude::*;
use bevy::time::Virtual;

use crate::common::state::{GameState, InLevel};
use crate::plugins::levels::{weapon_for, LevelCatalog};
use crate::plugins::shooting::{ActiveWeapon, FireControl};
use crate::plugins::targets::{Spawner, Target};

/// The running level's bookkeeping.
///
/// Counters satisfy `hits <= targets_spawned <= config.target_count`: every
/// hit removes exactly one target, and a target can be hit at most once.
#[derive(Resource, Debug, Default)]
pub struct Session {
    pub level: u32,
    /// Bumped on every level entry and teardown; delayed actions stamped with
    /// an older generation are dead.
    pub generation: u64,
    pub hits: u32,
    pub points: u32,
    pub shots_fired: u32,
    pub targets_spawned: u32,
    pub active: bool,
}

impl Session {
    /// Accuracy as a percentage; zero shots is defined as 0 %, not an error.
    pub fn accuracy(&self) -> f32 {
        if self.shots_fired == 0 {
            0.0
        } else {
            self.hits as f32 / self.shots_fired as f32 * 100.0
        }
    }
}

/// Highest level the player may enter. Monotone for the process lifetime.
#[derive(Resource, Debug)]
pub struct ProgressStore {
    pub unlocked: u32,
}

impl Default for ProgressStore {
    fn default() -> Self {
        Self { unlocked: 1 }
    }
}

/// Outcome of the most recently finished level, for the results panel.
#[derive(Debug, Clone, Copy)]
pub struct LevelOutcome {
    pub level: u32,
    pub accuracy: f32,
    pub goal: f32,
    pub passed: bool,
}

#[derive(Resource, Debug, Default)]
pub struct LastLevelResult(pub Option<LevelOutcome>);

/// Enter the given level. Validated against the catalogue before anything
/// else happens.
#[derive(Message, Debug, Clone, Copy)]
pub struct StartLevelRequest {
    pub level: u32,
}

/// Toggle between `Playing` and `Paused`.
#[derive(Message, Debug, Clone, Copy)]
pub struct PauseToggleRequest;

/// A level finished; accuracy already compared against the goal.
#[derive(Message, Debug, Clone, Copy)]
pub struct LevelEnded {
    pub level: u32,
    pub accuracy: f32,
    pub goal: f32,
    pub passed: bool,
}

/// The unlocked-level bound moved forward.
#[derive(Message, Debug, Clone, Copy)]
pub struct UnlockedLevelsChanged {
    pub unlocked: u32,
}

/// `Playing` or `Paused` — the states in which the pause toggle is live.
fn level_running(state: Res<State<GameState>>) -> bool {
    matches!(state.get(), GameState::Playing | GameState::Paused)
}

/// States from which `start(level)` may be invoked.
fn level_entry_point(state: Res<State<GameState>>) -> bool {
    matches!(state.get(), GameState::LevelSelect | GameState::LevelEnd)
}

/// Map the pause key onto a toggle request. Headless apps have no input
/// resource, so this is a no-op there.
pub fn pause_input(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut writer: MessageWriter<PauseToggleRequest>,
) {
    let Some(keys) = keys else {
        return;
    };
    if keys.just_pressed(KeyCode::Escape) {
        writer.write(PauseToggleRequest);
    }
}

/// `start(level)`: validate, reset counters, arm the weapon, clear leftovers,
/// and kick the spawner.
///
/// The first spawn is enqueued with zero delay instead of running inline, so
/// the spawn path is single and counters are still pristine when the request
/// finishes processing.
pub fn handle_start_requests(
    mut requests: MessageReader<StartLevelRequest>,
    mut commands: Commands,
    catalog: Res<LevelCatalog>,
    mut session: ResMut<Session>,
    mut spawner: ResMut<Spawner>,
    mut weapon: ResMut<ActiveWeapon>,
    mut control: ResMut<FireControl>,
    q_live: Query<Entity, With<Target>>,
    mut next: ResMut<NextState<GameState>>,
) {
    // Last request of a frame wins; duplicates only come from double clicks.
    let Some(&StartLevelRequest { level }) = requests.read().last() else {
        return;
    };

    if let Err(err) = catalog.get(level) {
        error!("refusing level entry: {err}");
        return;
    }

    session.level = level;
    session.hits = 0;
    session.points = 0;
    session.shots_fired = 0;
    session.targets_spawned = 0;
    session.active = true;
    session.generation += 1;

    // A retry can still have live targets staged for removal; clear them all.
    for e in &q_live {
        commands.entity(e).despawn();
    }

    weapon.0 = weapon_for(level);
    control.rearm(weapon.0.fire_interval);

    spawner.clear();
    spawner.schedule_spawn(0.0, session.generation);

    info!("starting level {level}");
    next.set(GameState::Playing);
}

/// Swap `Playing` and `Paused`, freezing virtual time while paused so spawn
/// delays and ambient effects hold still without resetting any counters.
pub fn toggle_pause(
    mut requests: MessageReader<PauseToggleRequest>,
    state: Res<State<GameState>>,
    mut next: ResMut<NextState<GameState>>,
    mut virtual_time: ResMut<Time<Virtual>>,
) {
    for _ in requests.read() {
        match state.get() {
            GameState::Playing => {
                virtual_time.pause();
                next.set(GameState::Paused);
            }
            GameState::Paused => {
                virtual_time.unpause();
                next.set(GameState::Playing);
            }
            _ => {}
        }
    }
}

/// Close out the level: compute accuracy, gate progression, publish results.
pub fn finish_level(
    catalog: Res<LevelCatalog>,
    mut session: ResMut<Session>,
    mut progress: ResMut<ProgressStore>,
    mut result: ResMut<LastLevelResult>,
    mut ended: MessageWriter<LevelEnded>,
    mut unlocked_out: MessageWriter<UnlockedLevelsChanged>,
) {
    session.active = false;

    let Ok(config) = catalog.get(session.level) else {
        // Entry was validated against the catalogue, so this cannot happen
        // while the catalogue stays immutable.
        error!("level {} finished without a config", session.level);
        return;
    };

    let accuracy = session.accuracy();
    let goal = config.accuracy_goal;
    let passed = accuracy >= goal;

    if passed && session.level < catalog.max_level() {
        let unlocked = progress.unlocked.max(session.level + 1);
        if unlocked != progress.unlocked {
            progress.unlocked = unlocked;
            unlocked_out.write(UnlockedLevelsChanged { unlocked });
        }
    }

    let outcome = LevelOutcome {
        level: session.level,
        accuracy,
        goal,
        passed,
    };
    result.0 = Some(outcome);
    ended.write(LevelEnded {
        level: outcome.level,
        accuracy,
        goal,
        passed,
    });

    info!(
        "level {} ended: accuracy {:.1}% vs goal {:.0}% ({})",
        outcome.level,
        accuracy,
        goal,
        if passed { "passed" } else { "failed" }
    );
}

/// Leaving the level for the menus: deactivate, invalidate delayed work, and
/// make sure virtual time runs again (the exit may come from `Paused`).
pub fn teardown_session(
    mut session: ResMut<Session>,
    mut spawner: ResMut<Spawner>,
    mut virtual_time: ResMut<Time<Virtual>>,
) {
    session.active = false;
    session.generation += 1;
    spawner.clear();
    virtual_time.unpause();
}

pub fn plugin(app: &mut App) {
    app.init_resource::<Session>()
        .init_resource::<ProgressStore>()
        .init_resource::<LastLevelResult>()
        .add_message::<StartLevelRequest>()
        .add_message::<PauseToggleRequest>()
        .add_message::<LevelEnded>()
        .add_message::<UnlockedLevelsChanged>();

    app.add_systems(
        Update,
        (pause_input, toggle_pause.after(pause_input)).run_if(level_running),
    );
    app.add_systems(Update, handle_start_requests.run_if(level_entry_point));
    app.add_systems(OnEnter(GameState::LevelEnd), finish_level);
    app.add_systems(OnExit(InLevel), teardown_session);
}

#[cfg(test)]
mod tests;
