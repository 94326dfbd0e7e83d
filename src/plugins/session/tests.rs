use super::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::test_utils::{headless_app, run_system_once};
use crate::plugins::targets::Target;

// -----------------------------------------------------------------------------
// Pure accuracy rules
// -----------------------------------------------------------------------------

#[test]
fn accuracy_is_zero_without_shots() {
    let session = Session::default();
    assert_eq!(session.accuracy(), 0.0);
}

#[test]
fn accuracy_is_hits_over_shots_as_percentage() {
    let session = Session {
        hits: 5,
        shots_fired: 10,
        ..Default::default()
    };
    assert_eq!(session.accuracy(), 50.0);

    let session = Session {
        hits: 6,
        shots_fired: 10,
        ..Default::default()
    };
    assert!((session.accuracy() - 60.0).abs() < 1e-5);
}

// -----------------------------------------------------------------------------
// Level entry
// -----------------------------------------------------------------------------

fn to_level_select(app: &mut App) {
    app.update();
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::LevelSelect);
    app.update();
}

#[test]
fn start_resets_counters_and_enters_playing() {
    let mut app = headless_app();
    to_level_select(&mut app);

    // Dirty the session as if a previous run left residue behind.
    {
        let mut session = app.world_mut().resource_mut::<Session>();
        session.hits = 3;
        session.points = 300;
        session.shots_fired = 7;
        session.targets_spawned = 9;
    }
    let generation_before = app.world().resource::<Session>().generation;

    app.world_mut().write_message(StartLevelRequest { level: 1 });
    app.update();

    // Counters are pristine the moment the request is processed; the first
    // spawn is queued, not inline.
    let session = app.world().resource::<Session>();
    assert!(session.active);
    assert_eq!(session.level, 1);
    assert_eq!(
        (
            session.hits,
            session.points,
            session.shots_fired,
            session.targets_spawned
        ),
        (0, 0, 0, 0)
    );
    assert!(session.generation > generation_before);

    // One more frame: the transition applies and the first target spawns.
    app.update();
    assert_eq!(
        app.world().resource::<State<GameState>>().get(),
        &GameState::Playing
    );
    assert_eq!(app.world().resource::<Session>().targets_spawned, 1);
    let targets = app
        .world_mut()
        .query::<&Target>()
        .iter(app.world())
        .count();
    assert_eq!(targets, 1);
}

#[test]
fn unknown_level_request_is_refused() {
    let mut app = headless_app();
    to_level_select(&mut app);

    app.world_mut().write_message(StartLevelRequest { level: 99 });
    app.update();
    app.update();

    assert_eq!(
        app.world().resource::<State<GameState>>().get(),
        &GameState::LevelSelect
    );
    assert!(!app.world().resource::<Session>().active);
}

// -----------------------------------------------------------------------------
// Pause
// -----------------------------------------------------------------------------

#[test]
fn pause_toggle_freezes_virtual_time_and_keeps_counters() {
    let mut app = headless_app();
    to_level_select(&mut app);
    app.world_mut().write_message(StartLevelRequest { level: 1 });
    app.update();
    app.update();

    {
        let mut session = app.world_mut().resource_mut::<Session>();
        session.hits = 2;
        session.shots_fired = 4;
    }

    app.world_mut().write_message(PauseToggleRequest);
    app.update();
    app.update();

    assert_eq!(
        app.world().resource::<State<GameState>>().get(),
        &GameState::Paused
    );
    assert!(app.world().resource::<Time<Virtual>>().is_paused());
    let session = app.world().resource::<Session>();
    assert_eq!((session.hits, session.shots_fired), (2, 4));

    app.world_mut().write_message(PauseToggleRequest);
    app.update();
    app.update();

    assert_eq!(
        app.world().resource::<State<GameState>>().get(),
        &GameState::Playing
    );
    assert!(!app.world().resource::<Time<Virtual>>().is_paused());
    let session = app.world().resource::<Session>();
    assert_eq!((session.hits, session.shots_fired), (2, 4));
}

// -----------------------------------------------------------------------------
// Level end & progression
// -----------------------------------------------------------------------------

fn finish_world(level: u32, hits: u32, shots: u32, unlocked: u32) -> World {
    let mut world = World::new();
    world.insert_resource(LevelCatalog::default());
    world.insert_resource(Session {
        level,
        hits,
        shots_fired: shots,
        active: true,
        ..Default::default()
    });
    world.insert_resource(ProgressStore { unlocked });
    world.init_resource::<LastLevelResult>();
    world.init_resource::<Messages<LevelEnded>>();
    world.init_resource::<Messages<UnlockedLevelsChanged>>();
    world
}

#[test]
fn passing_a_level_unlocks_the_next() {
    let mut world = finish_world(1, 6, 10, 1);
    run_system_once(&mut world, finish_level);

    assert!(!world.resource::<Session>().active);
    assert_eq!(world.resource::<ProgressStore>().unlocked, 2);

    let outcome = world.resource::<LastLevelResult>().0.expect("result recorded");
    assert!(outcome.passed);
    assert!((outcome.accuracy - 60.0).abs() < 1e-5);
    assert_eq!(outcome.goal, 50.0);

    let unlocks: Vec<_> = world
        .resource_mut::<Messages<UnlockedLevelsChanged>>()
        .drain()
        .collect();
    assert_eq!(unlocks.len(), 1);
    assert_eq!(unlocks[0].unlocked, 2);

    let ends: Vec<_> = world.resource_mut::<Messages<LevelEnded>>().drain().collect();
    assert_eq!(ends.len(), 1);
    assert!(ends[0].passed);
}

#[test]
fn failing_a_level_keeps_progress() {
    let mut world = finish_world(1, 2, 10, 1);
    run_system_once(&mut world, finish_level);

    assert_eq!(world.resource::<ProgressStore>().unlocked, 1);
    let outcome = world.resource::<LastLevelResult>().0.unwrap();
    assert!(!outcome.passed);
    assert_eq!(outcome.accuracy, 20.0);

    let unlocks: Vec<_> = world
        .resource_mut::<Messages<UnlockedLevelsChanged>>()
        .drain()
        .collect();
    assert!(unlocks.is_empty());
}

#[test]
fn unlock_is_monotonic_across_later_failures() {
    // Everything already unlocked; a failed retry of level 1 changes nothing.
    let mut world = finish_world(1, 0, 10, 3);
    run_system_once(&mut world, finish_level);
    assert_eq!(world.resource::<ProgressStore>().unlocked, 3);
}

#[test]
fn passing_an_already_unlocked_level_emits_nothing() {
    let mut world = finish_world(1, 10, 10, 3);
    run_system_once(&mut world, finish_level);

    assert_eq!(world.resource::<ProgressStore>().unlocked, 3);
    let unlocks: Vec<_> = world
        .resource_mut::<Messages<UnlockedLevelsChanged>>()
        .drain()
        .collect();
    assert!(unlocks.is_empty());
}

#[test]
fn passing_the_top_level_does_not_unlock_beyond_the_catalogue() {
    let mut world = finish_world(3, 10, 10, 3);
    run_system_once(&mut world, finish_level);
    assert_eq!(world.resource::<ProgressStore>().unlocked, 3);
}

#[test]
fn zero_shot_level_ends_with_zero_accuracy() {
    let mut world = finish_world(1, 0, 0, 1);
    run_system_once(&mut world, finish_level);

    let outcome = world.resource::<LastLevelResult>().0.unwrap();
    assert_eq!(outcome.accuracy, 0.0);
    assert!(!outcome.passed);
}

// -----------------------------------------------------------------------------
// Teardown
// -----------------------------------------------------------------------------

#[test]
fn teardown_invalidates_generation_and_pending_work() {
    let mut world = World::new();
    world.insert_resource(Session {
        generation: 5,
        active: true,
        ..Default::default()
    });
    let mut spawner = Spawner::default();
    spawner.schedule_spawn(0.5, 5);
    world.insert_resource(spawner);
    world.insert_resource(Time::<Virtual>::default());

    run_system_once(&mut world, teardown_session);

    let session = world.resource::<Session>();
    assert!(!session.active);
    assert_eq!(session.generation, 6);
    assert_eq!(world.resource::<Spawner>().pending_len(), 0);
}

#[test]
fn leaving_for_the_menu_clears_live_targets() {
    let mut app = headless_app();
    to_level_select(&mut app);
    app.world_mut().write_message(StartLevelRequest { level: 1 });
    app.update();
    app.update();
    assert!(
        app.world_mut()
            .query::<&Target>()
            .iter(app.world())
            .next()
            .is_some()
    );

    let generation_before = app.world().resource::<Session>().generation;
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::LevelSelect);
    app.update();
    app.update();

    assert!(
        app.world_mut()
            .query::<&Target>()
            .iter(app.world())
            .next()
            .is_none()
    );
    let session = app.world().resource::<Session>();
    assert!(!session.active);
    assert!(session.generation > generation_before);
}
