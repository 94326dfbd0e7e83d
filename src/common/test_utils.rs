//! Test helpers.
//!
//! Systems that use `Commands` enqueue structural changes; applying them is
//! normally handled by `ApplyDeferred` / schedule boundaries. We call
//! `world.flush()` after running so queued commands are applied before
//! assertions.

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// A `Time` resource carrying a fixed delta, for systems run in isolation.
pub fn time_with_delta(dt: f32) -> Time {
    let mut t = Time::default();
    t.advance_by(Duration::from_secs_f32(dt));
    t
}

/// Headless app with the full gameplay stack; mirrors `tests/common`.
pub fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));
    crate::game::configure_headless(&mut app);
    app
}
