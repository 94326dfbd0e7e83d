//! Feature plugins.

use bevy::prelude::*;

pub mod core;
pub mod hud;
pub mod levels;
pub mod physics;
pub mod session;
pub mod shooting;
pub mod targets;

// Render-only
pub mod camera;
pub mod fx;
pub mod menus;
pub mod scenery;
pub mod viewmodel;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    levels::plugin(app);
    session::plugin(app);
    targets::plugin(app);
    shooting::plugin(app);
    hud::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    camera::plugin(app);
    scenery::plugin(app);
    menus::plugin(app);
    viewmodel::plugin(app);
    fx::plugin(app);
}

/// Register all plugins (full app).
pub fn register_all(app: &mut App) {
    register_gameplay(app);
    register_render(app);
}
