//! In-level HUD: level number, spawn progress, hits, score, live accuracy.
//!
//! Registered with the gameplay set so headless runs exercise it; the text
//! entity is plain components and needs no render infrastructure to exist.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::{GameState, InLevel};
use crate::plugins::levels::LevelCatalog;
use crate::plugins::session::Session;

#[derive(Component)]
pub struct HudText;

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Name::new("Hud"),
        HudText,
        Text::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(16.0),
            bottom: Val::Px(16.0),
            ..default()
        },
        DespawnOnExit(InLevel),
    ));
}

fn update_hud(
    session: Res<Session>,
    catalog: Res<LevelCatalog>,
    mut q: Query<&mut Text, With<HudText>>,
) {
    let Ok(mut text) = q.single_mut() else {
        return;
    };
    let total = catalog
        .get(session.level)
        .map(|config| config.target_count)
        .unwrap_or(0);
    text.0 = format!(
        "LEVEL {}\nTargets: {}/{}\nHits: {}\nScore: {}\nAccuracy: {:.1}%",
        session.level,
        session.targets_spawned,
        total,
        session.hits,
        session.points,
        session.accuracy(),
    );
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(InLevel), spawn_hud);
    app.add_systems(Update, update_hud.run_if(in_state(GameState::Playing)));
}
