//! Menu screens (render-only): main menu, level select, pause overlay, and
//! the level-end panel.
//!
//! Buttons write the same messages the tests drive the core with, so the UI
//! has no privileged path into the session.

use bevy::app::AppExit;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::plugins::levels::LevelCatalog;
use crate::plugins::session::{
    LastLevelResult, PauseToggleRequest, ProgressStore, StartLevelRequest,
};

const BUTTON_BG: Color = Color::srgb(0.13, 0.30, 0.52);
const BUTTON_BG_DANGER: Color = Color::srgb(0.48, 0.14, 0.14);
const BUTTON_BG_LOCKED: Color = Color::srgb(0.22, 0.22, 0.24);
const PANEL_BG: Color = Color::srgba(0.05, 0.05, 0.08, 0.92);

#[derive(Component, Debug, Clone, Copy)]
enum MenuButton {
    Start,
    Quit,
    EnterLevel(u32),
    Resume,
    ToLevelSelect,
    ToMainMenu,
}

/// Level button the player has not unlocked yet; presses are ignored.
#[derive(Component)]
struct LockedLevel;

fn screen_root() -> Node {
    Node {
        width: Val::Percent(100.0),
        height: Val::Percent(100.0),
        flex_direction: FlexDirection::Column,
        align_items: AlignItems::Center,
        justify_content: JustifyContent::Center,
        row_gap: Val::Px(12.0),
        ..default()
    }
}

fn spawn_button(parent: &mut ChildSpawnerCommands, label: &str, action: MenuButton, bg: Color) {
    parent
        .spawn((
            Button,
            action,
            Node {
                width: Val::Px(280.0),
                height: Val::Px(52.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                ..default()
            },
            BackgroundColor(bg),
        ))
        .with_children(|p| {
            p.spawn((
                Text::new(label),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

fn title(parent: &mut ChildSpawnerCommands, text: &str) {
    parent.spawn((
        Text::new(text),
        TextFont {
            font_size: 42.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            margin: UiRect::bottom(Val::Px(24.0)),
            ..default()
        },
    ));
}

fn spawn_main_menu(mut commands: Commands) {
    commands
        .spawn((
            Name::new("MainMenu"),
            screen_root(),
            BackgroundColor(PANEL_BG),
            DespawnOnExit(GameState::MainMenu),
        ))
        .with_children(|p| {
            title(p, "AIM GALLERY");
            spawn_button(p, "Start", MenuButton::Start, BUTTON_BG);
            spawn_button(p, "Quit", MenuButton::Quit, BUTTON_BG_DANGER);
        });
}

fn spawn_level_select(
    mut commands: Commands,
    catalog: Res<LevelCatalog>,
    progress: Res<ProgressStore>,
) {
    let unlocked = progress.unlocked;
    let levels: Vec<u32> = catalog.level_ids().collect();

    commands
        .spawn((
            Name::new("LevelSelect"),
            screen_root(),
            BackgroundColor(PANEL_BG),
            DespawnOnExit(GameState::LevelSelect),
        ))
        .with_children(|p| {
            title(p, "Select Level");
            for level in levels {
                if level <= unlocked {
                    spawn_button(
                        p,
                        &format!("Level {level}"),
                        MenuButton::EnterLevel(level),
                        BUTTON_BG,
                    );
                } else {
                    p.spawn((
                        Button,
                        MenuButton::EnterLevel(level),
                        LockedLevel,
                        Node {
                            width: Val::Px(280.0),
                            height: Val::Px(52.0),
                            align_items: AlignItems::Center,
                            justify_content: JustifyContent::Center,
                            ..default()
                        },
                        BackgroundColor(BUTTON_BG_LOCKED),
                    ))
                    .with_children(|p| {
                        p.spawn((
                            Text::new(format!("Level {level} (locked)")),
                            TextFont {
                                font_size: 22.0,
                                ..default()
                            },
                            TextColor(Color::srgb(0.5, 0.5, 0.5)),
                        ));
                    });
                }
            }
            spawn_button(p, "Main Menu", MenuButton::ToMainMenu, BUTTON_BG_DANGER);
        });
}

fn spawn_pause_overlay(mut commands: Commands) {
    commands
        .spawn((
            Name::new("PauseMenu"),
            screen_root(),
            BackgroundColor(PANEL_BG),
            DespawnOnExit(GameState::Paused),
        ))
        .with_children(|p| {
            title(p, "Paused");
            spawn_button(p, "Resume", MenuButton::Resume, BUTTON_BG);
            spawn_button(p, "Level Select", MenuButton::ToLevelSelect, BUTTON_BG);
            spawn_button(p, "Main Menu", MenuButton::ToMainMenu, BUTTON_BG_DANGER);
        });
}

fn spawn_end_panel(
    mut commands: Commands,
    result: Res<LastLevelResult>,
    catalog: Res<LevelCatalog>,
) {
    let Some(outcome) = result.0 else {
        return;
    };

    commands
        .spawn((
            Name::new("LevelEndPanel"),
            screen_root(),
            BackgroundColor(PANEL_BG),
            DespawnOnExit(GameState::LevelEnd),
        ))
        .with_children(|p| {
            if outcome.passed {
                title(p, &format!("LEVEL {} COMPLETE!", outcome.level));
            } else {
                title(p, "TRY AGAIN");
            }
            p.spawn((
                Text::new(format!(
                    "Accuracy: {:.1}% (Goal: {:.0}%)",
                    outcome.accuracy, outcome.goal
                )),
                TextFont {
                    font_size: 26.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));

            if outcome.passed {
                if outcome.level < catalog.max_level() {
                    spawn_button(
                        p,
                        "Next Level",
                        MenuButton::EnterLevel(outcome.level + 1),
                        BUTTON_BG,
                    );
                }
            } else {
                spawn_button(
                    p,
                    "Retry",
                    MenuButton::EnterLevel(outcome.level),
                    BUTTON_BG,
                );
            }
            spawn_button(p, "Level Select", MenuButton::ToLevelSelect, BUTTON_BG_DANGER);
        });
}

fn handle_buttons(
    q: Query<(&Interaction, &MenuButton, Option<&LockedLevel>), Changed<Interaction>>,
    mut starts: MessageWriter<StartLevelRequest>,
    mut pauses: MessageWriter<PauseToggleRequest>,
    mut next: ResMut<NextState<GameState>>,
    mut exit: MessageWriter<AppExit>,
) {
    for (interaction, button, locked) in &q {
        if *interaction != Interaction::Pressed || locked.is_some() {
            continue;
        }
        match *button {
            MenuButton::Start => next.set(GameState::LevelSelect),
            MenuButton::Quit => {
                exit.write(AppExit::Success);
            }
            MenuButton::EnterLevel(level) => {
                starts.write(StartLevelRequest { level });
            }
            MenuButton::Resume => {
                pauses.write(PauseToggleRequest);
            }
            MenuButton::ToLevelSelect => next.set(GameState::LevelSelect),
            MenuButton::ToMainMenu => next.set(GameState::MainMenu),
        }
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::MainMenu), spawn_main_menu);
    app.add_systems(OnEnter(GameState::LevelSelect), spawn_level_select);
    app.add_systems(OnEnter(GameState::Paused), spawn_pause_overlay);
    app.add_systems(
        OnEnter(GameState::LevelEnd),
        spawn_end_panel.after(crate::plugins::session::finish_level),
    );
    app.add_systems(Update, handle_buttons);
}
