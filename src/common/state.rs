//! Global state machine.

use bevy::prelude::*;

/// Menu and level flow. `Playing` and `Paused` swap back and forth without
/// touching session counters; `LevelEnd` keeps the session data alive for the
/// results panel.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    MainMenu,
    LevelSelect,
    Playing,
    Paused,
    LevelEnd,
}

/// Active while a level instance exists (`Playing`, `Paused` or `LevelEnd`).
///
/// Level-scoped entities carry `DespawnOnExit(InLevel)`, so leaving for the
/// menus tears them down structurally instead of through per-system cleanup.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct InLevel;

impl ComputedStates for InLevel {
    type SourceStates = GameState;

    fn compute(source: GameState) -> Option<Self> {
        matches!(
            source,
            GameState::Playing | GameState::Paused | GameState::LevelEnd
        )
        .then_some(Self)
    }
}
