//! Tunable gameplay constants.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    /// Delay between a target's removal and the next spawn wave.
    pub respawn_delay: f32,
    /// Delay between the quota being exhausted and the level-end transition.
    pub level_end_delay: f32,
    /// Horizontal bound beyond which a target counts as escaped.
    pub escape_bound_x: f32,
    /// |x| at which fresh targets enter the booth.
    pub spawn_edge_x: f32,
    /// Forward ray length for shot resolution.
    pub ray_max_distance: f32,
    /// Score awarded per hit.
    pub hit_reward: u32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            respawn_delay: 0.5,
            level_end_delay: 1.0,
            escape_bound_x: 24.0,
            spawn_edge_x: 22.0,
            ray_max_distance: 200.0,
            hit_reward: 100,
        }
    }
}
