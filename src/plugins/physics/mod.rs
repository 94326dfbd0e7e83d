use avian3d::prelude::*;
use bevy::prelude::*;

/// Physics is used for collider bookkeeping and spatial ray queries only;
/// nothing in the booth needs dynamics, so gravity is zeroed.
pub fn plugin(app: &mut App) {
    app.add_plugins(PhysicsPlugins::default());
    app.insert_resource(Gravity(Vec3::ZERO));
}
