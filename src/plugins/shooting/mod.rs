//! Shot resolution: fire-rate gating and the forward ray test.
//!
//! Fire intent arrives as `FireRequest` messages (the render layer maps mouse
//! presses; tests write them directly). A request inside the weapon's minimum
//! interval is dropped silently — no counter moves. A resolved shot casts one
//! ray from the aim pose; if it strikes a live [`Target`], that target's hit
//! path runs: counters, reward, removal notification, impact flash. Anything
//! else the ray touches is a plain miss.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::levels::{Weapon, DEFAULT_FIRE_INTERVAL};
use crate::plugins::session::Session;
use crate::plugins::targets::{
    move_targets, ImpactSpawned, PendingDespawn, RemovalCause, Target, TargetRemoved,
};

/// Discrete fire intent from the input collaborator.
#[derive(Message, Debug, Clone, Copy)]
pub struct FireRequest;

/// A shot passed the rate gate and was resolved (hit or miss).
#[derive(Message, Debug, Clone, Copy)]
pub struct ShotFired {
    pub shots_fired: u32,
}

/// A shot struck a live target.
#[derive(Message, Debug, Clone, Copy)]
pub struct HitRegistered {
    pub hits: u32,
    pub shots_fired: u32,
}

/// The weapon selected for the running level.
#[derive(Resource, Debug, Default)]
pub struct ActiveWeapon(pub Weapon);

/// Entities the forward ray must pass through (the shooter's own geometry,
/// i.e. the weapon viewmodel).
#[derive(Resource, Debug, Default)]
pub struct ShooterIgnore(pub Vec<Entity>);

/// Where the next ray starts. The render camera feeds this every frame; the
/// default is the booth firing position, which headless runs keep.
#[derive(Resource, Debug, Clone, Copy)]
pub struct AimPose {
    pub origin: Vec3,
    pub forward: Dir3,
}

impl Default for AimPose {
    fn default() -> Self {
        Self {
            origin: Vec3::new(0.0, 0.0, -15.0),
            forward: Dir3::Z,
        }
    }
}

/// Minimum-interval gate between shots.
#[derive(Resource, Debug)]
pub struct FireControl {
    cooldown: Timer,
}

impl Default for FireControl {
    fn default() -> Self {
        Self {
            cooldown: Timer::from_seconds(DEFAULT_FIRE_INTERVAL, TimerMode::Once),
        }
    }
}

impl FireControl {
    /// Re-arm for a level start; the first shot waits out a full interval.
    pub fn rearm(&mut self, interval: f32) {
        self.cooldown = Timer::from_seconds(interval, TimerMode::Once);
    }

    pub fn ready(&self) -> bool {
        self.cooldown.is_finished()
    }
}

/// Map mouse presses onto fire requests. No-op in headless apps.
pub fn fire_input(
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    mut writer: MessageWriter<FireRequest>,
) {
    let Some(buttons) = buttons else {
        return;
    };
    if buttons.just_pressed(MouseButton::Left) {
        writer.write(FireRequest);
    }
}

/// Resolve fire requests against the live target set.
pub fn resolve_fire(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut control: ResMut<FireControl>,
    mut requests: MessageReader<FireRequest>,
    aim: Res<AimPose>,
    ignore: Res<ShooterIgnore>,
    spatial: SpatialQuery,
    mut session: ResMut<Session>,
    mut commands: Commands,
    mut q_targets: Query<(&mut Target, &Transform), Without<PendingDespawn>>,
    mut removed: MessageWriter<TargetRemoved>,
    mut shots: MessageWriter<ShotFired>,
    mut hits: MessageWriter<HitRegistered>,
    mut impacts: MessageWriter<ImpactSpawned>,
) {
    control.cooldown.tick(time.delta());

    for _ in requests.read() {
        if !control.ready() {
            // Rate-limited: defined no-op, not an error.
            continue;
        }
        control.cooldown.reset();

        session.shots_fired += 1;
        shots.write(ShotFired {
            shots_fired: session.shots_fired,
        });

        let filter = SpatialQueryFilter::from_mask([Layer::Target, Layer::Booth])
            .with_excluded_entities(ignore.0.iter().copied());
        let Some(ray_hit) = spatial.cast_ray(
            aim.origin,
            aim.forward,
            tunables.ray_max_distance,
            true,
            &filter,
        ) else {
            continue;
        };

        // Only targets can be hit; booth geometry just stops the ray.
        let Ok((mut target, tf)) = q_targets.get_mut(ray_hit.entity) else {
            continue;
        };
        if !target.alive {
            // Already terminally transitioned this frame; a second hit is a no-op.
            continue;
        }

        target.alive = false;
        session.hits += 1;
        session.points += tunables.hit_reward;
        commands.entity(ray_hit.entity).insert(PendingDespawn);

        removed.write(TargetRemoved {
            cause: RemovalCause::Hit,
            generation: session.generation,
        });
        hits.write(HitRegistered {
            hits: session.hits,
            shots_fired: session.shots_fired,
        });
        impacts.write(ImpactSpawned {
            position: tf.translation,
            scale: target.scale,
        });
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<ActiveWeapon>()
        .init_resource::<ShooterIgnore>()
        .init_resource::<AimPose>()
        .init_resource::<FireControl>()
        .add_message::<FireRequest>()
        .add_message::<ShotFired>()
        .add_message::<HitRegistered>();

    // Live targets tick before any fire is resolved against them.
    app.add_systems(
        Update,
        (fire_input, resolve_fire.after(fire_input).after(move_targets))
            .run_if(in_state(GameState::Playing)),
    );
}
