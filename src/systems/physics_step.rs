//! Actuation and physics stepping.

use bevy_ecs::prelude::*;

use crate::resources::actuation::ActuationQueue;
use crate::resources::physics::PhysicsWorld;
use crate::resources::worldtime::SimClock;

/// Apply this tick's queued actuation and advance the simulation one step.
///
/// Force accumulators are cleared first, so only outputs produced this tick
/// act on this step. An entity whose chain produced nothing therefore coasts
/// under gravity, damping and contacts alone.
pub fn apply_actuation_and_step(
    mut physics: ResMut<PhysicsWorld>,
    mut queue: ResMut<ActuationQueue>,
    clock: Res<SimClock>,
) {
    physics.reset_all_forces();
    for (id, output) in queue.drain() {
        if let Some(force) = output.force {
            physics.apply_force(&id, force);
        }
        if let Some(torque) = output.torque {
            physics.apply_torque(&id, torque);
        }
        if let Some(impulse) = output.impulse {
            physics.apply_impulse(&id, impulse);
        }
    }
    physics.step(clock.dt);
}
