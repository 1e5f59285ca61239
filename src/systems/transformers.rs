//! Chain execution system.
//!
//! Runs every entity's transformer chain over a freshly built
//! [`TransformInput`] and queues the merged outputs for the physics step.
//! Chains live outside the ECS tables because scripted stages are not
//! thread-safe; the store is a non-send resource keyed by ECS entity.

use bevy_ecs::prelude::*;

use crate::components::entitydesc::EntityDesc;
use crate::components::rendermesh::RenderMesh;
use crate::resources::actuation::ActuationQueue;
use crate::resources::physics::PhysicsWorld;
use crate::resources::worldtime::SimClock;
use crate::session::ChainStore;
use crate::transformers::TransformInput;

/// Execute all transformer chains for this tick.
///
/// Kinematic state (velocity, rotation, grounded) is read from the physics
/// world's cache, so every chain sees the state as of the end of the previous
/// step regardless of execution order. For an entity without a body the
/// render mesh is the pose authority, so its current rotation is used.
pub fn execute_transformers(
    mut chains: NonSendMut<ChainStore>,
    physics: Res<PhysicsWorld>,
    clock: Res<SimClock>,
    query: Query<(Entity, &EntityDesc, &RenderMesh)>,
    mut queue: ResMut<ActuationQueue>,
) {
    for (entity, desc, mesh) in query.iter() {
        let Some(chain) = chains.get_mut(entity) else {
            continue;
        };
        if chain.is_empty() {
            continue;
        }

        let mut input = TransformInput::new(desc.id.clone(), clock.dt);
        if let Some((_, rotation)) = physics.cached_transform(&desc.id) {
            input.rotation = rotation;
        } else {
            input.rotation = mesh.rotation;
        }
        if let Some(velocity) = physics.linear_velocity(&desc.id) {
            input.velocity = velocity;
        }
        if let Some(angular) = physics.angular_velocity(&desc.id) {
            input.angular_velocity = angular;
        }
        input.environment.grounded = physics.is_grounded(&desc.id);

        let output = chain.execute(&mut input, clock.dt);
        queue.queue(&desc.id, output);
    }
}
