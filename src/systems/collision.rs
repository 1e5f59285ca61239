//! Collision message publication.

use bevy_ecs::prelude::*;

use crate::components::entitydesc::EntityDesc;
use crate::events::collision::CollisionStarted;
use crate::resources::entityindex::EntityIndex;
use crate::resources::physics::PhysicsWorld;

/// Rotate the collision mailbox so last tick's messages age out.
///
/// Runs before the physics step publishes this tick's batch, giving readers
/// exactly one tick to consume each message.
pub fn update_collision_messages(mut messages: ResMut<Messages<CollisionStarted>>) {
    messages.update();
}

/// Re-emit the step's contact-begin pairs as ECS messages.
///
/// A message is only written for a participant that declared a collision
/// hook in its descriptor; a pair where both sides declared one produces two
/// messages, one per hook.
pub fn publish_collisions(
    physics: Res<PhysicsWorld>,
    index: Res<EntityIndex>,
    descs: Query<&EntityDesc>,
    mut writer: MessageWriter<CollisionStarted>,
) {
    for pair in physics.collisions() {
        for (id, other) in [(&pair.a, &pair.b), (&pair.b, &pair.a)] {
            let Some(entity) = index.get(id) else {
                continue;
            };
            let Ok(desc) = descs.get(entity) else {
                continue;
            };
            if let Some(hook) = &desc.collision_hook {
                writer.write(CollisionStarted {
                    entity: id.clone(),
                    other: other.clone(),
                    hook: hook.clone(),
                });
            }
        }
    }
}
