//! Physics to render pose synchronization.

use bevy_ecs::prelude::*;

use crate::components::entitydesc::EntityDesc;
use crate::components::rendermesh::{BodyLink, RenderMesh};
use crate::resources::physics::PhysicsWorld;

/// Copy the post-step physics poses into the render transform buffers.
///
/// Only entities marked with [`BodyLink`] are touched; everything else keeps
/// its authored pose. Descriptors are never written here.
pub fn sync_from_physics(
    physics: Res<PhysicsWorld>,
    mut query: Query<(&EntityDesc, &mut RenderMesh), With<BodyLink>>,
) {
    for (desc, mut mesh) in query.iter_mut() {
        if let Some((position, rotation)) = physics.cached_transform(&desc.id) {
            mesh.position = position;
            mesh.rotation = rotation;
        }
    }
}
