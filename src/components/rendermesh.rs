//! Render mesh transform buffer component.
//!
//! Stands in for the renderer's mesh object: the pose registry writes it,
//! rendering reads it. For a physics-driven entity the physics cache is the
//! source of truth and this buffer is refreshed from it after every step;
//! for everything else the buffer simply holds the authored pose.

use bevy_ecs::prelude::Component;
use glam::{Quat, Vec3};

use crate::components::entitydesc::EntityDesc;

#[derive(Component, Debug, Clone)]
pub struct RenderMesh {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl RenderMesh {
    /// Seed the buffer from the authored pose.
    pub fn from_desc(desc: &EntityDesc) -> Self {
        Self {
            position: desc.position,
            rotation: desc.rotation,
            scale: desc.scale,
        }
    }
}

/// Marker: this entity owns a body in the physics world, keyed by its id.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct BodyLink;
