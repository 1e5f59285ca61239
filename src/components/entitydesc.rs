//! Static entity descriptor component.
//!
//! The declarative description of one world entity: identity, optional
//! physics body kind and collision shape, initial pose and scale, material
//! parameters, and the ordered transformer configuration. Owned by the world
//! document; immutable during a frame. The simulation never writes the
//! descriptor. Persisting a live pose back into it is an explicit editor
//! operation outside this crate.

use bevy_ecs::prelude::Component;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::transformers::config::TransformerConfig;

/// How the physics world treats the entity's body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    /// Immovable; never reads controller output.
    Static,
    /// Fully simulated; forces, impulses and gravity apply.
    Dynamic,
    /// Position-driven; moved by explicit writes, pushes dynamic bodies.
    Kinematic,
}

/// Collision shape descriptor. Dimensions are pre-scale; the physics adapter
/// applies the entity's scale when sizing the collider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Box { size: Vec3 },
    Sphere { radius: f32 },
    Cylinder { height: f32, radius: f32 },
    Capsule { height: f32, radius: f32 },
    /// Infinite ground plane, approximated by a large thin box whose top
    /// face sits at the entity's local origin.
    Plane,
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

fn default_friction() -> f32 {
    0.5
}

/// Static description of one world entity.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct EntityDesc {
    pub id: String,
    #[serde(default)]
    pub body: Option<BodyKind>,
    #[serde(default)]
    pub shape: Option<Shape>,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Quat,
    #[serde(default = "default_scale")]
    pub scale: Vec3,
    /// Explicit mass for dynamic bodies; when set, collider density is chosen
    /// so the resulting mass matches.
    #[serde(default)]
    pub mass: Option<f32>,
    #[serde(default = "default_friction")]
    pub friction: f32,
    #[serde(default)]
    pub restitution: f32,
    #[serde(default)]
    pub linear_damping: f32,
    #[serde(default)]
    pub angular_damping: f32,
    #[serde(default)]
    pub transformers: Vec<TransformerConfig>,
    /// Excludes the entity from interactive drag, not from simulation.
    #[serde(default)]
    pub locked: bool,
    /// Script hook name invoked by the collision collaborator. Collision
    /// events are only emitted for entities that declare one.
    #[serde(default)]
    pub collision_hook: Option<String>,
}

impl EntityDesc {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: None,
            shape: None,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            mass: None,
            friction: default_friction(),
            restitution: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            transformers: Vec::new(),
            locked: false,
            collision_hook: None,
        }
    }

    pub fn with_body(mut self, body: BodyKind) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn with_angular_damping(mut self, damping: f32) -> Self {
        self.angular_damping = damping;
        self
    }

    pub fn with_transformers(mut self, transformers: Vec<TransformerConfig>) -> Self {
        self.transformers = transformers;
        self
    }

    pub fn with_collision_hook(mut self, hook: impl Into<String>) -> Self {
        self.collision_hook = Some(hook.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_defaults() {
        let desc: EntityDesc = serde_json::from_str(r#"{ "id": "rock" }"#).unwrap();
        assert_eq!(desc.id, "rock");
        assert!(desc.body.is_none());
        assert_eq!(desc.scale, Vec3::ONE);
        assert_eq!(desc.rotation, Quat::IDENTITY);
        assert_eq!(desc.friction, 0.5);
        assert_eq!(desc.restitution, 0.0);
        assert!(!desc.locked);
    }

    #[test]
    fn deserializes_full_dynamic_entity() {
        let desc: EntityDesc = serde_json::from_str(
            r#"{
                "id": "car",
                "body": "dynamic",
                "shape": { "kind": "box", "size": [2.0, 1.0, 4.0] },
                "position": [0.0, 1.0, 0.0],
                "mass": 1200.0,
                "angular_damping": 0.5,
                "transformers": [
                    { "type": "input", "priority": 0, "preset": "car" },
                    { "type": "car", "priority": 1 }
                ],
                "collision_hook": "on_crash"
            }"#,
        )
        .unwrap();
        assert_eq!(desc.body, Some(BodyKind::Dynamic));
        assert_eq!(desc.mass, Some(1200.0));
        assert_eq!(desc.transformers.len(), 2);
        assert_eq!(desc.collision_hook.as_deref(), Some("on_crash"));
    }

    #[test]
    fn shape_tags_round_trip() {
        let shape = Shape::Cylinder {
            height: 2.0,
            radius: 0.5,
        };
        let json = serde_json::to_string(&shape).unwrap();
        assert!(json.contains("cylinder"));
        let back: Shape = serde_json::from_str(&json).unwrap();
        assert_eq!(back, shape);
    }
}
