//! Physics world adapter.
//!
//! Owns the rapier rigid-body simulation and presents a frame-oriented,
//! value-copy interface over it, keyed by entity id. No live rapier handle or
//! reference ever escapes this module: transforms are cached once after each
//! step and reads are served from that cache until the next step, and
//! velocity accessors return plain copies. This boundary is what keeps the
//! rest of the crate free of aliasing into engine-internal state.
//!
//! Per-tick protocol (the order is an invariant, not a suggestion):
//!
//! 1. [`PhysicsWorld::reset_all_forces`]: clear every dynamic body's force
//!    and torque accumulators. Skipping this makes each tick's controller
//!    torque compound on top of the previous tick's, producing runaway
//!    super-linear velocity growth.
//! 2. [`PhysicsWorld::apply_force`] / [`apply_torque`](PhysicsWorld::apply_torque)
//!    / [`apply_impulse`](PhysicsWorld::apply_impulse) with the merged chain
//!    outputs.
//! 3. [`PhysicsWorld::step`]: advance one fixed tick, refresh the transform
//!    cache, drain the step-scoped collision events.

use bevy_ecs::prelude::Resource;
use crossbeam_channel::Receiver;
use glam::{Quat, Vec3};
use rapier3d::na::Quaternion;
use rapier3d::prelude::*;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::components::entitydesc::{BodyKind, EntityDesc, Shape};

/// Half extent of the large thin box standing in for an infinite plane.
const PLANE_HALF_EXTENT: f32 = 500.0;
/// Half thickness of the plane box; its top face sits at the local origin.
const PLANE_HALF_THICKNESS: f32 = 0.05;

/// Two entity ids whose colliders began touching in a given step.
/// Unordered; each pair is reported once per contact begin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionPair {
    pub a: String,
    pub b: String,
}

impl CollisionPair {
    /// True when `id` is one of the participants.
    pub fn involves(&self, id: &str) -> bool {
        self.a == id || self.b == id
    }
}

/// The rigid-body simulation and its id-keyed bookkeeping.
#[derive(Resource)]
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    events: ChannelEventCollector,
    collision_rx: Receiver<CollisionEvent>,
    contact_force_rx: Receiver<ContactForceEvent>,

    body_by_id: FxHashMap<String, RigidBodyHandle>,
    id_by_collider: FxHashMap<ColliderHandle, String>,
    /// Value copies of body transforms, refreshed once per step.
    transform_cache: FxHashMap<String, (Vec3, Quat)>,
    /// Entities with at least one active contact, refreshed once per step.
    in_contact: FxHashMap<String, bool>,
    /// Contact-begin pairs for the most recent step only.
    step_collisions: Vec<CollisionPair>,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec3) -> Self {
        let (collision_tx, collision_rx) = crossbeam_channel::unbounded();
        let (contact_force_tx, contact_force_rx) = crossbeam_channel::unbounded();
        Self {
            gravity: to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            events: ChannelEventCollector::new(collision_tx, contact_force_tx),
            collision_rx,
            contact_force_rx,
            body_by_id: FxHashMap::default(),
            id_by_collider: FxHashMap::default(),
            transform_cache: FxHashMap::default(),
            in_contact: FxHashMap::default(),
            step_collisions: Vec::new(),
        }
    }

    /// Create the body (and collider, when the entity has a shape) for one
    /// entity. Entities without a body kind are not physics-driven and are
    /// ignored here.
    pub fn add_entity(&mut self, desc: &EntityDesc) {
        let Some(kind) = desc.body else {
            return;
        };

        let builder = match kind {
            BodyKind::Static => RigidBodyBuilder::fixed(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_position_based(),
        };
        let body = builder
            .position(Isometry::from_parts(
                Translation::from(to_na(desc.position)),
                quat_to_na(desc.rotation),
            ))
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .build();
        let handle = self.bodies.insert(body);

        if let Some(shape) = desc.shape {
            let (builder, volume, offset) = scaled_collider(shape, desc.scale);
            let mut collider = builder
                .friction(desc.friction)
                .restitution(desc.restitution);
            if let Some(offset) = offset {
                collider = collider.translation(to_na(offset));
            }
            if kind == BodyKind::Dynamic
                && let Some(mass) = desc.mass
                && volume > 0.0
            {
                collider = collider.density(mass / volume);
            }
            if desc.collision_hook.is_some() {
                collider = collider.active_events(ActiveEvents::COLLISION_EVENTS);
            }
            let collider_handle =
                self.colliders
                    .insert_with_parent(collider, handle, &mut self.bodies);
            self.id_by_collider.insert(collider_handle, desc.id.clone());
        }

        self.body_by_id.insert(desc.id.clone(), handle);
        self.transform_cache
            .insert(desc.id.clone(), (desc.position, desc.rotation));
        self.in_contact.insert(desc.id.clone(), false);
    }

    /// Remove an entity's body, colliders and cached state.
    pub fn remove_entity(&mut self, id: &str) {
        if let Some(handle) = self.body_by_id.remove(id) {
            self.id_by_collider
                .retain(|_, entity_id| entity_id.as_str() != id);
            self.bodies.remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
        }
        self.transform_cache.remove(id);
        self.in_contact.remove(id);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.body_by_id.contains_key(id)
    }

    /// Advance the simulation by exactly one fixed tick, then refresh the
    /// transform cache, the contact flags and the step-scoped collision
    /// pairs. Events from previous steps are never carried over.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &self.events,
        );
        self.refresh_cache();
        self.drain_collision_events();
    }

    /// Clear the pending force and torque accumulators on every dynamic
    /// body. Mandatory once per tick, before the tick's `apply_*` calls.
    pub fn reset_all_forces(&mut self) {
        for (_, body) in self.bodies.iter_mut() {
            if body.is_dynamic() {
                body.reset_forces(true);
                body.reset_torques(true);
            }
        }
    }

    /// Additively apply a force for the next step. No-op on non-dynamic
    /// bodies and unknown ids.
    pub fn apply_force(&mut self, id: &str, force: Vec3) {
        if let Some(body) = self.dynamic_body_mut(id) {
            body.add_force(to_na(force), true);
        }
    }

    /// Additively apply a torque for the next step. No-op on non-dynamic
    /// bodies and unknown ids.
    pub fn apply_torque(&mut self, id: &str, torque: Vec3) {
        if let Some(body) = self.dynamic_body_mut(id) {
            body.add_torque(to_na(torque), true);
        }
    }

    /// Apply an instantaneous velocity change. No-op on non-dynamic bodies
    /// and unknown ids.
    pub fn apply_impulse(&mut self, id: &str, impulse: Vec3) {
        if let Some(body) = self.dynamic_body_mut(id) {
            body.apply_impulse(to_na(impulse), true);
        }
    }

    /// Teleport the body, bypassing force integration. Also updates the
    /// cached transform so reads before the next step see the new pose.
    pub fn set_position(&mut self, id: &str, position: Vec3) {
        if let Some(&handle) = self.body_by_id.get(id)
            && let Some(body) = self.bodies.get_mut(handle)
        {
            body.set_translation(to_na(position), true);
            if let Some(cached) = self.transform_cache.get_mut(id) {
                cached.0 = position;
            }
        }
    }

    /// Directly set the body's orientation, bypassing integration. Also
    /// updates the cached transform.
    pub fn set_rotation(&mut self, id: &str, rotation: Quat) {
        if let Some(&handle) = self.body_by_id.get(id)
            && let Some(body) = self.bodies.get_mut(handle)
        {
            body.set_rotation(quat_to_na(rotation), true);
            if let Some(cached) = self.transform_cache.get_mut(id) {
                cached.1 = rotation;
            }
        }
    }

    /// Change gravity; takes effect on the next step.
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = to_na(gravity);
    }

    pub fn gravity(&self) -> Vec3 {
        from_na(&self.gravity)
    }

    /// Plain-value copy of the body's transform as of the last step (or the
    /// last teleport). Never a live handle into the simulation.
    pub fn cached_transform(&self, id: &str) -> Option<(Vec3, Quat)> {
        self.transform_cache.get(id).copied()
    }

    /// Copy of the body's current linear velocity.
    pub fn linear_velocity(&self, id: &str) -> Option<Vec3> {
        let body = self.bodies.get(*self.body_by_id.get(id)?)?;
        Some(from_na(body.linvel()))
    }

    /// Copy of the body's current angular velocity.
    pub fn angular_velocity(&self, id: &str) -> Option<Vec3> {
        let body = self.bodies.get(*self.body_by_id.get(id)?)?;
        Some(from_na(body.angvel()))
    }

    /// Directly set linear velocity. No-op on non-dynamic bodies.
    pub fn set_linear_velocity(&mut self, id: &str, velocity: Vec3) {
        if let Some(body) = self.dynamic_body_mut(id) {
            body.set_linvel(to_na(velocity), true);
        }
    }

    /// Whether the entity's collider had an active contact as of the last
    /// step.
    pub fn is_grounded(&self, id: &str) -> bool {
        self.in_contact.get(id).copied().unwrap_or(false)
    }

    /// Contact-begin pairs for the most recent step only.
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.step_collisions
    }

    /// Ids of all bodies this world owns.
    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.body_by_id.keys().map(String::as_str)
    }

    /// Free all bodies, colliders and queued events. Safe to call on a world
    /// that was never attached to a session (the async-creation cancellation
    /// path). Accessor behavior after disposal is unspecified; the caller's
    /// documented ordering must prevent it.
    pub fn dispose(&mut self) {
        self.body_by_id.clear();
        self.id_by_collider.clear();
        self.transform_cache.clear();
        self.in_contact.clear();
        self.step_collisions.clear();
        self.bodies = RigidBodySet::new();
        self.colliders = ColliderSet::new();
        self.impulse_joints = ImpulseJointSet::new();
        self.multibody_joints = MultibodyJointSet::new();
        while self.collision_rx.try_recv().is_ok() {}
        while self.contact_force_rx.try_recv().is_ok() {}
    }

    fn dynamic_body_mut(&mut self, id: &str) -> Option<&mut RigidBody> {
        let body = self.bodies.get_mut(*self.body_by_id.get(id)?)?;
        body.is_dynamic().then_some(body)
    }

    fn refresh_cache(&mut self) {
        for (id, &handle) in &self.body_by_id {
            if let Some(body) = self.bodies.get(handle) {
                self.transform_cache.insert(
                    id.clone(),
                    (from_na(body.translation()), na_to_quat(body.rotation())),
                );
            }
        }
        for (&collider, id) in &self.id_by_collider {
            let touching = self
                .narrow_phase
                .contact_pairs_with(collider)
                .any(|pair| pair.has_any_active_contact);
            self.in_contact.insert(id.clone(), touching);
        }
    }

    fn drain_collision_events(&mut self) {
        self.step_collisions.clear();
        let mut seen: SmallVec<[(ColliderHandle, ColliderHandle); 8]> = SmallVec::new();
        while let Ok(event) = self.collision_rx.try_recv() {
            let CollisionEvent::Started(h1, h2, _) = event else {
                continue;
            };
            let key = if h1.into_raw_parts() <= h2.into_raw_parts() {
                (h1, h2)
            } else {
                (h2, h1)
            };
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            if let (Some(a), Some(b)) = (self.id_by_collider.get(&h1), self.id_by_collider.get(&h2))
            {
                self.step_collisions.push(CollisionPair {
                    a: a.clone(),
                    b: b.clone(),
                });
            }
        }
        // Contact force events are not consumed; keep the channel drained.
        while self.contact_force_rx.try_recv().is_ok() {}
    }
}

/// Size a collider from shape + per-axis scale and report its scaled volume
/// (for density-from-mass) and local offset (for the plane approximation).
fn scaled_collider(shape: Shape, scale: Vec3) -> (ColliderBuilder, f32, Option<Vec3>) {
    use std::f32::consts::PI;
    match shape {
        Shape::Box { size } => {
            let half = size * scale * 0.5;
            let volume = half.x * half.y * half.z * 8.0;
            (ColliderBuilder::cuboid(half.x, half.y, half.z), volume, None)
        }
        Shape::Sphere { radius } => {
            // Spheres cannot scale per axis; use the average.
            let r = radius * (scale.x + scale.y + scale.z) / 3.0;
            (ColliderBuilder::ball(r), 4.0 / 3.0 * PI * r * r * r, None)
        }
        Shape::Cylinder { height, radius } => {
            let half_height = height * scale.y * 0.5;
            let r = radius * scale.x.max(scale.z);
            (
                ColliderBuilder::cylinder(half_height, r),
                PI * r * r * half_height * 2.0,
                None,
            )
        }
        Shape::Capsule { height, radius } => {
            let half_height = height * scale.y * 0.5;
            let r = radius * scale.x.max(scale.z);
            let volume = PI * r * r * half_height * 2.0 + 4.0 / 3.0 * PI * r * r * r;
            (ColliderBuilder::capsule_y(half_height, r), volume, None)
        }
        Shape::Plane => (
            ColliderBuilder::cuboid(PLANE_HALF_EXTENT, PLANE_HALF_THICKNESS, PLANE_HALF_EXTENT),
            0.0,
            // Center the thin box below the origin so its top face sits at y = 0.
            Some(Vec3::new(0.0, -PLANE_HALF_THICKNESS, 0.0)),
        ),
    }
}

fn to_na(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn from_na(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn quat_to_na(q: Quat) -> Rotation<Real> {
    Rotation::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

fn na_to_quat(q: &Rotation<Real>) -> Quat {
    let c = q.coords;
    Quat::from_xyzw(c.x, c.y, c.z, c.w)
}
