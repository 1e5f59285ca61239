//! Simulation session facade.
//!
//! [`SimSession`] owns the ECS world and the per-tick schedule and is the
//! only surface the host talks to: entity add/remove, pose reads and writes,
//! the tick driver, and the raw input hub handle. Everything underneath
//! (chains, the physics adapter, message mailboxes) stays internal.
//!
//! [`PhysicsLoader`] covers the one asynchronous boundary: building a physics
//! world on a background thread with single-flight and
//! cancel-then-dispose-on-arrival semantics.

use bevy_ecs::prelude::*;
use bevy_ecs::system::RunSystemOnce;
use crossbeam_channel::{Receiver, bounded};
use glam::{Quat, Vec3};
use log::{debug, warn};
use rustc_hash::FxHashMap;

use crate::components::entitydesc::EntityDesc;
use crate::components::rendermesh::{BodyLink, RenderMesh};
use crate::events::collision::CollisionStarted;
use crate::resources::actuation::ActuationQueue;
use crate::resources::entityindex::EntityIndex;
use crate::resources::physics::{CollisionPair, PhysicsWorld};
use crate::resources::rawinput::{InputHubRes, RawInputHub, SharedInputHub};
use crate::resources::simconfig::SimConfig;
use crate::resources::worldtime::SimClock;
use crate::systems;
use crate::transformers::chain::TransformerChain;
use crate::transformers::factory::{self, ChainBuildError, ChainDeps};

/// Non-send store of per-entity transformer chains.
///
/// Chains hold boxed closures and (with the `lua` feature) script state that
/// is not thread-safe, so they live outside the ECS tables as a non-send
/// resource keyed by ECS entity.
#[derive(Default)]
pub struct ChainStore {
    chains: FxHashMap<Entity, TransformerChain>,
}

impl ChainStore {
    pub fn insert(&mut self, entity: Entity, chain: TransformerChain) {
        self.chains.insert(entity, chain);
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut TransformerChain> {
        self.chains.get_mut(&entity)
    }

    pub fn remove(&mut self, entity: Entity) -> Option<TransformerChain> {
        self.chains.remove(&entity)
    }

    pub fn clear(&mut self) {
        self.chains.clear();
    }
}

/// Facade over the ECS world and the per-tick pipeline.
pub struct SimSession {
    world: World,
    schedule: Schedule,
    input_hub: SharedInputHub,
}

impl SimSession {
    /// Create a session with a fresh physics world built from the config.
    pub fn new(config: SimConfig) -> Self {
        let physics = PhysicsWorld::new(config.gravity);
        Self::with_physics(physics, config)
    }

    /// Create a session around a pre-built physics world, typically one
    /// delivered by a [`PhysicsLoader`].
    pub fn with_physics(physics: PhysicsWorld, config: SimConfig) -> Self {
        let mut world = World::new();
        let input_hub = RawInputHub::shared();

        world.insert_resource(physics);
        world.insert_resource(config);
        world.insert_resource(SimClock::default());
        world.insert_resource(ActuationQueue::default());
        world.insert_resource(EntityIndex::default());
        world.insert_resource(Messages::<CollisionStarted>::default());
        world.insert_non_send_resource(ChainStore::default());
        world.insert_non_send_resource(InputHubRes(input_hub.clone()));

        // Tick pipeline. The order is an invariant: transformers read the
        // previous step's state, actuation lands on a clean accumulator, and
        // poses/collisions are published from the step that just ran.
        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                systems::input::sample_raw_input,
                systems::collision::update_collision_messages,
                systems::transformers::execute_transformers,
                systems::physics_step::apply_actuation_and_step,
                systems::pose_sync::sync_from_physics,
                systems::collision::publish_collisions,
            )
                .chain(),
        );

        Self {
            world,
            schedule,
            input_hub,
        }
    }

    /// Add one entity: physics body (when declared), render mesh seeded from
    /// the authored pose, and transformer chain. An existing entity with the
    /// same id is replaced.
    pub fn add_entity(&mut self, desc: EntityDesc) -> Result<(), ChainBuildError> {
        if self.world.resource::<EntityIndex>().contains(&desc.id) {
            debug!("replacing entity '{}'", desc.id);
            self.remove_entity(&desc.id);
        }

        let policy = self.world.resource::<SimConfig>().chain_policy;
        let deps = ChainDeps {
            raw_input: self.input_hub.clone(),
        };
        let chain = factory::build_chain(&desc.id, &desc.transformers, &deps, policy)?;

        self.world
            .resource_mut::<PhysicsWorld>()
            .add_entity(&desc);

        let id = desc.id.clone();
        let has_body = desc.body.is_some();
        let mesh = RenderMesh::from_desc(&desc);
        let entity = if has_body {
            self.world.spawn((desc, mesh, BodyLink)).id()
        } else {
            self.world.spawn((desc, mesh)).id()
        };

        self.world
            .resource_mut::<EntityIndex>()
            .insert(id, entity);
        self.world
            .non_send_resource_mut::<ChainStore>()
            .insert(entity, chain);
        Ok(())
    }

    /// Remove an entity and all its state. Returns false for unknown ids.
    pub fn remove_entity(&mut self, id: &str) -> bool {
        let Some(entity) = self.world.resource_mut::<EntityIndex>().remove(id) else {
            return false;
        };
        self.world.non_send_resource_mut::<ChainStore>().remove(entity);
        self.world.resource_mut::<PhysicsWorld>().remove_entity(id);
        self.world.despawn(entity);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.world.resource::<EntityIndex>().contains(id)
    }

    /// Advance the simulation by exactly one fixed tick.
    pub fn tick(&mut self) {
        let dt = self.world.resource::<SimConfig>().fixed_dt;
        self.world.resource_mut::<SimClock>().advance(dt);
        self.schedule.run(&mut self.world);
        self.world.clear_trackers();
    }

    /// Run only the chain-execution stage, queueing actuation without
    /// stepping. The next [`tick`](Self::tick) or explicit step consumes it.
    pub fn execute_transformers(&mut self, dt: f32) {
        self.world.resource_mut::<SimClock>().dt = dt;
        if let Err(e) = self
            .world
            .run_system_once(systems::transformers::execute_transformers)
        {
            warn!("transformer execution failed: {e}");
        }
    }

    /// Current render-buffer position, falling back to the authored pose for
    /// entities that were never synced.
    pub fn get_position(&mut self, id: &str) -> Option<Vec3> {
        let entity = self.world.resource::<EntityIndex>().get(id)?;
        self.world
            .get::<RenderMesh>(entity)
            .map(|mesh| mesh.position)
    }

    pub fn get_rotation(&mut self, id: &str) -> Option<Quat> {
        let entity = self.world.resource::<EntityIndex>().get(id)?;
        self.world
            .get::<RenderMesh>(entity)
            .map(|mesh| mesh.rotation)
    }

    /// Move an entity: writes the render buffer and teleports the body when
    /// one exists. The descriptor's authored pose is never touched.
    pub fn set_position(&mut self, id: &str, position: Vec3) {
        let Some(entity) = self.world.resource::<EntityIndex>().get(id) else {
            return;
        };
        if let Some(mut mesh) = self.world.get_mut::<RenderMesh>(entity) {
            mesh.position = position;
        }
        self.world
            .resource_mut::<PhysicsWorld>()
            .set_position(id, position);
    }

    pub fn set_rotation(&mut self, id: &str, rotation: Quat) {
        let Some(entity) = self.world.resource::<EntityIndex>().get(id) else {
            return;
        };
        if let Some(mut mesh) = self.world.get_mut::<RenderMesh>(entity) {
            mesh.rotation = rotation;
        }
        self.world
            .resource_mut::<PhysicsWorld>()
            .set_rotation(id, rotation);
    }

    /// Snapshot of every entity's current render pose, keyed by id. This is
    /// the surface an editor commit reads when persisting live poses.
    pub fn all_poses(&mut self) -> FxHashMap<String, (Vec3, Quat)> {
        let mut poses = FxHashMap::default();
        let mut query = self.world.query::<(&EntityDesc, &RenderMesh)>();
        for (desc, mesh) in query.iter(&self.world) {
            poses.insert(desc.id.clone(), (mesh.position, mesh.rotation));
        }
        poses
    }

    /// Contact-begin pairs from the most recent tick's physics step.
    pub fn collisions(&self) -> Vec<CollisionPair> {
        self.world.resource::<PhysicsWorld>().collisions().to_vec()
    }

    /// Whether the entity is excluded from interactive drag.
    pub fn is_locked(&mut self, id: &str) -> bool {
        let Some(entity) = self.world.resource::<EntityIndex>().get(id) else {
            return false;
        };
        self.world
            .get::<EntityDesc>(entity)
            .map(|desc| desc.locked)
            .unwrap_or(false)
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.world.resource_mut::<PhysicsWorld>().set_gravity(gravity);
    }

    /// Shared handle the host feeds key state and wheel deltas into.
    pub fn input_hub(&self) -> SharedInputHub {
        self.input_hub.clone()
    }

    /// Remove every entity, chain and body. The session stays usable.
    pub fn clear(&mut self) {
        let ids: Vec<String> = self
            .world
            .resource::<EntityIndex>()
            .ids()
            .map(str::to_string)
            .collect();
        for id in ids {
            self.remove_entity(&id);
        }
        self.world.resource_mut::<ActuationQueue>().drain().count();
    }
}

/// Background construction of a physics world.
///
/// `begin` spawns at most one build at a time; a second call while one is in
/// flight coalesces into it. `cancel` marks the in-flight build so that its
/// result, when it lands, is disposed instead of delivered.
#[derive(Default)]
pub struct PhysicsLoader {
    rx: Option<Receiver<PhysicsWorld>>,
    cancelled: bool,
}

impl PhysicsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a physics world for `gravity` on a background thread.
    /// No-op while a build is already in flight.
    pub fn begin(&mut self, gravity: Vec3) {
        if self.in_flight() {
            debug!("physics world build already in flight");
            return;
        }
        self.cancelled = false;
        let (tx, rx) = bounded(1);
        self.rx = Some(rx);
        std::thread::spawn(move || {
            let world = PhysicsWorld::new(gravity);
            // Receiver dropped means the loader itself was discarded.
            let _ = tx.send(world);
        });
    }

    pub fn in_flight(&self) -> bool {
        self.rx.is_some()
    }

    /// Mark the in-flight build as unwanted. Its world is disposed on
    /// arrival instead of being delivered.
    pub fn cancel(&mut self) {
        if self.in_flight() {
            self.cancelled = true;
        }
    }

    /// Non-blocking delivery check. Returns the finished world once, unless
    /// the build was cancelled, in which case the world is disposed and
    /// `None` is returned.
    pub fn poll(&mut self) -> Option<PhysicsWorld> {
        let rx = self.rx.as_ref()?;
        match rx.try_recv() {
            Ok(mut world) => {
                self.rx = None;
                if self.cancelled {
                    self.cancelled = false;
                    world.dispose();
                    None
                } else {
                    Some(world)
                }
            }
            Err(_) => None,
        }
    }
}
