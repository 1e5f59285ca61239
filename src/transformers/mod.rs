//! Behavior transformers: the entity control pipeline.
//!
//! A transformer is one named, prioritized, enable-able stage in an entity's
//! control pipeline. Each simulation tick the stages of a
//! [`TransformerChain`](chain::TransformerChain) run in ascending priority
//! order over one shared, mutable [`TransformInput`], and their
//! [`TransformOutput`]s are summed into the net force/impulse/torque handed to
//! the physics world.
//!
//! Submodules overview:
//! - [`chain`] – ordered stage collection with stable priority sorting and early exit
//! - [`config`] – serializable per-stage configuration (tagged union, validated params)
//! - [`factory`] – builds chain instances from configuration
//! - [`input`] – maps raw hardware snapshots to semantic actions
//! - [`airplane`], [`car`], [`character`], [`animal`], [`butterfly`] – behavior variants
//! - [`custom`] – Lua-scripted stage (feature `lua`)

pub mod airplane;
pub mod animal;
pub mod butterfly;
pub mod car;
pub mod chain;
pub mod character;
pub mod config;
#[cfg(feature = "lua")]
pub mod custom;
pub mod factory;
pub mod input;

use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

/// Read-only context about the entity's surroundings for this tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct Environment {
    /// Whether the entity's collider has an active contact this tick.
    pub grounded: bool,
}

/// Shared, mutable per-entity state flowing through a chain for exactly one
/// tick. Rebuilt every frame; never persisted.
///
/// Earlier stages may write state later stages consume; the canonical case
/// is an input stage populating `actions` for a vehicle stage.
#[derive(Debug, Clone)]
pub struct TransformInput {
    pub entity_id: String,
    pub dt: f32,
    /// Semantic action name to intensity (usually in `[0, 1]`, wheel-driven
    /// actions may carry signed magnitudes).
    pub actions: FxHashMap<String, f32>,
    /// Current linear velocity of the entity's body (zero when it has none).
    pub velocity: Vec3,
    /// Current angular velocity of the entity's body (zero when it has none).
    pub angular_velocity: Vec3,
    /// Current orientation.
    pub rotation: Quat,
    pub environment: Environment,
}

impl TransformInput {
    pub fn new(entity_id: impl Into<String>, dt: f32) -> Self {
        Self {
            entity_id: entity_id.into(),
            dt,
            actions: FxHashMap::default(),
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            environment: Environment::default(),
        }
    }

    /// Intensity of a named action, zero when absent.
    pub fn action(&self, name: &str) -> f32 {
        self.actions.get(name).copied().unwrap_or(0.0)
    }
}

/// Additive actuation produced by one stage (or the merged chain result).
/// Ephemeral; consumed by the physics world adapter and discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformOutput {
    pub force: Option<Vec3>,
    pub impulse: Option<Vec3>,
    pub torque: Option<Vec3>,
    /// When set, the chain stops after this stage and returns the sum so far.
    pub early_exit: bool,
}

impl TransformOutput {
    /// Output that carries no actuation and does not stop the chain.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.force.is_none() && self.impulse.is_none() && self.torque.is_none()
    }

    /// Component-wise additive merge of another stage's output into this one.
    pub fn merge(&mut self, other: &TransformOutput) {
        self.force = accumulate(self.force, other.force);
        self.impulse = accumulate(self.impulse, other.impulse);
        self.torque = accumulate(self.torque, other.torque);
        self.early_exit |= other.early_exit;
    }
}

fn accumulate(a: Option<Vec3>, b: Option<Vec3>) -> Option<Vec3> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + b),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

/// `Some(v)` unless `v` is exactly zero. Variants use this so a quiescent
/// stage contributes nothing instead of a zero vector.
pub(crate) fn nonzero(v: Vec3) -> Option<Vec3> {
    if v == Vec3::ZERO { None } else { Some(v) }
}

/// One stage of an entity's control pipeline.
///
/// `transform` must be a pure function of `(input, dt, params)` plus any
/// per-variant state the implementation declares; given the same call
/// sequence it must produce the same outputs.
pub trait Transformer {
    /// Stable name for logging and per-stage toggling.
    fn name(&self) -> &'static str;

    /// Lower priorities run first. Equal priorities keep insertion order.
    fn priority(&self) -> i32;

    fn enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    /// Compute this stage's actuation for the tick. May mutate `input` for
    /// later stages.
    fn transform(&mut self, input: &mut TransformInput, dt: f32) -> TransformOutput;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_sums_componentwise() {
        let mut a = TransformOutput {
            force: Some(Vec3::new(1.0, 0.0, 0.0)),
            impulse: None,
            torque: Some(Vec3::Y),
            early_exit: false,
        };
        let b = TransformOutput {
            force: Some(Vec3::new(0.0, 2.0, 0.0)),
            impulse: Some(Vec3::Z),
            torque: None,
            early_exit: false,
        };
        a.merge(&b);
        assert_eq!(a.force, Some(Vec3::new(1.0, 2.0, 0.0)));
        assert_eq!(a.impulse, Some(Vec3::Z));
        assert_eq!(a.torque, Some(Vec3::Y));
    }

    #[test]
    fn merge_preserves_early_exit() {
        let mut a = TransformOutput::none();
        let b = TransformOutput {
            early_exit: true,
            ..TransformOutput::none()
        };
        a.merge(&b);
        assert!(a.early_exit);
    }

    #[test]
    fn action_lookup_defaults_to_zero() {
        let mut input = TransformInput::new("e1", 1.0 / 60.0);
        input.actions.insert("throttle".to_string(), 0.5);
        assert_eq!(input.action("throttle"), 0.5);
        assert_eq!(input.action("missing"), 0.0);
    }

    #[test]
    fn nonzero_filters_zero_vectors() {
        assert_eq!(nonzero(Vec3::ZERO), None);
        assert_eq!(nonzero(Vec3::X), Some(Vec3::X));
    }
}
