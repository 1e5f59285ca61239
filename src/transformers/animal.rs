//! Ambient animal behavior stage.
//!
//! A slow forward wander with a sinusoidal heading sway. The only state
//! carried across ticks is the sway phase, which advances by `dt` each call,
//! so the stage is tick-deterministic given the same call sequence.

use glam::Vec3;

use crate::transformers::config::AnimalParams;
use crate::transformers::{TransformInput, TransformOutput, Transformer, nonzero};

pub struct AnimalTransformer {
    priority: i32,
    enabled: bool,
    params: AnimalParams,
    phase: f32,
}

impl AnimalTransformer {
    pub fn new(params: AnimalParams) -> Self {
        Self {
            priority: params.priority,
            enabled: params.enabled,
            params,
            phase: 0.0,
        }
    }
}

impl Transformer for AnimalTransformer {
    fn name(&self) -> &'static str {
        "animal"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn transform(&mut self, input: &mut TransformInput, dt: f32) -> TransformOutput {
        self.phase += dt * self.params.sway_frequency * std::f32::consts::TAU;

        let mut heading = input.rotation * Vec3::NEG_Z;
        heading.y = 0.0;
        let heading = heading.normalize_or_zero();

        let force = heading * self.params.wander_force;
        let torque = Vec3::Y * (self.phase.sin() * self.params.turn_torque);

        TransformOutput {
            force: nonzero(force),
            torque: nonzero(torque),
            ..TransformOutput::none()
        }
    }
}
