//! Rally-car behavior stage.
//!
//! Consumes `throttle`, `brake`, `steer_left`, `steer_right` and `handbrake`
//! actions. Engine force acts along the car's forward axis, braking and
//! rolling drag oppose the current velocity, and steering is a yaw torque
//! around the world up axis. Pure function of `(input, params)`; no state
//! carries across ticks.

use glam::Vec3;

use crate::transformers::config::CarParams;
use crate::transformers::{TransformInput, TransformOutput, Transformer, nonzero};

pub struct CarTransformer {
    priority: i32,
    enabled: bool,
    params: CarParams,
}

impl CarTransformer {
    pub fn new(params: CarParams) -> Self {
        Self {
            priority: params.priority,
            enabled: params.enabled,
            params,
        }
    }
}

impl Transformer for CarTransformer {
    fn name(&self) -> &'static str {
        "car"
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

    fn transform(&mut self, input: &mut TransformInput, _dt: f32) -> TransformOutput {
        let throttle = input.action("throttle");
        let brake = input.action("brake") + input.action("handbrake");
        let steer = input.action("steer_left") - input.action("steer_right");

        let forward = input.rotation * Vec3::NEG_Z;
        let speed = input.velocity.length();

        let mut force = forward * (throttle * self.params.engine_force);
        if brake > 0.0 && speed > 1e-3 {
            force -= input.velocity.normalize() * (brake * self.params.brake_force);
        }
        // Rolling drag grows with speed so top speed stays bounded.
        force -= input.velocity * (self.params.drag_coeff * speed);

        let torque = Vec3::Y * (steer * self.params.steer_torque);

        TransformOutput {
            force: nonzero(force),
            torque: nonzero(torque),
            ..TransformOutput::none()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage() -> CarTransformer {
        CarTransformer::new(CarParams::default())
    }

    #[test]
    fn throttle_pushes_along_forward_axis() {
        let mut car = stage();
        let mut input = TransformInput::new("car", 1.0 / 60.0);
        input.actions.insert("throttle".to_string(), 1.0);
        let out = car.transform(&mut input, 1.0 / 60.0);
        let force = out.force.unwrap();
        // Identity rotation: forward is -Z.
        assert!(force.z < 0.0);
        assert!(force.x.abs() < 1e-5 && force.y.abs() < 1e-5);
        assert!(out.torque.is_none());
    }

    #[test]
    fn steer_right_yields_negative_yaw_torque() {
        let mut car = stage();
        let mut input = TransformInput::new("car", 1.0 / 60.0);
        input.actions.insert("steer_right".to_string(), 1.0);
        let out = car.transform(&mut input, 1.0 / 60.0);
        assert!(out.force.is_none());
        assert!(out.torque.unwrap().y < 0.0);
    }

    #[test]
    fn brake_opposes_motion() {
        let mut car = stage();
        let mut input = TransformInput::new("car", 1.0 / 60.0);
        input.velocity = Vec3::new(0.0, 0.0, -10.0);
        input.actions.insert("brake".to_string(), 1.0);
        let out = car.transform(&mut input, 1.0 / 60.0);
        // Moving along -Z, so braking force points towards +Z.
        assert!(out.force.unwrap().z > 0.0);
    }

    #[test]
    fn quiescent_input_emits_nothing() {
        let mut car = stage();
        let mut input = TransformInput::new("car", 1.0 / 60.0);
        let out = car.transform(&mut input, 1.0 / 60.0);
        assert!(out.is_empty());
        assert!(!out.early_exit);
    }
}
