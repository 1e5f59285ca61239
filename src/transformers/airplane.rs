//! Fixed-wing airplane behavior stage.
//!
//! Thrust acts along the nose, lift along the airframe's up axis scaled by
//! airspeed, and drag opposes velocity quadratically. Pitch/yaw/roll actions
//! become a torque in the airframe's local axes, rotated into world space.

use glam::Vec3;

use crate::transformers::config::AirplaneParams;
use crate::transformers::{TransformInput, TransformOutput, Transformer, nonzero};

pub struct AirplaneTransformer {
    priority: i32,
    enabled: bool,
    params: AirplaneParams,
}

impl AirplaneTransformer {
    pub fn new(params: AirplaneParams) -> Self {
        Self {
            priority: params.priority,
            enabled: params.enabled,
            params,
        }
    }
}

impl Transformer for AirplaneTransformer {
    fn name(&self) -> &'static str {
        "airplane"
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
        let p = &self.params;
        let speed = input.velocity.length();
        let forward = input.rotation * Vec3::NEG_Z;
        let up = input.rotation * Vec3::Y;

        let mut force = forward * (input.action("thrust") * p.thrust_force);
        force += up * (p.lift_coeff * speed);
        force -= input.velocity * (p.drag_coeff * speed);

        let local_torque = Vec3::new(
            (input.action("pitch_up") - input.action("pitch_down")) * p.pitch_torque,
            (input.action("yaw_left") - input.action("yaw_right")) * p.yaw_torque,
            (input.action("roll_left") - input.action("roll_right")) * p.roll_torque,
        );
        let torque = input.rotation * local_torque;

        TransformOutput {
            force: nonzero(force),
            torque: nonzero(torque),
            ..TransformOutput::none()
        }
    }
}
