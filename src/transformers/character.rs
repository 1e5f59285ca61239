//! Walking character behavior stage.
//!
//! Movement force is the facing direction projected onto the ground plane,
//! turning is a yaw torque, and `jump` emits a one-shot vertical impulse,
//! but only while the environment reports ground contact, so holding the key
//! mid-air does nothing.

use glam::Vec3;

use crate::transformers::config::CharacterParams;
use crate::transformers::{TransformInput, TransformOutput, Transformer, nonzero};

pub struct CharacterTransformer {
    priority: i32,
    enabled: bool,
    params: CharacterParams,
}

impl CharacterTransformer {
    pub fn new(params: CharacterParams) -> Self {
        Self {
            priority: params.priority,
            enabled: params.enabled,
            params,
        }
    }
}

impl Transformer for CharacterTransformer {
    fn name(&self) -> &'static str {
        "character"
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
        let walk = input.action("move_forward") - input.action("move_back");
        let turn = input.action("turn_left") - input.action("turn_right");
        let run = 1.0 + input.action("run") * (p.run_multiplier - 1.0);

        let mut heading = input.rotation * Vec3::NEG_Z;
        heading.y = 0.0;
        let heading = heading.normalize_or_zero();

        let force = heading * (walk * p.move_force * run);
        let torque = Vec3::Y * (turn * p.turn_torque);

        let impulse = if input.action("jump") > 0.0 && input.environment.grounded {
            Some(Vec3::Y * p.jump_impulse)
        } else {
            None
        };

        TransformOutput {
            force: nonzero(force),
            torque: nonzero(torque),
            impulse,
            ..TransformOutput::none()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage() -> CharacterTransformer {
        CharacterTransformer::new(CharacterParams::default())
    }

    #[test]
    fn walk_force_stays_in_ground_plane() {
        let mut character = stage();
        let mut input = TransformInput::new("hero", 1.0 / 60.0);
        // Pitch the body 45 degrees; the walk force must remain horizontal.
        input.rotation = glam::Quat::from_rotation_x(std::f32::consts::FRAC_PI_4);
        input.actions.insert("move_forward".to_string(), 1.0);
        let out = character.transform(&mut input, 1.0 / 60.0);
        assert!(out.force.unwrap().y.abs() < 1e-5);
    }

    #[test]
    fn jump_requires_ground_contact() {
        let mut character = stage();
        let mut airborne = TransformInput::new("hero", 1.0 / 60.0);
        airborne.actions.insert("jump".to_string(), 1.0);
        assert!(character.transform(&mut airborne, 1.0 / 60.0).impulse.is_none());

        let mut grounded = TransformInput::new("hero", 1.0 / 60.0);
        grounded.actions.insert("jump".to_string(), 1.0);
        grounded.environment.grounded = true;
        let out = character.transform(&mut grounded, 1.0 / 60.0);
        assert!(out.impulse.unwrap().y > 0.0);
    }

    #[test]
    fn run_modifier_scales_move_force() {
        let mut character = stage();
        let mut walking = TransformInput::new("hero", 1.0 / 60.0);
        walking.actions.insert("move_forward".to_string(), 1.0);
        let walk_force = character.transform(&mut walking, 1.0 / 60.0).force.unwrap();

        let mut running = TransformInput::new("hero", 1.0 / 60.0);
        running.actions.insert("move_forward".to_string(), 1.0);
        running.actions.insert("run".to_string(), 1.0);
        let run_force = character.transform(&mut running, 1.0 / 60.0).force.unwrap();

        assert!(run_force.length() > walk_force.length());
    }
}
