//! Serializable transformer configuration.
//!
//! A [`TransformerConfig`] is the declarative description of one pipeline
//! stage, discriminated by a `type` tag. Every variant carries `priority`
//! (default 10, lower runs first) and `enabled` (default true) plus its own
//! validated parameter record. Unknown `type` tags and unknown parameter
//! fields are rejected at parse time; missing numeric parameters fall back to
//! the published reference defaults.

use serde::{Deserialize, Serialize};

use crate::resources::mappings::{InputMapping, MappingPreset};

fn default_priority() -> i32 {
    10
}

fn default_enabled() -> bool {
    true
}

fn default_one() -> f32 {
    1.0
}

/// Declarative description of one pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformerConfig {
    Input(InputParams),
    Airplane(AirplaneParams),
    Character(CharacterParams),
    Car(CarParams),
    Animal(AnimalParams),
    Butterfly(ButterflyParams),
    Custom(CustomParams),
}

impl TransformerConfig {
    /// The `type` tag this config would serialize with.
    pub fn kind(&self) -> &'static str {
        match self {
            TransformerConfig::Input(_) => "input",
            TransformerConfig::Airplane(_) => "airplane",
            TransformerConfig::Character(_) => "character",
            TransformerConfig::Car(_) => "car",
            TransformerConfig::Animal(_) => "animal",
            TransformerConfig::Butterfly(_) => "butterfly",
            TransformerConfig::Custom(_) => "custom",
        }
    }

    pub fn priority(&self) -> i32 {
        match self {
            TransformerConfig::Input(p) => p.priority,
            TransformerConfig::Airplane(p) => p.priority,
            TransformerConfig::Character(p) => p.priority,
            TransformerConfig::Car(p) => p.priority,
            TransformerConfig::Animal(p) => p.priority,
            TransformerConfig::Butterfly(p) => p.priority,
            TransformerConfig::Custom(p) => p.priority,
        }
    }
}

/// Parameters for the input stage: preset (or explicit bindings) plus a
/// uniform sensitivity multiplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputParams {
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub preset: MappingPreset,
    /// Explicit binding table overriding the preset when present.
    #[serde(default)]
    pub bindings: Option<InputMapping>,
    #[serde(default = "default_one")]
    pub sensitivity: f32,
}

impl Default for InputParams {
    fn default() -> Self {
        Self {
            priority: default_priority(),
            enabled: true,
            preset: MappingPreset::default(),
            bindings: None,
            sensitivity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AirplaneParams {
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "AirplaneParams::default_thrust_force")]
    pub thrust_force: f32,
    #[serde(default = "AirplaneParams::default_lift_coeff")]
    pub lift_coeff: f32,
    #[serde(default = "AirplaneParams::default_drag_coeff")]
    pub drag_coeff: f32,
    #[serde(default = "AirplaneParams::default_pitch_torque")]
    pub pitch_torque: f32,
    #[serde(default = "AirplaneParams::default_yaw_torque")]
    pub yaw_torque: f32,
    #[serde(default = "AirplaneParams::default_roll_torque")]
    pub roll_torque: f32,
}

impl AirplaneParams {
    fn default_thrust_force() -> f32 {
        60.0
    }
    fn default_lift_coeff() -> f32 {
        0.9
    }
    fn default_drag_coeff() -> f32 {
        0.05
    }
    fn default_pitch_torque() -> f32 {
        8.0
    }
    fn default_yaw_torque() -> f32 {
        4.0
    }
    fn default_roll_torque() -> f32 {
        10.0
    }
}

impl Default for AirplaneParams {
    fn default() -> Self {
        Self {
            priority: default_priority(),
            enabled: true,
            thrust_force: Self::default_thrust_force(),
            lift_coeff: Self::default_lift_coeff(),
            drag_coeff: Self::default_drag_coeff(),
            pitch_torque: Self::default_pitch_torque(),
            yaw_torque: Self::default_yaw_torque(),
            roll_torque: Self::default_roll_torque(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CharacterParams {
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "CharacterParams::default_move_force")]
    pub move_force: f32,
    #[serde(default = "CharacterParams::default_turn_torque")]
    pub turn_torque: f32,
    #[serde(default = "CharacterParams::default_jump_impulse")]
    pub jump_impulse: f32,
    /// Multiplier applied to `move_force` while the `run` action is held.
    #[serde(default = "CharacterParams::default_run_multiplier")]
    pub run_multiplier: f32,
}

impl CharacterParams {
    fn default_move_force() -> f32 {
        25.0
    }
    fn default_turn_torque() -> f32 {
        3.0
    }
    fn default_jump_impulse() -> f32 {
        5.0
    }
    fn default_run_multiplier() -> f32 {
        1.8
    }
}

impl Default for CharacterParams {
    fn default() -> Self {
        Self {
            priority: default_priority(),
            enabled: true,
            move_force: Self::default_move_force(),
            turn_torque: Self::default_turn_torque(),
            jump_impulse: Self::default_jump_impulse(),
            run_multiplier: Self::default_run_multiplier(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CarParams {
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "CarParams::default_engine_force")]
    pub engine_force: f32,
    #[serde(default = "CarParams::default_brake_force")]
    pub brake_force: f32,
    #[serde(default = "CarParams::default_steer_torque")]
    pub steer_torque: f32,
    /// Rolling drag, proportional to speed.
    #[serde(default = "CarParams::default_drag_coeff")]
    pub drag_coeff: f32,
}

impl CarParams {
    fn default_engine_force() -> f32 {
        40.0
    }
    fn default_brake_force() -> f32 {
        30.0
    }
    fn default_steer_torque() -> f32 {
        6.0
    }
    fn default_drag_coeff() -> f32 {
        0.02
    }
}

impl Default for CarParams {
    fn default() -> Self {
        Self {
            priority: default_priority(),
            enabled: true,
            engine_force: Self::default_engine_force(),
            brake_force: Self::default_brake_force(),
            steer_torque: Self::default_steer_torque(),
            drag_coeff: Self::default_drag_coeff(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimalParams {
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "AnimalParams::default_wander_force")]
    pub wander_force: f32,
    #[serde(default = "AnimalParams::default_turn_torque")]
    pub turn_torque: f32,
    /// Heading oscillation frequency in radians per second.
    #[serde(default = "AnimalParams::default_sway_frequency")]
    pub sway_frequency: f32,
}

impl AnimalParams {
    fn default_wander_force() -> f32 {
        8.0
    }
    fn default_turn_torque() -> f32 {
        2.0
    }
    fn default_sway_frequency() -> f32 {
        0.7
    }
}

impl Default for AnimalParams {
    fn default() -> Self {
        Self {
            priority: default_priority(),
            enabled: true,
            wander_force: Self::default_wander_force(),
            turn_torque: Self::default_turn_torque(),
            sway_frequency: Self::default_sway_frequency(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ButterflyParams {
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "ButterflyParams::default_flutter_force")]
    pub flutter_force: f32,
    /// Wing-beat frequency in hertz.
    #[serde(default = "ButterflyParams::default_flutter_frequency")]
    pub flutter_frequency: f32,
    #[serde(default = "ButterflyParams::default_drift_force")]
    pub drift_force: f32,
    /// Seed for the lateral drift jitter; same seed, same flight.
    #[serde(default = "ButterflyParams::default_seed")]
    pub seed: u64,
}

impl ButterflyParams {
    fn default_flutter_force() -> f32 {
        3.0
    }
    fn default_flutter_frequency() -> f32 {
        4.0
    }
    fn default_drift_force() -> f32 {
        0.8
    }
    fn default_seed() -> u64 {
        7
    }
}

impl Default for ButterflyParams {
    fn default() -> Self {
        Self {
            priority: default_priority(),
            enabled: true,
            flutter_force: Self::default_flutter_force(),
            flutter_frequency: Self::default_flutter_frequency(),
            drift_force: Self::default_drift_force(),
            seed: Self::default_seed(),
        }
    }
}

/// Parameters for the scripted stage. `code` is required; the factory rejects
/// an empty script.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomParams {
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Lua source defining a global `transform(input)` function.
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_car_config_with_defaults() {
        let cfg: TransformerConfig = serde_json::from_str(r#"{ "type": "car" }"#).unwrap();
        let TransformerConfig::Car(params) = cfg else {
            panic!("expected car variant");
        };
        assert_eq!(params.priority, 10);
        assert!(params.enabled);
        assert_eq!(params.engine_force, CarParams::default_engine_force());
    }

    #[test]
    fn parses_priority_and_enabled_overrides() {
        let cfg: TransformerConfig =
            serde_json::from_str(r#"{ "type": "input", "priority": 0, "enabled": false }"#)
                .unwrap();
        assert_eq!(cfg.priority(), 0);
        let TransformerConfig::Input(params) = cfg else {
            panic!("expected input variant");
        };
        assert!(!params.enabled);
    }

    #[test]
    fn rejects_unknown_type_tag() {
        let err = serde_json::from_str::<TransformerConfig>(r#"{ "type": "rocket" }"#);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_unknown_parameter_fields() {
        let err = serde_json::from_str::<TransformerConfig>(
            r#"{ "type": "car", "warp_drive": 9000 }"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn custom_requires_code_field() {
        let err = serde_json::from_str::<TransformerConfig>(r#"{ "type": "custom" }"#);
        assert!(err.is_err());
    }

    #[test]
    fn round_trips_through_json() {
        let cfg = TransformerConfig::Butterfly(ButterflyParams {
            priority: 3,
            seed: 99,
            ..ButterflyParams::default()
        });
        let json = serde_json::to_string(&cfg).unwrap();
        let back: TransformerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind(), "butterfly");
        assert_eq!(back.priority(), 3);
    }
}
