//! Input mapping presets.
//!
//! A mapping turns a [`RawInput`] snapshot into named semantic actions
//! (`throttle`, `steer_left`, ...). Key bindings contribute a fixed scale
//! while held; wheel bindings contribute `delta * sensitivity` for the tick
//! in which the delta was sampled. Applying a mapping *replaces* the action
//! set wholesale, which makes the input stage the canonical source of actions
//! for the tick.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::resources::rawinput::{Key, RawInput};

/// One key bound to a named action with a contribution scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: Key,
    pub action: String,
    pub scale: f32,
}

/// Wheel axis selector for [`WheelBinding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelAxis {
    X,
    Y,
}

/// Wheel/trackpad axis bound to a named action with per-axis sensitivity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelBinding {
    pub axis: WheelAxis,
    pub action: String,
    pub sensitivity: f32,
}

/// Named preset selector used by transformer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingPreset {
    #[default]
    Car,
    Airplane,
    Character,
}

/// Static table mapping raw keys and wheel axes to semantic actions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputMapping {
    #[serde(default)]
    pub keys: Vec<KeyBinding>,
    #[serde(default)]
    pub wheels: Vec<WheelBinding>,
}

impl InputMapping {
    /// Resolve a preset into its binding table.
    pub fn preset(preset: MappingPreset) -> Self {
        match preset {
            MappingPreset::Car => Self::car(),
            MappingPreset::Airplane => Self::airplane(),
            MappingPreset::Character => Self::character(),
        }
    }

    /// WASD rally-car bindings plus vertical wheel as fine throttle trim.
    pub fn car() -> Self {
        Self {
            keys: vec![
                key(Key::W, "throttle", 1.0),
                key(Key::S, "brake", 1.0),
                key(Key::A, "steer_left", 1.0),
                key(Key::D, "steer_right", 1.0),
                key(Key::Shift, "handbrake", 1.0),
            ],
            wheels: vec![wheel(WheelAxis::Y, "throttle", 0.1)],
        }
    }

    /// Thrust on W, pitch on arrows, yaw on A/D, roll on Q/E.
    pub fn airplane() -> Self {
        Self {
            keys: vec![
                key(Key::W, "thrust", 1.0),
                key(Key::Up, "pitch_down", 1.0),
                key(Key::Down, "pitch_up", 1.0),
                key(Key::A, "yaw_left", 1.0),
                key(Key::D, "yaw_right", 1.0),
                key(Key::Q, "roll_left", 1.0),
                key(Key::E, "roll_right", 1.0),
            ],
            wheels: vec![wheel(WheelAxis::Y, "thrust", 0.05)],
        }
    }

    /// Walk/turn/jump bindings with shift as a run modifier.
    pub fn character() -> Self {
        Self {
            keys: vec![
                key(Key::W, "move_forward", 1.0),
                key(Key::S, "move_back", 1.0),
                key(Key::A, "turn_left", 1.0),
                key(Key::D, "turn_right", 1.0),
                key(Key::Space, "jump", 1.0),
                key(Key::Shift, "run", 1.0),
            ],
            wheels: Vec::new(),
        }
    }

    /// Apply the mapping to a snapshot, **replacing** `actions` with the
    /// result. Bindings that share an action name accumulate. `sensitivity`
    /// scales every contribution uniformly.
    pub fn apply(&self, raw: &RawInput, actions: &mut FxHashMap<String, f32>, sensitivity: f32) {
        actions.clear();
        for binding in &self.keys {
            if raw.is_down(binding.key) {
                *actions.entry(binding.action.clone()).or_insert(0.0) +=
                    binding.scale * sensitivity;
            }
        }
        for binding in &self.wheels {
            let delta = match binding.axis {
                WheelAxis::X => raw.wheel_x,
                WheelAxis::Y => raw.wheel_y,
            };
            if delta != 0.0 {
                *actions.entry(binding.action.clone()).or_insert(0.0) +=
                    delta * binding.sensitivity * sensitivity;
            }
        }
    }
}

fn key(key: Key, action: &str, scale: f32) -> KeyBinding {
    KeyBinding {
        key,
        action: action.to_string(),
        scale,
    }
}

fn wheel(axis: WheelAxis, action: &str, sensitivity: f32) -> WheelBinding {
    WheelBinding {
        axis,
        action: action.to_string(),
        sensitivity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::rawinput::RawInputHub;

    fn snapshot(keys: &[Key]) -> RawInput {
        let mut hub = RawInputHub::new();
        for &k in keys {
            hub.set_key(k, true);
        }
        hub.sample()
    }

    #[test]
    fn car_preset_maps_wasd() {
        let mapping = InputMapping::car();
        let mut actions = FxHashMap::default();
        mapping.apply(&snapshot(&[Key::W, Key::D]), &mut actions, 1.0);
        assert_eq!(actions.get("throttle"), Some(&1.0));
        assert_eq!(actions.get("steer_right"), Some(&1.0));
        assert!(actions.get("steer_left").is_none());
    }

    #[test]
    fn apply_replaces_previous_actions() {
        let mapping = InputMapping::car();
        let mut actions = FxHashMap::default();
        actions.insert("stale".to_string(), 1.0);
        mapping.apply(&snapshot(&[Key::A]), &mut actions, 1.0);
        assert!(actions.get("stale").is_none());
        assert_eq!(actions.get("steer_left"), Some(&1.0));
    }

    #[test]
    fn wheel_binding_scales_by_sensitivity() {
        let mapping = InputMapping::car();
        let mut hub = RawInputHub::new();
        hub.add_wheel(0.0, 10.0);
        let snap = hub.sample();
        let mut actions = FxHashMap::default();
        mapping.apply(&snap, &mut actions, 1.0);
        // 10.0 delta * 0.1 wheel sensitivity
        assert!((actions.get("throttle").copied().unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn sensitivity_scales_key_contributions() {
        let mapping = InputMapping::character();
        let mut actions = FxHashMap::default();
        mapping.apply(&snapshot(&[Key::W]), &mut actions, 0.5);
        assert_eq!(actions.get("move_forward"), Some(&0.5));
    }

    #[test]
    fn quiescent_snapshot_yields_empty_actions() {
        let mapping = InputMapping::airplane();
        let mut actions = FxHashMap::default();
        actions.insert("thrust".to_string(), 1.0);
        mapping.apply(&snapshot(&[]), &mut actions, 1.0);
        assert!(actions.is_empty());
    }
}
