//! Input stage: raw hardware snapshot to semantic actions.
//!
//! The input transformer is stateless passthrough for actuation (it never
//! emits force or torque); its job is to make the chain's action set for the
//! tick. It reads the latest [`RawInput`] through an injected zero-argument
//! accessor and **overwrites** `input.actions` with the mapped result, so any
//! actions a previous tick left behind are dropped, not merged. When no
//! snapshot is available the action set is cleared to empty.

use crate::resources::mappings::InputMapping;
use crate::resources::rawinput::RawInput;
use crate::transformers::config::InputParams;
use crate::transformers::{TransformInput, TransformOutput, Transformer};

/// Zero-argument accessor returning the latest raw input snapshot, if any.
pub type RawInputSource = Box<dyn Fn() -> Option<RawInput>>;

pub struct InputTransformer {
    priority: i32,
    enabled: bool,
    mapping: InputMapping,
    sensitivity: f32,
    source: RawInputSource,
}

impl InputTransformer {
    pub fn new(params: &InputParams, source: RawInputSource) -> Self {
        let mapping = params
            .bindings
            .clone()
            .unwrap_or_else(|| InputMapping::preset(params.preset));
        Self {
            priority: params.priority,
            enabled: params.enabled,
            mapping,
            sensitivity: params.sensitivity,
            source,
        }
    }
}

impl Transformer for InputTransformer {
    fn name(&self) -> &'static str {
        "input"
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
        match (self.source)() {
            Some(raw) => self.mapping.apply(&raw, &mut input.actions, self.sensitivity),
            None => input.actions.clear(),
        }
        TransformOutput::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::rawinput::{Key, RawInputHub, input_accessor};

    fn params() -> InputParams {
        InputParams::default()
    }

    #[test]
    fn overwrites_actions_from_snapshot() {
        let hub = RawInputHub::shared();
        hub.borrow_mut().set_key(Key::W, true);
        hub.borrow_mut().sample();

        let mut stage = InputTransformer::new(&params(), input_accessor(&hub));
        let mut input = TransformInput::new("car", 1.0 / 60.0);
        input.actions.insert("stale".to_string(), 1.0);

        let out = stage.transform(&mut input, 1.0 / 60.0);
        assert!(out.is_empty());
        assert_eq!(input.action("throttle"), 1.0);
        assert_eq!(input.action("stale"), 0.0);
    }

    #[test]
    fn clears_actions_when_no_snapshot_available() {
        let mut stage = InputTransformer::new(&params(), Box::new(|| None));
        let mut input = TransformInput::new("car", 1.0 / 60.0);
        input.actions.insert("throttle".to_string(), 1.0);

        stage.transform(&mut input, 1.0 / 60.0);
        assert!(input.actions.is_empty());
    }

    #[test]
    fn explicit_bindings_override_preset() {
        let mut p = params();
        p.bindings = Some(InputMapping {
            keys: vec![crate::resources::mappings::KeyBinding {
                key: Key::F,
                action: "honk".to_string(),
                scale: 2.0,
            }],
            wheels: Vec::new(),
        });
        let hub = RawInputHub::shared();
        hub.borrow_mut().set_key(Key::F, true);
        hub.borrow_mut().sample();

        let mut stage = InputTransformer::new(&p, input_accessor(&hub));
        let mut input = TransformInput::new("car", 1.0 / 60.0);
        stage.transform(&mut input, 1.0 / 60.0);
        assert_eq!(input.action("honk"), 2.0);
    }
}
