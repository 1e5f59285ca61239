//! Ordered transformer chain for one entity.
//!
//! Stages execute in ascending priority order over the same mutable
//! [`TransformInput`]; outputs are summed component-wise. A stage returning
//! `early_exit` halts the chain immediately and the accumulated output so far
//! is returned; later stages do not run at all.

use crate::transformers::{TransformInput, TransformOutput, Transformer};

/// The ordered set of transformers belonging to one entity.
#[derive(Default)]
pub struct TransformerChain {
    stages: Vec<Box<dyn Transformer>>,
}

impl TransformerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage and re-sort by ascending priority. The sort is stable:
    /// equal priorities preserve insertion order.
    pub fn add(&mut self, stage: Box<dyn Transformer>) {
        self.stages.push(stage);
        self.stages.sort_by_key(|s| s.priority());
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Enable or disable every stage with the given name. Returns true when
    /// at least one stage matched.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        let mut found = false;
        for stage in &mut self.stages {
            if stage.name() == name {
                stage.set_enabled(enabled);
                found = true;
            }
        }
        found
    }

    /// Run enabled stages in priority order, merging their outputs.
    ///
    /// Disabled stages are skipped entirely; they neither read nor write
    /// `input`. An `early_exit` output stops execution immediately.
    pub fn execute(&mut self, input: &mut TransformInput, dt: f32) -> TransformOutput {
        let mut merged = TransformOutput::none();
        for stage in &mut self.stages {
            if !stage.enabled() {
                continue;
            }
            let out = stage.transform(input, dt);
            merged.merge(&out);
            if out.early_exit {
                break;
            }
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    /// Test stage that records its execution order in the shared input's
    /// action map and emits a fixed force.
    struct Probe {
        name: &'static str,
        priority: i32,
        enabled: bool,
        force: Vec3,
        early_exit: bool,
    }

    impl Probe {
        fn new(name: &'static str, priority: i32, force: Vec3) -> Self {
            Self {
                name,
                priority,
                enabled: true,
                force,
                early_exit: false,
            }
        }
    }

    impl Transformer for Probe {
        fn name(&self) -> &'static str {
            self.name
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
            let order = input.actions.len() as f32;
            input.actions.insert(self.name.to_string(), order);
            TransformOutput {
                force: Some(self.force),
                early_exit: self.early_exit,
                ..TransformOutput::none()
            }
        }
    }

    fn run(chain: &mut TransformerChain) -> (TransformInput, TransformOutput) {
        let mut input = TransformInput::new("e1", 1.0 / 60.0);
        let out = chain.execute(&mut input, 1.0 / 60.0);
        (input, out)
    }

    #[test]
    fn executes_in_priority_order_regardless_of_insertion() {
        let mut chain = TransformerChain::new();
        chain.add(Box::new(Probe::new("late", 10, Vec3::ZERO)));
        chain.add(Box::new(Probe::new("early", 0, Vec3::ZERO)));
        let (input, _) = run(&mut chain);
        assert_eq!(input.action("early"), 0.0);
        assert_eq!(input.action("late"), 1.0);
        assert_eq!(chain.stage_names(), vec!["early", "late"]);
    }

    #[test]
    fn equal_priorities_preserve_insertion_order() {
        let mut chain = TransformerChain::new();
        chain.add(Box::new(Probe::new("first", 5, Vec3::ZERO)));
        chain.add(Box::new(Probe::new("second", 5, Vec3::ZERO)));
        chain.add(Box::new(Probe::new("third", 5, Vec3::ZERO)));
        let (input, _) = run(&mut chain);
        assert_eq!(input.action("first"), 0.0);
        assert_eq!(input.action("second"), 1.0);
        assert_eq!(input.action("third"), 2.0);
    }

    #[test]
    fn outputs_sum_componentwise() {
        let mut chain = TransformerChain::new();
        chain.add(Box::new(Probe::new("a", 0, Vec3::new(1.0, 0.0, 0.0))));
        chain.add(Box::new(Probe::new("b", 1, Vec3::new(0.0, 2.0, 0.0))));
        let (_, out) = run(&mut chain);
        assert_eq!(out.force, Some(Vec3::new(1.0, 2.0, 0.0)));
    }

    #[test]
    fn early_exit_halts_later_stages() {
        let mut chain = TransformerChain::new();
        let mut exiting = Probe::new("exit", 1, Vec3::Y);
        exiting.early_exit = true;
        chain.add(Box::new(Probe::new("a", 0, Vec3::X)));
        chain.add(Box::new(exiting));
        chain.add(Box::new(Probe::new("never", 2, Vec3::Z)));
        let (input, out) = run(&mut chain);
        // Sum of stages up to and including the exiting one.
        assert_eq!(out.force, Some(Vec3::new(1.0, 1.0, 0.0)));
        assert!(!input.actions.contains_key("never"));
    }

    #[test]
    fn disabled_stages_are_skipped_entirely() {
        let mut chain = TransformerChain::new();
        chain.add(Box::new(Probe::new("on", 0, Vec3::X)));
        chain.add(Box::new(Probe::new("off", 1, Vec3::Y)));
        assert!(chain.set_enabled("off", false));
        let (input, out) = run(&mut chain);
        assert_eq!(out.force, Some(Vec3::X));
        assert!(!input.actions.contains_key("off"));
    }

    #[test]
    fn set_enabled_reports_missing_stage() {
        let mut chain = TransformerChain::new();
        assert!(!chain.set_enabled("ghost", false));
    }
}
