//! Per-tick actuation queue.
//!
//! Buffers merged transformer outputs between chain execution and the
//! physics step. Queuing the same entity twice in one tick merges
//! component-wise, matching how stages within a chain combine.

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;

use crate::transformers::TransformOutput;

#[derive(Resource, Default)]
pub struct ActuationQueue {
    pending: FxHashMap<String, TransformOutput>,
}

impl ActuationQueue {
    /// Queue an entity's merged chain output for the next step.
    pub fn queue(&mut self, entity_id: &str, output: TransformOutput) {
        if output.is_empty() {
            return;
        }
        match self.pending.get_mut(entity_id) {
            Some(existing) => existing.merge(&output),
            None => {
                self.pending.insert(entity_id.to_string(), output);
            }
        }
    }

    /// Take everything queued this tick, leaving the queue empty.
    pub fn drain(&mut self) -> impl Iterator<Item = (String, TransformOutput)> {
        std::mem::take(&mut self.pending).into_iter()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
