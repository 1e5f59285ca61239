//! Per-tick input sampling.

use bevy_ecs::prelude::NonSendMut;

use crate::resources::rawinput::InputHubRes;

/// Take this tick's hardware snapshot. Runs first in the schedule so every
/// input transformer's accessor sees the same snapshot for the whole tick.
pub fn sample_raw_input(hub: NonSendMut<InputHubRes>) {
    hub.0.borrow_mut().sample();
}
