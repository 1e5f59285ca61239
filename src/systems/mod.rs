//! ECS systems: the per-tick pipeline, in schedule order.
//!
//! Submodules overview:
//! - [`input`] – samples the raw input hub into this tick's snapshot
//! - [`collision`] – mailbox rotation and contact-begin publication
//! - [`transformers`] – runs every entity's chain, queues actuation
//! - [`physics_step`] – clears accumulators, applies actuation, steps
//! - [`pose_sync`] – copies post-step poses into render buffers

pub mod collision;
pub mod input;
pub mod physics_step;
pub mod pose_sync;
pub mod transformers;
