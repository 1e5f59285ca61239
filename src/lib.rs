//! Diorama simulation library.
//!
//! Headless entity control and rigid-body simulation core: raw input becomes
//! semantic actions, per-entity transformer chains turn actions into forces
//! and torques, a fixed-step physics world integrates them, and render poses
//! plus collision messages come out the other side. Exposed as a library for
//! integration tests and for hosts that embed the session.

pub mod components;
pub mod events;
pub mod resources;
pub mod session;
pub mod systems;
pub mod transformers;
