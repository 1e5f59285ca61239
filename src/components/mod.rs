//! ECS components for simulated entities.
//!
//! Submodules overview:
//! - [`entitydesc`] – static declarative description of one world entity
//! - [`rendermesh`] – render transform buffer and the physics-body marker

pub mod entitydesc;
pub mod rendermesh;
