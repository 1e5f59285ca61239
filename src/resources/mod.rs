//! ECS resources: simulation-wide shared state.
//!
//! Submodules overview:
//! - [`actuation`] – per-tick queue of merged transformer outputs
//! - [`entityindex`] – string id to ECS entity index
//! - [`mappings`] – key/wheel to semantic action mapping presets
//! - [`physics`] – rigid-body simulation adapter
//! - [`rawinput`] – raw device input hub and per-tick snapshots
//! - [`simconfig`] – INI-backed simulation settings
//! - [`worldtime`] – fixed-step simulation clock

pub mod actuation;
pub mod entityindex;
pub mod mappings;
pub mod physics;
pub mod rawinput;
pub mod simconfig;
pub mod worldtime;
