//! Messages exchanged across systems.
//!
//! Submodules:
//! - [`collision`] – contact-begin notifications from the physics step

pub mod collision;
