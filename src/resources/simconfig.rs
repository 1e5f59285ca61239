//! Simulation configuration resource.
//!
//! Settings loaded from an INI configuration file, with defaults for safe
//! startup. Missing values keep their defaults.
//!
//! # Configuration File Format
//!
//! ```ini
//! [simulation]
//! fixed_dt = 0.016666668
//! chain_policy = partial
//!
//! [physics]
//! gravity_x = 0.0
//! gravity_y = -9.81
//! gravity_z = 0.0
//! ```

use bevy_ecs::prelude::Resource;
use configparser::ini::Ini;
use glam::Vec3;
use log::info;
use std::path::PathBuf;

use crate::transformers::factory::ChainPolicy;

/// Default safe values for startup
const DEFAULT_FIXED_DT: f32 = 1.0 / 60.0;
const DEFAULT_GRAVITY_Y: f32 = -9.81;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Simulation configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct SimConfig {
    /// Fixed timestep in seconds for every simulation tick.
    pub fixed_dt: f32,
    /// World gravity vector.
    pub gravity: Vec3,
    /// What to do when a transformer stage fails to construct.
    pub chain_policy: ChainPolicy,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            fixed_dt: DEFAULT_FIXED_DT,
            gravity: Vec3::new(0.0, DEFAULT_GRAVITY_Y, 0.0),
            chain_policy: ChainPolicy::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [simulation] section
        if let Some(dt) = config.getfloat("simulation", "fixed_dt").ok().flatten() {
            if dt > 0.0 {
                self.fixed_dt = dt as f32;
            }
        }
        if let Some(policy) = config.get("simulation", "chain_policy") {
            match policy.as_str() {
                "strict" => self.chain_policy = ChainPolicy::Strict,
                "partial" => self.chain_policy = ChainPolicy::Partial,
                other => {
                    return Err(format!("Unknown chain_policy value: {}", other));
                }
            }
        }

        // [physics] section
        if let Some(x) = config.getfloat("physics", "gravity_x").ok().flatten() {
            self.gravity.x = x as f32;
        }
        if let Some(y) = config.getfloat("physics", "gravity_y").ok().flatten() {
            self.gravity.y = y as f32;
        }
        if let Some(z) = config.getfloat("physics", "gravity_z").ok().flatten() {
            self.gravity.z = z as f32;
        }

        info!(
            "Loaded config: fixed_dt={}, gravity={:?}, chain_policy={:?}",
            self.fixed_dt, self.gravity, self.chain_policy
        );

        Ok(())
    }
}
