//! Diorama headless demo runner.
//!
//! Loads a world document (a JSON array of entity descriptors), runs the
//! simulation for a number of fixed ticks and prints the resulting poses and
//! collision pairs. Useful for smoke-testing world documents and transformer
//! chains without a renderer.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --world demos/worlds/playground.json --ticks 300
//! ```

mod components;
mod events;
mod resources;
mod session;
mod systems;
mod transformers;

use std::path::PathBuf;

use clap::Parser;
use glam::Vec3;

use crate::components::entitydesc::EntityDesc;
use crate::resources::rawinput::Key;
use crate::resources::simconfig::SimConfig;
use crate::session::SimSession;

/// Diorama headless simulation runner
#[derive(Parser)]
#[command(version, about = "Headless runner for diorama world documents")]
struct Cli {
    /// World document: a JSON array of entity descriptors.
    #[arg(long, value_name = "PATH", default_value = "demos/worlds/playground.json")]
    world: PathBuf,

    /// Number of fixed simulation ticks to run.
    #[arg(long, default_value_t = 300)]
    ticks: u32,

    /// Simulation settings INI file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Hold the throttle key for the whole run, as a stand-in for a host
    /// feeding real input.
    #[arg(long, default_value_t = false)]
    drive: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SimConfig::with_path(path.clone()),
        None => SimConfig::new(),
    };
    if cli.config.is_some() {
        if let Err(e) = config.load_from_file() {
            log::error!("{e}");
            std::process::exit(1);
        }
    } else {
        config.load_from_file().ok(); // optional ./config.ini, defaults otherwise
    }

    let doc = match std::fs::read_to_string(&cli.world) {
        Ok(doc) => doc,
        Err(e) => {
            log::error!("Failed to read world {}: {e}", cli.world.display());
            std::process::exit(1);
        }
    };
    let descs: Vec<EntityDesc> = match serde_json::from_str(&doc) {
        Ok(descs) => descs,
        Err(e) => {
            log::error!("Invalid world document {}: {e}", cli.world.display());
            std::process::exit(1);
        }
    };

    let fixed_dt = config.fixed_dt;
    let mut session = SimSession::new(config);
    for desc in descs {
        let id = desc.id.clone();
        if let Err(e) = session.add_entity(desc) {
            log::error!("Failed to add entity '{id}': {e}");
            std::process::exit(1);
        }
    }

    if cli.drive {
        session.input_hub().borrow_mut().set_key(Key::W, true);
    }

    log::info!(
        "Running {} ticks at dt={fixed_dt} over {}",
        cli.ticks,
        cli.world.display()
    );
    for _ in 0..cli.ticks {
        session.tick();
        for pair in session.collisions() {
            log::info!("collision: {} <-> {}", pair.a, pair.b);
        }
    }

    let mut poses: Vec<_> = session.all_poses().into_iter().collect();
    poses.sort_by(|a, b| a.0.cmp(&b.0));
    for (id, (position, rotation)) in poses {
        let (axis, angle) = rotation.to_axis_angle();
        let axis = if angle.abs() < 1e-6 { Vec3::Y } else { axis };
        println!(
            "{id}: pos=({:.3}, {:.3}, {:.3}) rot={:.3} rad about ({:.2}, {:.2}, {:.2})",
            position.x, position.y, position.z, angle, axis.x, axis.y, axis.z
        );
    }
}
