//! Butterfly behavior stage.
//!
//! Upward flutter pulses on a wing-beat oscillator plus a small seeded
//! lateral drift. The drift uses a per-instance seeded RNG, so two
//! butterflies with the same seed fly identical paths given the same tick
//! sequence.

use glam::Vec3;

use crate::transformers::config::ButterflyParams;
use crate::transformers::{TransformInput, TransformOutput, Transformer, nonzero};

pub struct ButterflyTransformer {
    priority: i32,
    enabled: bool,
    params: ButterflyParams,
    phase: f32,
    rng: fastrand::Rng,
}

impl ButterflyTransformer {
    pub fn new(params: ButterflyParams) -> Self {
        let rng = fastrand::Rng::with_seed(params.seed);
        Self {
            priority: params.priority,
            enabled: params.enabled,
            params,
            phase: 0.0,
            rng,
        }
    }
}

impl Transformer for ButterflyTransformer {
    fn name(&self) -> &'static str {
        "butterfly"
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

    fn transform(&mut self, _input: &mut TransformInput, dt: f32) -> TransformOutput {
        let p = &self.params;
        self.phase += dt * p.flutter_frequency * std::f32::consts::TAU;

        // Wings only push on the downstroke.
        let beat = self.phase.sin().max(0.0);
        let mut force = Vec3::Y * (beat * p.flutter_force);

        let drift = Vec3::new(self.rng.f32() - 0.5, 0.0, self.rng.f32() - 0.5);
        force += drift * p.drift_force;

        TransformOutput {
            force: nonzero(force),
            ..TransformOutput::none()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fly(seed: u64, ticks: usize) -> Vec<TransformOutput> {
        let mut butterfly = ButterflyTransformer::new(ButterflyParams {
            seed,
            ..ButterflyParams::default()
        });
        let dt = 1.0 / 60.0;
        (0..ticks)
            .map(|_| {
                let mut input = TransformInput::new("butterfly", dt);
                butterfly.transform(&mut input, dt)
            })
            .collect()
    }

    #[test]
    fn same_seed_same_flight() {
        assert_eq!(fly(42, 60), fly(42, 60));
    }

    #[test]
    fn different_seeds_diverge() {
        assert_ne!(fly(1, 60), fly(2, 60));
    }

    #[test]
    fn flutter_never_pushes_down() {
        for out in fly(7, 120) {
            if let Some(force) = out.force {
                // Vertical component comes only from the downstroke pulse.
                assert!(force.y >= 0.0);
            }
        }
    }
}
