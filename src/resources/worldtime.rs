//! Simulation clock resource.

use bevy_ecs::prelude::Resource;

/// Fixed-step simulation time. `advance` is called once per tick, before the
/// schedule runs.
#[derive(Resource, Clone, Copy, Debug)]
pub struct SimClock {
    /// Total simulated time in seconds.
    pub elapsed: f32,
    /// Duration of the current tick in seconds.
    pub dt: f32,
    /// Number of completed ticks.
    pub tick: u64,
}

impl Default for SimClock {
    fn default() -> Self {
        SimClock {
            elapsed: 0.0,
            dt: 0.0,
            tick: 0,
        }
    }
}

impl SimClock {
    pub fn advance(&mut self, dt: f32) {
        self.dt = dt;
        self.elapsed += dt;
        self.tick += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates() {
        let mut clock = SimClock::default();
        clock.advance(0.5);
        clock.advance(0.25);
        assert_eq!(clock.tick, 2);
        assert_eq!(clock.dt, 0.25);
        assert!((clock.elapsed - 0.75).abs() < 1e-6);
    }
}
