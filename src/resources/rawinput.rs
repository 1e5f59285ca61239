//! Raw hardware input snapshots.
//!
//! The simulation core does not own keyboard or wheel event listeners; the
//! host (window layer, editor shell, or a test harness) feeds key state and
//! wheel deltas into a [`RawInputHub`] and the session samples it once per
//! tick into a [`RawInput`] snapshot. Input transformers receive the snapshot
//! through an injected zero-argument accessor, so they never touch the hub
//! directly.
//!
//! Wheel deltas accumulate between samples and are drained the moment a
//! snapshot is taken, giving at-most-once delivery per tick.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Fixed set of keys the simulation understands.
///
/// The host maps its own scancodes/keycodes onto this set before feeding the
/// hub; anything outside it is not representable on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    R,
    F,
    Shift,
    Space,
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    pub const COUNT: usize = 14;

    fn index(self) -> usize {
        self as usize
    }
}

/// Hardware snapshot for one tick: key booleans plus the wheel deltas
/// accumulated since the previous sample.
#[derive(Debug, Clone, Default)]
pub struct RawInput {
    keys: [bool; Key::COUNT],
    /// Horizontal wheel/trackpad delta since the last sample.
    pub wheel_x: f32,
    /// Vertical wheel/trackpad delta since the last sample.
    pub wheel_y: f32,
}

impl RawInput {
    /// Whether `key` was held when the snapshot was taken.
    pub fn is_down(&self, key: Key) -> bool {
        self.keys[key.index()]
    }
}

/// Accumulator the host writes into and the session samples from.
///
/// Key state is level-triggered (latest write wins); wheel deltas accumulate
/// and are reset to zero by [`RawInputHub::sample`].
#[derive(Debug, Default)]
pub struct RawInputHub {
    keys: [bool; Key::COUNT],
    wheel_x: f32,
    wheel_y: f32,
    latest: Option<RawInput>,
}

impl RawInputHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for the shared handle the session hands out.
    pub fn shared() -> SharedInputHub {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Record the current pressed state of a key.
    pub fn set_key(&mut self, key: Key, down: bool) {
        self.keys[key.index()] = down;
    }

    /// Accumulate a wheel/trackpad delta. Drained on the next sample.
    pub fn add_wheel(&mut self, dx: f32, dy: f32) {
        self.wheel_x += dx;
        self.wheel_y += dy;
    }

    /// Take the per-tick snapshot: copies key state, drains wheel deltas, and
    /// stores the result as the latest snapshot for accessors.
    pub fn sample(&mut self) -> RawInput {
        let snapshot = RawInput {
            keys: self.keys,
            wheel_x: self.wheel_x,
            wheel_y: self.wheel_y,
        };
        self.wheel_x = 0.0;
        self.wheel_y = 0.0;
        self.latest = Some(snapshot.clone());
        snapshot
    }

    /// The snapshot taken by the most recent [`sample`](Self::sample), if any.
    ///
    /// `None` until the first sample; input transformers treat `None` as "no
    /// input available" and clear their action set.
    pub fn latest(&self) -> Option<RawInput> {
        self.latest.clone()
    }
}

/// Shared handle to a [`RawInputHub`]. Single-threaded by design; the tick
/// driver and the host feed run on the same thread.
pub type SharedInputHub = Rc<RefCell<RawInputHub>>;

/// Build the zero-argument accessor an input transformer is constructed with.
pub fn input_accessor(hub: &SharedInputHub) -> Box<dyn Fn() -> Option<RawInput>> {
    let hub = Rc::clone(hub);
    Box::new(move || hub.borrow().latest())
}

/// Non-send resource wrapper so the hub can live in the ECS world.
pub struct InputHubRes(pub SharedInputHub);
