use crate::wheel::{abs, ceil, trunc};

/// Interval between two momentum steps.
pub const MOMENTUM_INTERVAL_MS: u64 = 16;

/// Per-step decay of the momentum delta.
pub const MOMENTUM_DECAY: f64 = 14.0 / 15.0;

/// Momentum stops once a step moves by this much or less.
pub const MOMENTUM_STOP_THRESHOLD: f64 = 0.1;

/// A scroll delta produced by a touch drag or its momentum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchDelta {
    pub horizontal: bool,
    /// Positive values scroll towards the end (content moves up/left).
    pub delta: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Momentum {
    horizontal: bool,
    delta: f64,
    next_step_ms: u64,
}

/// Single-finger drag tracking with inertial follow-up.
///
/// Every move reports the finger travel since the previous move on its dominant axis. If the
/// host accepted that delta ([`TouchMomentum::arm`]), momentum keeps scrolling in the same
/// direction every [`MOMENTUM_INTERVAL_MS`], each step [`MOMENTUM_DECAY`] times the previous.
#[derive(Clone, Copy, Debug, Default)]
pub struct TouchMomentum {
    last: Option<(f64, f64)>,
    momentum: Option<Momentum>,
}

impl TouchMomentum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_touching(&self) -> bool {
        self.last.is_some()
    }

    pub fn has_momentum(&self) -> bool {
        self.momentum.is_some()
    }

    /// Starts tracking. Multi-touch and a second start while tracking are ignored.
    ///
    /// Returns whether tracking started. A new touch always stops running momentum.
    pub fn start(&mut self, x: f64, y: f64, touches: usize) -> bool {
        self.momentum = None;
        if touches != 1 || self.last.is_some() {
            return false;
        }
        self.last = Some((ceil(x), ceil(y)));
        true
    }

    /// Reports finger travel since the previous position on the dominant axis.
    ///
    /// Any running momentum is stopped; re-arm it with [`TouchMomentum::arm`] once the host
    /// accepted the delta.
    pub fn move_to(&mut self, x: f64, y: f64) -> Option<TouchDelta> {
        let (last_x, last_y) = self.last?;
        self.momentum = None;

        let x = ceil(x);
        let y = ceil(y);
        let delta_x = last_x - x;
        let delta_y = last_y - y;

        // Only the axis that moved is consumed; the other keeps accumulating.
        let horizontal = abs(delta_x) > abs(delta_y);
        if horizontal {
            self.last = Some((x, last_y));
            Some(TouchDelta {
                horizontal,
                delta: delta_x,
            })
        } else {
            self.last = Some((last_x, y));
            Some(TouchDelta {
                horizontal,
                delta: delta_y,
            })
        }
    }

    /// Continues `delta` as momentum, starting one interval after `now_ms`.
    pub fn arm(&mut self, delta: TouchDelta, now_ms: u64) {
        self.momentum = Some(Momentum {
            horizontal: delta.horizontal,
            delta: delta.delta,
            next_step_ms: now_ms.saturating_add(MOMENTUM_INTERVAL_MS),
        });
    }

    /// Stops tracking. Momentum armed by the last move keeps running.
    pub fn end(&mut self) {
        self.last = None;
    }

    pub fn stop_momentum(&mut self) {
        if self.momentum.take().is_some() {
            vtrace!("touch momentum stopped");
        }
    }

    /// Returns the next due momentum step, if any.
    ///
    /// Call in a loop until it returns `None`: several steps may be due when frames are slower
    /// than [`MOMENTUM_INTERVAL_MS`]. Momentum ends by itself once a step falls to
    /// [`MOMENTUM_STOP_THRESHOLD`]; the host ends it earlier with
    /// [`TouchMomentum::stop_momentum`] when it rejects a step.
    pub fn next_step(&mut self, now_ms: u64) -> Option<TouchDelta> {
        let momentum = self.momentum.as_mut()?;
        if now_ms < momentum.next_step_ms {
            return None;
        }

        momentum.delta *= MOMENTUM_DECAY;
        momentum.next_step_ms = momentum.next_step_ms.saturating_add(MOMENTUM_INTERVAL_MS);

        let step = trunc(momentum.delta);
        if abs(step) <= MOMENTUM_STOP_THRESHOLD {
            self.momentum = None;
            return None;
        }
        Some(TouchDelta {
            horizontal: momentum.horizontal,
            delta: step,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
