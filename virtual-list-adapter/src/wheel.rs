/// How long a boundary hit keeps wheel/touch deltas from propagating to the outer page.
pub const ORIGIN_SCROLL_LOCK_MS: u64 = 50;

/// Flushes since the last wheel event after which the gesture direction lock is released.
pub const WHEEL_DIRECTION_RELEASE_FRAMES: u8 = 2;

/// A raw wheel event as reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WheelEvent {
    pub delta_x: f64,
    pub delta_y: f64,
    /// Shift held: a purely vertical wheel scrolls horizontally.
    pub shift_key: bool,
}

impl WheelEvent {
    pub fn vertical(delta_y: f64) -> Self {
        Self {
            delta_y,
            ..Self::default()
        }
    }

    pub fn horizontal(delta_x: f64) -> Self {
        Self {
            delta_x,
            ..Self::default()
        }
    }

    pub fn with_shift(mut self, shift_key: bool) -> Self {
        self.shift_key = shift_key;
        self
    }
}

/// The axis a wheel gesture is locked to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelDirection {
    Y,
    X,
    /// A vertical wheel turned horizontal by the shift key.
    ShiftX,
}

impl WheelDirection {
    pub fn is_horizontal(self) -> bool {
        !matches!(self, Self::Y)
    }
}

/// Coalesces wheel deltas into at most one vertical offset update per frame.
///
/// The first event of a gesture locks its direction; later events of the same gesture are
/// routed to that axis until [`WHEEL_DIRECTION_RELEASE_FRAMES`] flushes pass without input.
/// Vertical deltas accumulate until [`FrameWheel::flush`]; horizontal ones are returned to the
/// caller to apply right away.
#[derive(Clone, Debug, Default)]
pub struct FrameWheel {
    direction: Option<WheelDirection>,
    idle_frames: u8,
    // Sub-pixel remainder carries over to the next flush.
    pending_y: f64,
    has_pending: bool,
}

impl FrameWheel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction(&self) -> Option<WheelDirection> {
        self.direction
    }

    pub fn has_pending(&self) -> bool {
        self.has_pending
    }

    /// Resolves the axis and delta for `event`, locking the gesture direction if needed.
    ///
    /// `horizontal_enabled` is whether the list scrolls horizontally at all.
    pub fn route(
        &mut self,
        event: WheelEvent,
        horizontal_enabled: bool,
    ) -> (WheelDirection, f64) {
        self.idle_frames = 0;

        let mut delta_x = event.delta_x;
        let mut delta_y = event.delta_y;

        let shift_to_x =
            self.direction.is_none() && event.shift_key && delta_y != 0.0 && delta_x == 0.0;
        if self.direction == Some(WheelDirection::ShiftX) || shift_to_x {
            delta_x = delta_y;
            delta_y = 0.0;
            self.direction = Some(WheelDirection::ShiftX);
        }

        let direction = *self.direction.get_or_insert_with(|| {
            if horizontal_enabled && abs(delta_x) > abs(delta_y) {
                WheelDirection::X
            } else {
                WheelDirection::Y
            }
        });

        match direction {
            WheelDirection::Y => (direction, delta_y),
            WheelDirection::X | WheelDirection::ShiftX => (direction, delta_x),
        }
    }

    /// Queues a vertical delta for the next flush.
    pub fn accumulate(&mut self, delta_y: f64) {
        self.pending_y += delta_y;
        self.has_pending = true;
    }

    /// Ends a frame: returns the whole-pixel vertical delta gathered since the last flush.
    pub fn flush(&mut self) -> Option<i64> {
        self.idle_frames = self.idle_frames.saturating_add(1);
        if self.idle_frames >= WHEEL_DIRECTION_RELEASE_FRAMES {
            self.direction = None;
        }

        if !self.has_pending {
            return None;
        }
        self.has_pending = false;

        let whole = trunc(self.pending_y);
        self.pending_y -= whole;
        let whole = whole as i64;
        (whole != 0).then_some(whole)
    }

    /// Drops queued deltas and the direction lock.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Decides whether a delta should scroll the outer page instead of the list.
///
/// A delta propagates only when the list already sits at the boundary in that direction and no
/// lock is active. Any delta the list consumes (or any boundary delta during a lock) arms the
/// lock for [`ORIGIN_SCROLL_LOCK_MS`], so a fast gesture that just reached the edge does not
/// spill into the page.
#[derive(Clone, Copy, Debug, Default)]
pub struct OriginScroll {
    locked_until: Option<u64>,
}

impl OriginScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self, now_ms: u64) -> bool {
        self.locked_until.is_some_and(|until| now_ms < until)
    }

    /// Returns `true` when `delta` should be left to the outer page.
    ///
    /// `smooth` marks momentum steps: those release the lock when they hit a boundary so the
    /// momentum can stop.
    pub fn should_propagate(
        &mut self,
        at_start: bool,
        at_end: bool,
        delta: f64,
        smooth: bool,
        now_ms: u64,
    ) -> bool {
        let at_boundary = (delta < 0.0 && at_start) || (delta > 0.0 && at_end);

        if smooth && at_boundary {
            self.locked_until = None;
        } else if !at_boundary || self.is_locked(now_ms) {
            self.locked_until = Some(now_ms.saturating_add(ORIGIN_SCROLL_LOCK_MS));
        }

        !self.is_locked(now_ms) && at_boundary
    }

    pub fn reset(&mut self) {
        self.locked_until = None;
    }
}

// `f64::{abs, trunc, ceil, round}` live in `std`; pixel deltas fit comfortably in an `i64`.
pub(crate) fn abs(v: f64) -> f64 {
    if v < 0.0 { -v } else { v }
}

pub(crate) fn trunc(v: f64) -> f64 {
    v as i64 as f64
}

pub(crate) fn ceil(v: f64) -> f64 {
    let t = trunc(v);
    if t < v { t + 1.0 } else { t }
}

pub(crate) fn round(v: f64) -> i64 {
    if v < 0.0 {
        (v - 0.5) as i64
    } else {
        (v + 0.5) as i64
    }
}
