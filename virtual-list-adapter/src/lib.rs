//! Adapter utilities for the `virtual-list` crate.
//!
//! The `virtual-list` crate is UI-agnostic and focuses on range math, the height cache and
//! scroll-to convergence. This crate provides small, framework-neutral helpers commonly needed
//! by hosts:
//!
//! - Wheel coalescing (one offset update per frame) with per-gesture direction locking
//! - Boundary propagation to the outer page
//! - Touch drag tracking with momentum
//! - Scrollbar thumb geometry and auto-hide
//! - Scroll anchoring (e.g. prepend in chat/timelines without visual jumps)
//!
//! Time is always passed in by the host as `now_ms`; nothing here reads a clock or spawns a
//! timer. This crate is intentionally framework-agnostic (no ratatui/egui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod anchor;
mod controller;
mod scrollbar;
mod touch;
mod wheel;


pub use anchor::{ScrollAnchor, apply_anchor, capture_first_visible_anchor};
pub use controller::{Controller, FrameOutput};
pub use scrollbar::{
    MIN_SPIN_SIZE, SCROLLBAR_HIDE_DELAY_MS, ScrollbarGeometry, ScrollbarMode, ScrollbarVisibility,
};
pub use touch::{
    MOMENTUM_DECAY, MOMENTUM_INTERVAL_MS, MOMENTUM_STOP_THRESHOLD, TouchDelta, TouchMomentum,
};
pub use wheel::{
    FrameWheel, ORIGIN_SCROLL_LOCK_MS, OriginScroll, WHEEL_DIRECTION_RELEASE_FRAMES,
    WheelDirection, WheelEvent,
};
