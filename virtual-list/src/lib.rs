//! A headless windowing core for very large, variable-height lists.
//!
//! Only the items intersecting the viewport (plus one item of lookahead) need to be mounted. This
//! crate decides which ones, remembers how tall each item turned out to be, and drives
//! "scroll to item" requests to convergence while heights are still being discovered.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - the data slice and a stable key accessor (see [`Items`])
//! - viewport size and scroll offset
//! - measured item heights after each render
//!
//! For host-side helpers (wheel coalescing, touch momentum, scrollbar, anchoring), see the
//! `virtual-list-adapter` crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod diff;
mod error;
mod height_cache;
mod key;
mod list;
mod options;
mod range;
mod scroll_to;
mod types;

#[cfg(test)]
mod tests;

pub use diff::{ListDiff, find_list_diff_index};
pub use error::ScrollToError;
pub use height_cache::HeightCache;
pub use key::{Items, ListKey};
pub use list::{ScrollEffect, ScrollRequest, VirtualList};
pub use options::{ListOptions, OnScrollCallback};
pub use range::{
    RangeInputs, RangeMemo, compute_range, full_range, item_top, total_height,
};
pub use scroll_to::{
    CancelToken, MAX_SCROLL_TO_ATTEMPTS, ScrollTarget, ScrollToController, ScrollToState,
    ScrollToStatus, ScrollToTick,
};
pub use types::{ResolvedAlign, ScrollAlign, ScrollInfo, Viewport, VisibleRange};
