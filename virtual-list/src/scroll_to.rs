use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::key::ListKey;
use crate::{HeightCache, Items, ResolvedAlign, ScrollAlign, ScrollToError, Viewport};

/// Number of convergence passes before a scroll-to request is abandoned.
pub const MAX_SCROLL_TO_ATTEMPTS: u32 = 10;

/// A positional scroll-to request.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollTarget<K> {
    Index {
        index: usize,
        align: ScrollAlign,
        offset: i64,
    },
    Key {
        key: K,
        align: ScrollAlign,
        offset: i64,
    },
}

impl<K> ScrollTarget<K> {
    pub fn index(index: usize) -> Self {
        Self::Index {
            index,
            align: ScrollAlign::Auto,
            offset: 0,
        }
    }

    pub fn key(key: K) -> Self {
        Self::Key {
            key,
            align: ScrollAlign::Auto,
            offset: 0,
        }
    }

    pub fn with_align(mut self, new_align: ScrollAlign) -> Self {
        match &mut self {
            Self::Index { align, .. } | Self::Key { align, .. } => *align = new_align,
        }
        self
    }

    /// Extra distance kept between the item and the aligned viewport edge.
    pub fn with_offset(mut self, new_offset: i64) -> Self {
        match &mut self {
            Self::Index { offset, .. } | Self::Key { offset, .. } => *offset = new_offset,
        }
        self
    }

    pub fn align(&self) -> ScrollAlign {
        match self {
            Self::Index { align, .. } | Self::Key { align, .. } => *align,
        }
    }

    pub fn offset(&self) -> i64 {
        match self {
            Self::Index { offset, .. } | Self::Key { offset, .. } => *offset,
        }
    }
}

/// Transient state of an in-flight scroll-to request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollToState {
    pub times_attempted: u32,
    pub target_index: usize,
    pub requested_offset: i64,
    pub origin_align: ScrollAlign,
    /// Set once an `Auto` request decided which edge to align to.
    pub resolved_align: Option<ResolvedAlign>,
    pub last_computed_top: Option<i64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollToStatus {
    Idle,
    Converging { times_attempted: u32 },
    Converged,
    /// Gave up after [`MAX_SCROLL_TO_ATTEMPTS`] passes; the offset stays where the last pass put it.
    Exhausted { attempts: u32 },
    Cancelled,
}

impl ScrollToStatus {
    pub fn is_converging(&self) -> bool {
        matches!(self, Self::Converging { .. })
    }

    pub fn as_error(&self) -> Option<ScrollToError> {
        match *self {
            Self::Exhausted { attempts } => Some(ScrollToError::ConvergenceExhausted { attempts }),
            Self::Cancelled => Some(ScrollToError::Cancelled),
            _ => None,
        }
    }
}

/// The outcome of one convergence pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollToTick {
    pub status: ScrollToStatus,
    /// The unclamped offset the host must apply (through its clamping setter), if any.
    pub scroll_top: Option<i64>,
}

impl ScrollToTick {
    fn idle(status: ScrollToStatus) -> Self {
        Self {
            status,
            scroll_top: None,
        }
    }
}

/// A shared flag that tears down convergence when the owning list goes away.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Drives the scroll offset until a target item is fully visible.
///
/// Heights of items around the target may be unknown until they are rendered, so a single
/// computation is not enough in general. The host calls [`ScrollToController::tick`] once per
/// render cycle (after measuring), applies the returned offset, and keeps ticking while the
/// status is [`ScrollToStatus::Converging`].
///
/// A clone carries the in-flight request but gets its own [`CancelToken`], so cancelling one
/// instance never tears down another.
#[derive(Debug, Default)]
pub struct ScrollToController {
    state: Option<ScrollToState>,
    cancel: CancelToken,
}

impl Clone for ScrollToController {
    fn clone(&self) -> Self {
        let cancel = CancelToken::new();
        if self.cancel.is_cancelled() {
            cancel.cancel();
        }
        Self {
            state: self.state,
            cancel,
        }
    }
}

impl ScrollToController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Option<&ScrollToState> {
        self.state.as_ref()
    }

    pub fn is_converging(&self) -> bool {
        self.state.is_some()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Cancels the controller for good. Later ticks report [`ScrollToStatus::Cancelled`].
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        self.state = None;
    }

    /// Drops the in-flight request, if any, without cancelling the controller.
    pub fn abort(&mut self) {
        if self.state.take().is_some() {
            vtrace!("ScrollToController::abort");
        }
    }

    /// Starts a new request, replacing any in-flight one.
    ///
    /// A key that is not in `items` is reported as [`ScrollToError::InvalidTarget`] and leaves the
    /// controller untouched.
    pub fn request<T, F, K>(
        &mut self,
        target: ScrollTarget<K>,
        items: &Items<'_, T, F>,
    ) -> Result<(), ScrollToError>
    where
        F: Fn(&T) -> K,
        K: ListKey,
    {
        if self.cancel.is_cancelled() {
            vwarn!("scroll_to requested on a cancelled controller");
            return Err(ScrollToError::Cancelled);
        }

        let align = target.align();
        let offset = target.offset();
        let index = match target {
            ScrollTarget::Index { index, .. } => index,
            ScrollTarget::Key { key, .. } => match items.position(&key) {
                Some(index) => index,
                None => {
                    vwarn!(len = items.len(), "scroll_to: key not found in data");
                    return Err(ScrollToError::InvalidTarget);
                }
            },
        };

        #[cfg(feature = "tracing")]
        if let Some(prev) = &self.state {
            vdebug!(
                prev_index = prev.target_index,
                next_index = index,
                "scroll_to: replacing in-flight request"
            );
        }

        self.state = Some(ScrollToState {
            times_attempted: 0,
            target_index: index,
            requested_offset: offset,
            origin_align: align,
            resolved_align: None,
            last_computed_top: None,
        });
        Ok(())
    }

    /// Runs one convergence pass against the current heights and viewport.
    pub fn tick<T, F, K>(
        &mut self,
        items: &Items<'_, T, F>,
        heights: &HeightCache<K>,
        item_height: u32,
        viewport: Viewport,
    ) -> ScrollToTick
    where
        F: Fn(&T) -> K,
        K: ListKey,
    {
        if self.cancel.is_cancelled() {
            self.state = None;
            return ScrollToTick::idle(ScrollToStatus::Cancelled);
        }
        let Some(mut state) = self.state else {
            return ScrollToTick::idle(ScrollToStatus::Idle);
        };

        // The first pass always asks for a second one so the result can be confirmed.
        let mut need_collect_height = state.times_attempted == 0;
        let mut resolved_align = state.resolved_align;
        let mut target_top: Option<i64> = None;

        if viewport.height == 0 {
            // Not laid out yet; try again next frame.
            need_collect_height = true;
        } else {
            let merged_align = state
                .resolved_align
                .map(ScrollAlign::from)
                .unwrap_or(state.origin_align);
            let height = viewport.height as i64;
            let offset = state.requested_offset;
            let last = state.target_index.min(items.len().saturating_sub(1));

            let (item_top, item_bottom) = item_edges(items, heights, item_height, last);

            if !items.is_empty()
                && has_unmeasured_in_window(items, heights, last, merged_align, height, offset)
            {
                need_collect_height = true;
            }

            match merged_align {
                ScrollAlign::Top => target_top = Some(item_top.saturating_sub(offset)),
                ScrollAlign::Bottom => {
                    target_top = Some(item_bottom.saturating_sub(height).saturating_add(offset))
                }
                ScrollAlign::Auto => {
                    let scroll_top = to_i64(viewport.scroll_top);
                    let scroll_bottom = scroll_top.saturating_add(height);
                    if item_top < scroll_top {
                        resolved_align = Some(ResolvedAlign::Top);
                    } else if item_bottom > scroll_bottom {
                        resolved_align = Some(ResolvedAlign::Bottom);
                    }
                }
            }

            if target_top != state.last_computed_top {
                need_collect_height = true;
            }
        }

        if !need_collect_height {
            vdebug!(
                index = state.target_index,
                passes = state.times_attempted,
                "scroll_to: converged"
            );
            self.state = None;
            return ScrollToTick {
                status: ScrollToStatus::Converged,
                scroll_top: target_top,
            };
        }

        state.times_attempted += 1;
        state.resolved_align = resolved_align;
        state.last_computed_top = target_top;
        vtrace!(
            index = state.target_index,
            times_attempted = state.times_attempted,
            target_top = ?target_top,
            "scroll_to: pass"
        );

        if state.times_attempted >= MAX_SCROLL_TO_ATTEMPTS {
            vwarn!(
                index = state.target_index,
                attempts = state.times_attempted,
                "scroll_to reached the max attempts without converging"
            );
            self.state = None;
            return ScrollToTick {
                status: ScrollToStatus::Exhausted {
                    attempts: state.times_attempted,
                },
                scroll_top: target_top,
            };
        }

        self.state = Some(state);
        ScrollToTick {
            status: ScrollToStatus::Converging {
                times_attempted: state.times_attempted,
            },
            scroll_top: target_top,
        }
    }
}

/// Top and bottom edge of the item at `last`, walking from index 0.
fn item_edges<T, F, K>(
    items: &Items<'_, T, F>,
    heights: &HeightCache<K>,
    item_height: u32,
    last: usize,
) -> (i64, i64)
where
    F: Fn(&T) -> K,
    K: ListKey,
{
    let mut item_top = 0u64;
    let mut item_bottom = 0u64;
    for key in items.keys().take(last.saturating_add(1)) {
        item_top = item_bottom;
        let height = heights.get(&key).unwrap_or(item_height);
        item_bottom = item_top.saturating_add(height as u64);
    }
    (to_i64(item_top), to_i64(item_bottom))
}

/// Whether any item between the target and the aligned viewport edge lacks a measured height.
fn has_unmeasured_in_window<T, F, K>(
    items: &Items<'_, T, F>,
    heights: &HeightCache<K>,
    last: usize,
    align: ScrollAlign,
    height: i64,
    offset: i64,
) -> bool
where
    F: Fn(&T) -> K,
    K: ListKey,
{
    let mut left_height = match align {
        ScrollAlign::Top => offset,
        ScrollAlign::Bottom | ScrollAlign::Auto => height.saturating_sub(offset),
    };
    for i in (0..=last).rev() {
        let Some(key) = items.key_at(i) else {
            break;
        };
        let Some(cached) = heights.get(&key) else {
            return true;
        };
        left_height = left_height.saturating_sub(cached as i64);
        if left_height <= 0 {
            break;
        }
    }
    false
}

fn to_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}
