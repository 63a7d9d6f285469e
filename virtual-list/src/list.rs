use crate::key::ListKey;
use crate::range::{RangeInputs, RangeMemo, compute_range, full_range, item_top, total_height};
use crate::{
    CancelToken, HeightCache, Items, ListOptions, ScrollInfo, ScrollTarget, ScrollToController,
    ScrollToError, ScrollToStatus, Viewport, VisibleRange,
};

/// An imperative scroll command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScrollRequest<K> {
    /// Briefly show the scrollbar without moving (the `scroll_to(None)` case).
    RevealScrollbar,
    Top(i64),
    Position { left: Option<i64>, top: Option<i64> },
    Target(ScrollTarget<K>),
}

impl<K> From<i64> for ScrollRequest<K> {
    fn from(top: i64) -> Self {
        Self::Top(top)
    }
}

impl<K> From<ScrollTarget<K>> for ScrollRequest<K> {
    fn from(target: ScrollTarget<K>) -> Self {
        Self::Target(target)
    }
}

impl<K> From<Option<ScrollTarget<K>>> for ScrollRequest<K> {
    fn from(target: Option<ScrollTarget<K>>) -> Self {
        target.map_or(Self::RevealScrollbar, Self::Target)
    }
}

/// What a [`ScrollRequest`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollEffect {
    /// The host should flash its scrollbar.
    RevealScrollbar,
    /// Offsets were applied immediately.
    Scrolled(ScrollInfo),
    /// A scroll-to request started; drive it with [`VirtualList::on_frame`].
    Converging,
}

/// One windowed list instance.
///
/// Owns the height cache, the scroll-to controller and the scroll offsets. The data itself stays
/// with the host and is passed in as [`Items`] on every call.
///
/// A typical frame:
/// 1. feed scroll/resize events (`on_native_scroll`, `sync_scroll_top`, `set_options`);
/// 2. call [`VirtualList::range`] and render `range.indices()` starting at `range.offset_top`;
/// 3. after layout, report heights with [`VirtualList::collect_heights`];
/// 4. call [`VirtualList::on_frame`] while a scroll-to is converging.
#[derive(Clone, Debug)]
pub struct VirtualList<K> {
    options: ListOptions,
    heights: HeightCache<K>,
    scroll_to: ScrollToController,
    memo: RangeMemo,
    data_generation: u64,
    offset_top: u64,
    offset_left: u64,
    scroll_height: u64,
    duplicate_key: Option<(usize, usize)>,
}

impl<K: ListKey> VirtualList<K> {
    pub fn new(options: ListOptions) -> Self {
        vdebug!(
            height = options.height,
            item_height = options.item_height,
            virtual_enabled = options.virtual_enabled,
            "VirtualList::new"
        );
        Self {
            offset_top: options.initial_scroll.y,
            offset_left: options.initial_scroll.x,
            options,
            heights: HeightCache::new(),
            scroll_to: ScrollToController::new(),
            memo: RangeMemo::new(),
            data_generation: 0,
            scroll_height: 0,
            duplicate_key: None,
        }
    }

    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ListOptions) {
        self.options = options;
        vtrace!(
            height = self.options.height,
            item_height = self.options.item_height,
            "VirtualList::set_options"
        );
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut ListOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn heights(&self) -> &HeightCache<K> {
        &self.heights
    }

    pub fn heights_mut(&mut self) -> &mut HeightCache<K> {
        &mut self.heights
    }

    pub fn scroll_to_controller(&self) -> &ScrollToController {
        &self.scroll_to
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.scroll_to.cancel_token()
    }

    pub fn data_generation(&self) -> u64 {
        self.data_generation
    }

    /// Whether windowing is requested and possible at all.
    pub fn is_virtual(&self) -> bool {
        self.options.virtual_enabled && self.options.height > 0 && self.options.item_height > 0
    }

    /// Whether windowing is actually needed for `items`: the estimated content overflows the
    /// viewport, or the list scrolls horizontally.
    pub fn in_virtual<T, F>(&self, items: &Items<'_, T, F>) -> bool
    where
        F: Fn(&T) -> K,
    {
        if !self.is_virtual() {
            return false;
        }
        let estimated = (self.options.item_height as u64).saturating_mul(items.len() as u64);
        estimated > self.options.height as u64 || self.options.scroll_width.is_some()
    }

    /// The range of items to mount for the current offsets.
    ///
    /// Memoized: repeated calls with unchanged inputs (offsets, heights revision, data generation,
    /// options) return the cached range.
    pub fn range<T, F>(&mut self, items: &Items<'_, T, F>) -> VisibleRange
    where
        F: Fn(&T) -> K,
    {
        let virtual_mode = self.in_virtual(items);
        let item_height = self.options.item_height;
        let viewport_height = self.options.height;
        let scroll_offset = if virtual_mode { self.offset_top } else { 0 };
        let inputs = RangeInputs {
            heights_revision: self.heights.revision(),
            data_generation: self.data_generation,
            data_len: items.len(),
            item_height,
            scroll_offset,
            viewport_height,
            virtual_mode,
        };

        let heights = &self.heights;
        let range = self.memo.get_or_compute(inputs, || {
            if virtual_mode {
                compute_range(items, heights, item_height, scroll_offset, viewport_height)
            } else {
                full_range(items.len(), total_height(items, heights, item_height))
            }
        });
        self.scroll_height = range.scroll_height;
        range
    }

    /// The last range returned by [`VirtualList::range`].
    pub fn last_range(&self) -> Option<VisibleRange> {
        self.memo.last()
    }

    /// Top edge of the item at `index` as laid out with the current height cache.
    pub fn item_top<T, F>(&self, items: &Items<'_, T, F>, index: usize) -> Option<u64>
    where
        F: Fn(&T) -> K,
    {
        item_top(items, &self.heights, self.options.item_height, index)
    }

    pub fn scroll_height(&self) -> u64 {
        self.scroll_height
    }

    pub fn max_scroll_top(&self) -> u64 {
        self.scroll_height.saturating_sub(self.options.height as u64)
    }

    pub fn max_scroll_left(&self) -> u64 {
        self.options
            .scroll_width
            .map_or(0, |w| w.saturating_sub(self.options.width) as u64)
    }

    pub fn keep_in_range(&self, top: i64) -> u64 {
        clamp_offset(top, self.max_scroll_top())
    }

    pub fn scroll_top(&self) -> u64 {
        self.offset_top
    }

    pub fn scroll_left(&self) -> u64 {
        self.offset_left
    }

    pub fn scroll_info(&self) -> ScrollInfo {
        ScrollInfo {
            x: self.offset_left,
            y: self.offset_top,
        }
    }

    /// Applies a vertical offset, clamped to `[0, max_scroll_top]`. Returns the applied offset.
    pub fn sync_scroll_top(&mut self, top: i64) -> u64 {
        let aligned = self.keep_in_range(top);
        if aligned != self.offset_top {
            self.offset_top = aligned;
            self.notify_scroll();
        }
        aligned
    }

    /// Applies a horizontal offset, clamped to `[0, max_scroll_left]`. Returns the applied offset.
    pub fn sync_scroll_left(&mut self, left: i64) -> u64 {
        let aligned = clamp_offset(left, self.max_scroll_left());
        if aligned != self.offset_left {
            self.offset_left = aligned;
            self.notify_scroll();
        }
        aligned
    }

    /// The host's scroll container reported a native scroll.
    pub fn on_native_scroll(&mut self, top: u64) -> u64 {
        let top = i64::try_from(top).unwrap_or(i64::MAX);
        self.sync_scroll_top(top)
    }

    pub fn is_scroll_at_top(&self) -> bool {
        self.offset_top == 0
    }

    pub fn is_scroll_at_bottom(&self) -> bool {
        self.offset_top >= self.max_scroll_top()
    }

    pub fn is_scroll_at_left(&self) -> bool {
        self.offset_left == 0
    }

    pub fn is_scroll_at_right(&self) -> bool {
        self.offset_left >= self.max_scroll_left()
    }

    /// Executes a scroll command.
    ///
    /// Plain offsets apply immediately and drop any in-flight scroll-to. Positional targets start
    /// a convergence that [`VirtualList::on_frame`] drives. Errors are non-fatal and leave the
    /// offsets untouched.
    pub fn scroll_to<T, F>(
        &mut self,
        request: impl Into<ScrollRequest<K>>,
        items: &Items<'_, T, F>,
    ) -> Result<ScrollEffect, ScrollToError>
    where
        F: Fn(&T) -> K,
    {
        match request.into() {
            ScrollRequest::RevealScrollbar => Ok(ScrollEffect::RevealScrollbar),
            ScrollRequest::Top(top) => {
                self.scroll_to.abort();
                self.sync_scroll_top(top);
                Ok(ScrollEffect::Scrolled(self.scroll_info()))
            }
            ScrollRequest::Position { left, top } => {
                self.scroll_to.abort();
                if let Some(left) = left {
                    self.sync_scroll_left(left);
                }
                if let Some(top) = top {
                    self.sync_scroll_top(top);
                }
                Ok(ScrollEffect::Scrolled(self.scroll_info()))
            }
            ScrollRequest::Target(target) => {
                self.scroll_to.request(target, items)?;
                Ok(ScrollEffect::Converging)
            }
        }
    }

    /// Runs one scroll-to convergence pass (call after heights of the last render were collected).
    pub fn on_frame<T, F>(&mut self, items: &Items<'_, T, F>) -> ScrollToStatus
    where
        F: Fn(&T) -> K,
    {
        if !self.scroll_to.is_converging() {
            return self.scroll_to.tick(items, &self.heights, 0, Viewport::default()).status;
        }

        // Refresh the scroll height so clamping sees the latest measurements.
        self.range(items);
        let viewport = Viewport {
            height: self.options.height,
            scroll_top: self.offset_top,
        };
        let tick = self
            .scroll_to
            .tick(items, &self.heights, self.options.item_height, viewport);
        if let Some(top) = tick.scroll_top {
            self.sync_scroll_top(top);
        }
        tick.status
    }

    /// Stores one measured height, unconditionally.
    ///
    /// This bypasses start-item anchoring; use [`VirtualList::collect_heights`] for post-render
    /// batches.
    pub fn record_height(&mut self, key: K, height: u32) {
        self.heights.set(key, height);
        self.heights.reset_changes();
    }

    /// Stores a batch of post-render measurements. Returns how many heights changed.
    ///
    /// Only heights that differ from the cache are written. When exactly one item was measured
    /// for the first time and it is the partially scrolled-out start item, the scroll offset is
    /// shifted by the difference to the estimate so the rows below it stay put.
    pub fn collect_heights<T, F>(
        &mut self,
        items: &Items<'_, T, F>,
        measurements: impl IntoIterator<Item = (K, u32)>,
    ) -> usize
    where
        F: Fn(&T) -> K,
    {
        let mut changed = 0usize;
        for (key, height) in measurements {
            if self.heights.get(&key) != Some(height) {
                self.heights.set(key, height);
                changed += 1;
            }
        }
        if changed > 0 {
            self.anchor_start_item(items);
        }
        self.heights.reset_changes();
        changed
    }

    fn anchor_start_item<T, F>(&mut self, items: &Items<'_, T, F>)
    where
        F: Fn(&T) -> K,
    {
        if self.heights.changed_len() != 1 {
            return;
        }
        let Some(rendered) = self.memo.last() else {
            return;
        };
        if rendered.offset_top >= self.offset_top {
            return;
        }
        let Some(start_key) = items.key_at(rendered.start_index) else {
            return;
        };
        let Some((key, prev)) = self.heights.changes().next() else {
            return;
        };
        if prev.is_some() || *key != start_key {
            return;
        }
        let Some(real) = self.heights.get(&start_key) else {
            return;
        };

        let diff = real as i64 - self.options.item_height as i64;
        if diff == 0 {
            return;
        }
        vtrace!(index = rendered.start_index, diff, "anchor start item");
        self.range(items);
        let top = i64::try_from(self.offset_top).unwrap_or(i64::MAX);
        self.sync_scroll_top(top.saturating_add(diff));
    }

    /// Call when the host swapped its data slice.
    pub fn on_data_changed<T, F>(&mut self, items: &Items<'_, T, F>)
    where
        F: Fn(&T) -> K,
    {
        self.data_generation = self.data_generation.wrapping_add(1);
        vtrace!(generation = self.data_generation, len = items.len(), "on_data_changed");

        if self.options.prune_stale_heights {
            self.heights.retain_keys(items);
        }
        // Writes through `heights_mut` since the last batch must not anchor against new data.
        self.heights.reset_changes();

        self.duplicate_key = None;
        #[cfg(debug_assertions)]
        if self.options.check_duplicate_keys {
            self.duplicate_key = items.find_duplicate_key();
            if let Some((first, second)) = self.duplicate_key {
                vwarn!(
                    first,
                    second,
                    "duplicate item key: these items will share one cached height"
                );
                debug_assert!(first < second);
            }
        }
    }

    /// The first duplicate key pair found by the last debug-build check, if any.
    pub fn duplicate_key(&self) -> Option<(usize, usize)> {
        self.duplicate_key
    }

    /// Tears the instance down: any in-flight scroll-to stops and later ticks report
    /// [`ScrollToStatus::Cancelled`].
    pub fn unmount(&mut self) {
        vdebug!("VirtualList::unmount");
        self.scroll_to.cancel();
    }

    fn notify_scroll(&self) {
        if let Some(cb) = &self.options.on_scroll {
            cb(self.scroll_info());
        }
    }
}

fn clamp_offset(value: i64, max: u64) -> u64 {
    u64::try_from(value).unwrap_or(0).min(max)
}
