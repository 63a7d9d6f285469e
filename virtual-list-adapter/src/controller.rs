use virtual_list::{
    Items, ListKey, ListOptions, ScrollEffect, ScrollInfo, ScrollRequest, ScrollToError,
    ScrollToStatus, VirtualList, VisibleRange,
};

use crate::wheel::round;
use crate::{
    FrameWheel, OriginScroll, ScrollAnchor, ScrollbarGeometry, ScrollbarMode, ScrollbarVisibility,
    TouchDelta, TouchMomentum, WheelDirection, WheelEvent, apply_anchor,
    capture_first_visible_anchor,
};

/// Everything the host needs to paint one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameOutput {
    /// Items to mount, positioned from `range.offset_top`.
    pub range: VisibleRange,
    pub scroll: ScrollInfo,
    /// Outcome of this frame's scroll-to pass.
    pub scroll_to: ScrollToStatus,
    pub scrollbar_visible: bool,
    pub scrollbar: ScrollbarGeometry,
    pub thumb_offset: u32,
    /// The host should schedule another tick even without new input.
    pub needs_frame: bool,
}

#[derive(Clone, Copy, Debug)]
struct ThumbDrag {
    pointer_start: i64,
    thumb_start: u32,
}

/// A framework-neutral controller that wraps a [`VirtualList`] with the input plumbing most
/// hosts need: wheel coalescing, touch momentum, boundary propagation and scrollbar state.
///
/// This type does not hold any UI objects or clocks. Adapters drive it by calling:
/// - `on_wheel` / `on_touch_*` / `on_native_scroll` / `on_thumb_drag_*` when UI events occur
/// - `tick(now_ms, items)` once per animation frame, then render `FrameOutput::range`
/// - `collect_heights` after the rendered rows were laid out
#[derive(Clone, Debug)]
pub struct Controller<K> {
    list: VirtualList<K>,
    wheel: FrameWheel,
    origin: OriginScroll,
    touch: TouchMomentum,
    scrollbar: ScrollbarVisibility,
    drag: Option<ThumbDrag>,
    last_scroll: ScrollInfo,
}

impl<K: ListKey> Controller<K> {
    pub fn new(options: ListOptions) -> Self {
        Self::from_list(VirtualList::new(options))
    }

    pub fn from_list(list: VirtualList<K>) -> Self {
        let last_scroll = list.scroll_info();
        Self {
            list,
            wheel: FrameWheel::new(),
            origin: OriginScroll::new(),
            touch: TouchMomentum::new(),
            scrollbar: ScrollbarVisibility::default(),
            drag: None,
            last_scroll,
        }
    }

    pub fn with_scrollbar_mode(mut self, mode: ScrollbarMode) -> Self {
        self.scrollbar.set_mode(mode);
        self
    }

    pub fn list(&self) -> &VirtualList<K> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut VirtualList<K> {
        &mut self.list
    }

    pub fn into_list(self) -> VirtualList<K> {
        self.list
    }

    pub fn scrollbar_geometry(&self) -> ScrollbarGeometry {
        ScrollbarGeometry::new(self.list.options().height, self.list.scroll_height())
    }

    pub fn is_animating(&self) -> bool {
        self.wheel.has_pending() || self.touch.has_momentum()
    }

    /// Handles a wheel event. Returns `true` when the list consumed it (the host should prevent
    /// the default page scroll), `false` when it should propagate.
    pub fn on_wheel<T, F>(
        &mut self,
        items: &Items<'_, T, F>,
        event: WheelEvent,
        now_ms: u64,
    ) -> bool
    where
        F: Fn(&T) -> K,
    {
        if !self.list.in_virtual(items) {
            return false;
        }
        let horizontal_enabled = self.list.options().scroll_width.is_some();
        let (direction, delta) = self.wheel.route(event, horizontal_enabled);
        vtrace!(?direction, delta, "on_wheel");

        match direction {
            WheelDirection::Y => {
                let at_top = self.list.is_scroll_at_top();
                let at_bottom = self.list.is_scroll_at_bottom();
                if self
                    .origin
                    .should_propagate(at_top, at_bottom, delta, false, now_ms)
                {
                    return false;
                }
                self.wheel.accumulate(delta);
            }
            WheelDirection::X | WheelDirection::ShiftX => self.scroll_left_by(delta),
        }
        true
    }

    pub fn on_touch_start(&mut self, x: f64, y: f64, touches: usize) -> bool {
        self.touch.start(x, y, touches)
    }

    /// Handles a touch move. Returns `true` when the list consumed the delta.
    pub fn on_touch_move<T, F>(
        &mut self,
        items: &Items<'_, T, F>,
        x: f64,
        y: f64,
        now_ms: u64,
    ) -> bool
    where
        F: Fn(&T) -> K,
    {
        let Some(delta) = self.touch.move_to(x, y) else {
            return false;
        };
        if !self.list.in_virtual(items) {
            return false;
        }
        let handled = self.apply_touch_delta(delta, false, now_ms);
        if handled {
            self.touch.arm(delta, now_ms);
        }
        handled
    }

    pub fn on_touch_end(&mut self) {
        self.touch.end();
    }

    /// The host's scroll container scrolled natively (e.g. scrollbar or keyboard).
    pub fn on_native_scroll(&mut self, top: u64, now_ms: u64) -> u64 {
        let applied = self.list.on_native_scroll(top);
        self.flash_if_scrolled(now_ms);
        applied
    }

    /// Starts dragging the scrollbar thumb at `pointer` (track coordinates).
    pub fn on_thumb_drag_start(&mut self, pointer: i64) {
        let geometry = self.scrollbar_geometry();
        self.drag = Some(ThumbDrag {
            pointer_start: pointer,
            thumb_start: geometry.thumb_offset(self.list.scroll_top()),
        });
        self.scrollbar.set_dragging(true);
        self.stop_motion();
    }

    /// Moves the dragged thumb. Returns the applied scroll offset, or `None` when not dragging.
    pub fn on_thumb_drag_move(&mut self, pointer: i64, now_ms: u64) -> Option<u64> {
        let drag = self.drag?;
        let geometry = self.scrollbar_geometry();
        let moved = pointer.saturating_sub(drag.pointer_start);
        let thumb = (drag.thumb_start as i64).saturating_add(moved);
        let top = geometry.scroll_offset_for_thumb(thumb);
        let applied = self.list.sync_scroll_top(i64::try_from(top).unwrap_or(i64::MAX));
        self.flash_if_scrolled(now_ms);
        Some(applied)
    }

    pub fn on_thumb_drag_end(&mut self, now_ms: u64) {
        if self.drag.take().is_some() {
            self.scrollbar.set_dragging(false);
            self.scrollbar.flash(now_ms);
        }
    }

    /// Executes a scroll command. Plain offsets stop wheel and touch motion.
    pub fn scroll_to<T, F>(
        &mut self,
        request: impl Into<ScrollRequest<K>>,
        items: &Items<'_, T, F>,
        now_ms: u64,
    ) -> Result<ScrollEffect, ScrollToError>
    where
        F: Fn(&T) -> K,
    {
        let request = request.into();
        if matches!(request, ScrollRequest::Top(_) | ScrollRequest::Position { .. }) {
            self.stop_motion();
        }
        let effect = self.list.scroll_to(request, items)?;
        match effect {
            ScrollEffect::RevealScrollbar => self.scrollbar.flash(now_ms),
            ScrollEffect::Scrolled(_) => self.flash_if_scrolled(now_ms),
            ScrollEffect::Converging => {}
        }
        Ok(effect)
    }

    /// Advances one animation frame: momentum steps, the coalesced wheel delta, one scroll-to
    /// pass, then the range to render.
    pub fn tick<T, F>(&mut self, now_ms: u64, items: &Items<'_, T, F>) -> FrameOutput
    where
        F: Fn(&T) -> K,
    {
        while let Some(step) = self.touch.next_step(now_ms) {
            if !self.apply_touch_delta(step, true, now_ms) {
                self.touch.stop_momentum();
                break;
            }
        }

        if let Some(delta) = self.wheel.flush() {
            let top = i64::try_from(self.list.scroll_top()).unwrap_or(i64::MAX);
            self.list.sync_scroll_top(top.saturating_add(delta));
        }

        let scroll_to = self.list.on_frame(items);
        if scroll_to.as_error().is_some() {
            vdebug!(status = ?scroll_to, "scroll_to finished without converging");
        }

        let range = self.list.range(items);
        self.flash_if_scrolled(now_ms);

        let scrollbar = self.scrollbar_geometry();
        FrameOutput {
            range,
            scroll: self.list.scroll_info(),
            scroll_to,
            scrollbar_visible: scrollbar.can_scroll() && self.scrollbar.is_visible(now_ms),
            scrollbar,
            thumb_offset: scrollbar.thumb_offset(self.list.scroll_top()),
            needs_frame: scroll_to.is_converging()
                || self.is_animating()
                || self.scrollbar.has_pending_hide(now_ms),
        }
    }

    /// Reports heights measured after rendering the last [`FrameOutput::range`].
    pub fn collect_heights<T, F>(
        &mut self,
        items: &Items<'_, T, F>,
        measurements: impl IntoIterator<Item = (K, u32)>,
    ) -> usize
    where
        F: Fn(&T) -> K,
    {
        self.list.collect_heights(items, measurements)
    }

    pub fn on_data_changed<T, F>(&mut self, items: &Items<'_, T, F>)
    where
        F: Fn(&T) -> K,
    {
        self.list.on_data_changed(items);
    }

    pub fn capture_first_visible_anchor<T, F>(
        &self,
        items: &Items<'_, T, F>,
    ) -> Option<ScrollAnchor<K>>
    where
        F: Fn(&T) -> K,
    {
        capture_first_visible_anchor(&self.list, items)
    }

    /// Re-applies a captured anchor. This stops wheel and touch motion.
    pub fn apply_anchor<T, F>(
        &mut self,
        anchor: &ScrollAnchor<K>,
        items: &Items<'_, T, F>,
    ) -> bool
    where
        F: Fn(&T) -> K,
    {
        self.stop_motion();
        apply_anchor(&mut self.list, anchor, items)
    }

    /// Tears the controller down: pending motion is dropped and scroll-to is cancelled.
    pub fn unmount(&mut self) {
        self.stop_motion();
        self.touch.reset();
        self.drag = None;
        self.list.unmount();
    }

    fn stop_motion(&mut self) {
        self.wheel.reset();
        self.touch.stop_momentum();
        self.origin.reset();
    }

    fn apply_touch_delta(&mut self, delta: TouchDelta, smooth: bool, now_ms: u64) -> bool {
        let (at_start, at_end) = if delta.horizontal {
            (self.list.is_scroll_at_left(), self.list.is_scroll_at_right())
        } else {
            (self.list.is_scroll_at_top(), self.list.is_scroll_at_bottom())
        };
        if self
            .origin
            .should_propagate(at_start, at_end, delta.delta, smooth, now_ms)
        {
            return false;
        }

        if delta.horizontal {
            self.scroll_left_by(delta.delta);
        } else {
            self.wheel.accumulate(delta.delta);
        }
        true
    }

    fn scroll_left_by(&mut self, delta: f64) {
        let left = i64::try_from(self.list.scroll_left()).unwrap_or(i64::MAX);
        self.list.sync_scroll_left(left.saturating_add(round(delta)));
    }

    fn flash_if_scrolled(&mut self, now_ms: u64) {
        let scroll = self.list.scroll_info();
        if scroll != self.last_scroll {
            self.last_scroll = scroll;
            self.scrollbar.flash(now_ms);
        }
    }
}
