/// Smallest thumb length, in pixels.
pub const MIN_SPIN_SIZE: u32 = 20;

/// How long an optional scrollbar stays visible after a scroll or a reveal request.
pub const SCROLLBAR_HIDE_DELAY_MS: u64 = 3000;

/// Thumb geometry for one scroll axis.
///
/// `container_size` is the track length (the viewport) and `scroll_range` the full content
/// length, as reported by `VirtualList::scroll_height`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollbarGeometry {
    pub container_size: u32,
    pub scroll_range: u64,
}

impl ScrollbarGeometry {
    pub fn new(container_size: u32, scroll_range: u64) -> Self {
        Self {
            container_size,
            scroll_range,
        }
    }

    /// Thumb length: the visible fraction of the track, at least [`MIN_SPIN_SIZE`].
    pub fn spin_size(&self) -> u32 {
        if self.scroll_range == 0 {
            return MIN_SPIN_SIZE;
        }
        let container = self.container_size as u128;
        let base = container * container / self.scroll_range as u128;
        let base = u32::try_from(base).unwrap_or(u32::MAX);
        base.max(MIN_SPIN_SIZE)
    }

    /// How far the content can scroll.
    pub fn enable_scroll_range(&self) -> u64 {
        self.scroll_range.saturating_sub(self.container_size as u64)
    }

    /// How far the thumb can travel along the track.
    pub fn enable_offset_range(&self) -> u32 {
        self.container_size.saturating_sub(self.spin_size())
    }

    pub fn can_scroll(&self) -> bool {
        self.enable_scroll_range() > 0
    }

    /// Thumb position for a content scroll offset.
    pub fn thumb_offset(&self, scroll_offset: u64) -> u32 {
        let scroll_range = self.enable_scroll_range();
        if scroll_range == 0 {
            return 0;
        }
        let offset = scroll_offset.min(scroll_range) as u128;
        let thumb = offset * self.enable_offset_range() as u128 / scroll_range as u128;
        thumb as u32
    }

    /// Content scroll offset for a thumb position, rounded up and clamped to the scroll range.
    pub fn scroll_offset_for_thumb(&self, thumb_offset: i64) -> u64 {
        let offset_range = self.enable_offset_range() as u128;
        if offset_range == 0 {
            return 0;
        }
        let scroll_range = self.enable_scroll_range() as u128;
        let thumb = u128::try_from(thumb_offset.max(0))
            .unwrap_or(0)
            .min(offset_range);
        let offset = (thumb * scroll_range).div_ceil(offset_range);
        offset as u64
    }
}

/// When the host should paint the scrollbar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollbarMode {
    Always,
    Hidden,
    /// Shown while dragging and for [`SCROLLBAR_HIDE_DELAY_MS`] after each scroll.
    #[default]
    Optional,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ScrollbarVisibility {
    mode: ScrollbarMode,
    visible_until: Option<u64>,
    dragging: bool,
}

impl ScrollbarVisibility {
    pub fn new(mode: ScrollbarMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> ScrollbarMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ScrollbarMode) {
        self.mode = mode;
    }

    /// Shows an optional scrollbar for the next [`SCROLLBAR_HIDE_DELAY_MS`].
    pub fn flash(&mut self, now_ms: u64) {
        self.visible_until = Some(now_ms.saturating_add(SCROLLBAR_HIDE_DELAY_MS));
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_visible(&self, now_ms: u64) -> bool {
        match self.mode {
            ScrollbarMode::Always => true,
            ScrollbarMode::Hidden => false,
            ScrollbarMode::Optional => {
                self.dragging || self.visible_until.is_some_and(|until| now_ms < until)
            }
        }
    }

    /// Whether a later tick could change [`ScrollbarVisibility::is_visible`] on its own.
    pub fn has_pending_hide(&self, now_ms: u64) -> bool {
        self.mode == ScrollbarMode::Optional
            && !self.dragging
            && self.visible_until.is_some_and(|until| now_ms < until)
    }
}
