use alloc::sync::Arc;

use crate::ScrollInfo;

/// A callback fired when the list's scroll offsets change.
pub type OnScrollCallback = Arc<dyn Fn(ScrollInfo) + Send + Sync>;

/// Configuration for [`crate::VirtualList`].
///
/// Cheap to clone: the callback is stored in an `Arc`, so adapters can tweak a few fields and call
/// `VirtualList::set_options` every frame.
pub struct ListOptions {
    /// Viewport height. `0` disables virtualization (nothing is known about the viewport yet).
    pub height: u32,
    /// Viewport width, only used for horizontal scrolling.
    pub width: u32,
    /// Estimated height used for items that have not been measured yet. `0` disables
    /// virtualization.
    pub item_height: u32,
    /// Set to `false` to always mount every item.
    pub virtual_enabled: bool,
    /// Width of the horizontally scrollable content, when the list scrolls horizontally.
    pub scroll_width: Option<u32>,
    /// Scroll offsets applied by `VirtualList::new` (e.g. restored from a previous mount).
    pub initial_scroll: ScrollInfo,
    /// Drop cached heights of keys that left the data set on `VirtualList::on_data_changed`.
    pub prune_stale_heights: bool,
    /// In debug builds, scan for duplicate keys on `VirtualList::on_data_changed`.
    pub check_duplicate_keys: bool,
    pub on_scroll: Option<OnScrollCallback>,
}

impl Clone for ListOptions {
    fn clone(&self) -> Self {
        Self {
            height: self.height,
            width: self.width,
            item_height: self.item_height,
            virtual_enabled: self.virtual_enabled,
            scroll_width: self.scroll_width,
            initial_scroll: self.initial_scroll,
            prune_stale_heights: self.prune_stale_heights,
            check_duplicate_keys: self.check_duplicate_keys,
            on_scroll: self.on_scroll.clone(),
        }
    }
}

impl ListOptions {
    /// Creates options for a viewport of `height` with the given estimated item height.
    pub fn new(height: u32, item_height: u32) -> Self {
        Self {
            height,
            width: 0,
            item_height,
            virtual_enabled: true,
            scroll_width: None,
            initial_scroll: ScrollInfo::default(),
            prune_stale_heights: false,
            check_duplicate_keys: true,
            on_scroll: None,
        }
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn with_item_height(mut self, item_height: u32) -> Self {
        self.item_height = item_height;
        self
    }

    pub fn with_virtual(mut self, virtual_enabled: bool) -> Self {
        self.virtual_enabled = virtual_enabled;
        self
    }

    pub fn with_scroll_width(mut self, scroll_width: Option<u32>) -> Self {
        self.scroll_width = scroll_width;
        self
    }

    pub fn with_initial_scroll(mut self, initial_scroll: ScrollInfo) -> Self {
        self.initial_scroll = initial_scroll;
        self
    }

    pub fn with_prune_stale_heights(mut self, prune: bool) -> Self {
        self.prune_stale_heights = prune;
        self
    }

    pub fn with_check_duplicate_keys(mut self, check: bool) -> Self {
        self.check_duplicate_keys = check;
        self
    }

    pub fn with_on_scroll(
        mut self,
        on_scroll: Option<impl Fn(ScrollInfo) + Send + Sync + 'static>,
    ) -> Self {
        self.on_scroll = on_scroll.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for ListOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListOptions")
            .field("height", &self.height)
            .field("width", &self.width)
            .field("item_height", &self.item_height)
            .field("virtual_enabled", &self.virtual_enabled)
            .field("scroll_width", &self.scroll_width)
            .field("initial_scroll", &self.initial_scroll)
            .field("prune_stale_heights", &self.prune_stale_heights)
            .field("check_duplicate_keys", &self.check_duplicate_keys)
            .finish_non_exhaustive()
    }
}
