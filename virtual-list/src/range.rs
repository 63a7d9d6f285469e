use crate::key::ListKey;
use crate::{HeightCache, Items, VisibleRange};

/// Computes the slice of `items` that must be mounted for the given scroll window.
///
/// Walks the data from the top, accumulating each item's cached height (or `item_height` when
/// the item was never measured):
/// - the start item is the first one whose bottom edge reaches `scroll_offset`;
/// - the end item is the first one whose bottom edge passes the viewport's bottom edge;
/// - one extra item is rendered after the end item for motion continuity.
///
/// When no start item exists (the offset is past all content, e.g. right after the data shrank),
/// the range falls back to `ceil(viewport_height / item_height)` items from the top.
///
/// This is `O(n)` in the data length; hosts are expected to call it on scroll/resize/data events
/// (batched per frame), not continuously. See [`RangeMemo`] for skipping redundant calls.
pub fn compute_range<T, F, K>(
    items: &Items<'_, T, F>,
    heights: &HeightCache<K>,
    item_height: u32,
    scroll_offset: u64,
    viewport_height: u32,
) -> VisibleRange
where
    F: Fn(&T) -> K,
    K: ListKey,
{
    let len = items.len();
    let view_end = scroll_offset.saturating_add(viewport_height as u64);

    let mut item_top = 0u64;
    let mut start: Option<(usize, u64)> = None;
    let mut end: Option<usize> = None;

    for (i, key) in items.keys().enumerate() {
        let height = heights.get(&key).unwrap_or(item_height);
        let item_bottom = item_top.saturating_add(height as u64);

        if start.is_none() && item_bottom >= scroll_offset {
            start = Some((i, item_top));
        }
        if end.is_none() && item_bottom > view_end {
            end = Some(i);
        }

        item_top = item_bottom;
    }

    let scroll_height = item_top;
    let (start_index, offset_top, last) = match start {
        Some((index, top)) => (index, top, end.unwrap_or(len.saturating_sub(1))),
        None => {
            vtrace!(scroll_offset, scroll_height, "compute_range: offset past content");
            (0, 0, fallback_last_index(viewport_height, item_height))
        }
    };

    if len == 0 {
        return VisibleRange {
            scroll_height,
            ..VisibleRange::EMPTY
        };
    }

    // `last` is inclusive; +1 for the lookahead item, +1 to make it exclusive.
    let end_index = last.saturating_add(2).min(len);

    VisibleRange {
        start_index,
        end_index,
        offset_top,
        scroll_height,
    }
}

fn fallback_last_index(viewport_height: u32, item_height: u32) -> usize {
    if item_height == 0 {
        return 0;
    }
    viewport_height.div_ceil(item_height) as usize
}

/// The non-virtual range: every item is mounted.
pub fn full_range(len: usize, scroll_height: u64) -> VisibleRange {
    VisibleRange {
        start_index: 0,
        end_index: len,
        offset_top: 0,
        scroll_height,
    }
}

/// Accumulated height of all items, using `item_height` for unmeasured ones.
pub fn total_height<T, F, K>(
    items: &Items<'_, T, F>,
    heights: &HeightCache<K>,
    item_height: u32,
) -> u64
where
    F: Fn(&T) -> K,
    K: ListKey,
{
    items
        .keys()
        .map(|key| heights.get(&key).unwrap_or(item_height) as u64)
        .fold(0u64, u64::saturating_add)
}

/// Top edge of the item at `index`, or `None` when `index` is out of bounds.
pub fn item_top<T, F, K>(
    items: &Items<'_, T, F>,
    heights: &HeightCache<K>,
    item_height: u32,
    index: usize,
) -> Option<u64>
where
    F: Fn(&T) -> K,
    K: ListKey,
{
    if index >= items.len() {
        return None;
    }
    Some(
        items
            .keys()
            .take(index)
            .map(|key| heights.get(&key).unwrap_or(item_height) as u64)
            .fold(0u64, u64::saturating_add),
    )
}

/// Everything a [`VisibleRange`] depends on.
///
/// `data_generation` is owned by the host (or [`crate::VirtualList`]): bump it whenever the data
/// slice is replaced, because the memo cannot observe the data itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RangeInputs {
    pub heights_revision: u64,
    pub data_generation: u64,
    pub data_len: usize,
    pub item_height: u32,
    pub scroll_offset: u64,
    pub viewport_height: u32,
    pub virtual_mode: bool,
}

/// A generation-checked memo for [`compute_range`].
#[derive(Clone, Debug, Default)]
pub struct RangeMemo {
    cached: Option<(RangeInputs, VisibleRange)>,
}

impl RangeMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached range when `inputs` match the last computation, otherwise runs
    /// `compute` and caches its result.
    pub fn get_or_compute(
        &mut self,
        inputs: RangeInputs,
        compute: impl FnOnce() -> VisibleRange,
    ) -> VisibleRange {
        if let Some((prev, range)) = self.cached {
            if prev == inputs {
                return range;
            }
        }
        let range = compute();
        self.cached = Some((inputs, range));
        range
    }

    pub fn last(&self) -> Option<VisibleRange> {
        self.cached.map(|(_, range)| range)
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
