use core::fmt;

use virtual_list::{Items, ListKey, VirtualList};

/// Keeps an item at the same place in the viewport across data changes.
///
/// Typical use cases:
/// - chat/timeline "load older" (rows prepended above) without content jumping
/// - any reorder/replace where the viewport should stay on an item identity
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollAnchor<K> {
    pub key: K,
    /// Distance from the anchor item's top edge to the scroll offset.
    pub offset_in_viewport: u64,
}

impl<K: fmt::Debug> fmt::Debug for ScrollAnchor<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollAnchor")
            .field("key", &self.key)
            .field("offset_in_viewport", &self.offset_in_viewport)
            .finish()
    }
}

/// Captures the start item of the last computed range.
///
/// Returns `None` before the first `VirtualList::range` call or when the range is empty.
pub fn capture_first_visible_anchor<T, F, K>(
    list: &VirtualList<K>,
    items: &Items<'_, T, F>,
) -> Option<ScrollAnchor<K>>
where
    F: Fn(&T) -> K,
    K: ListKey,
{
    let range = list.last_range()?;
    if range.is_empty() {
        return None;
    }
    let key = items.key_at(range.start_index)?;
    Some(ScrollAnchor {
        key,
        offset_in_viewport: list.scroll_top().saturating_sub(range.offset_top),
    })
}

/// Re-applies `anchor` against the current data by adjusting the scroll offset.
///
/// Returns `false` when the anchor key is gone.
pub fn apply_anchor<T, F, K>(
    list: &mut VirtualList<K>,
    anchor: &ScrollAnchor<K>,
    items: &Items<'_, T, F>,
) -> bool
where
    F: Fn(&T) -> K,
    K: ListKey,
{
    let Some(index) = items.position(&anchor.key) else {
        vdebug!("apply_anchor: anchor key is no longer in the data");
        return false;
    };
    let Some(top) = list.item_top(items, index) else {
        return false;
    };

    // Refresh the scroll height so the new offset is clamped against the new data.
    list.range(items);
    let target = top.saturating_add(anchor.offset_in_viewport);
    list.sync_scroll_top(i64::try_from(target).unwrap_or(i64::MAX));
    true
}
