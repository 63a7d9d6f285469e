/// Alignment policy for [`crate::ScrollTarget`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollAlign {
    Top,
    Bottom,
    /// Scroll only if the item is not fully visible, towards whichever edge it is past.
    #[default]
    Auto,
}

/// A concrete edge an [`ScrollAlign::Auto`] request resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolvedAlign {
    Top,
    Bottom,
}

impl From<ResolvedAlign> for ScrollAlign {
    fn from(align: ResolvedAlign) -> Self {
        match align {
            ResolvedAlign::Top => Self::Top,
            ResolvedAlign::Bottom => Self::Bottom,
        }
    }
}

/// The slice of data that must be mounted.
///
/// `end_index` is exclusive. The last rendered index (already including one item of lookahead)
/// is [`VisibleRange::last_index`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub start_index: usize,
    pub end_index: usize,
    /// Top edge of the item at `start_index`.
    pub offset_top: u64,
    /// Accumulated height of the whole data set.
    pub scroll_height: u64,
}

impl VisibleRange {
    pub const EMPTY: Self = Self {
        start_index: 0,
        end_index: 0,
        offset_top: 0,
        scroll_height: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn last_index(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.end_index - 1)
    }

    pub fn indices(&self) -> core::ops::Range<usize> {
        self.start_index..self.end_index
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices().contains(&index)
    }
}

/// Last known scroll offsets, for host introspection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollInfo {
    pub x: u64,
    pub y: u64,
}

/// Current viewport geometry as seen by one convergence tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub height: u32,
    pub scroll_top: u64,
}
