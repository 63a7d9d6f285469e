use crate::Items;

/// Where two keyed lists start to differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListDiff {
    pub index: usize,
    /// `true` unless exactly one item was inserted or removed at `index`.
    pub multiple: bool,
}

/// Finds the first index at which `origin` and `target` disagree on keys.
///
/// Hosts use this to keep a just-removed row mounted while it animates out: when `multiple` is
/// `false`, the row at `index` of the longer list is the single inserted/removed item.
pub fn find_list_diff_index<A, FA, B, FB, K>(
    origin: &Items<'_, A, FA>,
    target: &Items<'_, B, FB>,
) -> Option<ListDiff>
where
    FA: Fn(&A) -> K,
    FB: Fn(&B) -> K,
    K: PartialEq,
{
    let origin_len = origin.len();
    let target_len = target.len();
    if origin_len == 0 && target_len == 0 {
        return None;
    }

    let origin_is_short = origin_len < target_len;
    let short_key = |i: usize| {
        if origin_is_short {
            origin.key_at(i)
        } else {
            target.key_at(i)
        }
    };
    let long_key = |i: usize| {
        if origin_is_short {
            target.key_at(i)
        } else {
            origin.key_at(i)
        }
    };
    let long_len = origin_len.max(target_len);

    let mut multiple = origin_len.abs_diff(target_len) != 1;
    for i in 0..long_len {
        let short = short_key(i);
        if short != long_key(i) {
            multiple = multiple || short != long_key(i + 1);
            return Some(ListDiff { index: i, multiple });
        }
    }
    None
}
