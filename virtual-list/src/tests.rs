use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell;
use core::sync::atomic::{AtomicU64, Ordering};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }

    fn gen_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

fn ids(n: usize) -> Vec<u64> {
    (0..n as u64).map(|i| 1000 + i).collect()
}

fn key_of(id: &u64) -> u64 {
    *id
}

fn cache_all(heights: &mut HeightCache<u64>, data: &[u64], sizes: &[u32]) {
    for (id, &h) in data.iter().zip(sizes) {
        heights.set(*id, h);
    }
}

fn effective_heights(heights: &HeightCache<u64>, data: &[u64], fallback: u32) -> Vec<u32> {
    data.iter()
        .map(|id| heights.get(id).unwrap_or(fallback))
        .collect()
}

fn expected_item_top(sizes: &[u32], index: usize) -> u64 {
    sizes[..index].iter().map(|&h| h as u64).sum()
}

/// A direct transcription of the walk: first bottom >= offset, first bottom > offset + view,
/// one item of lookahead.
fn expected_range(sizes: &[u32], fallback: u32, scroll_offset: u64, view: u32) -> VisibleRange {
    let len = sizes.len();
    let total: u64 = sizes.iter().map(|&h| h as u64).sum();
    if len == 0 {
        return VisibleRange::EMPTY;
    }
    let mut start = None;
    let mut end = None;
    let mut bottom = 0u64;
    for (i, &h) in sizes.iter().enumerate() {
        let top = bottom;
        bottom += h as u64;
        if start.is_none() && bottom >= scroll_offset {
            start = Some((i, top));
        }
        if end.is_none() && bottom > scroll_offset + view as u64 {
            end = Some(i);
        }
    }
    let (start_index, offset_top, last) = match start {
        Some((i, top)) => (i, top, end.unwrap_or(len - 1)),
        None => (0, 0, (view as usize).div_ceil(fallback as usize)),
    };
    VisibleRange {
        start_index,
        end_index: (last + 2).min(len),
        offset_top,
        scroll_height: total,
    }
}

/// Renders the current range of `list` and reports the real heights of the rendered rows.
fn render_and_measure(list: &mut VirtualList<u64>, data: &[u64], real: &[u32]) -> VisibleRange {
    let items = Items::new(data, key_of);
    let range = list.range(&items);
    let measured: Vec<(u64, u32)> = range.indices().map(|i| (data[i], real[i])).collect();
    list.collect_heights(&items, measured);
    range
}

// HeightCache

#[test]
fn height_cache_get_returns_none_until_measured() {
    let mut c = HeightCache::<u64>::new();
    assert_eq!(c.get(&1), None);
    assert!(c.is_empty());
    c.set(1, 42);
    assert_eq!(c.get(&1), Some(42));
    assert!(c.contains_key(&1));
    assert_eq!(c.len(), 1);
}

#[test]
fn height_cache_revision_bumps_on_every_set_even_if_unchanged() {
    let mut c = HeightCache::<&str>::new();
    let r0 = c.revision();
    c.set("a", 10);
    c.set("a", 10);
    assert_eq!(c.get(&"a"), Some(10));
    assert_eq!(c.revision(), r0 + 2);
}

#[test]
fn height_cache_records_first_previous_value_per_key() {
    let mut c = HeightCache::<u64>::new();
    c.set(1, 10);
    c.reset_changes();

    c.set(1, 20);
    c.set(1, 30);
    c.set(2, 5);

    let mut changes: Vec<(u64, Option<u32>)> = c.changes().map(|(k, v)| (*k, v)).collect();
    changes.sort_unstable();
    assert_eq!(changes, alloc::vec![(1, Some(10)), (2, None)]);
    assert_eq!(c.changed_len(), 2);

    c.reset_changes();
    assert_eq!(c.changed_len(), 0);
    assert_eq!(c.get(&1), Some(30));
}

#[test]
fn height_cache_retain_keys_prunes_departed_items() {
    let mut c = HeightCache::<u64>::new();
    for k in 0..10u64 {
        c.set(k, 10);
    }
    let r = c.revision();

    let live: Vec<u64> = (5..15).collect();
    let removed = c.retain_keys(&Items::new(&live, key_of));
    assert_eq!(removed, 5);
    assert_eq!(c.len(), 5);
    assert_eq!(c.get(&4), None);
    assert_eq!(c.get(&5), Some(10));
    assert_eq!(c.revision(), r + 1);

    // Nothing to remove: revision untouched.
    let removed = c.retain_keys(&Items::new(&live, key_of));
    assert_eq!(removed, 0);
    assert_eq!(c.revision(), r + 1);
}

#[test]
fn height_cache_export_import_roundtrip() {
    let mut c = HeightCache::<u64>::new();
    c.set(7, 70);
    c.set(8, 80);

    let mut exported = c.export();
    exported.sort_unstable();
    assert_eq!(exported, alloc::vec![(7, 70), (8, 80)]);

    let mut restored = HeightCache::<u64>::new();
    restored.import(exported);
    assert_eq!(restored.get(&7), Some(70));
    assert_eq!(restored.get(&8), Some(80));
    assert_eq!(restored.revision(), 1);
    assert_eq!(restored.changed_len(), 0);

    restored.clear();
    assert!(restored.is_empty());
    assert_eq!(restored.revision(), 2);
}

// Range calculation

#[test]
fn range_with_exact_heights_known() {
    let data = ids(100);
    let mut heights = HeightCache::new();
    cache_all(&mut heights, &data, &[50; 100]);

    let r = compute_range(&Items::new(&data, key_of), &heights, 50, 620, 300);
    assert_eq!(r.start_index, 12);
    assert_eq!(r.offset_top, 600);
    // bottom of item 18 (950) is the first past 920; +1 lookahead => last index 19.
    assert_eq!(r.last_index(), Some(19));
    assert_eq!(r.end_index, 20);
    assert_eq!(r.scroll_height, 5000);
}

#[test]
fn range_with_unknown_heights_uses_fallback() {
    let data = ids(50);
    let heights = HeightCache::new();

    let r = compute_range(&Items::new(&data, key_of), &heights, 40, 0, 200);
    assert_eq!(r.start_index, 0);
    assert_eq!(r.offset_top, 0);
    // ceil(200 / 40) = 5, plus one lookahead.
    assert_eq!(r.last_index(), Some(6));
    assert_eq!(r.scroll_height, 2000);
}

#[test]
fn range_of_empty_data_is_empty() {
    let data: Vec<u64> = Vec::new();
    let heights = HeightCache::new();
    let r = compute_range(&Items::new(&data, key_of), &heights, 40, 300, 200);
    assert_eq!(r, VisibleRange::EMPTY);
    assert!(r.is_empty());
    assert_eq!(r.last_index(), None);
}

#[test]
fn single_item_taller_than_viewport() {
    let data = ids(1);
    let mut heights = HeightCache::new();
    heights.set(data[0], 1000);
    let r = compute_range(&Items::new(&data, key_of), &heights, 40, 300, 200);
    assert_eq!(r.start_index, 0);
    assert_eq!(r.last_index(), Some(0));
    assert_eq!(r.offset_top, 0);
}

#[test]
fn tall_item_spanning_viewport_is_start_and_end() {
    let data = ids(10);
    let mut heights = HeightCache::new();
    cache_all(&mut heights, &data, &[20, 20, 500, 20, 20, 20, 20, 20, 20, 20]);
    // Viewport [100, 300) lies entirely inside item 2 ([40, 540)).
    let r = compute_range(&Items::new(&data, key_of), &heights, 20, 100, 200);
    assert_eq!(r.start_index, 2);
    assert_eq!(r.offset_top, 40);
    // End item is 2 as well; the lookahead adds item 3.
    assert_eq!(r.last_index(), Some(3));
}

#[test]
fn offset_past_content_falls_back_to_top() {
    let data = ids(10);
    let mut heights = HeightCache::new();
    cache_all(&mut heights, &data, &[50; 10]);
    let r = compute_range(&Items::new(&data, key_of), &heights, 50, 10_000, 200);
    assert_eq!(r.start_index, 0);
    assert_eq!(r.offset_top, 0);
    // ceil(200 / 50) = 4, plus one lookahead.
    assert_eq!(r.last_index(), Some(5));
    assert_eq!(r.scroll_height, 500);
}

#[test]
fn fallback_range_is_clamped_to_data_len() {
    let data = ids(3);
    let heights = HeightCache::new();
    let r = compute_range(&Items::new(&data, key_of), &heights, 10, 5_000, 200);
    assert_eq!(r.start_index, 0);
    assert_eq!(r.last_index(), Some(2));
}

#[test]
fn zero_fallback_height_does_not_divide_by_zero() {
    let data = ids(4);
    let heights = HeightCache::new();
    let r = compute_range(&Items::new(&data, key_of), &heights, 0, 5, 200);
    assert_eq!(r.start_index, 0);
    assert_eq!(r.last_index(), Some(1));
}

#[test]
fn full_range_and_total_height() {
    let data = ids(5);
    let mut heights = HeightCache::new();
    heights.set(data[0], 100);
    let total = total_height(&Items::new(&data, key_of), &heights, 10);
    assert_eq!(total, 140);

    let r = full_range(data.len(), total);
    assert_eq!(r.indices(), 0..5);
    assert_eq!(r.offset_top, 0);
    assert_eq!(r.scroll_height, 140);
    assert!(r.contains(4));
    assert!(!r.contains(5));
}

#[test]
fn range_memo_skips_recompute_for_identical_inputs() {
    let calls = Cell::new(0u32);
    let mut memo = RangeMemo::new();
    let inputs = RangeInputs {
        heights_revision: 1,
        data_generation: 0,
        data_len: 10,
        item_height: 20,
        scroll_offset: 0,
        viewport_height: 100,
        virtual_mode: true,
    };
    let compute = || {
        calls.set(calls.get() + 1);
        full_range(10, 200)
    };

    let a = memo.get_or_compute(inputs, compute);
    let b = memo.get_or_compute(inputs, compute);
    assert_eq!(a, b);
    assert_eq!(calls.get(), 1);

    let bumped = RangeInputs {
        heights_revision: 2,
        ..inputs
    };
    memo.get_or_compute(bumped, compute);
    assert_eq!(calls.get(), 2);

    memo.invalidate();
    assert_eq!(memo.last(), None);
    memo.get_or_compute(bumped, compute);
    assert_eq!(calls.get(), 3);
}

#[test]
fn property_random_range_invariants() {
    let mut rng = Lcg::new(0x5eed_1234);
    for _case in 0..300 {
        let len = rng.gen_range_usize(1, 120);
        let data = ids(len);
        let fallback = rng.gen_range_u32(1, 60);
        let view = rng.gen_range_u32(1, 400);

        let mut heights = HeightCache::new();
        for id in &data {
            if rng.gen_bool() {
                heights.set(*id, rng.gen_range_u32(1, 120));
            }
        }
        let sizes = effective_heights(&heights, &data, fallback);
        let total: u64 = sizes.iter().map(|&h| h as u64).sum();
        let max_scroll = total.saturating_sub(view as u64);
        let offset = rng.gen_range_u64(0, max_scroll + 1);

        let items = Items::new(&data, key_of);
        let r = compute_range(&items, &heights, fallback, offset, view);
        assert_eq!(r, expected_range(&sizes, fallback, offset, view));

        // Monotonicity and bounds.
        let last = r.last_index().unwrap();
        assert!(r.start_index <= last);
        assert!(last < len);
        assert_eq!(r.scroll_height, total);

        // Coverage: no visible gap inside [offset, offset + view).
        assert_eq!(r.offset_top, expected_item_top(&sizes, r.start_index));
        assert!(r.offset_top <= offset);
        let rendered_bottom = expected_item_top(&sizes, last + 1);
        assert!(rendered_bottom >= (offset + view as u64).min(total));
    }
}

// ScrollToController

#[test]
fn scroll_to_converges_in_one_pass_when_heights_are_known() {
    let data = ids(20);
    let mut heights = HeightCache::new();
    cache_all(&mut heights, &data[..11], &[30; 11]);
    let items = Items::new(&data, key_of);

    let mut c = ScrollToController::new();
    c.request(
        ScrollTarget::index(10).with_align(ScrollAlign::Top),
        &items,
    )
    .unwrap();

    let viewport = Viewport {
        height: 100,
        scroll_top: 0,
    };
    let t1 = c.tick(&items, &heights, 30, viewport);
    assert_eq!(t1.scroll_top, Some(300));
    assert_eq!(t1.status, ScrollToStatus::Converging { times_attempted: 1 });

    let viewport = Viewport {
        height: 100,
        scroll_top: 300,
    };
    let t2 = c.tick(&items, &heights, 30, viewport);
    assert_eq!(t2.status, ScrollToStatus::Converged);
    assert_eq!(t2.scroll_top, Some(300));
    assert!(!c.is_converging());

    let t3 = c.tick(&items, &heights, 30, viewport);
    assert_eq!(t3.status, ScrollToStatus::Idle);
}

#[test]
fn scroll_to_missing_key_is_a_noop() {
    let data = ids(20);
    let items = Items::new(&data, key_of);
    let heights = HeightCache::new();

    let mut c = ScrollToController::new();
    let err = c.request(ScrollTarget::key(42), &items).unwrap_err();
    assert_eq!(err, ScrollToError::InvalidTarget);
    assert!(!c.is_converging());

    let t = c.tick(&items, &heights, 30, Viewport::default());
    assert_eq!(t.status, ScrollToStatus::Idle);
    assert_eq!(t.scroll_top, None);
}

#[test]
fn scroll_to_key_resolves_first_match() {
    let data: Vec<u64> = alloc::vec![5, 6, 7, 6];
    let items = Items::new(&data, key_of);
    let mut c = ScrollToController::new();
    c.request(ScrollTarget::key(6), &items).unwrap();
    assert_eq!(c.state().unwrap().target_index, 1);
}

#[test]
fn scroll_to_bottom_align_uses_item_bottom_and_offset() {
    let data = ids(50);
    let mut heights = HeightCache::new();
    cache_all(&mut heights, &data, &[20; 50]);
    let items = Items::new(&data, key_of);

    let mut c = ScrollToController::new();
    c.request(
        ScrollTarget::index(30)
            .with_align(ScrollAlign::Bottom)
            .with_offset(10),
        &items,
    )
    .unwrap();
    let t = c.tick(
        &items,
        &heights,
        20,
        Viewport {
            height: 100,
            scroll_top: 0,
        },
    );
    // bottom of item 30 is 620; 620 - 100 + 10.
    assert_eq!(t.scroll_top, Some(530));
}

#[test]
fn scroll_to_auto_does_not_move_when_item_is_visible() {
    let data = ids(50);
    let mut heights = HeightCache::new();
    cache_all(&mut heights, &data, &[20; 50]);
    let items = Items::new(&data, key_of);
    let viewport = Viewport {
        height: 100,
        scroll_top: 40,
    };

    let mut c = ScrollToController::new();
    c.request(ScrollTarget::index(3), &items).unwrap();

    let t1 = c.tick(&items, &heights, 20, viewport);
    assert_eq!(t1.scroll_top, None);
    assert!(t1.status.is_converging());

    let t2 = c.tick(&items, &heights, 20, viewport);
    assert_eq!(t2.scroll_top, None);
    assert_eq!(t2.status, ScrollToStatus::Converged);
}

#[test]
fn scroll_to_auto_resolves_to_bottom_for_items_below() {
    let data = ids(50);
    let mut heights = HeightCache::new();
    cache_all(&mut heights, &data, &[20; 50]);
    let items = Items::new(&data, key_of);
    let mut viewport = Viewport {
        height: 100,
        scroll_top: 0,
    };

    let mut c = ScrollToController::new();
    c.request(ScrollTarget::index(20), &items).unwrap();

    let t1 = c.tick(&items, &heights, 20, viewport);
    assert_eq!(t1.scroll_top, None);
    assert_eq!(
        c.state().unwrap().resolved_align,
        Some(ResolvedAlign::Bottom)
    );

    let t2 = c.tick(&items, &heights, 20, viewport);
    // bottom of item 20 is 420.
    assert_eq!(t2.scroll_top, Some(320));
    viewport.scroll_top = 320;

    let t3 = c.tick(&items, &heights, 20, viewport);
    assert_eq!(t3.status, ScrollToStatus::Converged);
}

#[test]
fn scroll_to_auto_resolves_to_top_for_items_above() {
    let data = ids(50);
    let mut heights = HeightCache::new();
    cache_all(&mut heights, &data, &[20; 50]);
    let items = Items::new(&data, key_of);
    let viewport = Viewport {
        height: 100,
        scroll_top: 500,
    };

    let mut c = ScrollToController::new();
    c.request(ScrollTarget::index(2), &items).unwrap();
    c.tick(&items, &heights, 20, viewport);
    assert_eq!(c.state().unwrap().resolved_align, Some(ResolvedAlign::Top));

    let t2 = c.tick(&items, &heights, 20, viewport);
    assert_eq!(t2.scroll_top, Some(40));
}

#[test]
fn scroll_to_gives_up_after_max_attempts() {
    let data = ids(100);
    let heights = HeightCache::new();
    let items = Items::new(&data, key_of);
    let viewport = Viewport {
        height: 100,
        scroll_top: 0,
    };

    let mut c = ScrollToController::new();
    c.request(
        ScrollTarget::index(60).with_align(ScrollAlign::Top),
        &items,
    )
    .unwrap();

    // Nothing is ever measured, so every pass asks for another one.
    let mut statuses = Vec::new();
    for _ in 0..MAX_SCROLL_TO_ATTEMPTS {
        statuses.push(c.tick(&items, &heights, 20, viewport).status);
    }
    assert!(statuses[..9].iter().all(ScrollToStatus::is_converging));
    let last = statuses[9];
    assert_eq!(last, ScrollToStatus::Exhausted { attempts: 10 });
    assert_eq!(
        last.as_error(),
        Some(ScrollToError::ConvergenceExhausted { attempts: 10 })
    );
    assert!(!c.is_converging());
}

#[test]
fn scroll_to_zero_viewport_waits_and_counts_passes() {
    let data = ids(10);
    let heights = HeightCache::new();
    let items = Items::new(&data, key_of);

    let mut c = ScrollToController::new();
    c.request(ScrollTarget::index(5), &items).unwrap();
    let t = c.tick(&items, &heights, 20, Viewport::default());
    assert_eq!(t.scroll_top, None);
    assert_eq!(t.status, ScrollToStatus::Converging { times_attempted: 1 });
}

#[test]
fn new_request_replaces_in_flight_one() {
    let data = ids(50);
    let heights = HeightCache::new();
    let items = Items::new(&data, key_of);
    let viewport = Viewport {
        height: 100,
        scroll_top: 0,
    };

    let mut c = ScrollToController::new();
    c.request(ScrollTarget::index(40), &items).unwrap();
    c.tick(&items, &heights, 20, viewport);
    c.request(ScrollTarget::index(10), &items).unwrap();

    let state = c.state().unwrap();
    assert_eq!(state.target_index, 10);
    assert_eq!(state.times_attempted, 0);
    assert_eq!(state.resolved_align, None);
}

#[test]
fn invalid_key_keeps_in_flight_request() {
    let data = ids(50);
    let items = Items::new(&data, key_of);

    let mut c = ScrollToController::new();
    c.request(ScrollTarget::index(40), &items).unwrap();
    assert!(c.request(ScrollTarget::key(7), &items).is_err());
    assert_eq!(c.state().unwrap().target_index, 40);
}

#[test]
fn cancelled_controller_rejects_requests_and_ticks() {
    let data = ids(50);
    let heights = HeightCache::new();
    let items = Items::new(&data, key_of);

    let mut c = ScrollToController::new();
    let token = c.cancel_token();
    c.request(ScrollTarget::index(40), &items).unwrap();

    token.cancel();
    let t = c.tick(&items, &heights, 20, Viewport::default());
    assert_eq!(t.status, ScrollToStatus::Cancelled);
    assert!(!c.is_converging());
    assert_eq!(
        c.request(ScrollTarget::index(1), &items),
        Err(ScrollToError::Cancelled)
    );
}

#[test]
fn property_scroll_to_always_terminates_within_budget() {
    let mut rng = Lcg::new(42);
    for _case in 0..100 {
        let len = rng.gen_range_usize(1, 300);
        let data = ids(len);
        let real: Vec<u32> = (0..len).map(|_| rng.gen_range_u32(5, 80)).collect();
        let view = rng.gen_range_u32(50, 400);
        let estimate = rng.gen_range_u32(5, 80);

        let mut list = VirtualList::<u64>::new(ListOptions::new(view, estimate));
        let items = Items::new(&data, key_of);
        list.on_data_changed(&items);
        render_and_measure(&mut list, &data, &real);

        let align = match rng.gen_range_u32(0, 3) {
            0 => ScrollAlign::Top,
            1 => ScrollAlign::Bottom,
            _ => ScrollAlign::Auto,
        };
        let index = rng.gen_range_usize(0, len);
        list.scroll_to(ScrollTarget::index(index).with_align(align), &items).unwrap();

        let mut ticks = 0;
        loop {
            let status = list.on_frame(&items);
            ticks += 1;
            match status {
                ScrollToStatus::Converging { .. } => {
                    assert!(ticks < MAX_SCROLL_TO_ATTEMPTS as usize);
                    render_and_measure(&mut list, &data, &real);
                }
                ScrollToStatus::Converged => {
                    // Fully visible in the layout the list currently uses.
                    let top = list.item_top(&items, index).unwrap();
                    let size = list.heights().get(&data[index]).unwrap_or(estimate);
                    if size <= view {
                        let scroll_top = list.scroll_top();
                        assert!(top >= scroll_top, "item {index} starts above the viewport");
                        assert!(
                            top + size as u64 <= scroll_top + view as u64,
                            "item {index} ends below the viewport"
                        );
                    }
                    break;
                }
                ScrollToStatus::Exhausted { .. } => break,
                other => panic!("unexpected status {other:?}"),
            }
        }
        assert!(ticks <= MAX_SCROLL_TO_ATTEMPTS as usize);
        assert!(list.scroll_top() <= list.max_scroll_top());
    }
}

#[test]
fn scroll_to_extreme_offsets_saturate_instead_of_overflowing() {
    let data = ids(50);
    let mut heights = HeightCache::new();
    cache_all(&mut heights, &data, &[20; 50]);
    let items = Items::new(&data, key_of);
    let viewport = Viewport {
        height: 100,
        scroll_top: 0,
    };

    let mut c = ScrollToController::new();
    let top = ScrollTarget::index(3).with_align(ScrollAlign::Top);
    c.request(top.with_offset(i64::MIN), &items).unwrap();
    assert_eq!(c.tick(&items, &heights, 20, viewport).scroll_top, Some(i64::MAX));

    let bottom = ScrollTarget::<u64>::index(3).with_align(ScrollAlign::Bottom);
    c.request(bottom.clone().with_offset(i64::MIN), &items).unwrap();
    assert_eq!(c.tick(&items, &heights, 20, viewport).scroll_top, Some(i64::MIN));
    // Bottom edge of item 3 is 80, so the target is `80 - 100 + i64::MAX`.
    c.request(bottom.with_offset(i64::MAX), &items).unwrap();
    assert_eq!(c.tick(&items, &heights, 20, viewport).scroll_top, Some(i64::MAX - 20));

    // Item 3 is visible at the top, so `Auto` keeps the offset.
    let auto = ScrollTarget::index(3).with_offset(i64::MIN);
    c.request(auto, &items).unwrap();
    let t = c.tick(&items, &heights, 20, viewport);
    assert_eq!(t.scroll_top, None);
    assert_eq!(t.status, ScrollToStatus::Converging { times_attempted: 1 });
}

#[test]
fn list_scroll_to_extreme_offset_is_clamped() {
    let data = ids(50);
    let items = Items::new(&data, key_of);
    let mut list = VirtualList::<u64>::new(ListOptions::new(100, 20));
    cache_all(list.heights_mut(), &data, &[20; 50]);
    list.range(&items);

    let target = ScrollTarget::index(3)
        .with_align(ScrollAlign::Top)
        .with_offset(i64::MIN);
    list.scroll_to(target, &items).unwrap();
    assert!(list.on_frame(&items).is_converging());
    assert_eq!(list.scroll_top(), 900);
    assert_eq!(list.on_frame(&items), ScrollToStatus::Converged);
    assert_eq!(list.scroll_top(), 900);

    let target = ScrollTarget::index(3)
        .with_align(ScrollAlign::Bottom)
        .with_offset(i64::MIN);
    list.scroll_to(target, &items).unwrap();
    list.on_frame(&items);
    assert_eq!(list.scroll_top(), 0);
}

// VirtualList

#[test]
fn list_range_is_memoized_and_tracks_scroll() {
    let data = ids(100);
    let items = Items::new(&data, key_of);
    let mut list = VirtualList::<u64>::new(ListOptions::new(300, 50));
    cache_all(list.heights_mut(), &data, &[50; 100]);

    let r0 = list.range(&items);
    assert_eq!(r0.start_index, 0);
    assert_eq!(list.scroll_height(), 5000);
    assert_eq!(list.max_scroll_top(), 4700);

    list.sync_scroll_top(620);
    let r1 = list.range(&items);
    assert_eq!(r1.start_index, 12);
    assert_eq!(r1.offset_top, 600);
    assert_eq!(list.last_range(), Some(r1));
}

#[test]
fn list_non_virtual_mode_renders_everything() {
    let data = ids(100);
    let items = Items::new(&data, key_of);
    let mut list = VirtualList::<u64>::new(ListOptions::new(300, 50).with_virtual(false));
    list.sync_scroll_top(1000);

    let r = list.range(&items);
    assert!(!list.is_virtual());
    assert_eq!(r.indices(), 0..100);
    assert_eq!(r.scroll_height, 5000);
}

#[test]
fn list_short_data_is_not_in_virtual_mode() {
    let data = ids(3);
    let items = Items::new(&data, key_of);
    let mut list = VirtualList::<u64>::new(ListOptions::new(300, 50));
    assert!(list.is_virtual());
    assert!(!list.in_virtual(&items));
    assert_eq!(list.range(&items).indices(), 0..3);

    let horizontal = VirtualList::<u64>::new(ListOptions::new(300, 50).with_scroll_width(Some(900)));
    assert!(horizontal.in_virtual(&items));
}

#[test]
fn list_sync_scroll_top_clamps_and_notifies() {
    let seen = Arc::new(AtomicU64::new(u64::MAX));
    let data = ids(10);
    let items = Items::new(&data, key_of);
    let mut list = VirtualList::<u64>::new(ListOptions::new(100, 20).with_on_scroll(Some({
        let seen = Arc::clone(&seen);
        move |info: ScrollInfo| seen.store(info.y, Ordering::Relaxed)
    })));
    list.range(&items);

    assert_eq!(list.sync_scroll_top(-50), 0);
    // Unchanged offset: no notification.
    assert_eq!(seen.load(Ordering::Relaxed), u64::MAX);

    assert_eq!(list.sync_scroll_top(10_000), 100);
    assert_eq!(seen.load(Ordering::Relaxed), 100);
    assert!(list.is_scroll_at_bottom());
    assert!(!list.is_scroll_at_top());
}

#[test]
fn list_scroll_to_reveal_scrollbar_is_stateless() {
    let data = ids(100);
    let items = Items::new(&data, key_of);
    let mut list = VirtualList::<u64>::new(ListOptions::new(100, 20));
    list.range(&items);
    list.sync_scroll_top(300);

    let effect = list.scroll_to(None::<ScrollTarget<u64>>, &items).unwrap();
    assert_eq!(effect, ScrollEffect::RevealScrollbar);
    assert_eq!(list.scroll_top(), 300);
    assert!(!list.scroll_to_controller().is_converging());
}

#[test]
fn list_scroll_to_offsets_apply_immediately() {
    let data = ids(100);
    let items = Items::new(&data, key_of);
    let mut list = VirtualList::<u64>::new(
        ListOptions::new(100, 20)
            .with_width(200)
            .with_scroll_width(Some(500)),
    );
    list.range(&items);

    let effect = list.scroll_to(250i64, &items).unwrap();
    assert_eq!(effect, ScrollEffect::Scrolled(ScrollInfo { x: 0, y: 250 }));

    list.scroll_to(
        ScrollRequest::<u64>::Position {
            left: Some(1000),
            top: None,
        },
        &items,
    )
    .unwrap();
    assert_eq!(list.scroll_info(), ScrollInfo { x: 300, y: 250 });
    assert!(list.is_scroll_at_right());
}

#[test]
fn list_scroll_to_missing_key_leaves_offsets_alone() {
    let data = ids(100);
    let items = Items::new(&data, key_of);
    let mut list = VirtualList::<u64>::new(ListOptions::new(100, 20));
    list.range(&items);
    list.sync_scroll_top(120);

    let err = list.scroll_to(ScrollTarget::key(1), &items).unwrap_err();
    assert_eq!(err, ScrollToError::InvalidTarget);
    assert_eq!(list.on_frame(&items), ScrollToStatus::Idle);
    assert_eq!(list.scroll_top(), 120);
}

#[test]
fn list_scroll_to_converges_while_heights_are_discovered() {
    let len = 200;
    let data = ids(len);
    let real: Vec<u32> = (0..len).map(|i| if i % 3 == 0 { 40 } else { 20 }).collect();
    let items = Items::new(&data, key_of);

    let mut list = VirtualList::<u64>::new(ListOptions::new(100, 20));
    render_and_measure(&mut list, &data, &real);

    let effect = list
        .scroll_to(
            ScrollTarget::key(data[100]).with_align(ScrollAlign::Bottom),
            &items,
        )
        .unwrap();
    assert_eq!(effect, ScrollEffect::Converging);

    let mut statuses = Vec::new();
    loop {
        let status = list.on_frame(&items);
        statuses.push(status);
        if !status.is_converging() {
            break;
        }
        render_and_measure(&mut list, &data, &real);
    }

    assert_eq!(statuses.last(), Some(&ScrollToStatus::Converged));
    assert!(statuses.len() <= MAX_SCROLL_TO_ATTEMPTS as usize);

    // The target's bottom edge, as laid out with the cache, sits at the viewport bottom.
    let sizes = effective_heights(list.heights(), &data, 20);
    let bottom = expected_item_top(&sizes, 101);
    assert_eq!(list.scroll_top(), bottom - 100);
    assert_eq!(list.scroll_top(), 2020);
}

#[test]
fn list_first_measure_of_start_item_anchors_scroll() {
    let data = ids(100);
    let items = Items::new(&data, key_of);
    let mut list = VirtualList::<u64>::new(ListOptions::new(100, 20));
    list.range(&items);
    list.sync_scroll_top(30);

    let r = list.range(&items);
    assert_eq!(r.start_index, 1);
    assert_eq!(r.offset_top, 20);

    // Item 1 turned out 30px taller than estimated.
    let changed = list.collect_heights(&items, [(data[1], 50)]);
    assert_eq!(changed, 1);
    assert_eq!(list.scroll_top(), 60);
    assert_eq!(list.heights().changed_len(), 0);
}

#[test]
fn list_does_not_anchor_on_batched_or_repeated_measurements() {
    let data = ids(100);
    let items = Items::new(&data, key_of);
    let mut list = VirtualList::<u64>::new(ListOptions::new(100, 20));
    list.range(&items);
    list.sync_scroll_top(30);
    list.range(&items);

    list.collect_heights(&items, [(data[1], 50), (data[2], 50)]);
    assert_eq!(list.scroll_top(), 30);

    // Same value again: nothing written.
    let r = list.heights().revision();
    assert_eq!(list.collect_heights(&items, [(data[1], 50)]), 0);
    assert_eq!(list.heights().revision(), r);
    assert_eq!(list.scroll_top(), 30);
}

#[test]
fn list_data_change_prunes_and_detects_duplicates() {
    let data = ids(10);
    let mut list = VirtualList::<u64>::new(
        ListOptions::new(100, 20).with_prune_stale_heights(true),
    );
    cache_all(list.heights_mut(), &data, &[30; 10]);

    let next: Vec<u64> = alloc::vec![1000, 1001, 1001, 5000];
    let gen_before = list.data_generation();
    list.on_data_changed(&Items::new(&next, key_of));

    assert_eq!(list.data_generation(), gen_before + 1);
    assert_eq!(list.heights().len(), 2);
    if cfg!(debug_assertions) {
        assert_eq!(list.duplicate_key(), Some((1, 2)));
    }
}

#[test]
fn list_unmount_cancels_convergence() {
    let data = ids(100);
    let items = Items::new(&data, key_of);
    let mut list = VirtualList::<u64>::new(ListOptions::new(100, 20));
    list.range(&items);
    list.scroll_to(ScrollTarget::index(50), &items).unwrap();
    let token = list.cancel_token();

    list.unmount();
    assert!(token.is_cancelled());
    assert_eq!(list.on_frame(&items), ScrollToStatus::Cancelled);
    assert_eq!(
        list.scroll_to(ScrollTarget::index(3), &items),
        Err(ScrollToError::Cancelled)
    );
}

#[test]
fn unmounting_a_clone_leaves_the_original_usable() {
    let data = ids(100);
    let items = Items::new(&data, key_of);
    let mut list = VirtualList::<u64>::new(ListOptions::new(100, 20));
    list.range(&items);

    let mut copy = list.clone();
    copy.unmount();
    assert!(copy.cancel_token().is_cancelled());
    assert!(!list.cancel_token().is_cancelled());

    assert_eq!(
        list.scroll_to(ScrollTarget::index(3), &items),
        Ok(ScrollEffect::Converging)
    );
    assert!(list.on_frame(&items).is_converging());
    assert_eq!(
        copy.scroll_to(ScrollTarget::index(3), &items),
        Err(ScrollToError::Cancelled)
    );

    // A clone of a torn-down list stays torn down.
    let mut copy_of_copy = copy.clone();
    assert_eq!(
        copy_of_copy.scroll_to(ScrollTarget::index(3), &items),
        Err(ScrollToError::Cancelled)
    );
}

#[test]
fn raw_height_writes_do_not_leak_into_anchoring() {
    let data = ids(100);
    let items = Items::new(&data, key_of);
    let mut list = VirtualList::<u64>::new(ListOptions::new(100, 20));
    list.range(&items);
    list.sync_scroll_top(30);
    list.range(&items);

    list.record_height(data[40], 35);
    assert_eq!(list.heights().changed_len(), 0);

    list.heights_mut().set(data[41], 35);
    assert_eq!(list.heights().changed_len(), 1);
    list.on_data_changed(&items);
    assert_eq!(list.heights().changed_len(), 0);

    let r = list.range(&items);
    assert_eq!(r.start_index, 1);
    list.collect_heights(&items, [(data[1], 50)]);
    assert_eq!(list.scroll_top(), 60);
}

#[test]
fn list_initial_scroll_is_restored_from_scroll_info() {
    let list = VirtualList::<u64>::new(
        ListOptions::new(100, 20).with_initial_scroll(ScrollInfo { x: 3, y: 400 }),
    );
    assert_eq!(list.scroll_info(), ScrollInfo { x: 3, y: 400 });
}

// List diff

#[test]
fn diff_detects_single_removal() {
    let before = ids(5);
    let after: Vec<u64> = alloc::vec![1000, 1001, 1003, 1004];
    let diff = find_list_diff_index(&Items::new(&before, key_of), &Items::new(&after, key_of));
    assert_eq!(
        diff,
        Some(ListDiff {
            index: 2,
            multiple: false
        })
    );
}

#[test]
fn diff_detects_single_append() {
    let before = ids(3);
    let after = ids(4);
    let diff = find_list_diff_index(&Items::new(&before, key_of), &Items::new(&after, key_of));
    assert_eq!(
        diff,
        Some(ListDiff {
            index: 3,
            multiple: false
        })
    );
}

#[test]
fn diff_flags_multiple_changes() {
    let before = ids(5);
    let after: Vec<u64> = alloc::vec![1000, 9, 8, 1003, 1004];
    let diff = find_list_diff_index(&Items::new(&before, key_of), &Items::new(&after, key_of));
    assert_eq!(
        diff,
        Some(ListDiff {
            index: 1,
            multiple: true
        })
    );

    let shorter = ids(2);
    let diff = find_list_diff_index(&Items::new(&before, key_of), &Items::new(&shorter, key_of));
    assert_eq!(
        diff,
        Some(ListDiff {
            index: 2,
            multiple: true
        })
    );
}

#[test]
fn diff_of_identical_or_empty_lists_is_none() {
    let a = ids(4);
    let empty: Vec<u64> = Vec::new();
    assert_eq!(
        find_list_diff_index(&Items::new(&a, key_of), &Items::new(&a, key_of)),
        None
    );
    assert_eq!(
        find_list_diff_index(&Items::new(&empty, key_of), &Items::new(&empty, key_of)),
        None
    );
}

#[test]
fn item_top_walks_cached_and_estimated_heights() {
    let data = ids(5);
    let items = Items::new(&data, key_of);
    let mut list = VirtualList::<u64>::new(ListOptions::new(100, 10));
    list.record_height(data[1], 40);

    assert_eq!(list.item_top(&items, 0), Some(0));
    assert_eq!(list.item_top(&items, 2), Some(50));
    assert_eq!(list.item_top(&items, 4), Some(70));
    assert_eq!(list.item_top(&items, 5), None);
}

#[test]
fn keep_in_range_clamps_to_scrollable_area() {
    let data = ids(20);
    let items = Items::new(&data, key_of);
    let mut list = VirtualList::<u64>::new(ListOptions::new(100, 20));
    list.range(&items);

    assert_eq!(list.keep_in_range(-1), 0);
    assert_eq!(list.keep_in_range(150), 150);
    assert_eq!(list.keep_in_range(10_000), 300);
}

#[test]
fn update_options_applies_closure() {
    let mut list = VirtualList::<u64>::new(ListOptions::new(100, 20));
    list.update_options(|o| o.height = 250);
    assert_eq!(list.options().height, 250);
}
