use virtual_list::{Items, ListOptions, ScrollAlign, ScrollTarget};
use virtual_list_adapter::{Controller, WheelEvent};

fn main() {
    // Example: drive the controller from a (simulated) animation frame loop.
    //
    // Input events are fed as they arrive; `tick` runs once per frame and returns everything the
    // host needs to paint. Heights are reported after the rows were laid out.
    let rows: Vec<u64> = (0..5_000).collect();
    let items = Items::new(&rows, |id: &u64| *id);
    let height_of = |id: u64| if id % 3 == 0 { 36 } else { 18 };

    let mut c = Controller::<u64>::new(ListOptions::new(240, 18));
    let mut now_ms = 0u64;

    let frame = |c: &mut Controller<u64>, now_ms: u64| {
        let out = c.tick(now_ms, &items);
        let measured: Vec<(u64, u32)> = out
            .range
            .indices()
            .map(|i| (rows[i], height_of(rows[i])))
            .collect();
        c.collect_heights(&items, measured);
        out
    };

    frame(&mut c, now_ms);

    // A burst of wheel events within one frame becomes a single offset update.
    for _ in 0..5 {
        c.on_wheel(&items, WheelEvent::vertical(40.0), now_ms);
    }
    now_ms += 16;
    let out = frame(&mut c, now_ms);
    println!(
        "after wheel: offset={} rows={:?} scrollbar_visible={}",
        out.scroll.y,
        out.range.indices(),
        out.scrollbar_visible
    );

    let target = ScrollTarget::index(4_000).with_align(ScrollAlign::Top);
    if let Err(err) = c.scroll_to(target, &items, now_ms) {
        eprintln!("scroll_to failed: {err}");
        return;
    }
    loop {
        now_ms += 16;
        let out = frame(&mut c, now_ms);
        if !out.scroll_to.is_converging() {
            println!(
                "scroll_to: {:?} offset={} first_row={}",
                out.scroll_to, out.scroll.y, out.range.start_index
            );
            break;
        }
    }
}
