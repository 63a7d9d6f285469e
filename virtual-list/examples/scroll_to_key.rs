// Example: scroll to a key while row heights are still being discovered.
//
// The host loop is: compute the range, "render" it (here: look up the real heights), report the
// measurements, then run one convergence pass. Repeat while the pass reports `Converging`.
use virtual_list::{Items, ListOptions, ScrollAlign, ScrollTarget, ScrollToStatus, VirtualList};

fn real_height(id: u64) -> u32 {
    // Every fifth row wraps onto a second line.
    if id % 5 == 0 { 48 } else { 24 }
}

fn render(list: &mut VirtualList<u64>, items: &Items<'_, u64, fn(&u64) -> u64>) {
    let range = list.range(items);
    let measured: Vec<(u64, u32)> = range
        .indices()
        .filter_map(|i| items.key_at(i))
        .map(|id| (id, real_height(id)))
        .collect();
    list.collect_heights(items, measured);
}

fn main() {
    let rows: Vec<u64> = (0..10_000).collect();
    let items: Items<'_, u64, fn(&u64) -> u64> = Items::new(&rows, |id| *id);

    let mut list = VirtualList::<u64>::new(ListOptions::new(400, 24));
    list.on_data_changed(&items);
    render(&mut list, &items);

    let target = ScrollTarget::key(7_500).with_align(ScrollAlign::Bottom);
    if let Err(err) = list.scroll_to(target, &items) {
        eprintln!("scroll_to failed: {err}");
        return;
    }

    let mut frames = 0;
    loop {
        frames += 1;
        match list.on_frame(&items) {
            ScrollToStatus::Converging { times_attempted } => {
                println!("frame {frames}: pass {times_attempted}, offset={}", list.scroll_top());
                render(&mut list, &items);
            }
            status => {
                println!("frame {frames}: {status:?}, offset={}", list.scroll_top());
                break;
            }
        }
    }

    let range = list.range(&items);
    println!("rendered rows {:?}", range.indices());
}
