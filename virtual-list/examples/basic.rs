// Example: minimal usage: compute the range for a scroll offset, then scroll by offset.
use virtual_list::{Items, ListOptions, VirtualList};

fn main() {
    let rows: Vec<u64> = (0..1_000_000).collect();
    let items = Items::new(&rows, |id: &u64| *id);

    let mut list = VirtualList::<u64>::new(ListOptions::new(300, 20));
    let range = list.range(&items);
    println!("scroll_height={}", list.scroll_height());
    println!("range at top={range:?}");

    list.sync_scroll_top(123_456);
    let range = list.range(&items);
    println!(
        "range at {}: rows {:?} from offset_top={}",
        list.scroll_top(),
        range.indices(),
        range.offset_top
    );

    // Out-of-range offsets are clamped.
    let applied = list.sync_scroll_top(i64::MAX);
    println!("clamped to max_scroll_top={applied}");
}
