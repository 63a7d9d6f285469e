// Example: persist measured heights across mounts, and prune heights of removed rows.
use virtual_list::{Items, ListOptions, VirtualList};

fn main() {
    let rows: Vec<u64> = (0..100).collect();
    let items = Items::new(&rows, |id: &u64| *id);

    let mut list = VirtualList::<u64>::new(ListOptions::new(200, 20).with_prune_stale_heights(true));
    list.collect_heights(&items, [(2, 64), (5, 42), (90, 33)]);

    let snapshot = list.heights().export();
    println!("exported {} heights", snapshot.len());

    // A later mount starts from the snapshot instead of estimates.
    let mut restored = VirtualList::<u64>::new(ListOptions::new(200, 20));
    restored.heights_mut().import(snapshot);
    restored.range(&items);
    println!(
        "restored: h2={:?} h5={:?} scroll_height={}",
        restored.heights().get(&2),
        restored.heights().get(&5),
        restored.scroll_height()
    );

    // Drop the tail of the data: its cached heights go with it.
    let fewer: Vec<u64> = (0..50).collect();
    list.on_data_changed(&Items::new(&fewer, |id: &u64| *id));
    println!(
        "after pruning: cached={} h90={:?}",
        list.heights().len(),
        list.heights().get(&90)
    );
}
