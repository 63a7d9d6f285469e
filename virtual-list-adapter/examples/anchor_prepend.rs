use virtual_list::{Items, ListOptions, VirtualList};
use virtual_list_adapter::{apply_anchor, capture_first_visible_anchor};

fn main() {
    // Example: preserve visual scroll position across "prepend" (chat/timeline load older messages).
    //
    // The adapter flow is typically:
    // 1) capture an anchor (key + offset_in_viewport) before data changes
    // 2) swap the data and call `on_data_changed`
    // 3) apply the anchor to adjust the scroll offset so the same row stays in the same place
    let messages: Vec<u64> = (1000..1100).collect();
    let items = Items::new(&messages, |id: &u64| *id);

    let mut list = VirtualList::<u64>::new(ListOptions::new(200, 24));
    list.range(&items);
    list.sync_scroll_top(1210);
    list.range(&items);

    let Some(anchor) = capture_first_visible_anchor(&list, &items) else {
        println!("nothing rendered yet");
        return;
    };
    println!("before prepend: off={} anchor={anchor:?}", list.scroll_top());

    // Load 20 older messages above.
    let older: Vec<u64> = (980..1000).chain(messages.iter().copied()).collect();
    let items = Items::new(&older, |id: &u64| *id);
    list.on_data_changed(&items);

    let ok = apply_anchor(&mut list, &anchor, &items);
    println!("after prepend: ok={ok} off={}", list.scroll_top());
}
