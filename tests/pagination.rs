mod common;

use backed_feed::error::FetchError;
use backed_feed::paginate::{PaginationEngine, PaginationOptions};
use backed_feed::signal::Signal;

use common::{page, record, GatedPages, PageCall};

struct Harness {
    first: Signal<u32>,
    next: Signal<()>,
    source: GatedPages,
    engine: PaginationEngine<GatedPages>,
}

fn harness(options: PaginationOptions) -> Harness {
    let first = Signal::new();
    let next = Signal::new();
    let source = GatedPages::new();
    let engine = PaginationEngine::new(&first, &next, source.clone(), options).unwrap();
    Harness {
        first,
        next,
        source,
        engine,
    }
}

#[tokio::test]
async fn first_page_then_next_pages_accumulate() {
    let h = harness(PaginationOptions::default());
    let items = record(&h.engine.outputs().items);
    let loading = record(&h.engine.outputs().loading);

    h.first.emit(7);
    h.source.wait_for_calls(1).await;
    assert_eq!(loading.values(), vec![true]);
    assert!(h.source.reply(0, page(&[1, 2], Some(10))));
    common::eventually("first page", || items.count() == 1).await;

    h.next.emit(());
    h.source.wait_for_calls(2).await;
    assert!(h.source.reply(1, page(&[3], None)));
    common::eventually("second page", || items.count() == 2).await;

    assert_eq!(h.source.calls(), vec![PageCall::First(7), PageCall::Next(10)]);
    assert_eq!(items.values(), vec![vec![1, 2], vec![1, 2, 3]]);
    common::eventually("loading cleared", || loading.count() == 4).await;
    assert_eq!(loading.values(), vec![true, false, true, false]);
    assert!(h.engine.is_last_page());
    assert_eq!(h.engine.items(), vec![1, 2, 3]);
}

#[tokio::test]
async fn next_page_requested_from_items_observer_stays_loading() {
    let h = harness(PaginationOptions::default());
    let loading = record(&h.engine.outputs().loading);
    let next = h.next.clone();
    let _reload = h.engine.outputs().items.observe(move |items: &Vec<u32>| {
        if items.len() < 4 {
            next.emit(());
        }
    });

    h.first.emit(1);
    h.source.wait_for_calls(1).await;
    assert!(h.source.reply(0, page(&[1, 2], Some(10))));
    h.source.wait_for_calls(2).await;
    common::settle().await;

    assert_eq!(h.source.calls(), vec![PageCall::First(1), PageCall::Next(10)]);
    assert!(h.engine.is_loading());
    assert_eq!(loading.values(), vec![true, false, true]);

    assert!(h.source.reply(1, page(&[3, 4], None)));
    common::eventually("loading cleared", || loading.count() == 4).await;
    assert_eq!(loading.values(), vec![true, false, true, false]);
    assert_eq!(h.engine.items(), vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn next_page_is_ignored_while_loading() {
    let h = harness(PaginationOptions::default());

    h.first.emit(1);
    h.source.wait_for_calls(1).await;
    h.next.emit(());
    h.next.emit(());
    common::settle().await;

    assert_eq!(h.source.calls(), vec![PageCall::First(1)]);
}

#[tokio::test]
async fn next_page_is_ignored_on_the_last_page() {
    let h = harness(PaginationOptions::default());
    let items = record(&h.engine.outputs().items);

    h.first.emit(1);
    h.source.wait_for_calls(1).await;
    h.source.reply(0, page(&[1], None));
    common::eventually("first page", || items.count() == 1).await;

    h.next.emit(());
    common::settle().await;

    assert_eq!(h.source.calls().len(), 1);
    assert!(!h.engine.is_loading());
}

#[tokio::test]
async fn new_first_page_supersedes_in_flight_fetch() {
    let h = harness(PaginationOptions::default());
    let items = record(&h.engine.outputs().items);
    let loading = record(&h.engine.outputs().loading);

    h.first.emit(1);
    h.source.wait_for_calls(1).await;
    h.first.emit(2);
    h.source.wait_for_calls(2).await;

    // The first fetch was aborted; answering it has no effect.
    assert!(h.source.reply(1, page(&[20], Some(21))));
    common::eventually("second request", || items.count() == 1).await;
    h.source.reply(0, page(&[10], Some(11)));
    common::settle().await;

    assert_eq!(items.values(), vec![vec![20]]);
    assert_eq!(h.engine.cursor(), Some(21));
    // A superseding request does not repeat `true`.
    assert_eq!(loading.values(), vec![true, false]);
}

#[tokio::test]
async fn clear_on_new_request_empties_list_immediately() {
    let h = harness(PaginationOptions {
        clear_on_new_request: true,
    });
    let items = record(&h.engine.outputs().items);

    h.first.emit(1);
    h.source.wait_for_calls(1).await;
    h.source.reply(0, page(&[1, 2], None));
    common::eventually("first page", || items.count() == 2).await;

    h.first.emit(1);
    assert_eq!(items.last(), Some(vec![]));
    assert!(h.engine.items().is_empty());
}

#[tokio::test]
async fn refresh_keeps_old_items_until_replaced() {
    let h = harness(PaginationOptions::default());
    let items = record(&h.engine.outputs().items);

    h.first.emit(1);
    h.source.wait_for_calls(1).await;
    h.source.reply(0, page(&[1, 2], Some(3)));
    common::eventually("first page", || items.count() == 1).await;

    h.first.emit(1);
    h.source.wait_for_calls(2).await;
    assert_eq!(h.engine.items(), vec![1, 2]);

    h.source.reply(1, page(&[5], None));
    common::eventually("refreshed page", || items.count() == 2).await;
    assert_eq!(items.values(), vec![vec![1, 2], vec![5]]);
}

#[tokio::test]
async fn failures_are_swallowed_and_reported() {
    let h = harness(PaginationOptions::default());
    let items = record(&h.engine.outputs().items);
    let loading = record(&h.engine.outputs().loading);
    let errors = record(&h.engine.outputs().fetch_errors);

    h.first.emit(1);
    h.source.wait_for_calls(1).await;
    h.source.reply(0, page(&[1], Some(2)));
    common::eventually("first page", || items.count() == 1).await;

    h.next.emit(());
    h.source.wait_for_calls(2).await;
    h.source.reply(1, Err(FetchError::request("boom")));
    common::eventually("failure", || errors.count() == 1).await;

    assert_eq!(errors.values(), vec![FetchError::request("boom")]);
    assert_eq!(items.values(), vec![vec![1]]);
    assert_eq!(loading.last(), Some(false));
    // The cursor survives, so the page can be retried.
    assert_eq!(h.engine.cursor(), Some(2));

    h.next.emit(());
    h.source.wait_for_calls(3).await;
    assert_eq!(h.source.calls()[2], PageCall::Next(2));
}

#[tokio::test]
async fn empty_first_page_without_cursor_is_last_page() {
    let h = harness(PaginationOptions::default());
    let items = record(&h.engine.outputs().items);

    assert!(!h.engine.is_last_page());
    h.first.emit(1);
    h.source.wait_for_calls(1).await;
    h.source.reply(0, page(&[], None));
    common::eventually("empty page", || items.count() == 1).await;

    assert_eq!(items.values(), vec![Vec::<u32>::new()]);
    assert!(h.engine.is_last_page());
}
