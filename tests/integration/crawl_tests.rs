//! End-to-end crawl tests against stub transports

use crate::common::{no_results_page, page_path, results_page, single_page, StubTransport};
use onion_spider::config::Config;
use onion_spider::crawler::Coordinator;
use onion_spider::{CrawlState, RequestBuilder, ResultPage, SpiderError};
use std::sync::Arc;
use std::time::Duration;

fn coordinator(stub: &Arc<StubTransport>) -> Coordinator {
    Coordinator::with_transport(&Config::default(), stub.clone()).expect("coordinator")
}

fn indices(pages: &[ResultPage]) -> Vec<u32> {
    let mut indices: Vec<u32> = pages.iter().map(ResultPage::page_index).collect();
    indices.sort_unstable();
    indices
}

#[tokio::test]
async fn test_full_paginated_crawl() {
    let stub = Arc::new(
        StubTransport::new()
            .page(&page_path("ssh", 1), results_page("ssh", 1, &[1, 2, 3], false))
            .page(&page_path("ssh", 2), results_page("ssh", 2, &[1, 2, 3, 4], false))
            .page(&page_path("ssh", 3), results_page("ssh", 3, &[2, 3, 4], false))
            .page(&page_path("ssh", 4), results_page("ssh", 4, &[3, 4], true)),
    );
    let coordinator = coordinator(&stub);
    let handled = coordinator.handled();

    let (pages, outcome) = coordinator.start("ssh").collect().await;
    let summary = outcome.expect("crawl should succeed");

    assert_eq!(indices(&pages), vec![1, 2, 3, 4]);
    assert_eq!(summary.pages, 4);
    assert_eq!(summary.dispatched, 4);
    assert_eq!(summary.total.as_deref(), Some("57 results"));
    assert!(!summary.interrupted);

    for index in 1..=4 {
        assert_eq!(stub.times_seen(&page_path("ssh", index)), 1, "page {}", index);
    }
    assert_eq!(handled.len(), 4);
    assert_eq!(handled.count_in(CrawlState::Done), 4);

    let last = pages.iter().find(|p| p.page_index() == 4).unwrap();
    assert!(last.is_last);
    assert!(last.links.is_empty());
    let first = pages.iter().find(|p| p.page_index() == 1).unwrap();
    assert!(first.is_root);
    assert_eq!(first.hits.len(), 2);
    assert_eq!(first.hits[0].title, "ssh hit 1a");
}

#[tokio::test]
async fn test_concurrent_discoveries_fetch_once() {
    // Pages 2 and 3 finish together and both list 4 and 5
    let stub = Arc::new(
        StubTransport::new()
            .page(&page_path("tor", 1), results_page("tor", 1, &[1, 2, 3], false))
            .page(&page_path("tor", 2), results_page("tor", 2, &[1, 2, 3, 4, 5], false))
            .page(&page_path("tor", 3), results_page("tor", 3, &[1, 2, 3, 4, 5], false))
            .page(&page_path("tor", 4), results_page("tor", 4, &[3, 4, 5], false))
            .page(&page_path("tor", 5), results_page("tor", 5, &[4, 5], true))
            .delayed(&page_path("tor", 2), Duration::from_millis(30))
            .delayed(&page_path("tor", 3), Duration::from_millis(30)),
    );

    let (pages, outcome) = coordinator(&stub).start("tor").collect().await;
    let summary = outcome.unwrap();

    assert_eq!(indices(&pages), vec![1, 2, 3, 4, 5]);
    assert_eq!(summary.dispatched, 5);
    assert_eq!(stub.seen().len(), 5);
    assert_eq!(stub.times_seen(&page_path("tor", 4)), 1);
    assert_eq!(stub.times_seen(&page_path("tor", 5)), 1);
}

#[tokio::test]
async fn test_single_page_result() {
    let stub = Arc::new(StubTransport::new().page(&page_path("rare", 1), single_page("rare")));

    let (pages, outcome) = coordinator(&stub).start("rare").collect().await;
    let summary = outcome.unwrap();

    assert_eq!(pages.len(), 1);
    assert!(pages[0].is_root);
    assert!(!pages[0].is_paginated);
    assert_eq!(summary.total.as_deref(), Some("1 result"));
    assert_eq!(stub.seen(), vec!["GET /search?query=rare\n".to_string()]);
}

#[tokio::test]
async fn test_no_results_fails_and_emits_nothing() {
    let stub = Arc::new(StubTransport::new().page(&page_path("zzz", 1), no_results_page()));
    let coordinator = coordinator(&stub);
    let handled = coordinator.handled();

    let (pages, outcome) = coordinator.start("zzz").collect().await;

    assert!(pages.is_empty());
    assert!(matches!(outcome, Err(SpiderError::NoResults { .. })));
    assert_eq!(handled.count_in(CrawlState::Failed), 1);
}

#[tokio::test]
async fn test_no_results_on_later_page_is_fatal() {
    let stub = Arc::new(
        StubTransport::new()
            .page(&page_path("odd", 1), results_page("odd", 1, &[1, 2], false))
            .page(&page_path("odd", 2), no_results_page()),
    );

    let (pages, outcome) = coordinator(&stub).start("odd").collect().await;

    assert_eq!(indices(&pages), vec![1]);
    assert!(matches!(outcome, Err(SpiderError::NoResults { query }) if query == "odd"));
}

#[tokio::test]
async fn test_transport_failure_aborts_crawl() {
    let stub = Arc::new(
        StubTransport::new()
            .page(&page_path("dns", 1), results_page("dns", 1, &[1, 2, 3], false))
            .failing(&page_path("dns", 2))
            .page(&page_path("dns", 3), results_page("dns", 3, &[2, 3], true))
            .delayed(&page_path("dns", 3), Duration::from_secs(2)),
    );
    let coordinator = coordinator(&stub);
    let handled = coordinator.handled();

    let started = std::time::Instant::now();
    let (pages, outcome) = coordinator.start("dns").collect().await;

    assert_eq!(indices(&pages), vec![1]);
    assert!(matches!(outcome, Err(SpiderError::Io { .. })));
    let failed = RequestBuilder::default().build(&page_path("dns", 2));
    assert_eq!(handled.state_of(&failed), CrawlState::Failed);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_failure_cancels_sibling_fetches() {
    let stub = Arc::new(
        StubTransport::new()
            .page(&page_path("ftp", 1), results_page("ftp", 1, &[1, 2, 3], false))
            .failing(&page_path("ftp", 2))
            .page(&page_path("ftp", 3), results_page("ftp", 3, &[2, 3], true))
            .delayed(&page_path("ftp", 3), Duration::from_millis(300)),
    );

    let (_, outcome) = coordinator(&stub).start("ftp").collect().await;
    assert!(outcome.is_err());

    tokio::time::sleep(Duration::from_millis(600)).await;
    let sibling = format!("GET {}\n", page_path("ftp", 3));
    assert!(
        !stub.finished().contains(&sibling),
        "sibling exchange ran to completion after the crawl failed"
    );
}

#[tokio::test]
async fn test_each_coordinator_crawls_with_fresh_handled_set() {
    let stub = Arc::new(
        StubTransport::new()
            .page(&page_path("irc", 1), results_page("irc", 1, &[1, 2], false))
            .page(&page_path("irc", 2), results_page("irc", 2, &[1, 2], true)),
    );

    for round in 1..=2 {
        let coordinator = coordinator(&stub);
        let handled = coordinator.handled();

        let (pages, outcome) = coordinator.start("irc").collect().await;
        let summary = outcome.unwrap();

        assert_eq!(indices(&pages), vec![1, 2], "round {}", round);
        assert_eq!(summary.dispatched, 2);
        assert_eq!(handled.len(), 2);
        assert_eq!(stub.times_seen(&page_path("irc", 2)), round);
    }
}

#[tokio::test]
async fn test_path_query_starts_mid_result_set() {
    let stub = Arc::new(
        StubTransport::new()
            .page(&page_path("web", 3), results_page("web", 3, &[2, 3, 4], false))
            .page(&page_path("web", 4), results_page("web", 4, &[3, 4], true)),
    );

    let (pages, outcome) = coordinator(&stub)
        .start(page_path("web", 3))
        .collect()
        .await;
    let summary = outcome.unwrap();

    assert_eq!(indices(&pages), vec![3, 4]);
    assert_eq!(summary.total, None);
    assert_eq!(stub.times_seen(&page_path("web", 2)), 0);
}

#[tokio::test]
async fn test_dropping_consumer_stops_crawl() {
    let stub = Arc::new(
        StubTransport::new()
            .page(&page_path("big", 1), results_page("big", 1, &[1, 2, 3], false))
            .page(&page_path("big", 2), results_page("big", 2, &[1, 2, 3], false))
            .page(&page_path("big", 3), results_page("big", 3, &[2, 3], true))
            .delayed(&page_path("big", 2), Duration::from_millis(100))
            .delayed(&page_path("big", 3), Duration::from_millis(100)),
    );

    let mut crawl = coordinator(&stub).start("big");
    let first = crawl.next_page().await.expect("first page");
    assert_eq!(first.page_index(), 1);

    let summary = crawl.finish().await.unwrap();
    assert!(summary.interrupted);
    assert_eq!(summary.pages, 1);
}

#[tokio::test]
async fn test_query_is_truncated_at_delimiter() {
    let stub = Arc::new(StubTransport::new().page(&page_path("nginx", 1), single_page("nginx")));

    let (pages, outcome) = coordinator(&stub)
        .start("nginx&page=7")
        .collect()
        .await;

    assert!(outcome.is_ok());
    assert_eq!(pages.len(), 1);
    assert_eq!(stub.seen(), vec!["GET /search?query=nginx\n".to_string()]);
}
