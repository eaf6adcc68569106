//! Tests for the debounced sub-search
//!
//! Time is paused: sleeps advance the tokio clock instantly, so quiet
//! periods and slow backends are exact.

use super::fixtures::{MockBackend, sample_docs};
use crate::subsearch::{DEFAULT_DEBOUNCE, PAGE_SIZE, SearchOutcome, SubSearch, SubSearchState};
use cmdmenu_types::{CollectionSearch, Document};
use std::sync::Arc;
use std::time::Duration;

fn target() -> CollectionSearch {
    CollectionSearch {
        slug: "posts".to_string(),
        label: "Posts".to_string(),
        title_field: "title".to_string(),
        title_field_label: "Title".to_string(),
    }
}

fn labels(search: &SubSearch<MockBackend>) -> Vec<&str> {
    search.items().iter().map(|i| i.label.as_str()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_request_waits_for_quiet_period() {
    let backend = Arc::new(MockBackend::new(sample_docs()));
    let (mut search, mut rx) = SubSearch::new(Arc::clone(&backend), DEFAULT_DEBOUNCE);

    search.schedule(&target(), "post", None);
    assert_eq!(search.state(), SubSearchState::Loading);

    tokio::time::sleep(Duration::from_millis(299)).await;
    assert!(backend.list_requests().is_empty());

    let outcome = rx.recv().await.unwrap();
    assert!(search.apply(outcome));
    assert_eq!(backend.list_filters(), vec![Some("post".to_string())]);
    assert_eq!(labels(&search), vec!["Post about Rust", "Second post"]);
    assert_eq!(search.state(), SubSearchState::Ready);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_edits_issue_one_request() {
    let backend = Arc::new(MockBackend::new(sample_docs()));
    let (mut search, mut rx) = SubSearch::new(Arc::clone(&backend), DEFAULT_DEBOUNCE);

    for query in ["p", "po", "pos", "post"] {
        search.schedule(&target(), query, None);
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    let outcome = rx.recv().await.unwrap();
    assert!(search.apply(outcome));
    assert_eq!(backend.list_filters(), vec![Some("post".to_string())]);
}

#[tokio::test(start_paused = true)]
async fn test_request_carries_listing_parameters() {
    let backend = Arc::new(MockBackend::new(sample_docs()));
    let (mut search, mut rx) = SubSearch::new(Arc::clone(&backend), DEFAULT_DEBOUNCE);

    search.schedule(&target(), "   ", None);
    rx.recv().await.unwrap();

    let requests = backend.list_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].slug, "posts");
    assert_eq!(requests[0].title_field, "title");
    assert_eq!(requests[0].filter, None);
    assert_eq!(requests[0].limit, PAGE_SIZE);
}

#[tokio::test(start_paused = true)]
async fn test_page_size_caps_results() {
    let docs: Vec<Document> = (0..25)
        .map(|i| Document {
            id: i.to_string(),
            title: None,
        })
        .collect();
    let backend = Arc::new(MockBackend::new(docs));
    let (mut search, mut rx) = SubSearch::new(backend, DEFAULT_DEBOUNCE);

    search.schedule(&target(), "", None);
    let outcome = rx.recv().await.unwrap();
    search.apply(outcome);
    assert_eq!(search.items().len(), PAGE_SIZE);
}

#[tokio::test(start_paused = true)]
async fn test_slow_earlier_request_never_overwrites_later_one() {
    let backend = Arc::new(
        MockBackend::new(sample_docs())
            .with_delay("x", 500)
            .with_delay("xy", 10),
    );
    let (mut search, mut rx) = SubSearch::new(Arc::clone(&backend), DEFAULT_DEBOUNCE);

    search.schedule(&target(), "x", None);
    // A's quiet period is over and its request is in flight
    tokio::time::sleep(Duration::from_millis(350)).await;
    search.schedule(&target(), "xy", None);

    let outcome = rx.recv().await.unwrap();
    assert!(search.apply(outcome));
    assert_eq!(labels(&search), vec!["xylophone"]);

    // Nothing else arrives: A was cancelled
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(rx.try_recv().is_err());
    assert_eq!(
        backend.list_filters(),
        vec![Some("x".to_string()), Some("xy".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn test_stale_outcome_discarded() {
    let backend = Arc::new(MockBackend::new(sample_docs()));
    let (mut search, mut rx) = SubSearch::new(backend, DEFAULT_DEBOUNCE);

    search.schedule(&target(), "x", None);
    let first = rx.recv().await.unwrap();

    search.schedule(&target(), "xy", None);
    assert!(!search.apply(first));
    assert!(search.is_loading());
    assert!(search.items().is_empty());

    let second = rx.recv().await.unwrap();
    assert!(search.apply(second));
    assert_eq!(labels(&search), vec!["xylophone"]);
}

#[tokio::test(start_paused = true)]
async fn test_outcome_from_unknown_generation_discarded() {
    let backend = Arc::new(MockBackend::new(sample_docs()));
    let (mut search, _rx) = SubSearch::new(backend, DEFAULT_DEBOUNCE);
    search.schedule(&target(), "x", None);

    let forged = SearchOutcome {
        generation: search.generation() + 1,
        result: Ok(sample_docs()),
    };
    assert!(!search.apply(forged));
    assert!(search.is_loading());
}

#[tokio::test(start_paused = true)]
async fn test_failed_listing_yields_empty_results() {
    let backend = Arc::new(MockBackend::new(sample_docs()).failing());
    let (mut search, mut rx) = SubSearch::new(backend, DEFAULT_DEBOUNCE);

    search.schedule(&target(), "post", None);
    let outcome = rx.recv().await.unwrap();
    assert!(outcome.result.is_err());

    assert!(search.apply(outcome));
    assert!(search.items().is_empty());
    assert!(!search.is_loading());
    assert_eq!(search.state(), SubSearchState::Ready);
}

#[tokio::test(start_paused = true)]
async fn test_reset_cancels_pending_request() {
    let backend = Arc::new(MockBackend::new(sample_docs()));
    let (mut search, mut rx) = SubSearch::new(Arc::clone(&backend), DEFAULT_DEBOUNCE);

    search.schedule(&target(), "post", None);
    tokio::time::sleep(Duration::from_millis(100)).await;
    search.reset();

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(rx.try_recv().is_err());
    assert!(backend.list_requests().is_empty());
    assert_eq!(search.state(), SubSearchState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_outcome_after_reset_discarded() {
    let backend = Arc::new(MockBackend::new(sample_docs()));
    let (mut search, mut rx) = SubSearch::new(backend, DEFAULT_DEBOUNCE);

    search.schedule(&target(), "post", None);
    let outcome = rx.recv().await.unwrap();
    search.reset();

    assert!(!search.apply(outcome));
    assert!(search.items().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_custom_debounce_and_icon() {
    let backend = Arc::new(MockBackend::new(sample_docs()));
    let (mut search, mut rx) = SubSearch::new(Arc::clone(&backend), DEFAULT_DEBOUNCE);
    search.set_debounce(Duration::from_millis(50));

    search.schedule(&target(), "hello", Some("newspaper".to_string()));
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(backend.list_requests().len(), 1);

    let outcome = rx.recv().await.unwrap();
    search.apply(outcome);
    let item = &search.items()[0];
    assert_eq!(item.slug, "posts-1");
    assert_eq!(item.icon.as_deref(), Some("newspaper"));
}
