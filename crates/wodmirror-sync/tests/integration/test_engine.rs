//! Integration tests for the SyncEngine against an in-memory feed and a
//! temporary store directory.

use url::Url;
use wodmirror_core::domain::{PublishedAt, Record};
use wodmirror_core::ports::IRecordStore;
use wodmirror_sync::engine::{StopReason, SyncMode};
use wodmirror_sync::store::JsonRecordStore;

use crate::common::{absolute, artifact_names, engine, key_for, FakeFeed};

/// page 1: a, b / page 2: c / page 3: empty
fn three_post_feed() -> std::sync::Arc<FakeFeed> {
    let feed = FakeFeed::new();
    feed.listing(1, &[("a", "2024-01-03"), ("b", "2024-01-02")]);
    feed.listing(2, &[("c", "2024-01-01")]);
    feed.listing(3, &[]);
    feed.post("a", "<p>Run 1 mile</p>");
    feed.post("b", "<p>Row 2k</p>");
    feed.post("c", "<p>Rest day</p>");
    feed
}

/// Writes a record for `slug` straight into the store, as an earlier run would have
async fn seed(store: &JsonRecordStore, slug: &str, datetime: &str, content: &str) {
    let record = Record {
        published_at: PublishedAt::new(datetime.to_string()).unwrap(),
        content: content.to_string(),
        image_url: String::new(),
        source_url: Url::parse(&absolute(&format!("/{slug}/"))).unwrap(),
    };
    store.write(&record.key(), &record).await.unwrap();
}

#[tokio::test]
async fn test_first_run_walks_to_end_of_feed() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonRecordStore::new(dir.path().join("workouts"));
    let feed = three_post_feed();

    let report = engine(&feed, &store, 10)
        .sync(SyncMode::Incremental)
        .await
        .unwrap();

    assert_eq!(report.stop_reason, StopReason::EndOfFeed { page: 3 });
    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.records_written, 3);
    assert_eq!(report.records_skipped, 0);

    assert_eq!(
        feed.fetched(),
        vec![
            absolute("/page/1/"),
            absolute("/a/"),
            absolute("/b/"),
            absolute("/page/2/"),
            absolute("/c/"),
            absolute("/page/3/"),
        ]
    );

    let mut expected = vec![
        key_for("a", "2024-01-03").file_name(),
        key_for("b", "2024-01-02").file_name(),
        key_for("c", "2024-01-01").file_name(),
    ];
    expected.sort();
    assert_eq!(artifact_names(store.root()), expected);
}

#[tokio::test]
async fn test_written_record_contents() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonRecordStore::new(dir.path());
    let feed = FakeFeed::new();
    feed.listing(1, &[("monday", "2024-01-15T06:00:00.000Z")]);
    feed.listing(2, &[]);
    feed.post("monday", "<p>Foo</p><p>Bar</p>");

    engine(&feed, &store, 10)
        .sync(SyncMode::Incremental)
        .await
        .unwrap();

    let key = key_for("monday", "2024-01-15T06:00:00.000Z");
    let record = store.read(&key).await.unwrap().expect("record written");
    assert_eq!(record.published_at.as_str(), "2024-01-15T06:00:00.000Z");
    assert_eq!(record.content, "Foo\nBar");
    assert_eq!(record.image_url, absolute("/content/images/monday.jpg"));
    assert_eq!(record.source_url.as_str(), absolute("/monday/"));
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonRecordStore::new(dir.path());
    let feed = three_post_feed();

    engine(&feed, &store, 10)
        .sync(SyncMode::Incremental)
        .await
        .unwrap();
    let names = artifact_names(store.root());
    let bytes_before: Vec<Vec<u8>> = names
        .iter()
        .map(|n| std::fs::read(dir.path().join(n)).unwrap())
        .collect();

    feed.clear_log();
    let report = engine(&feed, &store, 10)
        .sync(SyncMode::Incremental)
        .await
        .unwrap();

    assert_eq!(report.records_written, 0);
    assert_eq!(
        report.stop_reason,
        StopReason::CaughtUp {
            key: key_for("a", "2024-01-03"),
            page: 1,
        }
    );
    assert_eq!(feed.fetched(), vec![absolute("/page/1/"), absolute("/a/")]);

    assert_eq!(artifact_names(store.root()), names);
    let bytes_after: Vec<Vec<u8>> = names
        .iter()
        .map(|n| std::fs::read(dir.path().join(n)).unwrap())
        .collect();
    assert_eq!(bytes_before, bytes_after);
}

#[tokio::test]
async fn test_incremental_stops_at_first_existing_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonRecordStore::new(dir.path());
    seed(&store, "b", "2024-01-02", "captured earlier").await;

    let feed = FakeFeed::new();
    feed.listing(1, &[("a", "2024-01-03"), ("b", "2024-01-02"), ("c", "2024-01-01")]);
    feed.listing(2, &[("d", "2023-12-31")]);
    feed.post("a", "<p>A</p>");
    feed.post("b", "<p>B</p>");
    feed.post("c", "<p>C</p>");
    feed.post("d", "<p>D</p>");

    let report = engine(&feed, &store, 10)
        .sync(SyncMode::Incremental)
        .await
        .unwrap();

    assert_eq!(report.records_written, 1);
    assert_eq!(report.pages_visited, 1);
    assert_eq!(
        report.stop_reason,
        StopReason::CaughtUp {
            key: key_for("b", "2024-01-02"),
            page: 1,
        }
    );

    // Nothing after the existing record is touched
    assert!(!feed.was_fetched("/c/"));
    assert!(!feed.was_fetched("/page/2/"));

    let b = store.read(&key_for("b", "2024-01-02")).await.unwrap().unwrap();
    assert_eq!(b.content, "captured earlier");
    assert!(store.read(&key_for("c", "2024-01-01")).await.unwrap().is_none());
    assert!(store.read(&key_for("a", "2024-01-03")).await.unwrap().is_some());
}

#[tokio::test]
async fn test_only_new_posts_are_written_after_prepend() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonRecordStore::new(dir.path());
    let feed = three_post_feed();

    engine(&feed, &store, 10)
        .sync(SyncMode::Incremental)
        .await
        .unwrap();

    // Two new posts push "b" onto page 2
    feed.listing(1, &[("e", "2024-01-05"), ("d", "2024-01-04")]);
    feed.listing(2, &[("a", "2024-01-03"), ("b", "2024-01-02")]);
    feed.listing(3, &[("c", "2024-01-01")]);
    feed.listing(4, &[]);
    feed.post("d", "<p>D</p>");
    feed.post("e", "<p>E</p>");
    feed.clear_log();

    let report = engine(&feed, &store, 10)
        .sync(SyncMode::Incremental)
        .await
        .unwrap();

    assert_eq!(report.records_written, 2);
    assert_eq!(report.pages_visited, 2);
    assert_eq!(
        report.stop_reason,
        StopReason::CaughtUp {
            key: key_for("a", "2024-01-03"),
            page: 2,
        }
    );
    assert!(!feed.was_fetched("/b/"));
    assert!(!feed.was_fetched("/page/3/"));
    assert_eq!(artifact_names(store.root()).len(), 5);
}

#[tokio::test]
async fn test_full_mode_walks_past_existing_without_overwriting() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonRecordStore::new(dir.path());
    seed(&store, "b", "2024-01-02", "captured earlier").await;

    let feed = FakeFeed::new();
    feed.listing(1, &[("a", "2024-01-03"), ("b", "2024-01-02"), ("c", "2024-01-01")]);
    feed.listing(2, &[("d", "2023-12-31")]);
    feed.listing(3, &[]);
    feed.post("a", "<p>A</p>");
    feed.post("b", "<p>B</p>");
    feed.post("c", "<p>C</p>");
    feed.post("d", "<p>D</p>");

    let report = engine(&feed, &store, 10).sync(SyncMode::Full).await.unwrap();

    assert_eq!(report.mode, SyncMode::Full);
    assert_eq!(report.stop_reason, StopReason::EndOfFeed { page: 3 });
    assert_eq!(report.records_written, 3);
    assert_eq!(report.records_skipped, 1);
    assert!(feed.was_fetched("/c/"));
    assert!(feed.was_fetched("/page/2/"));

    let b = store.read(&key_for("b", "2024-01-02")).await.unwrap().unwrap();
    assert_eq!(b.content, "captured earlier");
    assert_eq!(artifact_names(store.root()).len(), 4);
}

#[tokio::test]
async fn test_empty_first_page_ends_run() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonRecordStore::new(dir.path().join("workouts"));
    let feed = FakeFeed::new();
    feed.listing(1, &[]);

    let report = engine(&feed, &store, 10)
        .sync(SyncMode::Incremental)
        .await
        .unwrap();

    assert_eq!(report.stop_reason, StopReason::EndOfFeed { page: 1 });
    assert_eq!(report.pages_visited, 1);
    assert_eq!(report.records_written, 0);
    assert_eq!(feed.fetched(), vec![absolute("/page/1/")]);
    assert!(artifact_names(store.root()).is_empty());
}

#[tokio::test]
async fn test_page_limit_is_inclusive() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonRecordStore::new(dir.path());
    let feed = FakeFeed::new();
    feed.listing(1, &[("a", "2024-01-03")]);
    feed.listing(2, &[("b", "2024-01-02")]);
    feed.listing(3, &[("c", "2024-01-01")]);
    feed.post("a", "<p>A</p>");
    feed.post("b", "<p>B</p>");
    feed.post("c", "<p>C</p>");

    let report = engine(&feed, &store, 2)
        .sync(SyncMode::Incremental)
        .await
        .unwrap();

    assert_eq!(report.stop_reason, StopReason::PageLimit { max_pages: 2 });
    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.records_written, 2);
    assert!(!feed.was_fetched("/page/3/"));
}

#[tokio::test]
async fn test_listing_structure_error_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonRecordStore::new(dir.path());
    let feed = FakeFeed::new();
    feed.serve(
        "/page/1/",
        r#"<html><body><article><a href="/a/">no date</a></article></body></html>"#,
    );
    feed.post("a", "<p>A</p>");

    let err = engine(&feed, &store, 10)
        .sync(SyncMode::Incremental)
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("Failed to parse listing page 1"));
    assert!(!feed.was_fetched("/a/"));
    assert!(artifact_names(store.root()).is_empty());
}

#[tokio::test]
async fn test_missing_body_is_fatal_and_keeps_earlier_records() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonRecordStore::new(dir.path());
    let feed = FakeFeed::new();
    feed.listing(1, &[("a", "2024-01-03"), ("b", "2024-01-02")]);
    feed.post("a", "<p>A</p>");
    feed.serve("/b/", "<html><body><article><p>no body block</p></article></body></html>");

    let err = engine(&feed, &store, 10)
        .sync(SyncMode::Incremental)
        .await
        .unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("Failed to extract post"));
    assert!(message.contains(&absolute("/b/")));
    assert_eq!(
        artifact_names(store.root()),
        vec![key_for("a", "2024-01-03").file_name()]
    );
}

#[tokio::test]
async fn test_fetch_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonRecordStore::new(dir.path());
    let feed = FakeFeed::new();
    feed.listing(1, &[("a", "2024-01-03")]);

    let err = engine(&feed, &store, 10)
        .sync(SyncMode::Incremental)
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("Failed to fetch post"));
    assert!(artifact_names(store.root()).is_empty());
}

#[tokio::test]
async fn test_missing_listing_page_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonRecordStore::new(dir.path());
    let feed = FakeFeed::new();
    feed.listing(1, &[("a", "2024-01-03")]);
    feed.post("a", "<p>A</p>");

    let err = engine(&feed, &store, 10)
        .sync(SyncMode::Incremental)
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("Failed to fetch listing page 2"));
    assert_eq!(artifact_names(store.root()).len(), 1);
}

#[tokio::test]
async fn test_runs_produce_identical_bytes() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let feed = three_post_feed();

    for dir in [&first, &second] {
        let store = JsonRecordStore::new(dir.path());
        engine(&feed, &store, 10)
            .sync(SyncMode::Incremental)
            .await
            .unwrap();
    }

    let names = artifact_names(first.path());
    assert_eq!(names, artifact_names(second.path()));
    for name in names {
        assert_eq!(
            std::fs::read(first.path().join(&name)).unwrap(),
            std::fs::read(second.path().join(&name)).unwrap(),
            "artifact {name} differs"
        );
    }
}
