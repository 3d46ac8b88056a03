//! Integration tests for ddb-walker
//!
//! These drive the full scan → classify → reconcile pipeline against the
//! in-memory table. No DynamoDB instance is needed.

use chrono::{TimeZone, Utc};
use ddb_walker::record::{classify, Classified, Collection, RawRecord, SavedItem};
use ddb_walker::store::MemoryTable;
use ddb_walker::walker::{ScanCompletion, ScanCoordinator, ScanOptions};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;
use uuid::Uuid;

const CID: &str = "9d4c6a1e-2b3f-4a5d-8c7e-1f2a3b4c5d6e";

fn collection_row(user: &str, object_id: &str, kind: &str, modified: &str) -> RawRecord {
    RawRecord::new()
        .with("userAndCollection", user)
        .with("referencedObjectId", object_id)
        .with("collectionType", kind)
        .with("contentType", "recipe")
        .with("lastModified", modified)
}

fn recipe_row(key: &str, recipe_id: &str) -> RawRecord {
    RawRecord::new()
        .with("userAndCollection", key)
        .with("referencedObjectId", recipe_id)
}

async fn run(table: MemoryTable, options: ScanOptions) -> ddb_walker::ScanReport {
    let coordinator = ScanCoordinator::new(table, options);
    tokio::time::timeout(Duration::from_secs(10), coordinator.run())
        .await
        .expect("scan did not terminate")
        .expect("scan failed")
}

/// Records the level of every event emitted while installed
#[derive(Clone, Default)]
struct LevelLog(Arc<Mutex<Vec<Level>>>);

impl LevelLog {
    fn count(&self, level: Level) -> usize {
        self.0.lock().unwrap().iter().filter(|l| **l == level).count()
    }
}

impl<S: Subscriber> Layer<S> for LevelLog {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.0.lock().unwrap().push(*event.metadata().level());
    }
}

/// Like `run`, capturing log levels. The subscriber is thread-local, so this
/// relies on the current-thread runtime `#[tokio::test]` provides.
async fn run_logged(table: MemoryTable, options: ScanOptions) -> (ddb_walker::ScanReport, LevelLog) {
    let log = LevelLog::default();
    let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(log.clone()));
    let report = run(table, options).await;
    (report, log)
}

#[tokio::test]
async fn test_single_collection_row() {
    let table = MemoryTable::new(
        "t",
        vec![collection_row("42", CID, "veg", "2023-01-01T00:00:00Z")],
    );

    let report = run(table, ScanOptions::default()).await;

    assert_eq!(report.completion, ScanCompletion::Exhausted);
    let collections = &report.users[&42];
    assert_eq!(collections.len(), 1);
    assert_eq!(collections[0].collection_id, Uuid::parse_str(CID).unwrap());
    assert_eq!(collections[0].collection_type, "veg");
    assert_eq!(
        collections[0].last_modified,
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
    );
    assert!(report.collections.is_empty());
}

#[tokio::test]
async fn test_single_recipe_row() {
    let table = MemoryTable::new("t", vec![recipe_row(&format!("42-{}", CID), "item1")]);

    let report = run(table, ScanOptions::default()).await;

    let cid = Uuid::parse_str(CID).unwrap();
    assert_eq!(
        report.collections[&cid],
        vec![SavedItem {
            owner: 42,
            collection_id: cid,
            recipe_id: "item1".into(),
        }]
    );
    assert!(report.users.is_empty());
}

#[tokio::test]
async fn test_recipe_with_non_numeric_owner_is_dropped() {
    let row = recipe_row(&format!("not-a-number-{}", CID), "item1");
    assert!(matches!(classify(row.clone()), Classified::Recipe(_)));

    let (report, log) = run_logged(MemoryTable::new("t", vec![row]), ScanOptions::default()).await;

    assert!(report.users.is_empty());
    assert!(report.collections.is_empty());
    assert_eq!(report.tally.recipes, 1);
    assert_eq!(report.tally.invalid_recipes, 1);
    assert!(report.is_complete());
    assert_eq!(log.count(Level::ERROR), 1);
    assert_eq!(log.count(Level::WARN), 0);
}

#[tokio::test]
async fn test_empty_table() {
    let table = MemoryTable::new("t", Vec::new());
    let (report, log) = run_logged(table, ScanOptions::default()).await;

    assert_eq!(report.completion, ScanCompletion::Exhausted);
    assert!(report.users.is_empty());
    assert!(report.collections.is_empty());
    assert_eq!(report.tally.pages, 1);
    assert_eq!(report.tally.dropped(), 0);
    assert_eq!(log.count(Level::ERROR), 0);
    assert_eq!(log.count(Level::WARN), 0);
    assert!(log.count(Level::INFO) >= 1);
}

#[tokio::test]
async fn test_first_page_failure() {
    let table = MemoryTable::new(
        "t",
        vec![collection_row("42", CID, "veg", "2023-01-01T00:00:00Z")],
    )
    .fail_on_request(0, "AccessDeniedException");

    let (report, log) = run_logged(table, ScanOptions::default()).await;

    assert!(matches!(report.completion, ScanCompletion::Failed { page: 0, .. }));
    assert!(!report.is_complete());
    assert!(report.users.is_empty());
    assert!(report.collections.is_empty());
    assert_eq!(report.tally.scanned, 0);
    assert_eq!(log.count(Level::ERROR), 1);
}

#[tokio::test]
async fn test_mid_scan_failure_keeps_earlier_pages() {
    let rows = (0..6)
        .map(|i| collection_row(&i.to_string(), &Uuid::new_v4().to_string(), "veg", "2023-01-01T00:00:00Z"))
        .collect();
    let table = MemoryTable::new("t", rows)
        .with_page_size(2)
        .fail_on_request(2, "InternalServerError");

    let report = run(table, ScanOptions::default()).await;

    assert!(matches!(report.completion, ScanCompletion::Failed { page: 2, .. }));
    assert_eq!(report.users.len(), 4);
    assert_eq!(report.tally.pages, 2);
}

#[tokio::test]
async fn test_grouping_across_many_pages_with_small_buffer() {
    let owners = [1, 2, 3];
    let mut rows = Vec::new();
    let mut expected_per_owner = [0usize; 3];
    for i in 0..60 {
        let owner = owners[i % 3];
        rows.push(collection_row(
            &owner.to_string(),
            &Uuid::new_v4().to_string(),
            &format!("kind-{}", i),
            "2023-05-06T07:08:09.5Z",
        ));
        expected_per_owner[i % 3] += 1;
        rows.push(recipe_row(&format!("{}-{}", owner, CID), &format!("r{}", i)));
    }
    // Noise the scanner must drop
    rows.push(RawRecord::new().with("userAndCollection", "12345"));
    rows.push(collection_row("x", CID, "veg", "2023-01-01T00:00:00Z"));

    let table = MemoryTable::new("t", rows).with_page_size(7);
    let options = ScanOptions {
        page_limit: None,
        channel_capacity: 1,
    };
    let report = run(table, options).await;

    assert!(report.is_complete());
    for (idx, owner) in owners.iter().enumerate() {
        let got = &report.users[&(*owner as i64)];
        assert_eq!(got.len(), expected_per_owner[idx]);
        // Arrival order equals scan order within each owner
        let kinds: Vec<_> = got.iter().map(|c| c.collection_type.clone()).collect();
        let expected: Vec<_> = (0..60)
            .filter(|i| i % 3 == idx)
            .map(|i| format!("kind-{}", i))
            .collect();
        assert_eq!(kinds, expected);
    }

    let cid = Uuid::parse_str(CID).unwrap();
    let recipe_ids: Vec<_> = report.collections[&cid]
        .iter()
        .map(|s| s.recipe_id.clone())
        .collect();
    let expected: Vec<_> = (0..60).map(|i| format!("r{}", i)).collect();
    assert_eq!(recipe_ids, expected);

    assert_eq!(report.tally.scanned, 122);
    assert_eq!(report.tally.unrecognized, 1);
    assert_eq!(report.tally.invalid_collections, 1);
    assert_eq!(report.tally.pages, 18);
}

#[tokio::test]
async fn test_page_limit_overrides_store_default() {
    let rows = (0..10).map(|i| recipe_row(&format!("{}-{}", i, CID), "r")).collect();
    let table = MemoryTable::new("t", rows).with_page_size(100);
    let options = ScanOptions {
        page_limit: Some(3),
        channel_capacity: 4,
    };

    let report = run(table, options).await;
    assert_eq!(report.tally.pages, 4);
    assert_eq!(report.collections[&Uuid::parse_str(CID).unwrap()].len(), 10);
}

#[test]
fn test_collection_round_trip_through_classifier() {
    let row = collection_row("77", CID, "fish", "2022-12-31T23:59:59.25+01:00");
    let Classified::Collection(raw) = classify(row) else {
        panic!("expected a collection row");
    };
    let collection = Collection::from_raw(&raw).unwrap();

    let back = collection.to_raw();
    let row = RawRecord::new()
        .with("userAndCollection", back.user_and_collection)
        .with("referencedObjectId", back.referenced_object_id)
        .with("collectionType", back.collection_type)
        .with("contentType", back.content_type)
        .with("lastModified", back.last_modified);
    let Classified::Collection(raw) = classify(row) else {
        panic!("expected a collection row");
    };
    assert_eq!(Collection::from_raw(&raw).unwrap(), collection);
}
