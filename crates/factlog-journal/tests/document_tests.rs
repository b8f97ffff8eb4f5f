//! Integration tests for the fact log document and store.
//!
//! Covers compatibility with files written by the in-game mod, and property
//! tests for the append-only ordering and dedup invariants.

use factlog_journal::prelude::*;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn entry(id: &str, reveal_order: i32) -> LogEntry {
    LogEntry {
        fact_id: id.to_owned(),
        wall_clock_time: "3/1/2024 10:00:00 AM".to_owned(),
        loop_time: 0.0,
        reveal_order,
        location: "Interloper".to_owned(),
        text: format!("fact {id}"),
    }
}

// ---------------------------------------------------------------------------
// Mod file compatibility
// ---------------------------------------------------------------------------

const MOD_WRITTEN_LOG: &str = r#"{
  "ProfileName": "Hatchling",
  "Entries": [
    {
      "FactID": "TH_VILLAGE_X1",
      "RealTime": "3/1/2024 10:00:00 AM",
      "LoopTime": 0.0412,
      "RevealOrder": 0,
      "Location": "Village",
      "Fact": "The village is built around a geyser."
    },
    {
      "FactID": "TH_ZERO_G_CAVE_X1",
      "RealTime": "3/1/2024 10:04:12 AM",
      "LoopTime": 0.2931,
      "RevealOrder": 3,
      "Location": "Zero-G Cave",
      "Fact": "There is a zero-gravity cave under the village."
    }
  ]
}"#;

#[test]
fn loads_log_written_by_the_mod() {
    let dir = tempfile::tempdir().unwrap();
    let store = LogStore::new(dir.path());
    std::fs::write(store.document_path("Hatchling"), MOD_WRITTEN_LOG).unwrap();

    let loaded = store.load("Hatchling");
    assert_eq!(loaded.origin, LoadOrigin::Existing);

    let doc = loaded.document;
    assert_eq!(doc.profile_id(), "Hatchling");
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.entries()[0].fact_id, "TH_VILLAGE_X1");
    assert_eq!(doc.entries()[1].reveal_order, 3);
    assert!((doc.entries()[1].loop_time - 0.2931).abs() < 1e-9);
    assert!(doc.contains("TH_ZERO_G_CAVE_X1"));
}

#[test]
fn saved_log_reloads_with_the_same_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = LogStore::new(dir.path());

    let mut doc = LogDocument::new("Hatchling");
    doc.append_batch(vec![entry("A", 1)]);
    store.save(&doc).unwrap();

    let raw = std::fs::read_to_string(store.document_path("Hatchling")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let keys: Vec<&str> = value["Entries"][0]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    for key in ["FactID", "RealTime", "LoopTime", "RevealOrder", "Location", "Fact"] {
        assert!(keys.contains(&key), "missing key {key}");
    }
}

#[test]
fn unreadable_path_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let store = LogStore::new(dir.path());
    // A directory where the document file should be cannot be read as text.
    std::fs::create_dir(store.document_path("p")).unwrap();

    let loaded = store.load("p");
    assert_eq!(loaded.origin, LoadOrigin::Recovered);
    assert!(loaded.document.is_empty());
}

// ---------------------------------------------------------------------------
// Property tests
// ---------------------------------------------------------------------------

/// A batch of (fact index, reveal order) pairs. Fact ids collide on purpose.
fn batch_strategy() -> impl Strategy<Value = Vec<(u8, i32)>> {
    prop::collection::vec((0u8..20, -5i32..5), 0..10)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1_000))]

    #[test]
    fn batches_preserve_dedup_and_order(batches in prop::collection::vec(batch_strategy(), 1..8)) {
        let mut doc = LogDocument::new("p");
        let mut batch_of = Vec::new();

        for (batch_index, batch) in batches.iter().enumerate() {
            let staged: Vec<LogEntry> = batch
                .iter()
                .map(|(id, order)| entry(&format!("F{id}"), *order))
                .collect();
            let added = doc.append_batch(staged);
            batch_of.extend(std::iter::repeat(batch_index).take(added));
        }

        // No fact id appears twice.
        let mut seen = std::collections::HashSet::new();
        for e in doc.entries() {
            prop_assert!(seen.insert(e.fact_id.clone()), "duplicate {}", e.fact_id);
        }

        // Batches stay in append order; within a batch reveal order is sorted.
        for (i, pair) in doc.entries().windows(2).enumerate() {
            prop_assert!(batch_of[i] <= batch_of[i + 1]);
            if batch_of[i] == batch_of[i + 1] {
                prop_assert!(pair[0].reveal_order <= pair[1].reveal_order);
            }
        }
    }
}
