//! The persisted fact log for one player profile.
//!
//! A [`LogDocument`] is an append-only sequence of [`LogEntry`] records, one
//! per revealed fact. Entries arrive in batches (one batch per watcher tick);
//! each batch is ordered by reveal order before it is appended, and batches
//! are never reordered relative to each other.
//!
//! The JSON field names match the files written by the in-game mod
//! (`ProfileName`, `Entries`, `FactID`, ...) so existing logs load unchanged.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LogEntry
// ---------------------------------------------------------------------------

/// A single revealed fact, captured at the tick it was first seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Stable id of the source fact. Unique within a document.
    #[serde(rename = "FactID")]
    pub fact_id: String,
    /// Human-readable local time at capture.
    #[serde(rename = "RealTime")]
    pub wall_clock_time: String,
    /// Completed loops plus the fraction of the current loop elapsed.
    #[serde(rename = "LoopTime")]
    pub loop_time: f64,
    /// The host's reveal sequence number. Only used as a sort key.
    #[serde(rename = "RevealOrder")]
    pub reveal_order: i32,
    /// Display name of the grouping that owns the fact.
    #[serde(rename = "Location")]
    pub location: String,
    /// The fact text.
    #[serde(rename = "Fact")]
    pub text: String,
}

impl LogEntry {
    /// Loop time formatted for display (two decimal places).
    pub fn loop_time_label(&self) -> String {
        format!("{:.2}", self.loop_time)
    }
}

// ---------------------------------------------------------------------------
// LogDocument
// ---------------------------------------------------------------------------

/// The complete fact log of one profile.
///
/// Membership checks go through an index of logged fact ids that is rebuilt
/// on deserialization and never written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "DocumentRepr")]
pub struct LogDocument {
    #[serde(rename = "ProfileName")]
    profile_id: String,
    #[serde(rename = "Entries")]
    entries: Vec<LogEntry>,
    #[serde(skip)]
    logged: HashSet<String>,
}

/// Wire shape of a document. `Entries` may be absent or `null` in files
/// written by older versions of the mod.
#[derive(Deserialize)]
struct DocumentRepr {
    #[serde(rename = "ProfileName")]
    profile_id: String,
    #[serde(rename = "Entries", default)]
    entries: Option<Vec<LogEntry>>,
}

impl From<DocumentRepr> for LogDocument {
    fn from(repr: DocumentRepr) -> Self {
        Self::with_entries(repr.profile_id, repr.entries.unwrap_or_default())
    }
}

impl PartialEq for LogDocument {
    fn eq(&self, other: &Self) -> bool {
        self.profile_id == other.profile_id && self.entries == other.entries
    }
}

impl LogDocument {
    /// Create an empty log for the given profile.
    pub fn new(profile_id: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
            entries: Vec::new(),
            logged: HashSet::new(),
        }
    }

    /// Build a document from existing entries, kept in the given order.
    ///
    /// Duplicate fact ids are kept as-is (a loaded file is returned
    /// unchanged) but reported, since they violate the log's invariant.
    pub fn with_entries(profile_id: impl Into<String>, entries: Vec<LogEntry>) -> Self {
        let profile_id = profile_id.into();
        let mut logged = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !logged.insert(entry.fact_id.clone()) {
                tracing::warn!(
                    profile = %profile_id,
                    fact_id = %entry.fact_id,
                    "fact log contains a duplicate entry"
                );
            }
        }
        Self {
            profile_id,
            entries,
            logged,
        }
    }

    /// The profile this log belongs to.
    pub fn profile_id(&self) -> &str {
        &self.profile_id
    }

    /// All entries in reveal order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of logged facts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no fact has been logged yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if a fact with this id is already logged.
    pub fn contains(&self, fact_id: &str) -> bool {
        self.logged.contains(fact_id)
    }

    /// Append one tick's worth of newly revealed facts.
    ///
    /// The batch is stable-sorted by `reveal_order` (ties keep the order they
    /// were staged in) and then appended after every existing entry. Entries
    /// whose fact id is already logged, or repeated within the batch, are
    /// dropped. Returns the number of entries actually appended.
    pub fn append_batch(&mut self, mut batch: Vec<LogEntry>) -> usize {
        batch.sort_by_key(|entry| entry.reveal_order);

        let before = self.entries.len();
        for entry in batch {
            if self.logged.insert(entry.fact_id.clone()) {
                self.entries.push(entry);
            } else {
                tracing::debug!(
                    profile = %self.profile_id,
                    fact_id = %entry.fact_id,
                    "fact already logged -- skipping"
                );
            }
        }
        self.entries.len() - before
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, reveal_order: i32) -> LogEntry {
        LogEntry {
            fact_id: id.to_owned(),
            wall_clock_time: "2024-03-01 10:00:00".to_owned(),
            loop_time: 1.5,
            reveal_order,
            location: "Brittle Hollow".to_owned(),
            text: format!("fact {id}"),
        }
    }

    fn ids(doc: &LogDocument) -> Vec<&str> {
        doc.entries().iter().map(|e| e.fact_id.as_str()).collect()
    }

    // -- 1. Empty document ----------------------------------------------------

    #[test]
    fn new_document_is_empty() {
        let doc = LogDocument::new("Hatchling");
        assert!(doc.is_empty());
        assert_eq!(doc.len(), 0);
        assert_eq!(doc.profile_id(), "Hatchling");
        assert!(!doc.contains("anything"));
    }

    // -- 2. Batches are sorted, documents are not ------------------------------

    #[test]
    fn batch_is_sorted_by_reveal_order() {
        let mut doc = LogDocument::new("p");
        let added = doc.append_batch(vec![entry("A", 2), entry("B", 1)]);
        assert_eq!(added, 2);
        assert_eq!(ids(&doc), vec!["B", "A"]);
    }

    #[test]
    fn earlier_batches_are_never_reordered() {
        let mut doc = LogDocument::new("p");
        doc.append_batch(vec![entry("late", 50)]);
        doc.append_batch(vec![entry("early", 1)]);
        assert_eq!(ids(&doc), vec!["late", "early"]);
    }

    #[test]
    fn ties_keep_staging_order() {
        let mut doc = LogDocument::new("p");
        doc.append_batch(vec![
            entry("first", 7),
            entry("zero", 0),
            entry("second", 7),
            entry("third", 7),
        ]);
        assert_eq!(ids(&doc), vec!["zero", "first", "second", "third"]);
    }

    // -- 3. Dedup ---------------------------------------------------------------

    #[test]
    fn already_logged_facts_are_dropped() {
        let mut doc = LogDocument::new("p");
        doc.append_batch(vec![entry("A", 1)]);
        let added = doc.append_batch(vec![entry("A", 1), entry("B", 2)]);
        assert_eq!(added, 1);
        assert_eq!(ids(&doc), vec!["A", "B"]);
        assert!(doc.contains("A"));
        assert!(doc.contains("B"));
    }

    #[test]
    fn duplicates_within_a_batch_keep_the_first() {
        let mut doc = LogDocument::new("p");
        let mut second = entry("A", 1);
        second.text = "second copy".to_owned();
        doc.append_batch(vec![entry("A", 1), second]);
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.entries()[0].text, "fact A");
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let mut doc = LogDocument::new("p");
        assert_eq!(doc.append_batch(Vec::new()), 0);
        assert!(doc.is_empty());
    }

    // -- 4. Serialization -------------------------------------------------------

    #[test]
    fn serializes_with_mod_field_names() {
        let mut doc = LogDocument::new("Hatchling");
        doc.append_batch(vec![entry("A", 3)]);
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["ProfileName"], "Hatchling");
        let first = &value["Entries"][0];
        assert_eq!(first["FactID"], "A");
        assert_eq!(first["RealTime"], "2024-03-01 10:00:00");
        assert_eq!(first["LoopTime"], 1.5);
        assert_eq!(first["RevealOrder"], 3);
        assert_eq!(first["Location"], "Brittle Hollow");
        assert_eq!(first["Fact"], "fact A");
        assert!(value.get("logged").is_none());
    }

    #[test]
    fn deserialization_rebuilds_the_index() {
        let json = r#"{
            "ProfileName": "Hatchling",
            "Entries": [
                {"FactID": "A", "RealTime": "t", "LoopTime": 0.5,
                 "RevealOrder": 1, "Location": "Ember Twin", "Fact": "a"}
            ]
        }"#;
        let doc: LogDocument = serde_json::from_str(json).unwrap();
        assert!(doc.contains("A"));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn null_or_missing_entries_load_as_empty() {
        let null: LogDocument =
            serde_json::from_str(r#"{"ProfileName": "p", "Entries": null}"#).unwrap();
        let missing: LogDocument = serde_json::from_str(r#"{"ProfileName": "p"}"#).unwrap();
        assert!(null.is_empty());
        assert!(missing.is_empty());
    }

    #[test]
    fn loop_time_label_has_two_decimals() {
        let mut e = entry("A", 0);
        e.loop_time = 3.14159;
        assert_eq!(e.loop_time_label(), "3.14");
    }
}
