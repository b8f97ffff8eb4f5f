//! Factlog Journal -- the per-profile fact log and its on-disk store.
//!
//! This crate is the leaf of the Factlog workspace. It owns the persisted data
//! model and everything that touches the filesystem:
//!
//! - [`document`]: [`LogDocument`](document::LogDocument) and
//!   [`LogEntry`](document::LogEntry), the append-only record of revealed facts
//!   for one player profile.
//! - [`store`]: [`LogStore`](store::LogStore), which loads and saves one
//!   document per profile and treats missing or corrupt files as recoverable.
//! - [`report`]: the standalone HTML report rendered from a document.
//!
//! # Quick Start
//!
//! ```
//! use factlog_journal::prelude::*;
//!
//! let dir = std::env::temp_dir().join("factlog-doc-quickstart");
//! # std::fs::remove_dir_all(&dir).ok();
//! let store = LogStore::new(&dir);
//!
//! let mut loaded = store.load("quickstart");
//! loaded.document.append_batch(vec![LogEntry {
//!     fact_id: "TH_VILLAGE_X1".to_owned(),
//!     wall_clock_time: "2024-01-01 12:00:00".to_owned(),
//!     loop_time: 0.25,
//!     reveal_order: 1,
//!     location: "Timber Hearth".to_owned(),
//!     text: "The village is built around a geyser.".to_owned(),
//! }]);
//! store.save(&loaded.document).unwrap();
//!
//! let reloaded = store.load("quickstart");
//! assert_eq!(reloaded.document, loaded.document);
//! # std::fs::remove_dir_all(&dir).ok();
//! ```

#![deny(unsafe_code)]

pub mod document;
pub mod report;
pub mod store;

use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by the fact log store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing a file in the data directory failed.
    #[error("failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A fact log file exists but is not a valid document.
    #[error("failed to parse fact log '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::document::{LogDocument, LogEntry};
    pub use crate::report::render_html;
    pub use crate::store::{LoadOrigin, LoadedDocument, LogStore, DOCUMENT_SUFFIX, REPORT_SUFFIX};
    pub use crate::StoreError;
}
