//! Durable per-profile storage for [`LogDocument`]s.
//!
//! Every profile owns two files in the store's data directory, both named by
//! concatenating the profile id with a fixed suffix:
//!
//! - `<profile>.fact-log.json` -- the document itself ([`DOCUMENT_SUFFIX`]).
//! - `<profile>_Fact_Log_Viewer.html` -- the last generated report
//!   ([`REPORT_SUFFIX`]).
//!
//! [`LogStore::load`] never fails. A missing file yields a fresh document; a
//! file that cannot be read or parsed is reported and also yields a fresh
//! document. In both cases the fresh document is written back immediately so
//! the profile has a log file from its first session on.
//!
//! [`LogStore::save`] always writes the complete document, so a failed save
//! is repaired by the next successful one.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::document::LogDocument;
use crate::report::render_html;
use crate::StoreError;

/// Suffix of the per-profile document file.
pub const DOCUMENT_SUFFIX: &str = ".fact-log.json";

/// Suffix of the per-profile HTML report file.
pub const REPORT_SUFFIX: &str = "_Fact_Log_Viewer.html";

// ---------------------------------------------------------------------------
// LoadedDocument
// ---------------------------------------------------------------------------

/// Where a loaded document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Parsed from an existing file.
    Existing,
    /// No file existed; a fresh document was created.
    Created,
    /// A file existed but was unreadable or corrupt; a fresh document
    /// replaced it.
    Recovered,
}

/// The result of [`LogStore::load`].
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: LogDocument,
    pub origin: LoadOrigin,
}

// ---------------------------------------------------------------------------
// LogStore
// ---------------------------------------------------------------------------

/// File-backed store keyed by profile id.
#[derive(Debug, Clone)]
pub struct LogStore {
    data_dir: PathBuf,
    document_suffix: String,
    report_suffix: String,
}

impl LogStore {
    /// A store rooted at `data_dir` using the default file suffixes.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_suffixes(data_dir, DOCUMENT_SUFFIX, REPORT_SUFFIX)
    }

    /// A store with custom document and report suffixes.
    pub fn with_suffixes(
        data_dir: impl Into<PathBuf>,
        document_suffix: impl Into<String>,
        report_suffix: impl Into<String>,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            document_suffix: document_suffix.into(),
            report_suffix: report_suffix.into(),
        }
    }

    /// The directory holding every profile's files.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the document file for `profile_id`.
    pub fn document_path(&self, profile_id: &str) -> PathBuf {
        self.data_dir
            .join(format!("{profile_id}{}", self.document_suffix))
    }

    /// Path of the report file for `profile_id`.
    pub fn report_path(&self, profile_id: &str) -> PathBuf {
        self.data_dir
            .join(format!("{profile_id}{}", self.report_suffix))
    }

    /// Load the document for `profile_id`, falling back to a fresh one.
    ///
    /// See the module docs for the recovery rules. The returned document is
    /// the parsed file unchanged when one exists.
    pub fn load(&self, profile_id: &str) -> LoadedDocument {
        let (document, origin) = match self.try_load(profile_id) {
            Ok(Some(document)) => {
                if document.profile_id() != profile_id {
                    tracing::warn!(
                        profile = %profile_id,
                        stored_profile = %document.profile_id(),
                        "fact log names a different profile than its file"
                    );
                }
                tracing::info!(
                    profile = %profile_id,
                    entries = document.len(),
                    "loaded existing fact log"
                );
                (document, LoadOrigin::Existing)
            }
            Ok(None) => (LogDocument::new(profile_id), LoadOrigin::Created),
            Err(e) => {
                tracing::warn!(
                    profile = %profile_id,
                    error = %e,
                    "fact log is unreadable -- starting a fresh one"
                );
                (LogDocument::new(profile_id), LoadOrigin::Recovered)
            }
        };

        if origin != LoadOrigin::Existing {
            match self.save(&document) {
                Ok(()) => tracing::info!(profile = %profile_id, "created fresh fact log"),
                Err(e) => tracing::error!(
                    profile = %profile_id,
                    error = %e,
                    "failed to write fresh fact log"
                ),
            }
        }

        LoadedDocument { document, origin }
    }

    /// Read and parse the document for `profile_id`.
    ///
    /// Returns `Ok(None)` if no document file exists.
    pub fn try_load(&self, profile_id: &str) -> Result<Option<LogDocument>, StoreError> {
        let path = self.document_path(profile_id);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| StoreError::Json { path, source })
    }

    /// Write `document` to its profile's file, replacing any previous
    /// content. Creates the data directory if needed.
    pub fn save(&self, document: &LogDocument) -> Result<(), StoreError> {
        let path = self.document_path(document.profile_id());
        let json = serde_json::to_string_pretty(document).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        self.write(&path, json.as_bytes())?;
        tracing::debug!(
            profile = %document.profile_id(),
            entries = document.len(),
            "saved fact log"
        );
        Ok(())
    }

    /// Render the HTML report for `document` and write it, replacing any
    /// previous report. Returns the report path.
    pub fn write_report(&self, document: &LogDocument) -> Result<PathBuf, StoreError> {
        let path = self.report_path(document.profile_id());
        self.write(&path, render_html(document).as_bytes())?;
        tracing::info!(
            profile = %document.profile_id(),
            path = %path.display(),
            "regenerated fact log report"
        );
        Ok(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir).map_err(|source| StoreError::Io {
            path: self.data_dir.clone(),
            source,
        })?;
        fs::write(path, contents).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
