//! Configuration for a journal session.

use std::path::PathBuf;

use factlog_journal::store::{LogStore, DOCUMENT_SUFFIX, REPORT_SUFFIX};

use crate::clock::{SystemClock, DEFAULT_TIME_FORMAT};

/// Environment variable the CLI reads the data directory from.
pub const DATA_DIR_ENV: &str = "FACTLOG_DATA_DIR";

/// Where logs live and how they are named and timestamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalConfig {
    /// Directory holding every profile's log and report.
    pub data_dir: PathBuf,
    /// Appended to the profile id to name the log file.
    pub document_suffix: String,
    /// Appended to the profile id to name the HTML report.
    pub report_suffix: String,
    /// `chrono` format string for the real-time column.
    pub time_format: String,
}

impl Default for JournalConfig {
    /// `./mod-data`, the mod's file suffixes, `YYYY-MM-DD HH:MM:SS` times.
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("mod-data"),
            document_suffix: DOCUMENT_SUFFIX.to_owned(),
            report_suffix: REPORT_SUFFIX.to_owned(),
            time_format: DEFAULT_TIME_FORMAT.to_owned(),
        }
    }
}

impl JournalConfig {
    /// Default configuration rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// The store described by this configuration.
    pub fn store(&self) -> LogStore {
        LogStore::with_suffixes(
            self.data_dir.clone(),
            self.document_suffix.clone(),
            self.report_suffix.clone(),
        )
    }

    /// The system clock described by this configuration.
    pub fn clock(&self) -> SystemClock {
        SystemClock::with_format(self.time_format.clone())
    }
}
