//! Factlog Engine -- detects newly revealed facts and journals them per profile.
//!
//! This crate builds on [`factlog_journal`] to provide the runtime side of
//! the fact log: a tick-driven [`FactWatcher`](watcher::FactWatcher) that
//! diffs the host's revealed facts against the loaded log, and a
//! [`JournalSession`](session::JournalSession) that wires the watcher to host
//! lifecycle events and the on-screen overlay.
//!
//! The host is reached only through the traits in [`source`] and [`clock`],
//! so everything here runs headless in tests.
//!
//! # Quick Start
//!
//! ```
//! use factlog_engine::prelude::*;
//!
//! let dir = std::env::temp_dir().join("factlog-doc-engine");
//! # std::fs::remove_dir_all(&dir).ok();
//! let config = JournalConfig::with_data_dir(&dir);
//! let mut session = JournalSession::with_clock(&config, Box::new(ManualClock::new("12:00")));
//!
//! let source = StaticFactSource::new();
//! session.handle(HostEvent::SceneLoaded {
//!     scene: SceneKind::SolarSystem,
//!     profile: "Hatchling".to_owned(),
//!     source: Some(Box::new(source.clone())),
//! });
//!
//! source.reveal("Village", "TH_VILLAGE_X1", 0, "The village is built around a geyser.");
//! assert_eq!(session.tick(), TickOutcome::Appended { added: 1, saved: true });
//! assert_eq!(session.tick(), TickOutcome::Unchanged);
//! # std::fs::remove_dir_all(&dir).ok();
//! ```

#![deny(unsafe_code)]

pub mod clock;
pub mod config;
pub mod session;
pub mod source;
pub mod view;
pub mod watcher;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

/// Re-export the journal crate for convenience.
pub use factlog_journal;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use factlog_journal::prelude::*;

    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::config::JournalConfig;
    pub use crate::session::{EventOutcome, HostEvent, JournalSession};
    pub use crate::source::{
        FactCategory, FactError, FactRecord, FactResult, FactSource, Grouping, Location,
        LoopTime, StaticFactSource,
    };
    pub use crate::view::{JournalView, ViewRow};
    pub use crate::watcher::{FactWatcher, SceneKind, TickOutcome, WatcherState};
}
