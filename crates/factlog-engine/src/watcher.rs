//! Per-tick detection of newly revealed facts.
//!
//! The [`FactWatcher`] is either **idle** (no log loaded) or **active** (one
//! profile's [`LogDocument`] loaded, with an optional [`FactSource`]). Each
//! active tick with a source:
//!
//! 1. Samples the wall clock and the loop time once. Every entry produced by
//!    the tick carries the same two values.
//! 2. Walks every grouping (rumor facts, then explore facts) and stages each
//!    revealed fact whose id is not logged yet. Malformed records are skipped
//!    with a warning; the scan carries on.
//! 3. Appends the staged batch, stable-sorted by reveal order, after all
//!    existing entries, then saves the whole document.
//!
//! A tick that stages nothing does not save.
//!
//! # Example
//!
//! ```
//! use factlog_engine::prelude::*;
//!
//! let dir = std::env::temp_dir().join("factlog-doc-watcher");
//! # std::fs::remove_dir_all(&dir).ok();
//! let source = StaticFactSource::new();
//! source.reveal("Village", "A", 2, "second");
//! source.reveal("Village", "B", 1, "first");
//!
//! let mut watcher = FactWatcher::new(LogStore::new(&dir));
//! watcher.start("Hatchling", Some(Box::new(source.clone())));
//!
//! let clock = ManualClock::new("12:00");
//! let outcome = watcher.tick(&clock);
//! assert_eq!(outcome, TickOutcome::Appended { added: 2, saved: true });
//!
//! let ids: Vec<_> = watcher
//!     .document()
//!     .unwrap()
//!     .entries()
//!     .iter()
//!     .map(|e| e.fact_id.as_str())
//!     .collect();
//! assert_eq!(ids, vec!["B", "A"]);
//! # std::fs::remove_dir_all(&dir).ok();
//! ```

use std::collections::HashSet;

use factlog_journal::document::{LogDocument, LogEntry};
use factlog_journal::store::{LoadOrigin, LogStore};

use crate::clock::Clock;
use crate::source::{FactSource, Grouping};

// ---------------------------------------------------------------------------
// SceneKind
// ---------------------------------------------------------------------------

/// The kind of scene the host finished loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    TitleScreen,
    SolarSystem,
    EyeOfTheUniverse,
    Credits,
    PostCreditsScene,
}

impl SceneKind {
    /// Only the solar system scene exposes the fact log.
    pub fn is_gameplay(self) -> bool {
        matches!(self, SceneKind::SolarSystem)
    }
}

// ---------------------------------------------------------------------------
// WatcherState / TickOutcome
// ---------------------------------------------------------------------------

/// Coarse lifecycle state of a [`FactWatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Idle,
    Active,
}

/// What a single [`FactWatcher::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No log is loaded.
    Idle,
    /// A log is loaded but no fact source is attached.
    NoSource,
    /// Nothing new was revealed. No save happened.
    Unchanged,
    /// `added` entries were appended. `saved` is `false` if writing the
    /// document failed; the next productive tick writes it in full again.
    Appended { added: usize, saved: bool },
}

// ---------------------------------------------------------------------------
// FactWatcher
// ---------------------------------------------------------------------------

struct ActiveLog {
    document: LogDocument,
    source: Option<Box<dyn FactSource>>,
}

/// Watches a [`FactSource`] and appends newly revealed facts to the loaded
/// profile's log.
pub struct FactWatcher {
    store: LogStore,
    active: Option<ActiveLog>,
}

impl FactWatcher {
    /// An idle watcher persisting through `store`.
    pub fn new(store: LogStore) -> Self {
        Self {
            store,
            active: None,
        }
    }

    /// Load the log for `profile_id` and become active.
    ///
    /// Any previously loaded log and source are dropped first. Returns where
    /// the loaded document came from.
    pub fn start(
        &mut self,
        profile_id: &str,
        source: Option<Box<dyn FactSource>>,
    ) -> LoadOrigin {
        self.stop();
        let loaded = self.store.load(profile_id);
        tracing::info!(
            profile = %profile_id,
            origin = ?loaded.origin,
            entries = loaded.document.len(),
            has_source = source.is_some(),
            "fact watcher active"
        );
        self.active = Some(ActiveLog {
            document: loaded.document,
            source,
        });
        loaded.origin
    }

    /// Drop the loaded log and source and become idle. Returns the log that
    /// was loaded, if any.
    pub fn stop(&mut self) -> Option<LogDocument> {
        let active = self.active.take()?;
        tracing::debug!(profile = %active.document.profile_id(), "fact watcher idle");
        Some(active.document)
    }

    /// React to the host finishing a scene load.
    ///
    /// Always stops; restarts for `profile_id` only when `scene` is a gameplay
    /// scene. Returns the resulting state.
    pub fn on_context_change(
        &mut self,
        scene: SceneKind,
        profile_id: &str,
        source: Option<Box<dyn FactSource>>,
    ) -> WatcherState {
        self.stop();
        if scene.is_gameplay() {
            self.start(profile_id, source);
        } else {
            tracing::debug!(?scene, "non-gameplay scene -- fact watcher stays idle");
        }
        self.state()
    }

    /// Attach (or replace) the fact source. Ignored while idle.
    pub fn attach_source(&mut self, source: Box<dyn FactSource>) {
        match self.active.as_mut() {
            Some(active) => active.source = Some(source),
            None => tracing::debug!("ignoring fact source while idle"),
        }
    }

    /// Detach the fact source; ticks become no-ops until one is attached.
    pub fn detach_source(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.source = None;
        }
    }

    /// Run detection once. See the module docs for the algorithm.
    pub fn tick(&mut self, clock: &dyn Clock) -> TickOutcome {
        let Some(active) = self.active.as_mut() else {
            return TickOutcome::Idle;
        };
        let Some(source) = active.source.as_deref() else {
            return TickOutcome::NoSource;
        };

        // One time snapshot per tick.
        let wall_clock_time = clock.wall_clock();
        let loop_time = finite_loop_time(source.loop_time().as_f64(), &active.document);

        let mut staged = Vec::new();
        let mut staged_ids = HashSet::new();
        let document = &active.document;
        source.visit_groupings(&mut |grouping: &dyn Grouping| {
            let location = grouping.display_name();
            let facts = grouping
                .rumor_facts()
                .into_iter()
                .chain(grouping.explore_facts());
            for fact in facts {
                let fact = match fact.and_then(|f| f.validate()) {
                    Ok(fact) => fact,
                    Err(e) => {
                        tracing::warn!(
                            location = %location,
                            error = %e,
                            "skipping malformed fact record"
                        );
                        continue;
                    }
                };
                if !fact.revealed || document.contains(&fact.id) {
                    continue;
                }
                if !staged_ids.insert(fact.id.clone()) {
                    continue;
                }
                tracing::debug!(fact_id = %fact.id, location = %location, "adding fact to log");
                staged.push(LogEntry {
                    fact_id: fact.id,
                    wall_clock_time: wall_clock_time.clone(),
                    loop_time,
                    reveal_order: fact.reveal_order,
                    location: location.clone(),
                    text: fact.text,
                });
            }
        });

        if staged.is_empty() {
            return TickOutcome::Unchanged;
        }

        let added = active.document.append_batch(staged);
        let saved = match self.store.save(&active.document) {
            Ok(()) => {
                tracing::info!(
                    profile = %active.document.profile_id(),
                    added,
                    total = active.document.len(),
                    "saved fact log"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    profile = %active.document.profile_id(),
                    error = %e,
                    "failed to save fact log"
                );
                false
            }
        };
        TickOutcome::Appended { added, saved }
    }

    // -- accessors ----------------------------------------------------------

    pub fn state(&self) -> WatcherState {
        if self.active.is_some() {
            WatcherState::Active
        } else {
            WatcherState::Idle
        }
    }

    /// The loaded log, if active.
    pub fn document(&self) -> Option<&LogDocument> {
        self.active.as_ref().map(|a| &a.document)
    }

    /// Whether a fact source is attached.
    pub fn has_source(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.source.is_some())
    }

    pub fn store(&self) -> &LogStore {
        &self.store
    }
}

/// JSON has no encoding for NaN or infinity, so a non-finite loop time would
/// make the saved log unreadable. Fall back to the last logged loop time.
fn finite_loop_time(sampled: f64, document: &LogDocument) -> f64 {
    if sampled.is_finite() {
        return sampled;
    }
    let fallback = document.entries().last().map_or(0.0, |e| e.loop_time);
    tracing::warn!(
        profile = %document.profile_id(),
        sampled,
        fallback,
        "non-finite loop time from fact source"
    );
    fallback
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
