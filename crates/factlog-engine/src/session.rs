//! A journal session: the watcher plus the overlay state around it.
//!
//! [`JournalSession`] is the one object a host integration holds. It owns the
//! [`FactWatcher`], the clock, and the display flags, and turns host
//! lifecycle notifications ([`HostEvent`]) into watcher transitions:
//!
//! - A finished scene load restarts the watcher (active only in gameplay
//!   scenes) and closes the display.
//! - The display can only be opened from the pause overlay, and closes when
//!   the overlay does.
//! - A report can only be generated while the display is open.
//!
//! Call [`JournalSession::tick`] once per frame.

use std::fmt;
use std::path::PathBuf;

use factlog_journal::document::LogDocument;
use factlog_journal::store::LoadOrigin;

use crate::clock::Clock;
use crate::config::JournalConfig;
use crate::source::FactSource;
use crate::view::JournalView;
use crate::watcher::{FactWatcher, SceneKind, TickOutcome, WatcherState};

// ---------------------------------------------------------------------------
// HostEvent / EventOutcome
// ---------------------------------------------------------------------------

/// A lifecycle notification or user action from the host.
pub enum HostEvent {
    /// The host finished loading `scene` with `profile` active.
    SceneLoaded {
        scene: SceneKind,
        profile: String,
        source: Option<Box<dyn FactSource>>,
    },
    PauseOpened,
    PauseClosed,
    /// The user pressed the fact log button.
    ToggleDisplay,
    /// The user asked for a shareable report.
    GenerateReport,
}

impl fmt::Debug for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostEvent::SceneLoaded {
                scene,
                profile,
                source,
            } => f
                .debug_struct("SceneLoaded")
                .field("scene", scene)
                .field("profile", profile)
                .field("has_source", &source.is_some())
                .finish(),
            HostEvent::PauseOpened => f.write_str("PauseOpened"),
            HostEvent::PauseClosed => f.write_str("PauseClosed"),
            HostEvent::ToggleDisplay => f.write_str("ToggleDisplay"),
            HostEvent::GenerateReport => f.write_str("GenerateReport"),
        }
    }
}

/// The result of [`JournalSession::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The watcher changed state after a scene load.
    Watcher(WatcherState),
    /// The pause overlay flag was updated.
    Pause { open: bool },
    /// The display is now open (`true`) or closed (`false`).
    Display(bool),
    /// The report was written to this path.
    ReportWritten(PathBuf),
    /// The action was not available (e.g. a report with the display closed)
    /// or failed; details are logged.
    Ignored,
}

// ---------------------------------------------------------------------------
// JournalSession
// ---------------------------------------------------------------------------

/// Everything one running game needs: watcher, clock and overlay state.
pub struct JournalSession {
    watcher: FactWatcher,
    clock: Box<dyn Clock>,
    display_open: bool,
    pause_open: bool,
}

impl JournalSession {
    /// A session using the configured store and the system clock.
    pub fn new(config: &JournalConfig) -> Self {
        Self::with_clock(config, Box::new(config.clock()))
    }

    /// A session with a custom clock.
    pub fn with_clock(config: &JournalConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            watcher: FactWatcher::new(config.store()),
            clock,
            display_open: false,
            pause_open: false,
        }
    }

    /// Load `profile` and start watching `source`.
    pub fn start(&mut self, profile: &str, source: Option<Box<dyn FactSource>>) -> LoadOrigin {
        self.display_open = false;
        self.watcher.start(profile, source)
    }

    /// Stop watching and close the display. Returns the log that was loaded.
    pub fn stop(&mut self) -> Option<LogDocument> {
        self.display_open = false;
        self.watcher.stop()
    }

    /// Per-frame update: close a display orphaned by the pause overlay, then
    /// run detection.
    pub fn tick(&mut self) -> TickOutcome {
        if self.display_open && !self.pause_open {
            self.set_display(false);
        }
        self.watcher.tick(&*self.clock)
    }

    /// Apply one host event.
    pub fn handle(&mut self, event: HostEvent) -> EventOutcome {
        tracing::trace!(?event, "host event");
        match event {
            HostEvent::SceneLoaded {
                scene,
                profile,
                source,
            } => {
                self.display_open = false;
                EventOutcome::Watcher(self.watcher.on_context_change(scene, &profile, source))
            }
            HostEvent::PauseOpened => {
                self.pause_open = true;
                EventOutcome::Pause { open: true }
            }
            HostEvent::PauseClosed => {
                self.pause_open = false;
                if self.display_open {
                    self.set_display(false);
                }
                EventOutcome::Pause { open: false }
            }
            HostEvent::ToggleDisplay => EventOutcome::Display(self.toggle_display()),
            HostEvent::GenerateReport => match self.generate_report() {
                Some(path) => EventOutcome::ReportWritten(path),
                None => EventOutcome::Ignored,
            },
        }
    }

    /// Toggle the display. Opening needs the pause overlay open and a log
    /// loaded. Returns whether the display is open afterwards.
    pub fn toggle_display(&mut self) -> bool {
        if self.display_open {
            self.set_display(false);
        } else if !self.pause_open {
            tracing::debug!("fact log can only be opened from the pause menu");
        } else if self.watcher.document().is_none() {
            tracing::debug!("no fact log loaded");
        } else {
            self.set_display(true);
        }
        self.display_open
    }

    /// Write the HTML report for the loaded log. Only available while the
    /// display is open; returns the report path on success.
    pub fn generate_report(&self) -> Option<PathBuf> {
        if !self.display_open {
            tracing::debug!("report requested with the fact log closed");
            return None;
        }
        let document = self.watcher.document()?;
        match self.watcher.store().write_report(document) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::error!(
                    profile = %document.profile_id(),
                    error = %e,
                    "failed to write fact log report"
                );
                None
            }
        }
    }

    fn set_display(&mut self, open: bool) {
        self.display_open = open;
        tracing::debug!(open, "fact log display toggled");
    }

    // -- accessors ----------------------------------------------------------

    pub fn is_display_open(&self) -> bool {
        self.display_open
    }

    pub fn is_pause_open(&self) -> bool {
        self.pause_open
    }

    /// The list view, while the display is open.
    pub fn view(&self) -> Option<JournalView<'_>> {
        if !self.display_open {
            return None;
        }
        self.watcher.document().map(JournalView::new)
    }

    pub fn watcher(&self) -> &FactWatcher {
        &self.watcher
    }

    pub fn watcher_mut(&mut self) -> &mut FactWatcher {
        &mut self.watcher
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::source::StaticFactSource;

    fn setup() -> (tempfile::TempDir, JournalSession, StaticFactSource) {
        let dir = tempfile::tempdir().unwrap();
        let config = JournalConfig::with_data_dir(dir.path());
        let session = JournalSession::with_clock(&config, Box::new(ManualClock::new("t")));
        (dir, session, StaticFactSource::new())
    }

    fn load_solar_system(session: &mut JournalSession, source: &StaticFactSource) {
        session.handle(HostEvent::SceneLoaded {
            scene: SceneKind::SolarSystem,
            profile: "Hatchling".to_owned(),
            source: Some(Box::new(source.clone())),
        });
    }

    // -- 1. Scene loads -------------------------------------------------------

    #[test]
    fn gameplay_scene_activates_the_watcher() {
        let (_dir, mut session, source) = setup();
        let outcome = session.handle(HostEvent::SceneLoaded {
            scene: SceneKind::SolarSystem,
            profile: "Hatchling".to_owned(),
            source: Some(Box::new(source)),
        });
        assert_eq!(outcome, EventOutcome::Watcher(WatcherState::Active));
    }

    #[test]
    fn menu_scene_leaves_the_watcher_idle() {
        let (_dir, mut session, source) = setup();
        load_solar_system(&mut session, &source);
        let outcome = session.handle(HostEvent::SceneLoaded {
            scene: SceneKind::TitleScreen,
            profile: "Hatchling".to_owned(),
            source: None,
        });
        assert_eq!(outcome, EventOutcome::Watcher(WatcherState::Idle));
        assert_eq!(session.tick(), TickOutcome::Idle);
    }

    // -- 2. Display -----------------------------------------------------------

    #[test]
    fn display_opens_only_from_pause_menu() {
        let (_dir, mut session, source) = setup();
        load_solar_system(&mut session, &source);

        assert_eq!(session.handle(HostEvent::ToggleDisplay), EventOutcome::Display(false));

        session.handle(HostEvent::PauseOpened);
        assert_eq!(session.handle(HostEvent::ToggleDisplay), EventOutcome::Display(true));
        assert!(session.view().is_some());

        assert_eq!(session.handle(HostEvent::ToggleDisplay), EventOutcome::Display(false));
        assert!(session.view().is_none());
    }

    #[test]
    fn display_needs_a_loaded_log() {
        let (_dir, mut session, _source) = setup();
        session.handle(HostEvent::PauseOpened);
        assert!(!session.toggle_display());
    }

    #[test]
    fn closing_pause_closes_display() {
        let (_dir, mut session, source) = setup();
        load_solar_system(&mut session, &source);
        session.handle(HostEvent::PauseOpened);
        session.toggle_display();

        session.handle(HostEvent::PauseClosed);
        assert!(!session.is_display_open());
    }

    #[test]
    fn scene_load_closes_display() {
        let (_dir, mut session, source) = setup();
        load_solar_system(&mut session, &source);
        session.handle(HostEvent::PauseOpened);
        session.toggle_display();

        load_solar_system(&mut session, &source);
        assert!(!session.is_display_open());
    }

    // -- 3. Report ------------------------------------------------------------

    #[test]
    fn report_requires_open_display() {
        let (_dir, mut session, source) = setup();
        source.reveal("Village", "A", 1, "a fact");
        load_solar_system(&mut session, &source);
        session.tick();

        assert_eq!(session.handle(HostEvent::GenerateReport), EventOutcome::Ignored);

        session.handle(HostEvent::PauseOpened);
        session.toggle_display();
        let EventOutcome::ReportWritten(path) = session.handle(HostEvent::GenerateReport) else {
            panic!("report should be written while the display is open");
        };
        assert!(path.ends_with("Hatchling_Fact_Log_Viewer.html"));
        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.contains("a fact"));
    }

    // -- 4. Tick --------------------------------------------------------------

    #[test]
    fn tick_detects_facts() {
        let (_dir, mut session, source) = setup();
        load_solar_system(&mut session, &source);
        assert_eq!(session.tick(), TickOutcome::Unchanged);

        source.reveal("Village", "A", 1, "a");
        assert_eq!(
            session.tick(),
            TickOutcome::Appended {
                added: 1,
                saved: true
            }
        );
        assert_eq!(session.watcher().document().unwrap().len(), 1);
    }

    #[test]
    fn stop_returns_the_log() {
        let (_dir, mut session, source) = setup();
        let origin = session.start("p", Some(Box::new(source)));
        assert_eq!(origin, LoadOrigin::Created);
        assert_eq!(session.stop().unwrap().profile_id(), "p");
        assert!(session.stop().is_none());
    }
}
