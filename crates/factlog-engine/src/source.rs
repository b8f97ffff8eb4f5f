//! The host game's fact data, seen through narrow capability traits.
//!
//! The watcher never talks to the host directly. It asks a [`FactSource`] for
//! the current loop time and walks its [`Grouping`]s (location-like
//! containers), each of which lists rumor facts and explore facts. A host
//! adapter implements these traits over the game's own objects; tests and
//! benches use the in-memory [`StaticFactSource`].
//!
//! A host may hand over records it cannot describe fully. Those are reported
//! per fact as a [`FactError`] so the watcher can skip them and keep scanning.

use std::cell::RefCell;
use std::rc::Rc;

// ---------------------------------------------------------------------------
// LoopTime
// ---------------------------------------------------------------------------

/// Game time inside the repeating loop.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoopTime {
    /// Progress through the current loop, in `[0, 1)`.
    pub fraction_elapsed: f64,
    /// Number of completed loops.
    pub loop_count: u32,
}

impl LoopTime {
    pub fn new(loop_count: u32, fraction_elapsed: f64) -> Self {
        Self {
            fraction_elapsed,
            loop_count,
        }
    }

    /// Completed loops plus the elapsed fraction, e.g. `3.25`.
    pub fn as_f64(&self) -> f64 {
        f64::from(self.loop_count) + self.fraction_elapsed
    }
}

// ---------------------------------------------------------------------------
// Facts
// ---------------------------------------------------------------------------

/// Which list of a grouping a fact belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactCategory {
    Rumor,
    Explore,
}

/// One fact as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactRecord {
    pub id: String,
    pub revealed: bool,
    pub reveal_order: i32,
    pub text: String,
}

impl FactRecord {
    /// A revealed fact.
    pub fn revealed(id: impl Into<String>, reveal_order: i32, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            revealed: true,
            reveal_order,
            text: text.into(),
        }
    }

    /// A fact the player has not discovered yet.
    pub fn hidden(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            revealed: false,
            reveal_order: -1,
            text: text.into(),
        }
    }

    /// Reject records that cannot be logged.
    pub fn validate(self) -> Result<Self, FactError> {
        if self.id.trim().is_empty() {
            return Err(FactError::MissingId);
        }
        Ok(self)
    }
}

/// A fact record the host could not describe.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactError {
    #[error("fact record has no id")]
    MissingId,

    #[error("malformed fact record: {reason}")]
    Malformed { reason: String },
}

/// The result type facts are reported in.
pub type FactResult = Result<FactRecord, FactError>;

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// A named, location-like container of facts.
pub trait Grouping {
    /// Label shown in the log's location column.
    fn display_name(&self) -> String;
    /// Facts learned second-hand about this grouping.
    fn rumor_facts(&self) -> Vec<FactResult>;
    /// Facts learned by exploring this grouping.
    fn explore_facts(&self) -> Vec<FactResult>;
}

/// Everything the watcher reads from the host each tick.
pub trait FactSource {
    /// The current loop time.
    fn loop_time(&self) -> LoopTime;
    /// Call `visit` once per grouping, in the host's enumeration order.
    fn visit_groupings(&self, visit: &mut dyn FnMut(&dyn Grouping));
}

// ---------------------------------------------------------------------------
// StaticFactSource
// ---------------------------------------------------------------------------

/// An in-memory grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub rumor: Vec<FactResult>,
    pub explore: Vec<FactResult>,
}

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rumor: Vec::new(),
            explore: Vec::new(),
        }
    }
}

impl Grouping for Location {
    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn rumor_facts(&self) -> Vec<FactResult> {
        self.rumor.clone()
    }

    fn explore_facts(&self) -> Vec<FactResult> {
        self.explore.clone()
    }
}

#[derive(Debug, Default)]
struct SourceState {
    loop_time: LoopTime,
    locations: Vec<Location>,
}

/// A [`FactSource`] backed by plain data.
///
/// Clones share state, so a test can hand one clone to the watcher and keep
/// revealing facts through another.
#[derive(Debug, Clone, Default)]
pub struct StaticFactSource {
    state: Rc<RefCell<SourceState>>,
}

impl StaticFactSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the loop time reported from now on.
    pub fn set_loop_time(&self, loop_time: LoopTime) {
        self.state.borrow_mut().loop_time = loop_time;
    }

    /// Add (or replace) a fact in `location`, creating the location at the
    /// end of the enumeration order if it is new.
    ///
    /// Replacing keeps the fact's position, so revealing a hidden fact does
    /// not change enumeration order.
    pub fn put_fact(&self, location: &str, category: FactCategory, fact: FactRecord) {
        let mut state = self.state.borrow_mut();
        let list = Self::list_mut(&mut state, location, category);
        let existing = list
            .iter()
            .position(|f| matches!(f, Ok(existing) if existing.id == fact.id));
        match existing {
            Some(index) => list[index] = Ok(fact),
            None => list.push(Ok(fact)),
        }
    }

    /// Shorthand for a revealed explore fact.
    pub fn reveal(&self, location: &str, id: &str, reveal_order: i32, text: &str) {
        self.put_fact(
            location,
            FactCategory::Explore,
            FactRecord::revealed(id, reveal_order, text),
        );
    }

    /// Add a record the host failed to describe.
    pub fn put_malformed(&self, location: &str, category: FactCategory, error: FactError) {
        let mut state = self.state.borrow_mut();
        Self::list_mut(&mut state, location, category).push(Err(error));
    }

    /// Number of groupings.
    pub fn location_count(&self) -> usize {
        self.state.borrow().locations.len()
    }

    fn list_mut<'a>(
        state: &'a mut SourceState,
        location: &str,
        category: FactCategory,
    ) -> &'a mut Vec<FactResult> {
        let index = match state.locations.iter().position(|l| l.name == location) {
            Some(index) => index,
            None => {
                state.locations.push(Location::new(location));
                state.locations.len() - 1
            }
        };
        let location = &mut state.locations[index];
        match category {
            FactCategory::Rumor => &mut location.rumor,
            FactCategory::Explore => &mut location.explore,
        }
    }
}

impl FactSource for StaticFactSource {
    fn loop_time(&self) -> LoopTime {
        self.state.borrow().loop_time
    }

    fn visit_groupings(&self, visit: &mut dyn FnMut(&dyn Grouping)) {
        let state = self.state.borrow();
        for location in &state.locations {
            visit(location);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
