//! On-screen list view of a fact log.
//!
//! [`JournalView`] is the presentation model the host's overlay draws: a
//! title, a header row, one row per entry, and pixel column widths for a
//! given screen width. [`JournalView::render_text`] lays the same table out
//! as plain text for terminals.

use factlog_journal::document::LogDocument;

/// Pixel width of the real-time column.
pub const REAL_TIME_WIDTH: f32 = 150.0;
/// Pixel width of the loop-time column.
pub const LOOP_TIME_WIDTH: f32 = 100.0;
/// Pixel width of the location column.
pub const LOCATION_WIDTH: f32 = 150.0;

/// Column titles, in display order.
pub const HEADERS: [&str; 4] = ["Real Time", "Loop Time", "Location", "Fact"];

// Character widths of the fixed text columns.
const TEXT_REAL_TIME: usize = 20;
const TEXT_LOOP_TIME: usize = 10;
const TEXT_LOCATION: usize = 20;
const TEXT_MIN_FACT: usize = 20;

/// One displayed row.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow {
    pub real_time: String,
    pub loop_time: String,
    pub location: String,
    pub fact: String,
}

/// Read-only view over a loaded log.
#[derive(Debug, Clone, Copy)]
pub struct JournalView<'a> {
    document: &'a LogDocument,
}

impl<'a> JournalView<'a> {
    pub fn new(document: &'a LogDocument) -> Self {
        Self { document }
    }

    pub fn title(&self) -> String {
        format!("Fact Log - {}", self.document.profile_id())
    }

    /// Rows in document order.
    pub fn rows(&self) -> impl Iterator<Item = ViewRow> + 'a {
        self.document.entries().iter().map(|e| ViewRow {
            real_time: e.wall_clock_time.clone(),
            loop_time: e.loop_time_label(),
            location: e.location.clone(),
            fact: e.text.clone(),
        })
    }

    /// Pixel widths of the four columns; the fact column takes the rest of
    /// the screen (never negative).
    pub fn column_widths(screen_width: f32) -> [f32; 4] {
        let fixed = REAL_TIME_WIDTH + LOOP_TIME_WIDTH + LOCATION_WIDTH;
        [
            REAL_TIME_WIDTH,
            LOOP_TIME_WIDTH,
            LOCATION_WIDTH,
            (screen_width - fixed).max(0.0),
        ]
    }

    /// Plain-text table `width` characters wide. Long facts wrap onto
    /// continuation lines; other cells are truncated to their column.
    pub fn render_text(&self, width: usize) -> String {
        let fact_width = width
            .saturating_sub(TEXT_REAL_TIME + TEXT_LOOP_TIME + TEXT_LOCATION + 3)
            .max(TEXT_MIN_FACT);

        let mut out = String::new();
        out.push_str(&self.title());
        out.push('\n');
        push_line(&mut out, HEADERS[0], HEADERS[1], HEADERS[2], HEADERS[3]);
        for row in self.rows() {
            let mut lines = wrap(&row.fact, fact_width).into_iter();
            let first = lines.next().unwrap_or_default();
            push_line(&mut out, &row.real_time, &row.loop_time, &row.location, &first);
            for line in lines {
                push_line(&mut out, "", "", "", &line);
            }
        }
        out
    }
}

fn push_line(out: &mut String, real_time: &str, loop_time: &str, location: &str, fact: &str) {
    out.push_str(&format!(
        "{:<rt$} {:>lt$} {:<loc$} {}",
        truncate(real_time, TEXT_REAL_TIME),
        truncate(loop_time, TEXT_LOOP_TIME),
        truncate(location, TEXT_LOCATION),
        fact,
        rt = TEXT_REAL_TIME,
        lt = TEXT_LOOP_TIME,
        loc = TEXT_LOCATION,
    ));
    let trimmed = out.trim_end_matches(' ').len();
    out.truncate(trimmed);
    out.push('\n');
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Greedy word wrap. Words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            lines.push(word.drain(..width).collect());
        }
        if word.is_empty() {
            continue;
        }
        let needed = if line.is_empty() { word.len() } else { line.chars().count() + 1 + word.len() };
        if needed > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.extend(word);
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}
