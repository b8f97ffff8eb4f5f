//! Standalone HTML report of a fact log.
//!
//! The report is a single self-contained page (inline CSS, no scripts) with
//! one table row per entry in document order. Columns: real time, loop time,
//! location, fact.

use crate::document::LogDocument;

const STYLE: &str = r#"
        body {
            background: #081018;
            font-family: monospace;
            font-size: 16px;
            color: white;
        }
        table {
            table-layout: fixed;
        }
        th {
            font-family: sans-serif;
            color: #ff7f25;
        }
        td {
            padding: 5px;
        }
        td:not(:last-child) {
            white-space: nowrap;
            text-align: right;
        }
"#;

/// Render `document` as an HTML page.
pub fn render_html(document: &LogDocument) -> String {
    let profile = escape_html(document.profile_id());
    let rows: String = document
        .entries()
        .iter()
        .map(|entry| {
            format!(
                "                <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape_html(&entry.wall_clock_time),
                entry.loop_time_label(),
                escape_html(&entry.location),
                escape_html(&entry.text),
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Fact Log - {profile}</title>
    <style>{STYLE}    </style>
</head>
<body>
    <table>
        <thead>
            <tr>
                <th>Real Time</th>
                <th>Loop Time</th>
                <th>Location</th>
                <th>Fact</th>
            </tr>
        </thead>
        <tbody>
{rows}        </tbody>
    </table>
</body>
</html>
"#
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
