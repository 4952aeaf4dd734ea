//! Just enough HTML scanning to pull a timetable out of the published page.
//!
//! The timetable page is regular: one `<table>` per service, identified by
//! its `summary` attribute, a header row, then one row per station with the
//! station link in a `<th>` and one `<td>` per run. Morning times are set in
//! `<em>`, afternoon times in `<strong>`.

use super::error::TimetableError;
use super::parse::Cell;

const TABLE_OPEN: &str = "<table";
const TABLE_CLOSE: &str = "</table>";

/// Return the markup of the table carrying `summary="<summary>"`.
pub fn find_table<'a>(html: &'a str, summary: &str) -> Result<&'a str, TimetableError> {
    let attr = format!("summary=\"{summary}\"");
    let at = html
        .find(&attr)
        .ok_or_else(|| TimetableError::SummaryNotFound {
            summary: summary.to_string(),
        })?;
    let start = html[..at]
        .rfind(TABLE_OPEN)
        .ok_or(TimetableError::TableStartNotFound)?;
    let end = html[start..]
        .find(TABLE_CLOSE)
        .ok_or(TimetableError::TableEndNotFound)?;
    Ok(&html[start..start + end + TABLE_CLOSE.len()])
}

/// A station row as found in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub station: String,
    pub cells: Vec<Cell>,
}

/// Extract station rows from a table, skipping the header row and any row
/// without a station link.
pub fn station_rows(table: &str) -> Vec<RawRow> {
    let body = elements(table, "tbody").first().copied().unwrap_or(table);
    elements(body, "tr")
        .into_iter()
        .skip(1)
        .filter_map(|row| {
            let th = elements(row, "th").first().copied()?;
            let station = elements(th, "a").first().map(|a| inner_text(a))?;
            if station.is_empty() {
                return None;
            }
            let cells = elements(row, "td").into_iter().map(classify_cell).collect();
            Some(RawRow { station, cells })
        })
        .collect()
}

/// Morning if the cell has `<em>` text, afternoon if it has `<strong>` text.
fn classify_cell(cell: &str) -> Cell {
    if let Some(text) = first_text(cell, "em") {
        Cell::Morning(text)
    } else if let Some(text) = first_text(cell, "strong") {
        Cell::Afternoon(text)
    } else {
        Cell::Empty
    }
}

/// Text of the first `tag` element that has any.
fn first_text(src: &str, tag: &str) -> Option<String> {
    elements(src, tag)
        .into_iter()
        .map(inner_text)
        .find(|t| !t.is_empty())
}

/// Inner markup of each `<tag ...>...</tag>` element, outermost first.
///
/// Elements of the same tag are assumed not to nest. An unclosed element
/// runs to the end of the input.
fn elements<'a>(src: &'a str, tag: &str) -> Vec<&'a str> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let mut found = Vec::new();
    let mut rest = src;

    while let Some(start) = find_open_tag(rest, &open) {
        let after_name = &rest[start + open.len()..];
        let Some(gt) = after_name.find('>') else {
            break;
        };
        let body = &after_name[gt + 1..];
        match body.find(&close) {
            Some(end) => {
                found.push(&body[..end]);
                rest = &body[end + close.len()..];
            }
            None => {
                found.push(body);
                break;
            }
        }
    }
    found
}

/// Position of `open` (e.g. `<th`) where the tag name ends right after it,
/// so `<th` does not match `<thead`.
fn find_open_tag(src: &str, open: &str) -> Option<usize> {
    src.match_indices(open).map(|(i, _)| i).find(|&i| {
        src[i + open.len()..]
            .chars()
            .next()
            .is_some_and(|c| c == '>' || c == '/' || c.is_ascii_whitespace())
    })
}

/// Text content with tags removed, entities for spaces decoded, non-ASCII
/// dropped and whitespace collapsed.
fn inner_text(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&#0160;", " ")
        .replace("&amp;", "&");
    decoded
        .chars()
        .filter(char::is_ascii)
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
