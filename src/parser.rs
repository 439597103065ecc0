//! Parsing unified-diff text into display rows.
//!
//! This module turns raw unified-diff output (as produced by `git diff`,
//! `diff -u`, or anything emitting the same format) into the aligned
//! [`Row`] sequence rendered by the side-by-side viewer. It does not compute
//! diffs itself and never fails: unrecognized lines degrade to context lines
//! and malformed hunk headers keep the previous line numbering.
//!
//! ## Processing Flow
//!
//! 1. The input is split into physical lines (`\n` or `\r\n`).
//! 2. Each line is classified: metadata, removal, addition, or context.
//! 3. Consecutive removals and additions accumulate in two pending buffers.
//! 4. A flush pairs them up index-by-index into aligned change rows. Flushes
//!    happen on metadata, on context lines, on a removal that starts a new
//!    change run after a pure-addition run, and once after the last line.
//!
//! ## Pairing Strategy
//!
//! The flush pairs the i-th removal with the i-th addition of a run. This is
//! a display heuristic, not a content-similarity alignment: it keeps change
//! runs visually compact and matches what reviewers expect from a classic
//! two-pane diff. Surplus lines on the longer side pair with a blank filler
//! cell on the other.

use crate::rows::{ContentRow, MetaKind, Row};
use regex::Regex;
use smallvec::SmallVec;
use std::sync::LazyLock;

/// Change runs are usually a handful of lines; inline storage avoids heap
/// allocation for the pending buffers.
type PendingLines = SmallVec<[String; 4]>;

/// Matches `@@ -<start>[,<count>] +<start>[,<count>] @@` and captures the two
/// start line numbers.
static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@@ -(\d+)(?:,\d+)? \+(\d+)(?:,\d+)? @@").expect("Invalid hunk header regex")
});

/// Marker emitted by diff tools when a file lacks a trailing newline.
const NO_NEWLINE_MARKER: &str = r"\ No newline at end of file";

/// Parses unified-diff text into an ordered sequence of display rows.
///
/// The output preserves the input's line order exactly: metadata rows appear
/// at the position their source line appeared, with buffered change runs
/// flushed in front of them. Line numbers are reconstructed from hunk
/// headers; content before the first header is numbered from 0.
///
/// The parse is total and referentially transparent, so callers may memoize
/// results by input string.
#[must_use]
pub fn parse(diff: &str) -> Vec<Row> {
    let mut builder = RowBuilder::default();
    for line in diff.lines() {
        builder.push_line(line);
    }
    builder.finish()
}

/// Accumulates classified diff lines and reconciles change runs into rows.
///
/// Holds the two pending buffers and the running left/right line counters.
/// Counters advance only when a physical line is consumed for a row, which
/// happens at context lines and at flush time for buffered changes. They
/// saturate at `u32::MAX` so hostile hunk starts cannot overflow them.
#[derive(Default)]
struct RowBuilder {
    rows: Vec<Row>,
    removals: PendingLines,
    additions: PendingLines,
    left_line: u32,
    right_line: u32,
}

impl RowBuilder {
    /// Classifies one physical line and updates the builder state.
    ///
    /// Prefix checks run in precedence order: file markers (`--- `/`+++ `)
    /// must win over removal/addition prefixes, and the hunk-header check
    /// must win over anything shaped like content.
    fn push_line(&mut self, line: &str) {
        if line.starts_with("diff ") || line.starts_with("index ") {
            self.flush();
            self.rows.push(Row::meta(line, MetaKind::Info));
        } else if line.starts_with("--- ") || line.starts_with("+++ ") {
            self.flush();
            self.rows.push(Row::meta(line, MetaKind::File));
        } else if line.starts_with("@@") {
            self.flush();
            self.start_hunk(line);
            self.rows.push(Row::meta(line, MetaKind::Hunk));
        } else if let Some(text) = line.strip_prefix('-') {
            // A removal directly after a pure-addition run starts a new
            // change run; flushing first keeps the earlier additions from
            // pairing with these removals.
            if !self.additions.is_empty() && self.removals.is_empty() {
                self.flush();
            }
            self.removals.push(text.to_string());
        } else if let Some(text) = line.strip_prefix('+') {
            self.additions.push(text.to_string());
        } else if line.starts_with(NO_NEWLINE_MARKER) {
            self.flush();
            self.rows.push(Row::meta(line, MetaKind::Info));
        } else {
            self.flush();
            let text = line.strip_prefix(' ').unwrap_or(line);
            let row = ContentRow::context(text, self.left_line, self.right_line);
            self.rows.push(Row::Content(row));
            self.left_line = self.left_line.saturating_add(1);
            self.right_line = self.right_line.saturating_add(1);
        }
    }

    /// Resets the line counters from a hunk header.
    ///
    /// A header that doesn't match the expected shape leaves the counters
    /// unchanged; the caller still emits the meta row, so a malformed header
    /// degrades the numbering but never the parse.
    fn start_hunk(&mut self, line: &str) {
        let Some(captures) = HUNK_HEADER.captures(line) else {
            return;
        };
        if let (Ok(left), Ok(right)) = (captures[1].parse(), captures[2].parse()) {
            self.left_line = left;
            self.right_line = right;
        }
    }

    /// Pairs up the pending removal and addition buffers into change rows.
    ///
    /// The i-th removal aligns with the i-th addition; surplus lines on the
    /// longer side get a filler on the other. A consumed side takes the
    /// current counter value and advances it by one.
    fn flush(&mut self) {
        if self.removals.is_empty() && self.additions.is_empty() {
            return;
        }

        let pairs = self.removals.len().max(self.additions.len());
        let mut removals = std::mem::take(&mut self.removals).into_iter();
        let mut additions = std::mem::take(&mut self.additions).into_iter();

        for _ in 0..pairs {
            let removal = removals.next().map(|text| {
                let line = self.left_line;
                self.left_line = self.left_line.saturating_add(1);
                (text, line)
            });
            let addition = additions.next().map(|text| {
                let line = self.right_line;
                self.right_line = self.right_line.saturating_add(1);
                (text, line)
            });
            self.rows.push(Row::Content(ContentRow::change(removal, addition)));
        }
    }

    /// Emits any trailing buffered changes and returns the row sequence.
    fn finish(mut self) -> Vec<Row> {
        self.flush();
        self.rows
    }
}
