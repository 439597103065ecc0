//! The display row model produced by the diff parser.
//!
//! A parsed diff becomes an ordered sequence of [`Row`] values: metadata rows
//! (hunk headers, file markers, `diff`/`index` lines) interleaved with aligned
//! content rows, in the exact order the corresponding lines appeared in the
//! input. The sequence is what a side-by-side viewer renders top to bottom.
//!
//! Rows serialize to camelCase JSON (for snapshot caches and non-Lua
//! consumers) and convert to Lua tables for the Neovim host.

use mlua::prelude::*;
use serde::Serialize;

/// The category of a metadata row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaKind {
    /// An `@@ -a,b +c,d @@` hunk header.
    Hunk,
    /// A `--- ` or `+++ ` file marker.
    File,
    /// Any other metadata: `diff`/`index` lines, the "no newline" marker.
    Info,
}

impl MetaKind {
    /// The lowercase name used on the Lua side.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            MetaKind::Hunk => "hunk",
            MetaKind::File => "file",
            MetaKind::Info => "info",
        }
    }
}

/// How one side of a content row should be rendered.
///
/// `Context` doubles as the "absent pairing placeholder": when a change run
/// has more removals than additions (or vice versa), the short side of the
/// surplus rows carries `Context` with no line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Added,
    Removed,
    Context,
}

impl Variant {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Variant::Added => "added",
            Variant::Removed => "removed",
            Variant::Context => "context",
        }
    }
}

/// One aligned display line with independent left and right sides.
///
/// A side's line number is present iff a physical diff line was consumed for
/// that side; the surplus side of an uneven change run has no number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRow {
    /// Text shown in the left (old) pane.
    pub left_text: String,

    /// Text shown in the right (new) pane.
    pub right_text: String,

    /// Line number in the old file, if a left-side line was consumed.
    pub left_line: Option<u32>,

    /// Line number in the new file, if a right-side line was consumed.
    pub right_line: Option<u32>,

    pub left_variant: Variant,

    pub right_variant: Variant,
}

impl ContentRow {
    /// Creates a context row: identical text on both sides, both numbered.
    #[must_use]
    pub(crate) fn context(text: &str, left_line: u32, right_line: u32) -> Self {
        Self {
            left_text: text.to_string(),
            right_text: text.to_string(),
            left_line: Some(left_line),
            right_line: Some(right_line),
            left_variant: Variant::Context,
            right_variant: Variant::Context,
        }
    }

    /// Creates a change row from an optional removal and optional addition.
    ///
    /// An absent side gets empty text, no line number, and the `Context`
    /// variant so the viewer renders it as a blank filler cell.
    #[must_use]
    pub(crate) fn change(
        removal: Option<(String, u32)>,
        addition: Option<(String, u32)>,
    ) -> Self {
        let (left_text, left_line, left_variant) = match removal {
            Some((text, line)) => (text, Some(line), Variant::Removed),
            None => (String::new(), None, Variant::Context),
        };
        let (right_text, right_line, right_variant) = match addition {
            Some((text, line)) => (text, Some(line), Variant::Added),
            None => (String::new(), None, Variant::Context),
        };

        Self {
            left_text,
            right_text,
            left_line,
            right_line,
            left_variant,
            right_variant,
        }
    }
}

/// A single row in the diff display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "row", rename_all = "lowercase")]
pub enum Row {
    /// A non-aligned informational line, rendered full-width.
    Meta { text: String, kind: MetaKind },

    /// An aligned left/right content line.
    Content(ContentRow),
}

impl Row {
    #[inline]
    #[must_use]
    pub(crate) fn meta(text: &str, kind: MetaKind) -> Self {
        Row::Meta {
            text: text.to_string(),
            kind,
        }
    }
}

/// Added/removed line counts for a parsed diff, for file-list display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowStats {
    /// Number of content rows whose right side is an addition.
    pub additions: u32,

    /// Number of content rows whose left side is a removal.
    pub deletions: u32,
}

/// Counts added and removed lines in a row sequence.
///
/// A pure fold over the output of [`crate::parser::parse`]; meta rows and
/// context sides contribute nothing.
#[must_use]
pub fn row_stats(rows: &[Row]) -> RowStats {
    rows.iter().fold(RowStats::default(), |mut stats, row| {
        if let Row::Content(content) = row {
            if content.right_variant == Variant::Added {
                stats.additions += 1;
            }
            if content.left_variant == Variant::Removed {
                stats.deletions += 1;
            }
        }
        stats
    })
}

impl IntoLua for Row {
    fn into_lua(self, lua: &Lua) -> LuaResult<LuaValue> {
        let table = lua.create_table()?;
        match self {
            Row::Meta { text, kind } => {
                table.set("kind", kind.name())?;
                table.set("text", text)?;
            }
            Row::Content(content) => {
                table.set("kind", "content")?;

                let left = lua.create_table()?;
                left.set("text", content.left_text)?;
                left.set("line", content.left_line)?;
                left.set("variant", content.left_variant.name())?;
                table.set("left", left)?;

                let right = lua.create_table()?;
                right.set("text", content.right_text)?;
                right.set("line", content.right_line)?;
                right.set("variant", content.right_variant.name())?;
                table.set("right", right)?;
            }
        }
        Ok(LuaValue::Table(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn added(text: &str, line: u32) -> Row {
        Row::Content(ContentRow::change(None, Some((text.to_string(), line))))
    }

    fn removed(text: &str, line: u32) -> Row {
        Row::Content(ContentRow::change(Some((text.to_string(), line)), None))
    }

    fn changed(old: &str, new: &str, left: u32, right: u32) -> Row {
        Row::Content(ContentRow::change(
            Some((old.to_string(), left)),
            Some((new.to_string(), right)),
        ))
    }

    #[test]
    fn stats_count_added_and_removed_sides() {
        let rows = vec![
            Row::meta("@@ -1,2 +1,2 @@", MetaKind::Hunk),
            Row::Content(ContentRow::context("same", 1, 1)),
            changed("old", "new", 2, 2),
            removed("gone", 3),
            added("fresh", 3),
        ];

        let stats = row_stats(&rows);
        assert_eq!(stats.additions, 2);
        assert_eq!(stats.deletions, 2);
    }

    #[test]
    fn stats_ignore_meta_and_context_rows() {
        let rows = vec![
            Row::meta("--- a/foo", MetaKind::File),
            Row::meta("+++ b/foo", MetaKind::File),
            Row::Content(ContentRow::context("ctx", 1, 1)),
        ];

        assert_eq!(row_stats(&rows), RowStats::default());
    }

    #[test]
    fn stats_of_empty_sequence_are_zero() {
        assert_eq!(row_stats(&[]), RowStats::default());
    }

    #[test]
    fn change_row_fills_absent_sides() {
        let Row::Content(row) = added("new line", 7) else {
            panic!("expected content row");
        };

        assert_eq!(row.left_text, "");
        assert_eq!(row.left_line, None);
        assert_eq!(row.left_variant, Variant::Context);
        assert_eq!(row.right_text, "new line");
        assert_eq!(row.right_line, Some(7));
        assert_eq!(row.right_variant, Variant::Added);
    }

    #[test]
    fn content_row_serializes_to_camel_case() {
        let row = changed("old", "new", 4, 6);
        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(json["row"], "content");
        assert_eq!(json["leftText"], "old");
        assert_eq!(json["rightText"], "new");
        assert_eq!(json["leftLine"], 4);
        assert_eq!(json["rightLine"], 6);
        assert_eq!(json["leftVariant"], "removed");
        assert_eq!(json["rightVariant"], "added");
    }

    #[test]
    fn meta_row_serializes_with_kind() {
        let row = Row::meta("@@ -1 +1 @@", MetaKind::Hunk);
        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(json["row"], "meta");
        assert_eq!(json["kind"], "hunk");
        assert_eq!(json["text"], "@@ -1 +1 @@");
    }
}
