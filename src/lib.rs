//! # unidiff-nvim
//!
//! A Neovim plugin backend for rendering unified diffs in a side-by-side
//! viewer.
//!
//! This crate provides Lua bindings for re-rendering already-produced
//! unified-diff text (from `git diff`, `diff -u`, a forge API, or anything
//! emitting the same format) into aligned display rows. It does not invoke
//! any VCS and does not compute diffs itself; the Lua side supplies the diff
//! text and lays out the returned rows.
//!
//! ## Architecture
//!
//! The crate is organized into three modules:
//!
//! - `rows` - The display row model, row statistics, and Lua conversions
//! - `parser` - Classifies diff lines and pairs change runs into rows
//! - `lib` (this module) - Lua module exports
//!
//! ## Usage from Lua
//!
//! ```lua
//! local unidiff = require("unidiff_nvim")
//!
//! -- Render one diff body
//! local result = unidiff.parse_diff(diff_text)
//! -- result.rows, result.additions, result.deletions
//!
//! -- Render several diff bodies (e.g. one per file) in parallel
//! local results = unidiff.parse_diffs({ diff_a, diff_b, diff_c })
//! ```
//!
//! Parsing is pure: the same diff text always yields the same rows, so the
//! Lua side can cache results keyed by the input string.

use mlua::prelude::*;
use rayon::prelude::*;

mod parser;
mod rows;

use rows::{Row, RowStats, row_stats};

/// Builds the Lua result table for one parsed diff:
/// `{ rows = {...}, additions = n, deletions = n }`.
fn diff_result(lua: &Lua, rows: Vec<Row>, stats: RowStats) -> LuaResult<LuaTable> {
    let rows_table = lua.create_table_with_capacity(rows.len(), 0)?;
    for (i, row) in rows.into_iter().enumerate() {
        rows_table.set(i + 1, row.into_lua(lua)?)?;
    }

    let result = lua.create_table()?;
    result.set("rows", rows_table)?;
    result.set("additions", stats.additions)?;
    result.set("deletions", stats.deletions)?;
    Ok(result)
}

/// Parses one unified-diff body into display rows and stats.
fn parse_diff(lua: &Lua, text: String) -> LuaResult<LuaTable> {
    let rows = parser::parse(&text);
    let stats = row_stats(&rows);
    diff_result(lua, rows, stats)
}

/// Parses several independent diff bodies, one result table per input.
///
/// The transform holds no shared state, so the bodies are parsed on the
/// rayon thread pool; only the Lua table construction runs on the calling
/// thread.
fn parse_diffs(lua: &Lua, texts: Vec<String>) -> LuaResult<LuaTable> {
    let parsed: Vec<(Vec<Row>, RowStats)> = texts
        .into_par_iter()
        .map(|text| {
            let rows = parser::parse(&text);
            let stats = row_stats(&rows);
            (rows, stats)
        })
        .collect();

    let results = lua.create_table_with_capacity(parsed.len(), 0)?;
    for (i, (rows, stats)) in parsed.into_iter().enumerate() {
        results.set(i + 1, diff_result(lua, rows, stats)?)?;
    }
    Ok(results)
}

/// Creates the Lua module exports. Called by mlua when loaded via
/// `require("unidiff_nvim")`.
#[mlua::lua_module]
fn unidiff_nvim(lua: &Lua) -> LuaResult<LuaTable> {
    let exports = lua.create_table()?;
    exports.set(
        "parse_diff",
        lua.create_function(|lua, text: String| parse_diff(lua, text))?,
    )?;
    exports.set(
        "parse_diffs",
        lua.create_function(|lua, texts: Vec<String>| parse_diffs(lua, texts))?,
    )?;
    Ok(exports)
}
