//! Custom SQL functions registered on every core connection.
//!
//! SQLite's built-in `LIKE`/`lower()` only fold ASCII, so search goes
//! through `casefold_contains(haystack, needle)` instead.

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

pub(crate) const CASEFOLD_CONTAINS: &str = "casefold_contains";

pub(crate) fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        CASEFOLD_CONTAINS,
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let haystack = ctx.get::<Option<String>>(0)?;
            let needle = ctx.get::<Option<String>>(1)?;
            Ok(match (haystack, needle) {
                (Some(haystack), Some(needle)) => casefold_contains(&haystack, &needle),
                _ => false,
            })
        },
    )
}

/// Unicode-aware, case-insensitive substring test.
pub(crate) fn casefold_contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
