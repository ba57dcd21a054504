//! Rosterforge ingestion core.
//!
//! Turns one loosely-structured upstream game-data snapshot into the clean
//! display schema in `rosterforge-schema`:
//! - pick exactly one "current" dataset revision among candidates,
//! - filter out non-player records,
//! - resolve templated description text against per-tier variables,
//! - cross-link entities once all four collections exist.
//!
//! Everything in this crate is pure over `serde_json::Value`; network I/O
//! and orchestration live in `rosterforge-cli`. The error philosophy is
//! degrade-never-abort: a missing section yields an empty collection, an
//! unresolvable token yields placeholder text, an unresolvable reference is
//! skipped. Only top-level shape violations (non-object snapshot) surface as
//! errors, and only at the crate boundary.

pub mod assets;
pub mod augments;
pub mod champions;
pub mod classify;
pub mod items;
pub mod linker;
pub mod selector;
pub mod stats;
pub mod text;
pub mod traits;

use anyhow::{anyhow, Result};
use serde_json::Value;

/// Assert the snapshot's basic shape at the crate boundary.
///
/// Everything downstream tolerates missing sections, but a snapshot that is
/// not even a JSON object is a caller bug, not upstream noise.
pub fn require_object<'a>(payload: &'a Value, what: &str) -> Result<&'a serde_json::Map<String, Value>> {
    payload
        .as_object()
        .ok_or_else(|| anyhow!("{what}: expected a JSON object at top level"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn require_object_accepts_objects() {
        let v = json!({"items": []});
        assert!(require_object(&v, "snapshot").is_ok());
    }

    #[test]
    fn require_object_rejects_arrays() {
        let v = json!([1, 2, 3]);
        let err = require_object(&v, "snapshot").unwrap_err();
        assert!(err.to_string().contains("expected a JSON object"));
    }
}
