//! Dataset revision selection.
//!
//! One upstream snapshot can expose several concurrent revisions (the
//! standard set plus special game-mode variants), shaped either as a
//! `setData` array or as a legacy `sets` map keyed by revision id. All
//! "which shape did we get" decisions live here; downstream parsers see one
//! selected revision or nothing.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// One candidate revision, normalized from either upstream shape.
#[derive(Debug, Clone, Copy)]
pub struct Revision<'a> {
    pub number: Option<u64>,
    pub mutator: Option<&'a str>,
    pub name: Option<&'a str>,
    /// The revision's own record (champions, traits, reference lists).
    pub data: &'a Value,
}

impl Revision<'_> {
    /// Display label: explicit number first, then digits embedded in the
    /// mutator tag, then the declared name, then "Unknown".
    pub fn label(&self) -> String {
        if let Some(n) = self.number {
            return format!("Set {n}");
        }
        if let Some(m) = self.mutator {
            if let Some(d) = DIGITS.find(m) {
                return format!("Set {}", d.as_str());
            }
        }
        match self.name {
            Some(n) if !n.trim().is_empty() => n.trim().to_string(),
            _ => "Unknown".to_string(),
        }
    }

    /// A mutator without a qualifying `_Suffix` is the standard variant;
    /// special game modes are tagged like `TFTSet14_Turbo`. A missing
    /// mutator also counts as standard.
    fn is_standard(&self) -> bool {
        self.mutator.map_or(true, |m| !m.contains('_'))
    }
}

/// Pick exactly one current revision, or `None` if the snapshot carries no
/// candidates. Callers must treat `None` as "emit empty collections", never
/// as a failed run.
///
/// Selection: highest revision number wins; among ties the standard variant
/// beats mode variants; among equal standards the first encountered wins.
/// The legacy map shape has no revision numbers and falls back to
/// digit-extracted key ordering, last key wins.
pub fn select_revision(snapshot: &Value) -> Option<Revision<'_>> {
    if let Some(arr) = snapshot.get("setData").and_then(Value::as_array) {
        let candidates: Vec<Revision<'_>> = arr.iter().map(revision_from_entry).collect();
        return pick(candidates);
    }

    if let Some(map) = snapshot.get("sets").and_then(Value::as_object) {
        // Legacy shape: keys like "4", "4.5", "14". Order by embedded
        // digits, then by the raw key for stability, and take the last.
        let mut keys: Vec<&String> = map.keys().collect();
        keys.sort_by(|a, b| {
            extract_digits(a)
                .cmp(&extract_digits(b))
                .then_with(|| a.cmp(b))
        });
        let key = keys.last()?;
        let data = &map[key.as_str()];
        debug!(key = %key, "selected legacy revision by key order");
        return Some(Revision {
            number: extract_digits(key),
            mutator: data.get("mutator").and_then(Value::as_str),
            name: data.get("name").and_then(Value::as_str),
            data,
        });
    }

    None
}

fn revision_from_entry(entry: &Value) -> Revision<'_> {
    Revision {
        number: entry.get("number").and_then(Value::as_u64),
        mutator: entry.get("mutator").and_then(Value::as_str),
        name: entry.get("name").and_then(Value::as_str),
        data: entry,
    }
}

fn pick(candidates: Vec<Revision<'_>>) -> Option<Revision<'_>> {
    let max = candidates.iter().filter_map(|r| r.number).max().unwrap_or(0);
    let at_max = || {
        candidates
            .iter()
            .filter(move |r| r.number.unwrap_or(0) == max)
    };
    // Standard variant first; ties keep encounter order.
    let selected = at_max().find(|r| r.is_standard()).or_else(|| at_max().next())?;
    debug!(number = ?selected.number, mutator = ?selected.mutator, "selected revision");
    Some(*selected)
}

fn extract_digits(s: &str) -> Option<u64> {
    DIGITS.find(s).and_then(|m| m.as_str().parse().ok())
}
