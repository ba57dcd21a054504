//! Augment parsing.
//!
//! Augments live in the same global item table as items; each revision
//! carries its own augment reference list. Tier comes from tag metadata when
//! present, else from the icon filename convention.

use crate::{assets::asset_url, classify::classify_augment_tier, items::reference_list, text};
use rosterforge_schema::Augment;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Resolve the revision's augment reference list against the global item
/// table, sorted by (tier, name).
pub fn parse_augments(revision: &Value, table: &HashMap<&str, &Value>) -> Vec<Augment> {
    let refs = reference_list(revision, "augments");
    let mut seen: HashSet<&str> = HashSet::new();
    let mut augments: Vec<Augment> = refs
        .iter()
        .filter(|key| seen.insert(key.as_str()))
        .filter_map(|key| table.get(key.as_str()).copied())
        .filter_map(parse_one)
        .collect();
    augments.sort_by(|a, b| a.tier.cmp(&b.tier).then_with(|| a.name.cmp(&b.name)));
    debug!(kept = augments.len(), refs = refs.len(), "parsed augments");
    augments
}

fn parse_one(record: &Value) -> Option<Augment> {
    let api_name = record
        .get("apiName")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let name = record
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim();
    if name.is_empty() || name.contains('@') {
        return None;
    }

    let tags: Vec<String> = record
        .get("tags")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let icon_raw = record.get("icon").and_then(Value::as_str).unwrap_or_default();

    let vars = record
        .get("effects")
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| v.as_f64().map(|v| (k.clone(), vec![v])))
                .collect()
        })
        .unwrap_or_default();
    let desc_raw = record.get("desc").and_then(Value::as_str).unwrap_or_default();

    Some(Augment {
        api_name: api_name.to_string(),
        name: name.to_string(),
        desc: text::resolve_ability_desc(desc_raw, &vars),
        icon: asset_url(icon_raw),
        tier: classify_augment_tier(&tags, icon_raw),
        associated_traits: record
            .get("associatedTraits")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    })
}
