//! Item parsing.
//!
//! The export keeps one global item table; each revision carries a list of
//! item reference keys that are live for that revision. Resolution ignores
//! duplicates and unresolvable references, and drops records that are not
//! player-facing inventory (consumables, champion-bound items, armory
//! grants, unnamed placeholders).

use crate::{assets::asset_url, classify::classify_item, text};
use rosterforge_schema::{Item, ItemCategory};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Build the global item table, indexed by stable key.
pub fn global_item_table(snapshot: &Value) -> HashMap<&str, &Value> {
    snapshot
        .get("items")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|item| {
                    item.get("apiName").and_then(Value::as_str).map(|k| (k, item))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Resolve the revision's item reference list against the global table and
/// parse the survivors, sorted by category precedence then name.
pub fn parse_items(revision: &Value, table: &HashMap<&str, &Value>) -> Vec<Item> {
    let refs = reference_list(revision, "items");
    let mut seen: HashSet<&str> = HashSet::new();
    let mut items: Vec<Item> = refs
        .iter()
        .filter(|key| seen.insert(key.as_str()))
        .filter_map(|key| table.get(key.as_str()).copied())
        .filter_map(parse_one)
        .collect();
    items.sort_by(|a, b| {
        a.category
            .display_rank()
            .cmp(&b.category.display_rank())
            .then_with(|| a.name.cmp(&b.name))
    });
    debug!(kept = items.len(), refs = refs.len(), "parsed items");
    items
}

/// A revision's reference list for `items` or `augments`. Missing lists read
/// as empty; the run proceeds with empty collections.
pub fn reference_list(revision: &Value, key: &str) -> Vec<String> {
    revision
        .get(key)
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_one(record: &Value) -> Option<Item> {
    let api_name = record
        .get("apiName")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let name = record
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim();
    if !is_inventory_item(api_name, name) {
        return None;
    }

    let composition = composition(record);
    let effects = effect_values(record);
    let desc_raw = record.get("desc").and_then(Value::as_str).unwrap_or_default();
    // Item variables are flat scalars; reuse the ability resolver with each
    // value lifted to a tier-invariant sequence.
    let vars = effects
        .iter()
        .map(|(k, v)| (k.clone(), vec![*v]))
        .collect();
    let desc = text::resolve_ability_desc(desc_raw, &vars);
    let category: ItemCategory = classify_item(api_name, name, desc_raw, &composition);

    Some(Item {
        id: record.get("id").and_then(Value::as_u64).map(|id| id as u32),
        api_name: api_name.to_string(),
        name: name.to_string(),
        desc,
        icon: record
            .get("icon")
            .and_then(Value::as_str)
            .map(asset_url)
            .unwrap_or_default(),
        category,
        composition,
        effects,
    })
}

/// Player-facing inventory filter: out go consumables, champion-bound
/// items, armory grants, and unnamed or template-marker placeholder names.
fn is_inventory_item(api_name: &str, name: &str) -> bool {
    if name.is_empty() || name.contains('@') || name.contains("TFT_Item") {
        return false;
    }
    let lower = api_name.to_ascii_lowercase();
    !(lower.contains("consumable")
        || lower.contains("championitem")
        || lower.contains("grant")
        || lower.contains("armory"))
}

fn composition(record: &Value) -> Vec<String> {
    record
        .get("composition")
        .or_else(|| record.get("from"))
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn effect_values(record: &Value) -> BTreeMap<String, f64> {
    record
        .get("effects")
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| v.as_f64().map(|v| (k.clone(), v)))
                .collect()
        })
        .unwrap_or_default()
}
