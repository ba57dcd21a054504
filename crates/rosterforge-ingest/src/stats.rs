//! Stat block normalization.
//!
//! The export has shipped two shapes for champion stats across iterations:
//! plain scalars, and 3-element per-tier arrays. This module is the single
//! place that decides which shape a field has; downstream code only ever
//! sees [`StatValue`].

use rosterforge_schema::{StatValue, Stats};
use serde_json::Value;

/// Normalize one stat field. Missing or malformed fields read as zero
/// scalars rather than failing the record.
pub fn stat_value(raw: Option<&Value>) -> StatValue {
    match raw {
        Some(Value::Number(n)) => StatValue::Scalar(n.as_f64().unwrap_or(0.0)),
        Some(Value::Array(arr)) if !arr.is_empty() => {
            let nums: Vec<f64> = arr.iter().filter_map(Value::as_f64).collect();
            match nums.as_slice() {
                [] => StatValue::Scalar(0.0),
                [only] => StatValue::Scalar(*only),
                _ => {
                    let last = *nums.last().unwrap_or(&0.0);
                    let mut tiers = [last; 3];
                    for (slot, v) in tiers.iter_mut().zip(nums.iter()) {
                        *slot = *v;
                    }
                    StatValue::Tiered(tiers)
                }
            }
        }
        _ => StatValue::Scalar(0.0),
    }
}

/// Normalize a raw champion stat object.
pub fn parse_stats(raw: &Value) -> Stats {
    let get = |key: &str| stat_value(raw.get(key));
    Stats {
        health: get("hp"),
        initial_mana: get("initialMana"),
        mana: get("mana"),
        armor: get("armor"),
        magic_resist: get("magicResist"),
        damage: get("damage"),
        attack_speed: get("attackSpeed"),
        crit_chance: get("critChance"),
        range: get("range"),
    }
}
