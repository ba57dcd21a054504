//! Champion parsing.

use crate::{assets::asset_url, classify::is_non_player, stats::parse_stats, text};
use rosterforge_schema::{Ability, Champion};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Parse the selected revision's champion list: filter non-player records,
/// clamp costs into `[1, 5]`, resolve ability text, normalize stats, and
/// sort by (cost, name).
pub fn parse_champions(revision: &Value) -> Vec<Champion> {
    let raw = revision
        .get("champions")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut champions: Vec<Champion> = raw.iter().filter_map(parse_one).collect();
    champions.sort_by(|a, b| a.cost.cmp(&b.cost).then_with(|| a.name.cmp(&b.name)));
    debug!(kept = champions.len(), raw = raw.len(), "parsed champions");
    champions
}

fn parse_one(record: &Value) -> Option<Champion> {
    let api_name = record
        .get("apiName")
        .or_else(|| record.get("characterName"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    let name = record
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim();
    let cost = record
        .get("cost")
        .and_then(Value::as_i64)
        .unwrap_or_default();
    let traits: Vec<String> = record
        .get("traits")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if name.is_empty() || is_non_player(api_name, cost, traits.len()) {
        return None;
    }

    let ability = parse_ability(record.get("ability"));

    Some(Champion {
        name: name.to_string(),
        api_name: api_name.to_string(),
        cost: cost.clamp(1, 5) as u8,
        traits,
        ability,
        stats: record.get("stats").map(parse_stats).unwrap_or_default(),
        icon: icon_field(record, "icon"),
        tile_icon: icon_field(record, "tileIcon"),
        splash_icon: record
            .get("splashIcon")
            .or_else(|| record.get("squareIcon"))
            .and_then(Value::as_str)
            .map(asset_url)
            .unwrap_or_default(),
    })
}

fn icon_field(record: &Value, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(asset_url)
        .unwrap_or_default()
}

fn parse_ability(raw: Option<&Value>) -> Ability {
    let Some(raw) = raw else {
        return Ability::default();
    };
    let variables = parse_variables(raw.get("variables"));
    let desc = raw.get("desc").and_then(Value::as_str).unwrap_or_default();
    Ability {
        name: raw
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        desc: text::resolve_ability_desc(desc, &variables),
        icon: icon_field(raw, "icon"),
        variables,
    }
}

/// Normalize ability variables to 3-tier sequences. The export stores one
/// slot per star level with slot 0 unused, so 4+-element arrays contribute
/// slots 1..=3; shorter arrays repeat their last value.
fn parse_variables(raw: Option<&Value>) -> BTreeMap<String, Vec<f64>> {
    let mut out = BTreeMap::new();
    let Some(arr) = raw.and_then(Value::as_array) else {
        return out;
    };
    for entry in arr {
        let Some(name) = entry.get("name").and_then(Value::as_str) else {
            continue;
        };
        let values: Vec<f64> = match entry.get("value") {
            Some(Value::Array(vs)) => vs.iter().filter_map(Value::as_f64).collect(),
            Some(Value::Number(n)) => n.as_f64().into_iter().collect(),
            _ => Vec::new(),
        };
        let tiers: Vec<f64> = match values.len() {
            0 => continue,
            1 => vec![values[0]; 3],
            2 | 3 => {
                let last = *values.last().unwrap_or(&0.0);
                (0..3).map(|i| values.get(i).copied().unwrap_or(last)).collect()
            }
            _ => values[1..=3].to_vec(),
        };
        out.insert(name.to_string(), tiers);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn champion(api: &str, name: &str, cost: i64, traits: &[&str]) -> Value {
        json!({
            "apiName": api,
            "name": name,
            "cost": cost,
            "traits": traits,
        })
    }

    #[test]
    fn non_player_records_are_excluded() {
        let revision = json!({"champions": [
            champion("TFT15_Aatrox", "Aatrox", 1, &["Juggernaut"]),
            champion("TFT15_Murkwolf", "Murk Wolf", 1, &[]),
            champion("TFT15_GodKing", "God King", 9, &["Divine"]),
        ]});
        let parsed = parse_champions(&revision);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "Aatrox");
    }

    #[test]
    fn unnamed_records_are_excluded() {
        let revision = json!({"champions": [champion("TFT15_X", "", 2, &["Sniper"])]});
        assert!(parse_champions(&revision).is_empty());
    }

    #[test]
    fn sorted_by_cost_then_name() {
        let revision = json!({"champions": [
            champion("TFT15_Zed", "Zed", 3, &["Assassin"]),
            champion("TFT15_Ahri", "Ahri", 3, &["Mage"]),
            champion("TFT15_Bard", "Bard", 1, &["Wanderer"]),
        ]});
        let names: Vec<String> = parse_champions(&revision)
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Bard", "Ahri", "Zed"]);
    }

    #[test]
    fn ability_variables_take_star_slots() {
        let revision = json!({"champions": [{
            "apiName": "TFT15_Ahri",
            "name": "Ahri",
            "cost": 3,
            "traits": ["Mage"],
            "ability": {
                "name": "Orb",
                "desc": "Deal @Damage@ magic damage.",
                "icon": "ASSETS/Abilities/Orb.tex",
                "variables": [
                    {"name": "Damage", "value": [0.0, 200.0, 300.0, 450.0, 9000.0]},
                    {"name": "Flat", "value": 40.0},
                ],
            },
        }]});
        let parsed = parse_champions(&revision);
        let ability = &parsed[0].ability;
        assert_eq!(ability.variables["Damage"], vec![200.0, 300.0, 450.0]);
        assert_eq!(ability.variables["Flat"], vec![40.0, 40.0, 40.0]);
        assert!(ability.desc.contains("<span class=\"tier-1\">200</span>"));
        assert!(ability.icon.ends_with("assets/abilities/orb.png"));
    }

    proptest! {
        // Whatever the raw cost, the parsed value stays in the shop range.
        #[test]
        fn cost_is_always_clamped(cost in -10i64..5_000) {
            let revision = json!({"champions": [champion("TFT15_Unit", "Unit", cost, &["Brawler"])]});
            for c in parse_champions(&revision) {
                prop_assert!((1u8..=5).contains(&c.cost));
            }
        }
    }
}
