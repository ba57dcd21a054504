//! Trait parsing.

use crate::{assets::asset_url, classify::classify_trait, text};
use rosterforge_schema::{TraitData, TraitEffect};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Map the export's breakpoint style codes to display names. Unknown codes
/// read as bronze.
pub fn style_name(style: u64) -> &'static str {
    match style {
        2 => "silver",
        3 => "gold",
        4 | 5 => "prismatic",
        _ => "bronze",
    }
}

/// Parse the selected revision's trait list: drop template/placeholder
/// records, resolve description text against breakpoint variables, classify
/// the kind, and sort by kind precedence then name. Member champions stay
/// empty here; the linker fills them once champions exist.
pub fn parse_traits(revision: &Value) -> Vec<TraitData> {
    let raw = revision
        .get("traits")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut traits: Vec<TraitData> = raw.iter().filter_map(parse_one).collect();
    traits.sort_by(|a, b| {
        a.kind
            .display_rank()
            .cmp(&b.kind.display_rank())
            .then_with(|| a.name.cmp(&b.name))
    });
    debug!(kept = traits.len(), raw = raw.len(), "parsed traits");
    traits
}

fn parse_one(record: &Value) -> Option<TraitData> {
    let api_name = record
        .get("apiName")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let name = record
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim();
    if name.is_empty() || api_name.to_ascii_lowercase().contains("template") {
        return None;
    }

    let effects = parse_effects(record.get("effects"));
    let desc = record.get("desc").and_then(Value::as_str).unwrap_or_default();
    let resolved = text::resolve_trait_desc(desc, &effects);
    let kind = classify_trait(api_name, &effects);

    Some(TraitData {
        api_name: api_name.to_string(),
        name: name.to_string(),
        desc: resolved.summary,
        icon: record
            .get("icon")
            .and_then(Value::as_str)
            .map(asset_url)
            .unwrap_or_default(),
        kind,
        levels: resolved.levels,
        effects,
        champions: Vec::new(),
    })
}

fn parse_effects(raw: Option<&Value>) -> Vec<TraitEffect> {
    let Some(arr) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };
    arr.iter()
        .map(|effect| {
            let variables: BTreeMap<String, f64> = effect
                .get("variables")
                .and_then(Value::as_object)
                .map(|map| {
                    map.iter()
                        .filter_map(|(k, v)| v.as_f64().map(|v| (k.clone(), v)))
                        .collect()
                })
                .unwrap_or_default();
            TraitEffect {
                min_units: effect.get("minUnits").and_then(Value::as_u64).unwrap_or(0) as u32,
                max_units: effect
                    .get("maxUnits")
                    .and_then(Value::as_u64)
                    .unwrap_or(u64::from(u32::MAX)) as u32,
                style: style_name(effect.get("style").and_then(Value::as_u64).unwrap_or(1))
                    .to_string(),
                variables,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosterforge_schema::TraitKind;
    use serde_json::json;

    fn trait_record(api: &str, name: &str, desc: &str, breakpoints: &[(u64, u64)]) -> Value {
        let effects: Vec<Value> = breakpoints
            .iter()
            .map(|(min, style)| {
                json!({
                    "minUnits": min,
                    "maxUnits": 99,
                    "style": style,
                    "variables": {"AD": 10.0 * (*min as f64)},
                })
            })
            .collect();
        json!({"apiName": api, "name": name, "desc": desc, "effects": effects, "icon": ""})
    }

    #[test]
    fn template_records_are_dropped() {
        let revision = json!({"traits": [
            trait_record("TFT15_Trait_Template", "Template", "x", &[(2, 1)]),
            trait_record("TFT15_Bruiser", "Bruiser", "Tanky.", &[(2, 1), (4, 3)]),
        ]});
        let parsed = parse_traits(&revision);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "Bruiser");
    }

    #[test]
    fn sorted_by_kind_then_name() {
        let revision = json!({"traits": [
            trait_record("TFT15_Solo", "Solo", "x", &[(1, 4)]),
            trait_record("TFT15_TeamUp_Duo", "Duo", "x", &[(2, 4)]),
            trait_record("TFT15_Duelist", "Duelist", "x", &[(2, 1), (4, 3)]),
            trait_record("TFT15_StarGuardian", "Star Guardian", "x", &[(3, 1), (5, 3)]),
        ]});
        let names: Vec<String> = parse_traits(&revision).into_iter().map(|t| t.name).collect();
        // origin, class, teamup, unique
        assert_eq!(names, ["Star Guardian", "Duelist", "Duo", "Solo"]);
    }

    #[test]
    fn breakpoints_and_styles_are_normalized() {
        let revision = json!({"traits": [
            trait_record("TFT15_Bruiser", "Bruiser", "Gain AD.<expandRow>(@MinUnits@) @AD@</expandRow>", &[(2, 1), (4, 3)]),
        ]});
        let parsed = parse_traits(&revision);
        let t = &parsed[0];
        assert_eq!(t.effects.len(), 2);
        assert_eq!(t.effects[0].style, "bronze");
        assert_eq!(t.effects[1].style, "gold");
        assert_eq!(t.levels.len(), 2);
        assert_eq!(t.levels[0].text, "(2) 20");
        assert_eq!(t.levels[1].min_units, 4);
        assert_eq!(t.kind, TraitKind::Class);
        assert!(!t.desc.is_empty());
    }

    #[test]
    fn missing_sections_yield_empty() {
        assert!(parse_traits(&json!({})).is_empty());
    }
}
