//! Entity classifiers.
//!
//! Named pure predicates over raw record fields. The upstream export ships
//! no explicit type metadata for most of these, so several classifiers are
//! reverse-engineered heuristics; they live here, separate from the parsing
//! pipeline, so tuning a rule never touches the parsers.

use regex::Regex;
use rosterforge_schema::{ItemCategory, TraitEffect, TraitKind};
use std::sync::LazyLock;

// ============================================================================
// Non-player filter
// ============================================================================

/// Identifier fragments that mark armory/assist/template records, neutral
/// monsters, and other board furniture. Matched case-insensitively against
/// the stable identifier.
const NON_PLAYER_FRAGMENTS: &[&str] = &[
    "armory",
    "assist",
    "template",
    "tutorial",
    "dummy",
    "npc",
    "chest",
    "minion",
    "voidspawn",
    "krug",
    "murkwolf",
    "raptor",
    "scuttle",
    "herald",
    "baronspawn",
];

/// Verdict on whether a raw champion record is a non-player entity.
///
/// Total over all inputs: cost above the shop range, a known non-player
/// identifier fragment, or a traitless cost-≤1 placeholder all exclude the
/// record. Everything else passes.
pub fn is_non_player(api_name: &str, cost: i64, trait_count: usize) -> bool {
    if cost > 5 {
        return true;
    }
    let lower = api_name.to_ascii_lowercase();
    if NON_PLAYER_FRAGMENTS.iter().any(|f| lower.contains(f)) {
        return true;
    }
    // Placeholder heuristic: real champions always belong to at least one
    // trait; traitless records at the bottom of the cost range are filler.
    trait_count == 0 && cost <= 1
}

// ============================================================================
// Trait kind
// ============================================================================

const TEAM_UP_MARKER: &str = "teamup";

/// Infer a trait's kind from its identifier and breakpoint thresholds.
///
/// Heuristic over absent upstream metadata: team-up traits carry a marker
/// token in the identifier; a single low threshold (≤2) marks a unique
/// trait; origins start activating at 3+ units; everything else is a class.
pub fn classify_trait(api_name: &str, effects: &[TraitEffect]) -> TraitKind {
    if api_name.to_ascii_lowercase().contains(TEAM_UP_MARKER) {
        return TraitKind::TeamUp;
    }
    let mut thresholds: Vec<u32> = effects
        .iter()
        .map(|e| e.min_units)
        .filter(|&m| m > 0)
        .collect();
    thresholds.sort_unstable();
    if thresholds.len() <= 1 && thresholds.first().copied().unwrap_or(1) <= 2 {
        return TraitKind::Unique;
    }
    match thresholds.first() {
        Some(&min) if min >= 3 => TraitKind::Origin,
        _ => TraitKind::Class,
    }
}

// ============================================================================
// Item category
// ============================================================================

/// Base components, by stable identifier. Components have no recipe; every
/// completed item is built from two of these.
const KNOWN_COMPONENTS: &[&str] = &[
    "TFT_Item_BFSword",
    "TFT_Item_ChainVest",
    "TFT_Item_GiantsBelt",
    "TFT_Item_NeedlesslyLargeRod",
    "TFT_Item_NegatronCloak",
    "TFT_Item_RecurveBow",
    "TFT_Item_SparringGloves",
    "TFT_Item_Spatula",
    "TFT_Item_FryingPan",
    "TFT_Item_TearOfTheGoddess",
];

/// Marker the export places in support item descriptions. Authoritative when
/// present, unlike the name-based rules below it.
const SUPPORT_DESC_MARKER: &str = "support item";

/// Assign the single category of an item record.
///
/// The predicates are not mutually exclusive (a radiant item also has two
/// components), so evaluation order is fixed and must not be rearranged:
/// component > support > emblem > artifact > radiant > completed > other.
pub fn classify_item(api_name: &str, name: &str, desc: &str, composition: &[String]) -> ItemCategory {
    if KNOWN_COMPONENTS.contains(&api_name) {
        return ItemCategory::Component;
    }
    if desc.to_ascii_lowercase().contains(SUPPORT_DESC_MARKER) {
        return ItemCategory::Support;
    }
    if name.contains("Emblem") {
        return ItemCategory::Emblem;
    }
    let lower = api_name.to_ascii_lowercase();
    if lower.contains("artifact") || lower.contains("ornnitem") {
        return ItemCategory::Artifact;
    }
    if name.starts_with("Radiant ") {
        return ItemCategory::Radiant;
    }
    if composition.len() == 2 {
        return ItemCategory::Completed;
    }
    ItemCategory::Other
}

// ============================================================================
// Augment tier
// ============================================================================

/// Tier tags as shipped by the export. The hashed forms are opaque upstream
/// identifiers with no stability guarantee across revisions; update this
/// table when a revision churns them. The readable aliases cover snapshots
/// where the hash was resolved server-side.
const TIER_TAGS: &[(&str, u8)] = &[
    ("{e4ef9fbd}", 1),
    ("{9f6d6f74}", 2),
    ("{c21d4b81}", 3),
    ("silver", 1),
    ("gold", 2),
    ("prismatic", 3),
];

static ROMAN_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[-_](iii|ii|i)\.(?:tex|dds|png)$").unwrap());

/// Derive an augment's tier (1 silver, 2 gold, 3 prismatic).
///
/// Tag metadata is authoritative; the Roman-numeral icon filename suffix is
/// the fallback convention; gold is the default when neither resolves.
pub fn classify_augment_tier(tags: &[String], icon: &str) -> u8 {
    for tag in tags {
        let tag = tag.to_ascii_lowercase();
        if let Some(&(_, tier)) = TIER_TAGS.iter().find(|(t, _)| *t == tag) {
            return tier;
        }
    }
    if let Some(caps) = ROMAN_SUFFIX.captures(icon) {
        return match caps[1].len() {
            3 => 3,
            2 => 2,
            _ => 1,
        };
    }
    2
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rosterforge_schema::TraitEffect;

    fn effect(min_units: u32) -> TraitEffect {
        TraitEffect {
            min_units,
            ..TraitEffect::default()
        }
    }

    #[test]
    fn cost_above_five_is_non_player() {
        assert!(is_non_player("TFT15_Perfectly_Normal_Unit", 8, 3));
    }

    #[test]
    fn known_fragments_are_non_player() {
        assert!(is_non_player("TFT15_ArmoryKey", 1, 2));
        assert!(is_non_player("TFT_TrainingDummy", 0, 0));
        assert!(is_non_player("TFT15_Murkwolf", 1, 0));
    }

    #[test]
    fn traitless_cheap_record_is_placeholder() {
        assert!(is_non_player("TFT15_Mystery", 1, 0));
        assert!(!is_non_player("TFT15_Mystery", 2, 0));
        assert!(!is_non_player("TFT15_Aatrox", 1, 2));
    }

    #[test]
    fn team_up_marker_wins() {
        let kind = classify_trait("TFT15_TeamUp_LuxJinx", &[effect(2)]);
        assert_eq!(kind, TraitKind::TeamUp);
    }

    #[test]
    fn single_low_threshold_is_unique() {
        assert_eq!(classify_trait("TFT15_Overlord", &[effect(1)]), TraitKind::Unique);
        assert_eq!(classify_trait("TFT15_Overlord", &[effect(2)]), TraitKind::Unique);
        // No positive thresholds at all also reads as unique.
        assert_eq!(classify_trait("TFT15_Overlord", &[]), TraitKind::Unique);
    }

    #[test]
    fn lowest_threshold_splits_origin_from_class() {
        let origin = classify_trait("TFT15_StarGuardian", &[effect(3), effect(5), effect(7)]);
        assert_eq!(origin, TraitKind::Origin);
        let class = classify_trait("TFT15_Duelist", &[effect(2), effect(4), effect(6)]);
        assert_eq!(class, TraitKind::Class);
    }

    #[test]
    fn item_precedence_component_first() {
        let cat = classify_item("TFT_Item_BFSword", "B.F. Sword", "", &[]);
        assert_eq!(cat, ItemCategory::Component);
    }

    #[test]
    fn radiant_name_beats_two_component_recipe() {
        let comp = vec!["A".to_string(), "B".to_string()];
        let cat = classify_item("X", "Radiant Blade", "", &comp);
        assert_eq!(cat, ItemCategory::Radiant);
    }

    #[test]
    fn two_components_without_other_markers_is_completed() {
        let comp = vec!["A".to_string(), "B".to_string()];
        let cat = classify_item("TFT_Item_Deathblade", "Deathblade", "", &comp);
        assert_eq!(cat, ItemCategory::Completed);
    }

    #[test]
    fn support_marker_beats_emblem_name() {
        let cat = classify_item(
            "TFT_Item_BansheesVeil",
            "Emblem of Protection",
            "A Support Item granting shields.",
            &[],
        );
        assert_eq!(cat, ItemCategory::Support);
    }

    #[test]
    fn augment_tier_from_tags() {
        let tags = vec!["{c21d4b81}".to_string()];
        assert_eq!(classify_augment_tier(&tags, ""), 3);
        let tags = vec!["Silver".to_string()];
        assert_eq!(classify_augment_tier(&tags, ""), 1);
    }

    #[test]
    fn augment_tier_from_roman_icon_suffix() {
        assert_eq!(classify_augment_tier(&[], "ASSETS/Augments/ClearMind-III.tex"), 3);
        assert_eq!(classify_augment_tier(&[], "assets/augments/clear_mind_ii.png"), 2);
        assert_eq!(classify_augment_tier(&[], "assets/augments/clear_mind_i.dds"), 1);
    }

    #[test]
    fn augment_tier_defaults_to_gold() {
        assert_eq!(classify_augment_tier(&[], "assets/augments/clear_mind.png"), 2);
    }

    proptest! {
        // Pure functions: a second call on the same record returns the same
        // verdict, whatever the record looks like.
        #[test]
        fn non_player_filter_is_deterministic(api in "[A-Za-z0-9_]{0,24}", cost in -3i64..12, traits in 0usize..5) {
            prop_assert_eq!(
                is_non_player(&api, cost, traits),
                is_non_player(&api, cost, traits)
            );
        }

        #[test]
        fn item_classifier_is_deterministic(api in "[A-Za-z0-9_]{0,24}", name in ".{0,24}", n in 0usize..4) {
            let comp: Vec<String> = (0..n).map(|i| format!("C{i}")).collect();
            prop_assert_eq!(
                classify_item(&api, &name, "", &comp),
                classify_item(&api, &name, "", &comp)
            );
        }
    }
}
