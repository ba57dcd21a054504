//! Templated description resolution.
//!
//! Upstream descriptions are templates: `@Token@` variable references,
//! `<expandRow>`/`<row>` breakpoint markup, `%i:scaleAD%` stat icons, and a
//! layer of presentation HTML. This module turns one template plus its
//! numeric variables into display-ready text: a flat summary, and (for
//! traits) structured per-breakpoint rows.
//!
//! Failure is always local: an unresolvable token renders as `?`, an unknown
//! icon key renders as nothing, and the description as a whole never errors.

pub mod color;
pub mod variables;

pub use color::colorize;

use regex::{Captures, Regex};
use rosterforge_schema::{TraitEffect, TraitLevel};
use std::collections::BTreeMap;
use std::sync::LazyLock;

type Vars = BTreeMap<String, Vec<f64>>;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@([^@]+)@").unwrap());
static EXPAND_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<expandrow>(.*?)</expandrow>").unwrap());
static ROW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<row>(.*?)</row>").unwrap());
static ICON_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"%i:(\w+)%").unwrap());
static BR_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<>]+>").unwrap());
static EMPTY_PARENS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\s*\)").unwrap());
static MULTI_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// Fixed icon-token vocabulary. Unknown keys degrade to empty string; a raw
/// `%i:...%` token must never leak into display text.
const ICON_LABELS: &[(&str, &str)] = &[
    ("scaleAD", "AD"),
    ("scaleAP", "AP"),
    ("scaleAS", "AS"),
    ("scaleArmor", "Armor"),
    ("scaleMR", "MR"),
    ("scaleCrit", "Crit Chance"),
    ("scaleCritChance", "Crit Chance"),
    ("scaleCritMult", "Crit Dmg"),
    ("scaleDA", "Damage Amp"),
    ("scaleDR", "Durability"),
    ("scaleHealth", "Health"),
    ("scaleOmnivamp", "Omnivamp"),
    ("scaleMana", "Mana"),
    ("scaleRange", "Range"),
];

// ============================================================================
// Numeric formatting
// ============================================================================

/// Integers render bare; everything else rounds to at most two decimals.
pub fn fmt_num(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{}", v.round() as i64)
    } else {
        let s = format!("{v:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Render a per-tier value sequence: a single uncolored number when all
/// tiers agree, otherwise one colorized value per tier joined by a muted
/// slash.
pub fn fmt_tiered(values: &[f64]) -> String {
    match values {
        [] => "?".to_string(),
        vs if vs.iter().all(|v| (v - vs[0]).abs() < 1e-9) => fmt_num(vs[0]),
        vs => vs
            .iter()
            .enumerate()
            .map(|(i, v)| color::tier_span(i, &fmt_num(*v)))
            .collect::<Vec<_>>()
            .join(&color::muted_slash()),
    }
}

// ============================================================================
// Ability descriptions
// ============================================================================

/// Resolve an ability description against its per-tier variable table.
pub fn resolve_ability_desc(desc: &str, vars: &Vars) -> String {
    let s = replace_icons(desc);
    let s = strip_markup(&s);
    let s = TOKEN
        .replace_all(&s, |caps: &Captures<'_>| {
            resolve_ability_token(caps[1].trim(), vars)
        })
        .into_owned();
    let s = tidy(&s);
    colorize(&s)
}

fn resolve_ability_token(token: &str, vars: &Vars) -> String {
    if is_runtime_ref(token) {
        return String::new();
    }
    if let Some((name, factor)) = split_multiplier(token) {
        return match variables::lookup(name, vars) {
            Some((_, values)) => {
                let scaled: Vec<f64> = values.iter().map(|v| v * factor).collect();
                fmt_tiered(&scaled)
            }
            None => "?".to_string(),
        };
    }
    // Breakpoint bounds only exist in trait context.
    if token.eq_ignore_ascii_case("MinUnits") || token.eq_ignore_ascii_case("MaxUnits") {
        return String::new();
    }
    match variables::lookup(token, vars) {
        Some((_, values)) => fmt_tiered(values),
        None => "?".to_string(),
    }
}

// ============================================================================
// Trait descriptions
// ============================================================================

/// Output of trait description resolution: a flat summary plus structured
/// per-breakpoint rows. When breakpoints exist the summary is never empty.
#[derive(Debug, Clone, Default)]
pub struct ResolvedTraitText {
    pub summary: String,
    pub levels: Vec<TraitLevel>,
}

/// Resolve a trait description against its breakpoint list.
///
/// `<expandRow>` templates instantiate once per breakpoint; `<row>` templates
/// bind positionally (excess rows reuse the last breakpoint). Both are
/// collected as rows, never left inline. The remainder becomes the flat
/// summary after garbage-line suppression; if the whole description
/// decomposed into rows, the first row's text is promoted as the summary so
/// breakpoints never render without visible summary text.
pub fn resolve_trait_desc(desc: &str, effects: &[TraitEffect]) -> ResolvedTraitText {
    let mut levels = Vec::new();
    let raw = replace_icons(desc);

    // Block-repeat markup: one instantiation per breakpoint.
    let remainder = EXPAND_ROW
        .replace_all(&raw, |caps: &Captures<'_>| {
            for effect in effects {
                levels.push(instantiate_row(&caps[1], effect));
            }
            String::new()
        })
        .into_owned();

    // Positional rows: row i binds to breakpoint i.
    let mut row_index = 0usize;
    let remainder = ROW
        .replace_all(&remainder, |caps: &Captures<'_>| {
            let effect = effects
                .get(row_index)
                .or_else(|| effects.last())
                .cloned()
                .unwrap_or_default();
            row_index += 1;
            levels.push(instantiate_row(&caps[1], &effect));
            String::new()
        })
        .into_owned();

    let flat = strip_markup(&remainder);
    let flat = TOKEN
        .replace_all(&flat, |caps: &Captures<'_>| {
            resolve_summary_token(caps[1].trim(), effects)
        })
        .into_owned();
    let summary = suppress_garbage(&tidy(&flat));
    let mut summary = colorize(&summary);

    if summary.is_empty() {
        if let Some(first) = levels.first() {
            summary = first.text.clone();
        }
    }

    ResolvedTraitText { summary, levels }
}

fn instantiate_row(template: &str, effect: &TraitEffect) -> TraitLevel {
    let s = strip_markup(template);
    let s = TOKEN
        .replace_all(&s, |caps: &Captures<'_>| {
            resolve_effect_token(caps[1].trim(), effect)
        })
        .into_owned();
    TraitLevel {
        min_units: effect.min_units,
        style: effect.style.clone(),
        text: colorize(tidy(&s).trim()),
    }
}

fn resolve_effect_token(token: &str, effect: &TraitEffect) -> String {
    if is_runtime_ref(token) {
        return String::new();
    }
    if token.eq_ignore_ascii_case("MinUnits") {
        return effect.min_units.to_string();
    }
    if token.eq_ignore_ascii_case("MaxUnits") {
        return effect.max_units.to_string();
    }
    if let Some((name, factor)) = split_multiplier(token) {
        return match scalar_lookup(name, &effect.variables) {
            Some(v) => fmt_num(v * factor),
            None => "?".to_string(),
        };
    }
    scalar_lookup(token, &effect.variables)
        .map(fmt_num)
        .unwrap_or_else(|| "?".to_string())
}

/// Flat-summary tokens resolve across all breakpoints: one value per
/// breakpoint, collapsed to a single number when they agree.
fn resolve_summary_token(token: &str, effects: &[TraitEffect]) -> String {
    if is_runtime_ref(token) {
        return String::new();
    }
    if token.eq_ignore_ascii_case("MinUnits") {
        return effects.first().map(|e| e.min_units.to_string()).unwrap_or_default();
    }
    if token.eq_ignore_ascii_case("MaxUnits") {
        return effects.first().map(|e| e.max_units.to_string()).unwrap_or_default();
    }
    let (name, factor) = split_multiplier(token).unwrap_or((token, 1.0));
    let values: Vec<f64> = effects
        .iter()
        .filter_map(|e| scalar_lookup(name, &e.variables))
        .map(|v| v * factor)
        .collect();
    if values.is_empty() {
        "?".to_string()
    } else {
        fmt_tiered(&values)
    }
}

/// Trait variables use the plain lookup chain: exact, then case-insensitive.
/// The deep fallback heuristics are reserved for ability templates, whose
/// naming drift is far worse.
fn scalar_lookup(token: &str, vars: &BTreeMap<String, f64>) -> Option<f64> {
    if let Some(v) = vars.get(token) {
        return Some(*v);
    }
    vars.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(token))
        .map(|(_, v)| *v)
}

// ============================================================================
// Markup and cleanup
// ============================================================================

/// Runtime-only property references cannot be resolved at build time and
/// substitute as empty, never as an error.
fn is_runtime_ref(token: &str) -> bool {
    token.contains("TFTUnitProperty") || token.contains(':')
}

fn split_multiplier(token: &str) -> Option<(&str, f64)> {
    let (name, factor) = token.split_once('*')?;
    Some((name.trim(), factor.trim().parse().ok()?))
}

fn replace_icons(s: &str) -> String {
    ICON_TOKEN
        .replace_all(s, |caps: &Captures<'_>| {
            ICON_LABELS
                .iter()
                .find(|(key, _)| *key == &caps[1])
                .map(|(_, label)| (*label).to_string())
                .unwrap_or_default()
        })
        .into_owned()
}

/// Strip presentation markup: `<br>` becomes a line break, remaining tags
/// are dropped, non-breaking-space entities become plain spaces.
fn strip_markup(s: &str) -> String {
    let s = BR_TAG.replace_all(s, "\n");
    let s = HTML_TAG.replace_all(&s, "");
    s.replace("&nbsp;", " ")
}

/// Remove empty-parenthesis artifacts and duplicate whitespace, per line.
fn tidy(s: &str) -> String {
    let s = EMPTY_PARENS.replace_all(s, "");
    let s = MULTI_SPACE.replace_all(&s, " ");
    s.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Drop lines with nothing to display: empty lines, bare trailing-colon
/// labels, and lines without alphabetic content that do not open a
/// parenthesized clause. Spans are ignored for the test, not the output.
fn suppress_garbage(s: &str) -> String {
    s.lines()
        .filter(|line| !is_garbage_line(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_garbage_line(line: &str) -> bool {
    let visible = HTML_TAG.replace_all(line, "");
    let visible = visible.trim();
    if visible.is_empty() {
        return true;
    }
    if visible.ends_with(':') {
        return true;
    }
    !visible.chars().any(|c| c.is_alphabetic()) && !visible.starts_with('(')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(entries: &[(&str, &[f64])]) -> Vars {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_vec()))
            .collect()
    }

    fn effect(min: u32, max: u32, style: &str, entries: &[(&str, f64)]) -> TraitEffect {
        TraitEffect {
            min_units: min,
            max_units: max,
            style: style.to_string(),
            variables: entries.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn fmt_num_renders_integers_bare() {
        assert_eq!(fmt_num(10.0), "10");
        assert_eq!(fmt_num(10.5), "10.5");
        assert_eq!(fmt_num(0.333333), "0.33");
        assert_eq!(fmt_num(1.50), "1.5");
    }

    #[test]
    fn plain_text_passes_through() {
        let out = resolve_ability_desc("Deal some damage to the nearest enemy.", &vars(&[]));
        assert_eq!(out, "Deal some damage to the nearest enemy.");
    }

    #[test]
    fn modified_token_falls_back_and_colorizes_tiers() {
        let v = vars(&[("QDamage", &[10.0, 20.0, 30.0])]);
        let out = resolve_ability_desc("Deal @ModifiedQDamage@ damage.", &v);
        assert!(out.contains("<span class=\"tier-1\">10</span>"));
        assert!(out.contains("<span class=\"tier-2\">20</span>"));
        assert!(out.contains("<span class=\"tier-3\">30</span>"));
    }

    #[test]
    fn equal_tiers_collapse_to_single_uncolored_value() {
        let v = vars(&[("Shield", &[5.0, 5.0, 5.0])]);
        let out = resolve_ability_desc("Gain a @Shield@ shield.", &v);
        assert_eq!(out, "Gain a 5 shield.");
    }

    #[test]
    fn unresolvable_token_degrades_to_placeholder() {
        let out = resolve_ability_desc("Deal @Mystery@ damage.", &vars(&[]));
        assert_eq!(out, "Deal ? damage.");
    }

    #[test]
    fn runtime_property_ref_substitutes_empty() {
        let out = resolve_ability_desc(
            "Level: @TFTUnitProperty.unit:ChampLevel@ done.",
            &vars(&[]),
        );
        assert_eq!(out, "Level: done.");
    }

    #[test]
    fn multiplication_scales_before_formatting() {
        let v = vars(&[("Ratio", &[0.5, 0.5, 0.5])]);
        let out = resolve_ability_desc("Heal @Ratio*100@% of it.", &v);
        assert_eq!(out, "Heal 50% of it.");
    }

    #[test]
    fn icon_tokens_map_to_labels_and_unknown_keys_vanish() {
        let out = resolve_ability_desc("Gain 10 %i:scaleAD% and %i:scaleNothing% more.", &vars(&[]));
        assert_eq!(out, "Gain 10 AD and more.");
    }

    #[test]
    fn markup_and_entities_are_stripped() {
        let out = resolve_ability_desc(
            "<b>Deal</b>&nbsp;heavy damage () now.<br><i></i>",
            &vars(&[]),
        );
        assert_eq!(out, "Deal heavy damage now.");
    }

    #[test]
    fn expand_row_instantiates_once_per_breakpoint() {
        let effects = [
            effect(2, 3, "bronze", &[("AD", 20.0)]),
            effect(4, 5, "silver", &[("AD", 45.0)]),
            effect(6, 99, "gold", &[("AD", 80.0)]),
        ];
        let resolved = resolve_trait_desc(
            "Gain Attack Damage.<expandRow>(@MinUnits@) @AD@ AD</expandRow>",
            &effects,
        );
        assert_eq!(resolved.levels.len(), 3);
        assert_eq!(resolved.levels[0].min_units, 2);
        assert_eq!(resolved.levels[0].style, "bronze");
        assert!(resolved.levels[0].text.contains("(2) 20 AD"));
        assert!(resolved.levels[2].text.contains("(6) 80 AD"));
        assert!(resolved.summary.contains("Attack Damage"));
        assert!(!resolved.summary.contains("expandRow"));
    }

    #[test]
    fn rows_bind_positionally_with_last_breakpoint_fallback() {
        let effects = [
            effect(3, 4, "bronze", &[("Heal", 100.0)]),
            effect(5, 99, "silver", &[("Heal", 250.0)]),
        ];
        let resolved = resolve_trait_desc(
            "Healers mend allies.<row>@MinUnits@: @Heal@ healing</row><row>@MinUnits@: @Heal@ healing</row><row>Ultimate: @Heal@ healing</row>",
            &effects,
        );
        assert_eq!(resolved.levels.len(), 3);
        assert_eq!(resolved.levels[0].text, "3: 100 healing");
        assert_eq!(resolved.levels[1].text, "5: 250 healing");
        // Excess row reuses the last breakpoint.
        assert_eq!(resolved.levels[2].text, "Ultimate: 250 healing");
    }

    #[test]
    fn summary_tokens_render_per_breakpoint_values() {
        let effects = [
            effect(2, 3, "bronze", &[("Shield", 150.0)]),
            effect(4, 99, "silver", &[("Shield", 300.0)]),
        ];
        let resolved = resolve_trait_desc("Grant a @Shield@ shield.", &effects);
        assert!(resolved.summary.contains("<span class=\"tier-1\">150</span>"));
        assert!(resolved.summary.contains("<span class=\"tier-2\">300</span>"));
    }

    #[test]
    fn garbage_lines_are_suppressed() {
        let effects = [effect(1, 99, "gold", &[("X", 10.0)])];
        let resolved = resolve_trait_desc(
            "A real sentence.<br>Damage:<br>123<br>(parenthesized aside)",
            &effects,
        );
        assert_eq!(resolved.summary, "A real sentence.\n(parenthesized aside)");
    }

    #[test]
    fn single_row_text_is_promoted_to_empty_summary() {
        let effects = [effect(1, 99, "gold", &[("AP", 30.0)])];
        let resolved = resolve_trait_desc("<expandRow>Gain @AP@ AP</expandRow>", &effects);
        assert_eq!(resolved.levels.len(), 1);
        assert_eq!(resolved.summary, "Gain 30 AP");
    }

    #[test]
    fn multi_row_only_description_still_gets_a_summary() {
        let effects = [
            effect(2, 3, "bronze", &[("AD", 20.0)]),
            effect(4, 99, "silver", &[("AD", 45.0)]),
        ];
        let resolved = resolve_trait_desc("<expandRow>(@MinUnits@) @AD@ AD</expandRow>", &effects);
        assert_eq!(resolved.levels.len(), 2);
        assert_eq!(resolved.summary, "(2) 20 AD");
    }
}
