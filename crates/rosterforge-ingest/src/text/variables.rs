//! Ability variable lookup.
//!
//! Template tokens and the variable table they refer to are written by
//! different upstream tools and routinely disagree on naming (`@ModifiedQDamage@`
//! against a stored `QDamage`, `@Damage@` against `APDamage`, and worse).
//! Resolution is an explicit ordered list of named strategies: each one is
//! independently testable and new ones are appended without disturbing the
//! earlier, more trustworthy matches. A total miss is reported to the caller,
//! which degrades to placeholder text rather than failing the description.

use std::collections::BTreeMap;
use tracing::debug;

type Vars = BTreeMap<String, Vec<f64>>;

/// Modifier prefixes the template side likes to prepend.
const MODIFIER_PREFIXES: &[&str] = &[
    "Modified",
    "Total",
    "Reduced",
    "Bonus",
    "FirstCast",
    "SecondCast",
    "ThirdCast",
];

/// Stat-type prefixes the variable side likes to prepend.
const STAT_PREFIXES: &[&str] = &["AP", "AD", "Flat", "Base", "Percent"];

struct Strategy {
    name: &'static str,
    apply: fn(&str, &Vars) -> Option<String>,
}

/// Ordered from most to least trustworthy. The tail entries are fuzzy
/// string heuristics; see the per-function docs.
const STRATEGIES: &[Strategy] = &[
    Strategy { name: "exact", apply: exact },
    Strategy { name: "case_insensitive", apply: case_insensitive },
    Strategy { name: "strip_modifiers", apply: strip_modifiers_then_match },
    Strategy { name: "stat_prefix", apply: stat_prefix },
    Strategy { name: "stat_prefix_before_damage", apply: stat_prefix_before_damage },
    Strategy { name: "suffix_swap", apply: suffix_swap },
    Strategy { name: "containment", apply: containment },
    Strategy { name: "longest_substring", apply: longest_substring },
    Strategy { name: "word_overlap", apply: word_overlap },
];

/// Resolve a template token to a variable key, walking the strategy list in
/// order. Returns the matched key so callers can index the table.
pub fn lookup<'a>(token: &str, vars: &'a Vars) -> Option<(&'a str, &'a Vec<f64>)> {
    for strategy in STRATEGIES {
        if let Some(key) = (strategy.apply)(token, vars) {
            if strategy.name != "exact" {
                debug!(token, key = %key, strategy = strategy.name, "fuzzy variable match");
            }
            return vars.get_key_value(&key).map(|(k, v)| (k.as_str(), v));
        }
    }
    debug!(token, "no variable match; emitting placeholder");
    None
}

fn exact(token: &str, vars: &Vars) -> Option<String> {
    vars.contains_key(token).then(|| token.to_string())
}

fn case_insensitive(token: &str, vars: &Vars) -> Option<String> {
    vars.keys()
        .find(|k| k.eq_ignore_ascii_case(token))
        .cloned()
}

/// Strip one known modifier prefix and retry exact/case-insensitive.
fn strip_modifiers_then_match(token: &str, vars: &Vars) -> Option<String> {
    let stripped = strip_modifiers(token)?;
    exact(&stripped, vars).or_else(|| case_insensitive(&stripped, vars))
}

fn strip_modifiers(token: &str) -> Option<String> {
    for prefix in MODIFIER_PREFIXES {
        if token.len() > prefix.len() && token.starts_with(prefix) {
            return Some(token[prefix.len()..].to_string());
        }
    }
    None
}

/// The token after modifier stripping, or the token itself. Shared by the
/// fuzzy strategies below.
fn base_name(token: &str) -> String {
    strip_modifiers(token).unwrap_or_else(|| token.to_string())
}

/// Try the stripped name with each stat-type prefix prepended
/// (`Damage` → `APDamage`).
fn stat_prefix(token: &str, vars: &Vars) -> Option<String> {
    let base = base_name(token);
    for prefix in STAT_PREFIXES {
        let candidate = format!("{prefix}{base}");
        if let Some(key) = exact(&candidate, vars).or_else(|| case_insensitive(&candidate, vars)) {
            return Some(key);
        }
    }
    None
}

/// Try inserting a stat-type prefix before a trailing `Damage`, on both the
/// raw token and its modifier-stripped form (`BonusDamage` → `BonusADDamage`).
fn stat_prefix_before_damage(token: &str, vars: &Vars) -> Option<String> {
    let base = base_name(token);
    for name in [token, base.as_str()] {
        let Some(head) = name.strip_suffix("Damage") else {
            continue;
        };
        for prefix in STAT_PREFIXES {
            let candidate = format!("{head}{prefix}Damage");
            if let Some(key) =
                exact(&candidate, vars).or_else(|| case_insensitive(&candidate, vars))
            {
                return Some(key);
            }
        }
    }
    None
}

/// Swap a trailing `_Suffix` to the front (`Damage_AP` → `APDamage`).
fn suffix_swap(token: &str, vars: &Vars) -> Option<String> {
    let base = base_name(token);
    let (head, tail) = base.rsplit_once('_')?;
    let candidate = format!("{tail}{head}");
    exact(&candidate, vars).or_else(|| case_insensitive(&candidate, vars))
}

/// Suffix/prefix containment against all known keys, either direction.
/// Longest key wins to keep the choice deterministic.
fn containment(token: &str, vars: &Vars) -> Option<String> {
    let base = base_name(token).to_ascii_lowercase();
    vars.keys()
        .filter(|k| {
            let k = k.to_ascii_lowercase();
            k.starts_with(&base) || k.ends_with(&base) || base.starts_with(&k) || base.ends_with(&k)
        })
        .max_by_key(|k| k.len())
        .cloned()
}

/// Substring containment either direction; the longest shared span wins.
fn longest_substring(token: &str, vars: &Vars) -> Option<String> {
    let base = base_name(token).to_ascii_lowercase();
    vars.keys()
        .filter_map(|k| {
            let kl = k.to_ascii_lowercase();
            if kl.contains(&base) || base.contains(&kl) {
                Some((base.len().min(kl.len()), k))
            } else {
                None
            }
        })
        .max_by_key(|&(overlap, _)| overlap)
        .map(|(_, k)| k.clone())
}

/// Camel-case word-segment overlap requiring at least two shared words.
///
/// Heuristic, not contractual: the ≥2 threshold is tuned against observed
/// data gaps and may mis-pair tokens with very generic word sets.
fn word_overlap(token: &str, vars: &Vars) -> Option<String> {
    let token_words = camel_words(&base_name(token));
    if token_words.len() < 2 {
        return None;
    }
    vars.keys()
        .filter_map(|k| {
            let shared = camel_words(k)
                .iter()
                .filter(|w| token_words.contains(w))
                .count();
            (shared >= 2).then_some((shared, k))
        })
        .max_by_key(|&(shared, _)| shared)
        .map(|(_, k)| k.clone())
}

/// Split a camel-case identifier into lowercase word segments; `_` and
/// digit runs also break words.
fn camel_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in name.chars() {
        let boundary = c == '_'
            || c.is_ascii_digit()
            || (c.is_ascii_uppercase() && prev_lower);
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        if c.is_ascii_alphabetic() {
            current.push(c.to_ascii_lowercase());
        }
        prev_lower = c.is_ascii_lowercase();
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
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

    #[test]
    fn exact_match_first() {
        let v = vars(&[("QDamage", &[10.0]), ("qdamage", &[99.0])]);
        let (key, _) = lookup("QDamage", &v).unwrap();
        assert_eq!(key, "QDamage");
    }

    #[test]
    fn case_insensitive_when_exact_misses() {
        let v = vars(&[("ShieldAmount", &[50.0])]);
        let (key, _) = lookup("shieldamount", &v).unwrap();
        assert_eq!(key, "ShieldAmount");
    }

    #[test]
    fn modifier_prefix_is_stripped() {
        let v = vars(&[("QDamage", &[10.0, 20.0, 30.0])]);
        let (key, values) = lookup("ModifiedQDamage", &v).unwrap();
        assert_eq!(key, "QDamage");
        assert_eq!(values, &vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn stat_prefix_is_inserted() {
        let v = vars(&[("APDamage", &[40.0])]);
        let (key, _) = lookup("Damage", &v).unwrap();
        assert_eq!(key, "APDamage");
    }

    #[test]
    fn stat_prefix_before_damage_suffix() {
        let v = vars(&[("BonusADDamage", &[15.0])]);
        let (key, _) = lookup("BonusDamage", &v).unwrap();
        assert_eq!(key, "BonusADDamage");
    }

    #[test]
    fn trailing_suffix_swaps_to_front() {
        let v = vars(&[("APDamage", &[40.0])]);
        let (key, _) = lookup("Damage_AP", &v).unwrap();
        assert_eq!(key, "APDamage");
    }

    #[test]
    fn containment_prefers_longest_key() {
        let v = vars(&[("Heal", &[1.0]), ("HealAmountPerSecond", &[2.0])]);
        let (key, _) = lookup("HealAmount", &v).unwrap();
        assert_eq!(key, "HealAmountPerSecond");
    }

    #[test]
    fn word_overlap_requires_two_shared_words() {
        let v = vars(&[("StunDurationSeconds", &[1.5])]);
        let (key, _) = lookup("TotalDurationStun", &v).unwrap();
        assert_eq!(key, "StunDurationSeconds");
        // One shared word is not enough.
        let v = vars(&[("StunStrength", &[1.0])]);
        assert!(lookup("BlindDurationExtra", &v).is_none());
    }

    #[test]
    fn total_miss_returns_none() {
        let v = vars(&[("QDamage", &[10.0])]);
        assert!(lookup("WHolyUnrelated", &v).is_none());
    }

    #[test]
    fn camel_words_split() {
        assert_eq!(camel_words("ModifiedQDamage"), vec!["modified", "q", "damage"]);
        assert_eq!(camel_words("Stun_Duration2X"), vec!["stun", "duration", "x"]);
    }
}
