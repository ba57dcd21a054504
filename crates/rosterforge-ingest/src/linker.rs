//! Cross-entity linking.
//!
//! Runs strictly after all four entity collections exist. Populates each
//! trait's member champion list from champion trait affiliations, and
//! derives team-up memberships from identifier naming when the affiliation
//! route produced nothing. Idempotent: linking twice never duplicates a
//! membership entry.

use rosterforge_schema::{Champion, TraitChampion, TraitData, TraitKind};
use tracing::debug;

/// Attach champion membership records to their traits.
///
/// Matching scans all traits for an exact display-name match before falling
/// back to a case-insensitive substring scan against the traits' stable keys
/// with spaces stripped. Unresolvable affiliations are skipped silently.
pub fn link_champions(traits: &mut [TraitData], champions: &[Champion]) {
    for champion in champions {
        for trait_name in &champion.traits {
            if let Some(t) = find_trait(traits, trait_name) {
                push_member(t, champion);
            }
        }
    }

    derive_team_ups(traits, champions);
}

fn find_trait<'a>(traits: &'a mut [TraitData], name: &str) -> Option<&'a mut TraitData> {
    if let Some(idx) = traits.iter().position(|t| t.name == name) {
        return traits.get_mut(idx);
    }
    let needle = name.replace(' ', "").to_ascii_lowercase();
    traits.iter_mut().find(|t| {
        t.api_name
            .replace(' ', "")
            .to_ascii_lowercase()
            .contains(&needle)
    })
}

fn push_member(t: &mut TraitData, champion: &Champion) {
    if t.champions.iter().any(|c| c.api_name == champion.api_name) {
        return;
    }
    t.champions.push(TraitChampion {
        name: champion.name.clone(),
        icon: champion.icon.clone(),
        api_name: champion.api_name.clone(),
    });
}

/// Team-up traits pair two specific champions but often list no
/// affiliations. Their identifiers end with the pair's names run together
/// (`..._TeamUp_LuxJinx`), so split the trailing segment on capitalization
/// boundaries and match each candidate against champion names.
fn derive_team_ups(traits: &mut [TraitData], champions: &[Champion]) {
    for t in traits
        .iter_mut()
        .filter(|t| t.kind == TraitKind::TeamUp && t.champions.is_empty())
    {
        let segment = t.api_name.rsplit('_').next().unwrap_or_default();
        for candidate in capital_segments(segment) {
            let found = champions
                .iter()
                .find(|c| c.name.to_ascii_lowercase().contains(&candidate.to_ascii_lowercase()));
            if let Some(champion) = found {
                debug!(trait_key = %t.api_name, champion = %champion.name, "derived team-up member");
                push_member(t, champion);
            }
        }
    }
}

fn capital_segments(s: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for c in s.chars() {
        if c.is_ascii_uppercase() && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}
