//! Normalized display schema for the Rosterforge pipeline.
//!
//! One upstream snapshot produces one [`Envelope`] per run. Everything here
//! is immutable once built; the only post-construction mutation in the whole
//! pipeline is the linker's one-time population of [`TraitData::champions`],
//! which requires the full champion set to exist first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Stat values
// ============================================================================

/// A stat field from the upstream export: either a plain scalar or a
/// 3-element per-tier sequence, depending on which export iteration produced
/// the snapshot. The shape decision is made once, at ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Scalar(f64),
    Tiered([f64; 3]),
}

impl StatValue {
    /// Value at a given tier index (0-based); scalars are tier-invariant.
    pub fn at_tier(&self, tier: usize) -> f64 {
        match self {
            Self::Scalar(v) => *v,
            Self::Tiered(vs) => vs[tier.min(2)],
        }
    }
}

impl Default for StatValue {
    fn default() -> Self {
        Self::Scalar(0.0)
    }
}

/// Champion combat stat block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub health: StatValue,
    pub initial_mana: StatValue,
    pub mana: StatValue,
    pub armor: StatValue,
    pub magic_resist: StatValue,
    pub damage: StatValue,
    pub attack_speed: StatValue,
    pub crit_chance: StatValue,
    pub range: StatValue,
}

// ============================================================================
// Champions
// ============================================================================

/// A champion ability: resolved description plus the raw per-tier variable
/// table it was resolved against (kept for downstream tooltips).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub desc: String,
    pub icon: String,
    /// Variable name → per-tier numeric sequence (normalized to 3 entries).
    pub variables: BTreeMap<String, Vec<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Champion {
    pub name: String,
    pub api_name: String,
    /// Shop cost, clamped into `[1, 5]`.
    pub cost: u8,
    /// Trait display names this champion counts toward (membership, not
    /// ownership; the traits themselves live in [`Envelope::traits`]).
    pub traits: Vec<String>,
    pub ability: Ability,
    pub stats: Stats,
    pub icon: String,
    pub tile_icon: String,
    pub splash_icon: String,
}

// ============================================================================
// Items
// ============================================================================

/// Mutually exclusive item category. Classification follows a fixed
/// precedence order because several predicates can match one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Component,
    Completed,
    Emblem,
    Artifact,
    Radiant,
    Support,
    Other,
}

impl ItemCategory {
    /// Canonical display order (components first, misc last).
    pub fn display_rank(self) -> u8 {
        match self {
            Self::Component => 0,
            Self::Completed => 1,
            Self::Emblem => 2,
            Self::Artifact => 3,
            Self::Radiant => 4,
            Self::Support => 5,
            Self::Other => 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Numeric id from the export, when present.
    pub id: Option<u32>,
    pub api_name: String,
    pub name: String,
    pub desc: String,
    pub icon: String,
    pub category: ItemCategory,
    /// Recipe components (api-names), empty for components themselves.
    pub composition: Vec<String>,
    /// Numeric effect values keyed by the export's opaque tag or name.
    pub effects: BTreeMap<String, f64>,
}

// ============================================================================
// Traits
// ============================================================================

/// Trait kind. Inferred from identifier and breakpoint shape; the export
/// carries no explicit type metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitKind {
    Origin,
    Class,
    Unique,
    TeamUp,
}

impl TraitKind {
    /// Canonical display order: origins, classes, team-ups, uniques.
    pub fn display_rank(self) -> u8 {
        match self {
            Self::Origin => 0,
            Self::Class => 1,
            Self::TeamUp => 2,
            Self::Unique => 3,
        }
    }
}

/// One resolved breakpoint row of a trait description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitLevel {
    pub min_units: u32,
    /// Breakpoint style name (bronze/silver/gold/prismatic).
    pub style: String,
    pub text: String,
}

/// A raw activation breakpoint: unit bounds plus the variables the text
/// resolver substitutes per instantiation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraitEffect {
    pub min_units: u32,
    pub max_units: u32,
    pub style: String,
    pub variables: BTreeMap<String, f64>,
}

/// Lightweight champion membership record, populated by the linker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitChampion {
    pub name: String,
    pub icon: String,
    pub api_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitData {
    pub api_name: String,
    pub name: String,
    /// Flat summary text (always non-empty when `levels` is non-empty).
    pub desc: String,
    pub icon: String,
    pub kind: TraitKind,
    pub levels: Vec<TraitLevel>,
    pub effects: Vec<TraitEffect>,
    /// Populated after parsing by the linker; empty until then.
    pub champions: Vec<TraitChampion>,
}

// ============================================================================
// Augments
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Augment {
    pub api_name: String,
    pub name: String,
    pub desc: String,
    pub icon: String,
    /// 1 = silver, 2 = gold, 3 = prismatic.
    pub tier: u8,
    pub associated_traits: Vec<String>,
}

// ============================================================================
// Output envelope
// ============================================================================

/// Metadata describing when and from what upstream version the output was
/// generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provenance {
    pub generated_at: DateTime<Utc>,
    pub patch: String,
    /// Display label of the selected dataset revision, e.g. `"Set 15"`.
    pub revision_label: String,
}

/// The single output of one pipeline run. A new run fully supersedes the
/// previous envelope; there is no incremental update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub champions: Vec<Champion>,
    pub items: Vec<Item>,
    pub traits: Vec<TraitData>,
    pub augments: Vec<Augment>,
    pub provenance: Provenance,
}
