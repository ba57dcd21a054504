//! Pipeline orchestration: select → parse → link → emit.
//!
//! One upstream snapshot in, one envelope out. Missing payloads and missing
//! sections degrade to empty collections; the run itself only fails on a
//! snapshot that violates the top-level shape contract.

use anyhow::Result;
use chrono::Utc;
use rosterforge_ingest::{
    augments::parse_augments, champions::parse_champions, items::global_item_table,
    items::parse_items, linker::link_champions, require_object, selector::select_revision,
    traits::parse_traits,
};
use rosterforge_schema::{Envelope, Provenance};
use serde_json::Value;
use tracing::{info, warn};

/// Run the full transformation over an optional snapshot and an optional
/// versions payload (first element = latest patch). An explicit patch
/// override wins over the versions payload and is kept verbatim, so offline
/// runs can still carry complete provenance.
pub fn run(
    snapshot: Option<Value>,
    versions: Option<Value>,
    patch_override: Option<String>,
) -> Result<Envelope> {
    let patch = patch_override.unwrap_or_else(|| patch_display(versions.as_ref()));

    let Some(snapshot) = snapshot else {
        warn!("no snapshot payload; emitting empty envelope");
        return Ok(empty_envelope(patch, "Unknown".to_string()));
    };
    require_object(&snapshot, "snapshot")?;

    let Some(revision) = select_revision(&snapshot) else {
        warn!("snapshot carries no dataset revisions; emitting empty envelope");
        return Ok(empty_envelope(patch, "Unknown".to_string()));
    };
    let label = revision.label();
    info!(%label, "selected dataset revision");

    let table = global_item_table(&snapshot);
    let champions = parse_champions(revision.data);
    let mut traits = parse_traits(revision.data);
    let items = parse_items(revision.data, &table);
    let augments = parse_augments(revision.data, &table);

    // Linking needs all four collections; it must run last.
    link_champions(&mut traits, &champions);

    info!(
        champions = champions.len(),
        traits = traits.len(),
        items = items.len(),
        augments = augments.len(),
        "pipeline complete"
    );

    Ok(Envelope {
        champions,
        items,
        traits,
        augments,
        provenance: Provenance {
            generated_at: Utc::now(),
            patch,
            revision_label: label,
        },
    })
}

/// Latest patch string for display: first element of the versions list,
/// truncated to its first two dot-segments (`"15.4.1"` → `"15.4"`).
fn patch_display(versions: Option<&Value>) -> String {
    versions
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
        .and_then(Value::as_str)
        .map(|v| v.split('.').take(2).collect::<Vec<_>>().join("."))
        .unwrap_or_default()
}

fn empty_envelope(patch: String, revision_label: String) -> Envelope {
    Envelope {
        champions: Vec::new(),
        items: Vec::new(),
        traits: Vec::new(),
        augments: Vec::new(),
        provenance: Provenance {
            generated_at: Utc::now(),
            patch,
            revision_label,
        },
    }
}
