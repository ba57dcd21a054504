//! Semantic colorization of resolved description text.
//!
//! Emits `<span>` elements with semantic classes so the rendering layer can
//! style per-tier values and stat keywords without the pipeline hard-coding
//! a palette. Matching is longest-phrase-first and placeholder-protected:
//! a span produced by an earlier pattern is never re-matched by a later,
//! shorter one.

use regex::Regex;
use std::sync::LazyLock;

/// Stat keyword vocabulary, longest phrase first. Order matters: "Critical
/// Strike Damage" must match before "Critical Strike", which must match
/// before any later pattern could see the word "Damage" on its own.
const STAT_KEYWORDS: &[(&str, &str)] = &[
    ("Critical Strike Damage", "crit-damage"),
    ("Critical Strike Chance", "crit-chance"),
    ("Critical Strike", "crit"),
    ("Attack Damage", "attack-damage"),
    ("Ability Power", "ability-power"),
    ("Attack Speed", "attack-speed"),
    ("Magic Resist", "magic-resist"),
    ("Damage Amp", "damage-amp"),
    ("Durability", "durability"),
    ("Omnivamp", "omnivamp"),
    ("Health", "health"),
    ("Armor", "armor"),
    ("Mana", "mana"),
];

static EXISTING_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<span[^>]*>[^<]*</span>").unwrap());

static SLASH_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?%?(?:/\d+(?:\.\d+)?%?)+").unwrap());

/// Wrap a per-tier value in its tier color span (0-based tier index; runs
/// longer than three entries reuse the last color).
pub fn tier_span(tier: usize, text: &str) -> String {
    format!("<span class=\"tier-{}\">{text}</span>", tier.min(2) + 1)
}

/// The muted separator between per-tier values.
pub fn muted_slash() -> String {
    "<span class=\"muted\">/</span>".to_string()
}

fn stat_span(class: &str, text: &str) -> String {
    format!("<span class=\"stat stat-{class}\">{text}</span>")
}

/// Colorize slash-separated numeric runs (per-tier values written literally
/// in the source text) and known stat keywords.
pub fn colorize(text: &str) -> String {
    let mut stash: Vec<String> = Vec::new();
    let mut out = text.to_string();

    // Protect spans produced during token substitution from re-matching.
    out = protect(&EXISTING_SPAN, &out, &mut stash, |m| m.to_string());

    out = protect(&SLASH_RUN, &out, &mut stash, |run| {
        run.split('/')
            .enumerate()
            .map(|(i, v)| tier_span(i, v))
            .collect::<Vec<_>>()
            .join(&muted_slash())
    });

    for &(phrase, class) in STAT_KEYWORDS {
        // Plain substring scan; keyword phrases contain no regex metachars
        // and placeholders guarantee earlier matches stay opaque.
        let mut next = String::with_capacity(out.len());
        let mut rest = out.as_str();
        while let Some(pos) = rest.find(phrase) {
            next.push_str(&rest[..pos]);
            next.push_str(&placeholder(stash.len()));
            stash.push(stat_span(class, phrase));
            rest = &rest[pos + phrase.len()..];
        }
        next.push_str(rest);
        out = next;
    }

    restore(&out, &stash)
}

fn placeholder(idx: usize) -> String {
    format!("\u{1}{idx}\u{2}")
}

fn protect(
    re: &Regex,
    text: &str,
    stash: &mut Vec<String>,
    render: impl Fn(&str) -> String,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in re.find_iter(text) {
        out.push_str(&text[last..m.start()]);
        out.push_str(&placeholder(stash.len()));
        stash.push(render(m.as_str()));
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{1}(\\d+)\u{2}").unwrap());

fn restore(text: &str, stash: &[String]) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &regex::Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| stash.get(i).cloned())
                .unwrap_or_default()
        })
        .into_owned()
}
