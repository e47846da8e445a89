//! Home-village inference for characters.
//!
//! The API's `personal` block is noisy: `village` is often missing and
//! `affiliation` mixes hidden villages with organisations, teams and units.
//! [`pick_village`] reduces it to one display name.

use serde_json::Value;

pub const UNKNOWN_VILLAGE: &str = "Unknown";

/// Organisation and unit fragments that never count as a home village
pub const DENYLIST: &[&str] = &[
    "allied shinobi forces",
    "akatsuki",
    "kara",
    "anbu",
    "root",
    "taka",
    "team",
    "sannin",
    "seven ninja swordsmen",
    "kara organization",
    "konoha council",
];

/// Canonical village names, highest priority first
pub const PRIORITY: &[&str] = &[
    "Sunagakure",
    "Konohagakure",
    "Iwagakure",
    "Kumogakure",
    "Kirigakure",
    "Amegakure",
    "Uzushiogakure",
    "Takigakure",
    "Kusagakure",
    "Yugakure",
    "Hoshigakure",
    "Otogakure",
];

const VILLAGE_MARKER: &str = "gakure";

fn looks_like_village(s: &str) -> bool {
    s.to_lowercase().contains(VILLAGE_MARKER)
}

fn is_denied(s: &str) -> bool {
    let lower = s.to_lowercase();
    DENYLIST.iter().any(|d| lower.contains(d))
}

/// Affiliation entries that could name a home village, trimmed, in input order
fn village_candidates(affiliation: Option<&Value>) -> Vec<&str> {
    let entries: Vec<&Value> = match affiliation {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(v) if crate::render::is_truthy(v) => vec![v],
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| looks_like_village(s) && !is_denied(s))
        .collect()
}

/// Resolve a character's home village from its `personal` attributes.
///
/// Order: explicit `village`, then affiliation candidates ranked by
/// [`PRIORITY`] (canonical name returned), then the first surviving
/// candidate as written, then a `birthplace` mentioning a hidden village,
/// else [`UNKNOWN_VILLAGE`]. Total over any JSON input.
pub fn pick_village(personal: Option<&Value>) -> String {
    let personal = match personal {
        Some(p) if !p.is_null() => p,
        _ => return UNKNOWN_VILLAGE.to_string(),
    };

    if let Some(village) = personal.get("village").and_then(Value::as_str) {
        if !village.is_empty() {
            return village.to_string();
        }
    }

    let candidates = village_candidates(personal.get("affiliation"));

    for canonical in PRIORITY {
        let needle = canonical.to_lowercase();
        if candidates.iter().any(|c| c.to_lowercase().contains(&needle)) {
            return (*canonical).to_string();
        }
    }
    if let Some(first) = candidates.first() {
        return (*first).to_string();
    }

    match personal.get("birthplace").and_then(Value::as_str) {
        Some(birthplace) if looks_like_village(birthplace) => birthplace.to_string(),
        _ => UNKNOWN_VILLAGE.to_string(),
    }
}
