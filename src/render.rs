//! Grid and detail view models.
//!
//! Entities arrive as loosely-typed JSON. Everything here turns them into
//! plain view structs the terminal UI (or `--print`) can draw without caring
//! which fields the API happened to populate.

use crate::constants::{images, messages};
use crate::types::Endpoint;
use crate::village::pick_village;
use serde_json::Value;

/// Keys never shown in key/value sections
const HIDDEN_KEYS: &[&str] = &["age", "height", "weight"];

// ===============================
// JSON helpers
// ===============================

/// Loose truthiness: null, false, 0, NaN and "" are falsy
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Display form of a scalar or nested value.
///
/// Arrays flatten to comma-joined elements (null elements become empty),
/// objects render as compact JSON, whole floats drop their `.0`.
pub fn display_string(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|i| if i.is_null() { String::new() } else { display_string(i) })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => v.to_string(),
    }
}

/// Whether a payload has anything worth rendering
pub fn is_valid_data(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => map
            .values()
            .any(|val| !val.is_null() && !display_string(val).trim().is_empty()),
        other => is_truthy(other),
    }
}

/// `personalInfo` -> `Personal Info`
pub fn humanize_key(key: &str) -> String {
    let mut chars = key.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out: String = first.to_uppercase().collect();
    for c in chars {
        if c.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

fn placeholder(prefix: &str, name: &str) -> String {
    format!("{prefix}{}", urlencoding::encode(name))
}

fn first_image(entity: &Value) -> Option<&str> {
    entity
        .get("images")
        .and_then(Value::as_array)
        .and_then(|imgs| imgs.first())
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn banner_for(endpoint: Endpoint) -> &'static str {
    match endpoint {
        Endpoint::Clan => images::CLAN_BANNER_URL,
        _ => images::VILLAGE_BANNER_URL,
    }
}

fn entity_name(entity: &Value) -> Option<&str> {
    entity.get("name").and_then(Value::as_str).filter(|n| !n.is_empty())
}

// ===============================
// Grid
// ===============================

/// Primary image plus the placeholder to use if it fails to load
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageSource {
    pub primary: String,
    pub fallback: String,
}

impl ImageSource {
    /// URL to show: the primary unless it is not an http(s) URL
    pub fn url(&self) -> &str {
        if self.primary.starts_with("http://") || self.primary.starts_with("https://") {
            &self.primary
        } else {
            &self.fallback
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    /// Position of the raw entity in the page list
    pub index: usize,
    pub name: String,
    pub image: ImageSource,
    /// `Village: ...` or `Known Members: n`
    pub summary: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridView {
    Empty,
    Cards(Vec<Card>),
}

impl GridView {
    pub fn cards(&self) -> &[Card] {
        match self {
            GridView::Empty => &[],
            GridView::Cards(cards) => cards,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards().is_empty()
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        match self {
            GridView::Empty => Some(messages::NO_RESULTS),
            GridView::Cards(_) => None,
        }
    }
}

/// Build one card per named entity; unnamed entries are skipped silently.
pub fn render_grid(items: &[Value], endpoint: Endpoint) -> GridView {
    let cards: Vec<Card> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| render_card(index, item, endpoint))
        .collect();

    if cards.is_empty() {
        GridView::Empty
    } else {
        GridView::Cards(cards)
    }
}

fn render_card(index: usize, item: &Value, endpoint: Endpoint) -> Option<Card> {
    let name = entity_name(item)?;
    let fallback = placeholder(images::CARD_PLACEHOLDER_PREFIX, name);

    let (primary, summary) = match endpoint {
        Endpoint::Character => (
            first_image(item).map(str::to_string).unwrap_or_else(|| fallback.clone()),
            format!("Village: {}", pick_village(item.get("personal"))),
        ),
        Endpoint::Clan | Endpoint::Village => {
            let members = item
                .get("characters")
                .and_then(Value::as_array)
                .map(Vec::len)
                .unwrap_or(0);
            (banner_for(endpoint).to_string(), format!("Known Members: {members}"))
        }
    };

    Some(Card {
        index,
        name: name.to_string(),
        image: ImageSource { primary, fallback },
        summary,
    })
}

// ===============================
// Detail
// ===============================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailRow {
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SectionContent {
    Rows(Vec<DetailRow>),
    Items(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailSection {
    pub title: &'static str,
    pub content: SectionContent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetailBody {
    /// Only the non-empty subsections, in display order
    Character { sections: Vec<DetailSection> },
    Group {
        about_title: &'static str,
        about: &'static str,
        members: Vec<String>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailView {
    pub name: String,
    pub image: String,
    pub body: DetailBody,
}

/// Key/value rows for an attribute mapping; empty when nothing is showable.
pub fn detail_rows(data: &Value) -> Vec<DetailRow> {
    if !is_valid_data(data) {
        return Vec::new();
    }
    let Some(map) = data.as_object() else {
        return Vec::new();
    };

    map.iter()
        .filter(|(key, _)| !HIDDEN_KEYS.contains(&key.to_lowercase().as_str()))
        .filter(|(_, value)| is_truthy(value))
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Array(items) => items
                    .iter()
                    .map(|i| if i.is_null() { String::new() } else { display_string(i) })
                    .collect::<Vec<_>>()
                    .join(", "),
                other => display_string(other),
            };
            // `[]` and `[""]` stringify to nothing
            if display_string(value).is_empty() {
                return None;
            }
            Some(DetailRow { label: humanize_key(key), value: text })
        })
        .collect()
}

/// List items for a single value or a sequence; empty when nothing is showable.
pub fn detail_list(data: &Value) -> Vec<String> {
    if !is_valid_data(data) {
        return Vec::new();
    }
    match data {
        Value::Array(items) => items.iter().map(display_string).collect(),
        other => vec![display_string(other)],
    }
}

fn rows_section(title: &'static str, data: Option<&Value>) -> Option<DetailSection> {
    let rows = detail_rows(data?);
    (!rows.is_empty()).then(|| DetailSection { title, content: SectionContent::Rows(rows) })
}

fn items_section(title: &'static str, data: &Value) -> Option<DetailSection> {
    let items = detail_list(data);
    (!items.is_empty()).then(|| DetailSection { title, content: SectionContent::Items(items) })
}

/// Family comes as a relation -> name mapping, a plain list, or nothing
fn family_members(family: Option<&Value>) -> Value {
    match family {
        Some(Value::Array(items)) => Value::Array(items.clone()),
        Some(Value::Object(map)) => Value::Array(map.values().cloned().collect()),
        Some(v) if is_truthy(v) => Value::Array(vec![v.clone()]),
        _ => Value::Array(Vec::new()),
    }
}

/// Render one entity for the detail overlay
pub fn render_detail(entity: &Value, endpoint: Endpoint) -> DetailView {
    let name = entity_name(entity).unwrap_or("Unknown").to_string();

    match endpoint {
        Endpoint::Character => {
            let image = first_image(entity)
                .map(str::to_string)
                .unwrap_or_else(|| placeholder(images::DETAIL_PLACEHOLDER_PREFIX, &name));

            let sections = [
                rows_section("Personal", entity.get("personal")),
                rows_section("Rank", entity.get("rank")),
                entity.get("jutsu").and_then(|j| items_section("Jutsu", j)),
                items_section("Family", &family_members(entity.get("family"))),
            ]
            .into_iter()
            .flatten()
            .collect();

            DetailView { name, image, body: DetailBody::Character { sections } }
        }
        Endpoint::Clan | Endpoint::Village => {
            let (about_title, about) = if endpoint == Endpoint::Clan {
                (messages::CLAN_ABOUT_TITLE, messages::CLAN_ABOUT)
            } else {
                (messages::VILLAGE_ABOUT_TITLE, messages::VILLAGE_ABOUT)
            };
            let members = match entity.get("characters") {
                Some(list @ Value::Array(_)) => detail_list(list),
                _ => Vec::new(),
            };
            DetailView {
                name,
                image: banner_for(endpoint).to_string(),
                body: DetailBody::Group { about_title, about, members },
            }
        }
    }
}
