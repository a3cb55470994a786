use serde::Deserialize;

use crate::error::DexError;

/// Static host serving the canonical thumbnail sprites.
const SPRITE_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

/// Tagged result of any asynchronous operation surfaced to presentation.
/// Exactly one variant is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Loading,
    Success(T),
    Error(String),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Outcome::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// One raw (name, detail-url) pair as returned by the list endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// Result of one list fetch. `count` is the API-reported total across all
/// pages and drives the end-of-catalog check.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub count: u32,
    pub results: Vec<NamedResource>,
}

/// One rendered catalog row. Identity is `id`; immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: u32,
    pub display_name: String,
    pub thumbnail_url: String,
}

impl CatalogEntry {
    /// Derives an entry from a raw list resource. The numeric id is the
    /// trailing digit run of the detail url; a url without one is rejected
    /// so the caller can exclude the entry instead of crashing.
    pub fn from_resource(resource: &NamedResource) -> Result<Self, DexError> {
        let id = trailing_id(&resource.url)
            .ok_or_else(|| DexError::InvalidEntryUrl(resource.url.clone()))?;
        Ok(Self {
            id,
            display_name: title_case(&resource.name),
            thumbnail_url: sprite_url(id),
        })
    }
}

/// One named base statistic of an entity, `value >= 0` by construction.
/// The per-list maximum is implicit; see [`EntityDetail::max_stat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub name: String,
    pub value: u32,
}

/// An ordered category tag such as "electric".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTag {
    pub name: String,
}

/// Image urls keyed by sprite variant. Any variant may be missing upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpriteSet {
    pub front_default: Option<String>,
    pub front_shiny: Option<String>,
    pub back_default: Option<String>,
    pub back_shiny: Option<String>,
}

/// Full record for one catalog entry as returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDetail {
    pub id: u32,
    pub order: i32,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub types: Vec<TypeTag>,
    pub stats: Vec<Stat>,
    pub sprites: SpriteSet,
}

impl EntityDetail {
    /// Maximum across the stats list, used as the implicit bar scale at
    /// render time. The list is non-empty for any successfully parsed detail.
    pub fn max_stat(&self) -> u32 {
        self.stats.iter().map(|stat| stat.value).max().unwrap_or(0)
    }

    /// Derives the single search-result entry: the ordinal field stands in
    /// for the list id and the shiny front sprite for the thumbnail.
    pub fn search_entry(&self) -> CatalogEntry {
        CatalogEntry {
            id: self.order.max(0) as u32,
            display_name: title_case(&self.name),
            thumbnail_url: self
                .sprites
                .front_shiny
                .clone()
                .unwrap_or_else(|| sprite_url(self.id)),
        }
    }
}

/// Extracts the longest trailing digit run of `url`, ignoring one trailing
/// slash. Returns `None` when the url ends in no digits or the run does not
/// fit a `u32`.
pub fn trailing_id(url: &str) -> Option<u32> {
    let trimmed = url.strip_suffix('/').unwrap_or(url);
    let head = trimmed.trim_end_matches(|ch: char| ch.is_ascii_digit());
    let digits = &trimmed[head.len()..];
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Canonical thumbnail url for a numeric id. Pure string template.
pub fn sprite_url(id: u32) -> String {
    format!("{SPRITE_BASE_URL}/{id}.png")
}

/// Uppercases the first character, leaving the rest untouched.
pub fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
