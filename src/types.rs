//! Core data types for series, chapters, pages, and browse filters.
//!
//! This module defines the internal model every backend normalizes into:
//!
//! - [`Series`] - a manga series with localized metadata and its native payload
//! - [`Tag`] - a genre/theme/demographic with a stable slug id
//! - [`Chapter`] and [`Page`] - synthetic reading content
//! - [`SeriesFilter`] - UI-level browse parameters
//! - [`Listing`] - a page of results plus the upstream total
//!
//! # Examples
//!
//! ```rust
//! use yomu::types::*;
//!
//! let filter = SeriesFilterBuilder::default()
//!     .title("frieren")
//!     .statuses(vec![SeriesStatus::Ongoing])
//!     .sort(Sort::new(SortKey::Rating, SortDirection::Desc))
//!     .limit(24u32)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(filter.title.as_deref(), Some("frieren"));
//! assert_eq!(filter.limit, Some(24));
//! ```

use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A language-code to text mapping that remembers insertion order.
///
/// "First available" in the accessor fallback chain means the first entry
/// inserted, which for upstream records is the order the mapper writes them
/// and for JSON documents is document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizedText {
    entries: Vec<(String, String)>,
}

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the text for `lang`, keeping the original position
    /// when replacing.
    pub fn insert(&mut self, lang: impl Into<String>, text: impl Into<String>) {
        let lang = lang.into();
        let text = text.into();
        match self.entries.iter_mut().find(|(l, _)| *l == lang) {
            Some(entry) => entry.1 = text,
            None => self.entries.push((lang, text)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, lang: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(lang, text);
        self
    }

    pub fn get(&self, lang: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == lang)
            .map(|(_, t)| t.as_str())
    }

    /// The first inserted entry, if any.
    pub fn first(&self) -> Option<(&str, &str)> {
        self.entries
            .first()
            .map(|(l, t)| (l.as_str(), t.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, t)| (l.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocalizedText {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut text = LocalizedText::new();
        for (lang, value) in iter {
            text.insert(lang, value);
        }
        text
    }
}

impl Serialize for LocalizedText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (lang, text) in &self.entries {
            map.serialize_entry(lang, text)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LocalizedText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LocalizedVisitor;

        impl<'de> Visitor<'de> for LocalizedVisitor {
            type Value = LocalizedText;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of language codes to strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut text = LocalizedText::new();
                while let Some((lang, value)) = access.next_entry::<String, String>()? {
                    text.insert(lang, value);
                }
                Ok(text)
            }
        }

        deserializer.deserialize_map(LocalizedVisitor)
    }
}

/// Publication lifecycle of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesStatus {
    Ongoing,
    Completed,
    Hiatus,
    Cancelled,
    Upcoming,
    #[default]
    Unknown,
}

impl SeriesStatus {
    pub const ALL: [SeriesStatus; 6] = [
        SeriesStatus::Ongoing,
        SeriesStatus::Completed,
        SeriesStatus::Hiatus,
        SeriesStatus::Cancelled,
        SeriesStatus::Upcoming,
        SeriesStatus::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesStatus::Ongoing => "ongoing",
            SeriesStatus::Completed => "completed",
            SeriesStatus::Hiatus => "hiatus",
            SeriesStatus::Cancelled => "cancelled",
            SeriesStatus::Upcoming => "upcoming",
            SeriesStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SeriesStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeriesStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        SeriesStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::Error::parse(format!("Unknown series status: {}", s)))
    }
}

/// A genre, theme or demographic label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Stable slug, e.g. `slice-of-life`.
    pub id: String,
    pub name: LocalizedText,
}

/// What a [`Relationship`] entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Author,
    CoverArt,
    ScanlationGroup,
}

/// A related entity attached to a series or chapter.
///
/// Mapped series always carry one author and one cover-art entry so the
/// accessors in [`crate::accessors`] have something to fall back to when the
/// native payload lacks the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub kind: RelationshipKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// A manga series.
///
/// The typed fields are the common subset every backend fills. Anything else
/// the upstream knows (score, rank, members, authors, alternate titles,
/// images) stays in [`native`](Series::native) and is read through
/// [`crate::accessors`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    pub id: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
    #[serde(default)]
    pub status: SeriesStatus,
    #[serde(default)]
    pub year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native: Option<serde_json::Value>,
}

impl Series {
    /// The first relationship of the given kind.
    pub fn relationship(&self, kind: RelationshipKind) -> Option<&Relationship> {
        self.relationships.iter().find(|rel| rel.kind == kind)
    }

    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags.iter().any(|tag| tag.id == tag_id)
    }
}

/// A synthetic chapter.
///
/// `number` is a string so values like `"10.5"` survive untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub series_id: String,
    pub number: String,
    pub title: Option<String>,
    pub volume: Option<String>,
    pub pages: u32,
    pub published_at: DateTime<Utc>,
    pub language: String,
    pub group: Option<String>,
}

/// A placeholder page image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// The pages of one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSet {
    pub chapter_id: String,
    pub pages: Vec<Page>,
}

/// One page of results plus the total the source reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub total: u32,
}

impl<T> Listing<T> {
    pub fn new(items: Vec<T>, total: u32) -> Self {
        Self { items, total }
    }

    /// `{items: [], total: 0}`, what the browse surface shows for both
    /// "nothing matched" and "the fetch failed".
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Fields a browse can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Title,
    Year,
    UpdatedAt,
    CreatedAt,
    Popularity,
    Rating,
}

impl FromStr for SortKey {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "title" => Ok(SortKey::Title),
            "year" => Ok(SortKey::Year),
            "updatedAt" | "updated_at" => Ok(SortKey::UpdatedAt),
            "createdAt" | "created_at" => Ok(SortKey::CreatedAt),
            "popularity" => Ok(SortKey::Popularity),
            "rating" => Ok(SortKey::Rating),
            other => Err(crate::Error::parse(format!("Unknown sort key: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// A sort key plus direction. Defaults to most popular first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Parses UI strings, falling back to [`Sort::default`] when the key is
    /// not recognized. An unrecognized direction means descending.
    ///
    /// ```rust
    /// use yomu::types::{Sort, SortDirection, SortKey};
    ///
    /// assert_eq!(Sort::parse("rating", "asc"), Sort::new(SortKey::Rating, SortDirection::Asc));
    /// assert_eq!(Sort::parse("vibes", "asc"), Sort::default());
    /// ```
    pub fn parse(key: &str, direction: &str) -> Self {
        match key.parse::<SortKey>() {
            Ok(key) => {
                let direction = if direction.eq_ignore_ascii_case("asc") {
                    SortDirection::Asc
                } else {
                    SortDirection::Desc
                };
                Sort { key, direction }
            }
            Err(_) => Sort::default(),
        }
    }
}

impl Default for Sort {
    fn default() -> Self {
        Sort::new(SortKey::Popularity, SortDirection::Desc)
    }
}

/// UI-level browse parameters.
///
/// `limit`/`offset` are the UI's windowing; backends translate them into
/// whatever pagination the upstream speaks.
#[derive(Debug, Clone, Default, PartialEq, Builder)]
#[builder(default, setter(into))]
pub struct SeriesFilter {
    #[builder(setter(strip_option))]
    pub title: Option<String>,
    pub include_tags: Vec<String>,
    pub exclude_tags: Vec<String>,
    pub statuses: Vec<SeriesStatus>,
    #[builder(setter(strip_option))]
    pub sort: Option<Sort>,
    #[builder(setter(strip_option))]
    pub limit: Option<u32>,
    #[builder(setter(strip_option))]
    pub offset: Option<u32>,
}

impl From<String> for SeriesFilter {
    fn from(title: String) -> Self {
        SeriesFilter {
            title: Some(title),
            ..Default::default()
        }
    }
}

impl From<&str> for SeriesFilter {
    fn from(title: &str) -> Self {
        SeriesFilter {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }
}

/// Windowing and order for a chapter list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChapterQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub direction: SortDirection,
}

impl ChapterQuery {
    pub fn ascending() -> Self {
        Self {
            direction: SortDirection::Asc,
            ..Default::default()
        }
    }
}

/// Cover image size classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CoverSize {
    #[default]
    #[serde(rename = "original")]
    Original,
    #[serde(rename = "512")]
    Medium,
    #[serde(rename = "256")]
    Small,
}

impl CoverSize {
    /// Placeholder pixel dimensions as `width/height`.
    pub fn dimensions(&self) -> &'static str {
        match self {
            CoverSize::Original => "600/800",
            CoverSize::Medium => "512/683",
            CoverSize::Small => "256/341",
        }
    }
}

impl FromStr for CoverSize {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "original" => Ok(CoverSize::Original),
            "512" => Ok(CoverSize::Medium),
            "256" => Ok(CoverSize::Small),
            other => Err(crate::Error::parse(format!("Unknown cover size: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localized_text_keeps_insertion_order() {
        let mut text = LocalizedText::new()
            .with("jp", "進撃の巨人")
            .with("en", "Attack on Titan");
        text.insert("jp", "Shingeki no Kyojin");

        assert_eq!(text.len(), 2);
        assert_eq!(text.first(), Some(("jp", "Shingeki no Kyojin")));
        assert_eq!(text.get("en"), Some("Attack on Titan"));
        assert_eq!(text.get("fr"), None);
    }

    #[test]
    fn test_localized_text_json_document_order() {
        let text: LocalizedText = serde_json::from_str(r#"{"jp":"X","en":"Y"}"#).unwrap();
        assert_eq!(text.first(), Some(("jp", "X")));
        assert_eq!(serde_json::to_string(&text).unwrap(), r#"{"jp":"X","en":"Y"}"#);
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("Ongoing".parse::<SeriesStatus>().unwrap(), SeriesStatus::Ongoing);
        assert!("publishing".parse::<SeriesStatus>().is_err());
    }

    #[test]
    fn test_sort_key_accepts_ui_spellings() {
        assert_eq!("updatedAt".parse::<SortKey>().unwrap(), SortKey::UpdatedAt);
        assert_eq!("created_at".parse::<SortKey>().unwrap(), SortKey::CreatedAt);
        assert!("relevance".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_filter_builder_defaults() {
        let filter = SeriesFilterBuilder::default().build().unwrap();
        assert_eq!(filter, SeriesFilter::default());
        assert!(filter.sort.is_none());

        let filter: SeriesFilter = "berserk".into();
        assert_eq!(filter.title.as_deref(), Some("berserk"));
    }

    #[test]
    fn test_cover_size_dimensions() {
        assert_eq!("256".parse::<CoverSize>().unwrap().dimensions(), "256/341");
        assert_eq!(CoverSize::default().dimensions(), "600/800");
        assert!("1024".parse::<CoverSize>().is_err());
    }
}
