//! Genre id ↔ tag slug registry.
//!
//! The upstream identifies genres by numeric MAL id; the internal model uses
//! slugs. The registry is the fixed bidirectional table between the two plus
//! the slugification rule for genres the table does not know.
//!
//! Lookups that miss are reported, never silently dropped: [`resolve`]
//! returns both the ids it could map and the slugs it could not.
//!
//! [`resolve`]: GenreRegistry::resolve
//!
//! # Examples
//!
//! ```rust
//! use yomu::registry::GenreRegistry;
//!
//! let registry = GenreRegistry::default();
//! let resolution = registry.resolve(&["action".to_string(), "cooking".to_string()]);
//!
//! assert_eq!(resolution.ids, vec![1]);
//! assert_eq!(resolution.unmapped, vec!["cooking".to_string()]);
//! assert_eq!(registry.tag_id(1, "Action"), "action");
//! assert_eq!(registry.tag_id(9999, "Boys Love"), "boys-love");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{LocalizedText, Tag};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// One row of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenreEntry {
    pub mal_id: u32,
    pub slug: &'static str,
    pub name: &'static str,
}

const fn entry(mal_id: u32, slug: &'static str, name: &'static str) -> GenreEntry {
    GenreEntry { mal_id, slug, name }
}

/// The built-in table, ordered by MAL id.
pub const BUILTIN_GENRES: &[GenreEntry] = &[
    entry(1, "action", "Action"),
    entry(2, "adventure", "Adventure"),
    entry(4, "comedy", "Comedy"),
    entry(7, "mystery", "Mystery"),
    entry(8, "drama", "Drama"),
    entry(10, "fantasy", "Fantasy"),
    entry(13, "historical", "Historical"),
    entry(14, "horror", "Horror"),
    entry(16, "magic", "Magic"),
    entry(22, "romance", "Romance"),
    entry(24, "sci-fi", "Sci-Fi"),
    entry(30, "sports", "Sports"),
    entry(36, "slice-of-life", "Slice of Life"),
    entry(37, "supernatural", "Supernatural"),
    entry(41, "thriller", "Thriller"),
    entry(62, "isekai", "Isekai"),
];

/// Outcome of mapping tag slugs to upstream genre ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Genre ids, in the order the slugs were given.
    pub ids: Vec<u32>,
    /// Slugs with no registry entry.
    pub unmapped: Vec<String>,
}

impl Resolution {
    pub fn is_complete(&self) -> bool {
        self.unmapped.is_empty()
    }
}

/// Bidirectional genre table.
#[derive(Debug, Clone)]
pub struct GenreRegistry {
    entries: Vec<GenreEntry>,
}

impl GenreRegistry {
    /// Creates a registry over the given entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use yomu::registry::{GenreEntry, GenreRegistry};
    ///
    /// let registry = GenreRegistry::new(vec![GenreEntry {
    ///     mal_id: 1,
    ///     slug: "action",
    ///     name: "Action",
    /// }]);
    /// assert_eq!(registry.mal_id_for("action"), Some(1));
    /// assert_eq!(registry.slug_for(2), None);
    /// ```
    pub fn new(entries: Vec<GenreEntry>) -> Self {
        Self { entries }
    }

    /// All entries in table order.
    pub fn entries(&self) -> &[GenreEntry] {
        &self.entries
    }

    /// Slug for an upstream genre id.
    pub fn slug_for(&self, mal_id: u32) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|e| e.mal_id == mal_id)
            .map(|e| e.slug)
    }

    /// Upstream genre id for a slug.
    pub fn mal_id_for(&self, slug: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.slug == slug)
            .map(|e| e.mal_id)
    }

    /// Tag id for an upstream genre: the registry slug, else the slugified
    /// display name.
    pub fn tag_id(&self, mal_id: u32, name: &str) -> String {
        self.slug_for(mal_id)
            .map(str::to_string)
            .unwrap_or_else(|| slugify(name))
    }

    /// Maps slugs to genre ids, reporting the ones that have no entry.
    pub fn resolve(&self, slugs: &[String]) -> Resolution {
        let mut resolution = Resolution::default();
        for slug in slugs {
            match self.mal_id_for(slug) {
                Some(id) => resolution.ids.push(id),
                None => resolution.unmapped.push(slug.clone()),
            }
        }
        resolution
    }

    /// The whole table as tags, used when the upstream vocabulary is
    /// unavailable.
    pub fn tags(&self) -> Vec<Tag> {
        self.entries
            .iter()
            .map(|e| Tag {
                id: e.slug.to_string(),
                name: LocalizedText::new().with("en", e.name),
            })
            .collect()
    }
}

impl Default for GenreRegistry {
    fn default() -> Self {
        Self::new(BUILTIN_GENRES.to_vec())
    }
}

/// Lowercases `name` and collapses each whitespace run into `-`.
///
/// Leading and trailing whitespace is trimmed first, so padded upstream
/// names never produce ids like `-gore-`.
pub fn slugify(name: &str) -> String {
    WHITESPACE
        .replace_all(name.trim(), "-")
        .to_lowercase()
}
