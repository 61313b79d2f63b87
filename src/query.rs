//! Translation from UI browse filters to the upstream query vocabulary.
//!
//! The UI windows results with `(limit, offset)` and names statuses and sort
//! keys its own way; the upstream pages with `(page, limit)` and has its own
//! names for everything. This module holds those fixed tables and assembles
//! the relative endpoint string the request engine caches on.
//!
//! # Examples
//!
//! ```rust
//! use yomu::query::build_search;
//! use yomu::registry::GenreRegistry;
//! use yomu::types::*;
//!
//! let filter = SeriesFilterBuilder::default()
//!     .title("one piece")
//!     .statuses(vec![SeriesStatus::Ongoing])
//!     .include_tags(vec!["action".to_string()])
//!     .offset(40u32)
//!     .build()
//!     .unwrap();
//!
//! let query = build_search(&filter, &GenreRegistry::default());
//! assert_eq!(
//!     query.endpoint,
//!     concat!(
//!         "/manga?page=3&limit=20&q=one%20piece&status=publishing",
//!         "&genres=1&order_by=popularity&sort=desc"
//!     )
//! );
//! ```

use log::debug;

use crate::registry::GenreRegistry;
use crate::types::{SeriesFilter, SeriesStatus, SortKey};

/// Page size used when the caller gives none, or gives zero.
pub const DEFAULT_LIMIT: u32 = 20;

/// Upstream endpoint for the genre vocabulary.
pub const GENRES_ENDPOINT: &str = "/genres/manga";

/// Internal status → value accepted by the upstream `status` filter.
const STATUS_QUERY_VALUES: &[(SeriesStatus, &str)] = &[
    (SeriesStatus::Ongoing, "publishing"),
    (SeriesStatus::Completed, "complete"),
    (SeriesStatus::Hiatus, "hiatus"),
    (SeriesStatus::Cancelled, "discontinued"),
    (SeriesStatus::Upcoming, "upcoming"),
];

/// Status labels the upstream puts on records.
const STATUS_RECORD_LABELS: &[(&str, SeriesStatus)] = &[
    ("Publishing", SeriesStatus::Ongoing),
    ("Finished", SeriesStatus::Completed),
    ("On Hiatus", SeriesStatus::Hiatus),
    ("Discontinued", SeriesStatus::Cancelled),
    ("Not yet published", SeriesStatus::Upcoming),
];

/// The upstream filter value for `status`; `Unknown` has none.
pub fn status_to_upstream(status: SeriesStatus) -> Option<&'static str> {
    STATUS_QUERY_VALUES
        .iter()
        .find(|(s, _)| *s == status)
        .map(|(_, v)| *v)
}

/// Interprets an upstream status, either a record label (`"On Hiatus"`) or a
/// filter value (`"hiatus"`). Anything else is `Unknown`.
pub fn status_from_upstream(value: &str) -> SeriesStatus {
    let value = value.trim();
    STATUS_RECORD_LABELS
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(value))
        .map(|(_, s)| *s)
        .or_else(|| {
            STATUS_QUERY_VALUES
                .iter()
                .find(|(_, v)| v.eq_ignore_ascii_case(value))
                .map(|(s, _)| *s)
        })
        .unwrap_or(SeriesStatus::Unknown)
}

/// Upstream `order_by` field for a sort key.
pub fn sort_field(key: SortKey) -> &'static str {
    match key {
        SortKey::Title => "title",
        SortKey::Year => "start_date",
        SortKey::UpdatedAt => "end_date",
        SortKey::CreatedAt => "start_date",
        SortKey::Popularity => "popularity",
        SortKey::Rating => "score",
    }
}

/// Effective page size: zero and absent both mean [`DEFAULT_LIMIT`].
pub fn effective_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => DEFAULT_LIMIT,
        Some(limit) => limit,
    }
}

/// 1-based upstream page containing `offset`.
///
/// ```rust
/// use yomu::query::page_for;
///
/// assert_eq!(page_for(0, 20), 1);
/// assert_eq!(page_for(19, 20), 1);
/// assert_eq!(page_for(20, 20), 2);
/// ```
pub fn page_for(offset: u32, limit: u32) -> u32 {
    offset / limit.max(1) + 1
}

/// A search endpoint plus what the translation could not express.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamQuery {
    /// Relative endpoint, e.g. `/manga?page=1&limit=20&...`.
    pub endpoint: String,
    pub page: u32,
    pub limit: u32,
    /// Included tag slugs with no genre id; they do not filter.
    pub unmapped_tags: Vec<String>,
    /// Excluded tag slugs; the upstream only supports inclusion.
    pub ignored_exclusions: Vec<String>,
    /// Statuses with no upstream filter value.
    pub dropped_statuses: Vec<SeriesStatus>,
}

/// Assembles the `/manga` search endpoint for `filter`.
pub fn build_search(filter: &SeriesFilter, registry: &GenreRegistry) -> UpstreamQuery {
    let limit = effective_limit(filter.limit);
    let page = page_for(filter.offset.unwrap_or(0), limit);

    let mut parts = vec![format!("page={}", page), format!("limit={}", limit)];

    if let Some(title) = filter.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        parts.push(format!("q={}", urlencoding::encode(title)));
    }

    let mut statuses = Vec::new();
    let mut dropped_statuses = Vec::new();
    for status in &filter.statuses {
        match status_to_upstream(*status) {
            Some(value) => statuses.push(value),
            None => dropped_statuses.push(*status),
        }
    }
    if !statuses.is_empty() {
        parts.push(format!("status={}", statuses.join(",")));
    }

    let resolution = registry.resolve(&filter.include_tags);
    if !resolution.ids.is_empty() {
        let ids: Vec<String> = resolution.ids.iter().map(u32::to_string).collect();
        parts.push(format!("genres={}", ids.join(",")));
    }

    let sort = filter.sort.unwrap_or_default();
    parts.push(format!("order_by={}", sort_field(sort.key)));
    parts.push(format!("sort={}", sort.direction.as_str()));

    let query = UpstreamQuery {
        endpoint: format!("/manga?{}", parts.join("&")),
        page,
        limit,
        unmapped_tags: resolution.unmapped,
        ignored_exclusions: filter.exclude_tags.clone(),
        dropped_statuses,
    };

    if !query.unmapped_tags.is_empty() {
        debug!("tags without a genre id do not filter: {:?}", query.unmapped_tags);
    }
    if !query.ignored_exclusions.is_empty() {
        debug!("tag exclusion is not supported upstream: {:?}", query.ignored_exclusions);
    }

    query
}

/// Endpoint for one full series record.
pub fn series_endpoint(mal_id: u64) -> String {
    format!("/manga/{}/full", mal_id)
}

/// Extracts the MAL id from `manga-123` or a bare `123`.
pub fn parse_series_id(id: &str) -> Option<u64> {
    id.trim()
        .strip_prefix("manga-")
        .unwrap_or(id.trim())
        .parse()
        .ok()
}
