use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::cmp::Ordering;
use std::time::Duration;

use crate::{
    accessors,
    config::SynthMode,
    error::{Error, Result},
    query::effective_limit,
    source::Catalog,
    synth,
    types::{
        Chapter, ChapterQuery, Listing, PageSet, Series, SeriesFilter, SortDirection, SortKey, Tag,
    },
};

const RAW_CATALOG: &str = include_str!("fixture_catalog.json");

static CATALOG: Lazy<FixtureData> = Lazy::new(|| {
    serde_json::from_str(RAW_CATALOG).expect("embedded fixture catalog is valid")
});

#[derive(Debug, Clone, Deserialize)]
struct FixtureData {
    tags: Vec<Tag>,
    series: Vec<Series>,
}

/// Offline catalog over a fixed set of series.
///
/// Series order in the document is the popularity rank: ascending popularity
/// is document order. Every filter the live backend cannot express
/// (tag exclusion, any status) is applied here in full.
///
/// # Examples
///
/// ```rust
/// use yomu::prelude::*;
/// use yomu::sources::FixtureCatalog;
///
/// # async fn example() -> yomu::Result<()> {
/// let catalog = FixtureCatalog::new();
/// let found = catalog.list_series(&SeriesFilter::from("one piece")).await?;
/// assert_eq!(found.total, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FixtureCatalog {
    series: Vec<Series>,
    tags: Vec<Tag>,
    latency: Duration,
    synth_mode: SynthMode,
}

impl FixtureCatalog {
    /// The built-in catalog: twelve series, twenty tags.
    pub fn new() -> Self {
        Self::from_parts(CATALOG.series.clone(), CATALOG.tags.clone())
    }

    pub fn from_parts(series: Vec<Series>, tags: Vec<Tag>) -> Self {
        Self {
            series,
            tags,
            latency: Duration::ZERO,
            synth_mode: SynthMode::default(),
        }
    }

    /// Loads a catalog document of the form `{"tags": [...], "series": [...]}`.
    pub fn from_json(document: &str) -> Result<Self> {
        let data: FixtureData = serde_json::from_str(document)?;
        Ok(Self::from_parts(data.series, data.tags))
    }

    /// Sleeps this long before answering, to mimic a network.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_synth_mode(mut self, mode: SynthMode) -> Self {
        self.synth_mode = mode;
        self
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn find(&self, id: &str) -> Result<&Series> {
        self.series
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::not_found(format!("Series with ID '{}'", id)))
    }

    /// Filters, sorts and windows without any latency.
    pub fn select(&self, filter: &SeriesFilter) -> Listing<Series> {
        let needle = filter
            .title
            .as_deref()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());

        let mut matches: Vec<&Series> = self
            .series
            .iter()
            .filter(|s| match &needle {
                Some(needle) => accessors::title(&s.title, "en").to_lowercase().contains(needle),
                None => true,
            })
            .filter(|s| filter.statuses.is_empty() || filter.statuses.contains(&s.status))
            .filter(|s| {
                filter.include_tags.is_empty() || filter.include_tags.iter().any(|t| s.has_tag(t))
            })
            .filter(|s| !filter.exclude_tags.iter().any(|t| s.has_tag(t)))
            .collect();

        if let Some(sort) = filter.sort {
            matches.sort_by(|a, b| {
                let ordering = compare(a, b, sort.key);
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
            if matches!(sort.key, SortKey::Popularity | SortKey::Rating)
                && sort.direction == SortDirection::Desc
            {
                matches.reverse();
            }
        }

        let total = matches.len() as u32;
        let offset = filter.offset.unwrap_or(0) as usize;
        let limit = effective_limit(filter.limit) as usize;

        let items = matches.into_iter().skip(offset).take(limit).cloned().collect();
        Listing::new(items, total)
    }
}

/// Popularity and rating have no data here; those keys leave document order.
fn compare(a: &Series, b: &Series, key: SortKey) -> Ordering {
    match key {
        SortKey::Title => accessors::title(&a.title, "en").cmp(accessors::title(&b.title, "en")),
        SortKey::Year => a.year.unwrap_or(0).cmp(&b.year.unwrap_or(0)),
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortKey::Popularity | SortKey::Rating => Ordering::Equal,
    }
}

impl Default for FixtureCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Catalog for FixtureCatalog {
    fn id(&self) -> &'static str {
        "fixture"
    }

    fn name(&self) -> &'static str {
        "Offline Catalog"
    }

    async fn list_series(&self, filter: &SeriesFilter) -> Result<Listing<Series>> {
        self.pause().await;
        Ok(self.select(filter))
    }

    async fn get_series(&self, id: &str) -> Result<Series> {
        self.pause().await;
        self.find(id).cloned()
    }

    async fn list_chapters(
        &self,
        series_id: &str,
        query: ChapterQuery,
    ) -> Result<Listing<Chapter>> {
        self.pause().await;
        let series = self.find(series_id)?;
        let known = accessors::chapter_count(series).and_then(|c| u32::try_from(c).ok());
        Ok(synth::chapters(&series.id, known, &query, self.synth_mode, Utc::now()))
    }

    async fn get_pages(&self, chapter_id: &str) -> Result<PageSet> {
        self.pause().await;
        Ok(synth::pages(chapter_id, self.synth_mode))
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.pause().await;
        Ok(self.tags.clone())
    }
}
