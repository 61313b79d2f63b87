//! Fluent browse builder.
//!
//! A chainable way to assemble a [`SeriesFilter`] against a [`Library`] and
//! run it.
//!
//! # Examples
//!
//! ```rust
//! use yomu::prelude::*;
//!
//! # async fn example() -> yomu::Result<()> {
//! let library = Library::fixture();
//!
//! let page = library
//!     .browse_with()
//!     .title("man")
//!     .status(SeriesStatus::Ongoing)
//!     .exclude_tags(vec!["horror".to_string()])
//!     .sort_by(SortKey::Title, SortDirection::Asc)
//!     .limit(10)
//!     .fetch()
//!     .await;
//!
//! // Or surface the backend error instead of an empty page.
//! let strict = library.browse_with().title("berserk").try_fetch().await?;
//! # Ok(())
//! # }
//! ```

use crate::{
    error::Result,
    source::Library,
    types::{Listing, Series, SeriesFilter, SeriesStatus, Sort, SortDirection, SortKey},
};

/// Builds a [`SeriesFilter`] step by step and executes it.
///
/// # Execution
///
/// - [`fetch()`](BrowseBuilder::fetch) - the listing, empty on failure
/// - [`try_fetch()`](BrowseBuilder::try_fetch) - the backend's own `Result`
/// - [`build()`](BrowseBuilder::build) - just the filter
pub struct BrowseBuilder<'a> {
    library: &'a Library,
    filter: SeriesFilter,
}

impl<'a> BrowseBuilder<'a> {
    /// Called by [`Library::browse_with`].
    pub(crate) fn new(library: &'a Library) -> Self {
        Self {
            library,
            filter: SeriesFilter::default(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.filter.title = Some(title.into());
        self
    }

    /// Window size. Zero means the default of 20.
    pub fn limit(mut self, limit: u32) -> Self {
        self.filter.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.filter.offset = Some(offset);
        self
    }

    /// Keeps series carrying any of these tag slugs.
    pub fn include_tags(mut self, tags: Vec<String>) -> Self {
        self.filter.include_tags = tags;
        self
    }

    /// Drops series carrying any of these tag slugs.
    ///
    /// The live backend cannot express this upstream and ignores it.
    pub fn exclude_tags(mut self, tags: Vec<String>) -> Self {
        self.filter.exclude_tags = tags;
        self
    }

    /// Adds one accepted status.
    pub fn status(mut self, status: SeriesStatus) -> Self {
        if !self.filter.statuses.contains(&status) {
            self.filter.statuses.push(status);
        }
        self
    }

    pub fn statuses(mut self, statuses: Vec<SeriesStatus>) -> Self {
        self.filter.statuses = statuses;
        self
    }

    pub fn sort_by(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.filter.sort = Some(Sort::new(key, direction));
        self
    }

    /// Sort from UI strings; an unknown key falls back to the default sort.
    pub fn sort_str(mut self, key: &str, direction: &str) -> Self {
        self.filter.sort = Some(Sort::parse(key, direction));
        self
    }

    pub fn build(self) -> SeriesFilter {
        self.filter
    }

    pub async fn fetch(self) -> Listing<Series> {
        self.library.browse(&self.filter).await
    }

    pub async fn try_fetch(self) -> Result<Listing<Series>> {
        self.library.catalog().list_series(&self.filter).await
    }
}
