//! Catalog trait and the library façade the view layer talks to.
//!
//! This module defines the core [`Catalog`] trait every backend implements,
//! and [`Library`], which wraps one catalog and adds the convenience queries
//! a browsing UI needs (trending, recently updated, the home feed).
//!
//! Backends report failures as [`Result`]s. `Library` is the single place
//! where list failures collapse into empty listings: a broken upstream makes
//! a browse page empty, never an error screen.
//!
//! # Examples
//!
//! ```rust
//! use yomu::prelude::*;
//!
//! # async fn example() -> yomu::Result<()> {
//! let library = Library::fixture();
//!
//! let home = library.home().await;
//! println!("{} trending", home.trending.items.len());
//!
//! let series = library.series("manga-2").await?;
//! let chapters = library.chapters(&series.id, ChapterQuery::default()).await;
//! if let Some(latest) = chapters.items.first() {
//!     let pages = library.pages(&latest.id).await?;
//!     println!("{} pages", pages.pages.len());
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use log::warn;

#[cfg(feature = "backend-jikan")]
use crate::config::ClientConfig;
use crate::{
    accessors,
    error::Result,
    search::BrowseBuilder,
    types::{
        Chapter, ChapterQuery, CoverSize, Listing, PageSet, Series, SeriesFilter, SeriesStatus,
        Sort, SortDirection, SortKey, Tag,
    },
};

/// Trait that every catalog backend implements.
///
/// # Required Methods
///
/// * [`id()`](Catalog::id) - Unique identifier for the backend
/// * [`name()`](Catalog::name) - Human-readable name
/// * [`list_series()`](Catalog::list_series) - Filtered, sorted, windowed series
/// * [`get_series()`](Catalog::get_series) - One series by id
/// * [`list_chapters()`](Catalog::list_chapters) - Chapter list of a series
/// * [`get_pages()`](Catalog::get_pages) - Page images of a chapter
/// * [`list_tags()`](Catalog::list_tags) - Tag vocabulary
///
/// [`cover_url()`](Catalog::cover_url) has a default that needs no network.
///
/// # Examples
///
/// ```rust
/// use yomu::prelude::*;
/// use async_trait::async_trait;
///
/// struct Empty;
///
/// #[async_trait]
/// impl Catalog for Empty {
///     fn id(&self) -> &'static str { "empty" }
///     fn name(&self) -> &'static str { "Empty" }
///
///     async fn list_series(&self, _filter: &SeriesFilter) -> yomu::Result<Listing<Series>> {
///         Ok(Listing::empty())
///     }
///
///     async fn get_series(&self, id: &str) -> yomu::Result<Series> {
///         Err(yomu::Error::not_found(id))
///     }
///
///     async fn list_chapters(
///         &self,
///         _series_id: &str,
///         _query: ChapterQuery,
///     ) -> yomu::Result<Listing<Chapter>> {
///         Ok(Listing::empty())
///     }
///
///     async fn get_pages(&self, chapter_id: &str) -> yomu::Result<PageSet> {
///         Err(yomu::Error::not_found(chapter_id))
///     }
///
///     async fn list_tags(&self) -> yomu::Result<Vec<Tag>> {
///         Ok(vec![])
///     }
/// }
///
/// let library = Library::new(Box::new(Empty));
/// assert_eq!(library.catalog().id(), "empty");
/// ```
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Lowercase identifier, e.g. `jikan`.
    fn id(&self) -> &'static str;

    fn name(&self) -> &'static str;

    /// Series matching `filter`, windowed by its `limit`/`offset`.
    ///
    /// `total` is the number of matches across all windows when the backend
    /// knows it.
    async fn list_series(&self, filter: &SeriesFilter) -> Result<Listing<Series>>;

    /// One series by id.
    ///
    /// # Errors
    ///
    /// * [`Error::NotFound`](crate::Error::NotFound) - no such series, or an id
    ///   the backend cannot interpret
    async fn get_series(&self, id: &str) -> Result<Series>;

    /// Chapter list of a series, ordered and windowed by `query`.
    async fn list_chapters(&self, series_id: &str, query: ChapterQuery) -> Result<Listing<Chapter>>;

    /// Pages of a chapter in reading order.
    async fn get_pages(&self, chapter_id: &str) -> Result<PageSet>;

    /// Every tag the backend can filter on.
    async fn list_tags(&self) -> Result<Vec<Tag>>;

    /// Cover image URL for a series.
    ///
    /// The default uses `file_name` when it is non-empty and a deterministic
    /// placeholder otherwise.
    fn cover_url(&self, series_id: &str, file_name: Option<&str>, size: CoverSize) -> String {
        accessors::cover_url_from(series_id, file_name, size)
    }
}

/// Which backend a [`Library`] is built over.
#[derive(Debug, Clone)]
pub enum Backend {
    /// The live Jikan API.
    #[cfg(feature = "backend-jikan")]
    Jikan(ClientConfig),
    /// The built-in offline catalog.
    #[cfg(feature = "backend-fixture")]
    Fixture,
}

/// The four rows of the home page.
#[derive(Debug, Clone, Default)]
pub struct HomeFeed {
    pub trending: Listing<Series>,
    pub recently_updated: Listing<Series>,
    pub ongoing: Listing<Series>,
    pub newly_added: Listing<Series>,
}

/// Client-facing façade over one [`Catalog`].
///
/// List-shaped queries ([`browse`](Library::browse), the convenience rows,
/// [`chapters`](Library::chapters), [`tags`](Library::tags)) never fail; the
/// error is logged and an empty result returned. Single-record lookups
/// ([`series`](Library::series), [`pages`](Library::pages)) propagate errors.
pub struct Library {
    catalog: Box<dyn Catalog>,
}

impl Library {
    /// Wraps a catalog.
    ///
    /// # Parameters
    ///
    /// * `catalog` - any [`Catalog`] implementation
    ///
    /// # Examples
    ///
    /// ```
    /// use yomu::Library;
    /// use yomu::sources::FixtureCatalog;
    ///
    /// let library = Library::new(Box::new(FixtureCatalog::new()));
    /// assert_eq!(library.catalog().id(), "fixture");
    /// ```
    pub fn new(catalog: Box<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// Builds the library for `backend`.
    ///
    /// # Errors
    ///
    /// * [`Error::Transport`](crate::Error::Transport) - the HTTP client for a
    ///   non-default Jikan configuration could not be built
    pub fn from_backend(backend: Backend) -> Result<Self> {
        let catalog: Box<dyn Catalog> = match backend {
            #[cfg(feature = "backend-jikan")]
            Backend::Jikan(config) => Box::new(crate::sources::JikanCatalog::with_config(config)?),
            #[cfg(feature = "backend-fixture")]
            Backend::Fixture => Box::new(crate::sources::FixtureCatalog::new()),
        };
        Ok(Self::new(catalog))
    }

    /// A library over the live Jikan API with the default configuration.
    #[cfg(feature = "backend-jikan")]
    pub fn jikan() -> Self {
        Self::new(Box::new(crate::sources::JikanCatalog::new()))
    }

    /// A library over the built-in offline catalog.
    #[cfg(feature = "backend-fixture")]
    pub fn fixture() -> Self {
        Self::new(Box::new(crate::sources::FixtureCatalog::new()))
    }

    /// The wrapped catalog, for calls that should surface errors.
    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    /// Series matching `filter`; empty on any failure.
    pub async fn browse(&self, filter: &SeriesFilter) -> Listing<Series> {
        match self.catalog.list_series(filter).await {
            Ok(listing) => listing,
            Err(e) => {
                warn!("{}: browse failed: {}", self.catalog.id(), e);
                Listing::empty()
            }
        }
    }

    /// Starts a fluent browse.
    ///
    /// ```rust
    /// use yomu::prelude::*;
    ///
    /// # async fn example() {
    /// let library = Library::fixture();
    /// let horror = library
    ///     .browse_with()
    ///     .include_tags(vec!["horror".to_string()])
    ///     .sort_by(SortKey::Year, SortDirection::Desc)
    ///     .limit(5)
    ///     .fetch()
    ///     .await;
    /// # }
    /// ```
    pub fn browse_with(&self) -> BrowseBuilder<'_> {
        BrowseBuilder::new(self)
    }

    /// Title search; the remaining criteria come from `filter`.
    pub async fn search(&self, query: &str, filter: SeriesFilter) -> Listing<Series> {
        let filter = SeriesFilter {
            title: Some(query.to_string()),
            ..filter
        };
        self.browse(&filter).await
    }

    /// Most popular first.
    pub async fn trending(&self, limit: u32) -> Listing<Series> {
        self.browse(&row(limit, Sort::new(SortKey::Popularity, SortDirection::Asc), vec![]))
            .await
    }

    /// Most recently updated first.
    pub async fn recently_updated(&self, limit: u32) -> Listing<Series> {
        self.browse(&row(limit, Sort::new(SortKey::UpdatedAt, SortDirection::Desc), vec![]))
            .await
    }

    /// Ongoing series, most popular first.
    pub async fn ongoing(&self, limit: u32) -> Listing<Series> {
        self.browse(&row(
            limit,
            Sort::new(SortKey::Popularity, SortDirection::Asc),
            vec![SeriesStatus::Ongoing],
        ))
        .await
    }

    /// Most recently created first.
    pub async fn newly_added(&self, limit: u32) -> Listing<Series> {
        self.browse(&row(limit, Sort::new(SortKey::CreatedAt, SortDirection::Desc), vec![]))
            .await
    }

    /// Fetches the four home rows concurrently.
    pub async fn home(&self) -> HomeFeed {
        let (trending, recently_updated, ongoing, newly_added) = futures::join!(
            self.trending(10),
            self.recently_updated(20),
            self.ongoing(20),
            self.newly_added(20),
        );

        HomeFeed {
            trending,
            recently_updated,
            ongoing,
            newly_added,
        }
    }

    /// One series by id.
    pub async fn series(&self, id: &str) -> Result<Series> {
        self.catalog.get_series(id).await
    }

    /// Chapter list of a series; empty on any failure.
    pub async fn chapters(&self, series_id: &str, query: ChapterQuery) -> Listing<Chapter> {
        match self.catalog.list_chapters(series_id, query).await {
            Ok(listing) => listing,
            Err(e) => {
                warn!("{}: chapters of {} failed: {}", self.catalog.id(), series_id, e);
                Listing::empty()
            }
        }
    }

    /// Page images of one chapter.
    pub async fn pages(&self, chapter_id: &str) -> Result<PageSet> {
        self.catalog.get_pages(chapter_id).await
    }

    /// Tag vocabulary; empty on any failure.
    pub async fn tags(&self) -> Vec<Tag> {
        self.catalog.list_tags().await.unwrap_or_else(|e| {
            warn!("{}: tags failed: {}", self.catalog.id(), e);
            Vec::new()
        })
    }

    /// Cover image URL for a series.
    ///
    /// # Parameters
    ///
    /// * `series_id` - the series whose cover is wanted
    /// * `file_name` - a cover file name already known to the caller, if any
    /// * `size` - requested rendition
    pub fn cover_url(
        &self,
        series_id: &str,
        file_name: Option<&str>,
        size: CoverSize,
    ) -> String {
        self.catalog.cover_url(series_id, file_name, size)
    }

    /// Cover of an already-loaded series at `size`.
    pub fn cover_for(&self, series: &Series, size: CoverSize) -> String {
        self.cover_url(&series.id, accessors::cover_art(series), size)
    }
}

fn row(limit: u32, sort: Sort, statuses: Vec<SeriesStatus>) -> SeriesFilter {
    SeriesFilter {
        sort: Some(sort),
        limit: Some(limit),
        statuses,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Records every filter it sees and fails on demand.
    #[derive(Default)]
    struct Recording {
        filters: Arc<Mutex<Vec<SeriesFilter>>>,
        fail: bool,
    }

    #[async_trait]
    impl Catalog for Recording {
        fn id(&self) -> &'static str {
            "recording"
        }

        fn name(&self) -> &'static str {
            "Recording"
        }

        async fn list_series(&self, filter: &SeriesFilter) -> Result<Listing<Series>> {
            self.filters.lock().push(filter.clone());
            if self.fail {
                Err(Error::RateLimited)
            } else {
                Ok(Listing::new(vec![], 42))
            }
        }

        async fn get_series(&self, id: &str) -> Result<Series> {
            Err(Error::not_found(id))
        }

        async fn list_chapters(
            &self,
            _series_id: &str,
            _query: ChapterQuery,
        ) -> Result<Listing<Chapter>> {
            Err(Error::Upstream { status: 500 })
        }

        async fn get_pages(&self, chapter_id: &str) -> Result<PageSet> {
            Err(Error::not_found(chapter_id))
        }

        async fn list_tags(&self) -> Result<Vec<Tag>> {
            Err(Error::parse("no tags"))
        }
    }

    #[tokio::test]
    async fn test_browse_collapses_errors() {
        let library = Library::new(Box::new(Recording {
            fail: true,
            ..Default::default()
        }));

        let listing = library.browse(&SeriesFilter::default()).await;
        assert!(listing.is_empty());
        assert_eq!(listing.total, 0);

        assert!(library.chapters("manga-1", ChapterQuery::default()).await.is_empty());
        assert!(library.tags().await.is_empty());
        assert!(matches!(library.series("manga-1").await, Err(Error::NotFound(_))));
        assert!(library.pages("chapter-manga-1-1").await.is_err());
    }

    #[tokio::test]
    async fn test_rows_use_fixed_sorts() {
        let filters = Arc::new(Mutex::new(Vec::new()));
        let library = Library::new(Box::new(Recording {
            filters: Arc::clone(&filters),
            fail: false,
        }));

        assert_eq!(library.trending(10).await.total, 42);
        library.ongoing(20).await;
        library.newly_added(20).await;
        library.recently_updated(20).await;
        library.search("berserk", SeriesFilter::default()).await;

        let filters = filters.lock();
        assert_eq!(filters[0].limit, Some(10));
        assert_eq!(filters[0].sort, Some(Sort::new(SortKey::Popularity, SortDirection::Asc)));
        assert_eq!(filters[1].statuses, vec![SeriesStatus::Ongoing]);
        assert_eq!(filters[1].sort, Some(Sort::new(SortKey::Popularity, SortDirection::Asc)));
        assert_eq!(filters[2].sort, Some(Sort::new(SortKey::CreatedAt, SortDirection::Desc)));
        assert_eq!(filters[3].sort, Some(Sort::new(SortKey::UpdatedAt, SortDirection::Desc)));
        assert_eq!(filters[4].title.as_deref(), Some("berserk"));
    }

    #[tokio::test]
    async fn test_home_issues_four_rows() {
        let filters = Arc::new(Mutex::new(Vec::new()));
        let library = Library::new(Box::new(Recording {
            filters: Arc::clone(&filters),
            fail: false,
        }));

        let home = library.home().await;
        assert_eq!(home.newly_added.total, 42);

        let mut limits: Vec<u32> = filters.lock().iter().filter_map(|f| f.limit).collect();
        limits.sort();
        assert_eq!(limits, vec![10, 20, 20, 20]);
    }

    #[test]
    fn test_default_cover_url() {
        let library = Library::new(Box::new(Recording::default()));
        assert_eq!(
            library.cover_url("manga-12", None, CoverSize::Small),
            "https://picsum.photos/256/341?random=12"
        );
        assert_eq!(library.cover_url("manga-12", Some("csm.jpg"), CoverSize::Small), "csm.jpg");
    }
}
