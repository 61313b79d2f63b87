//! # Yomu - typed manga catalog client
//!
//! Yomu is an async client for browsing manga metadata. It talks to the
//! public Jikan v4 API (MyAnimeList data), normalizes its records into one
//! typed model, and synthesizes the chapter and page data the metadata API
//! does not have, so a reader UI always has something to show.
//!
//! ## Features
//!
//! - **One Catalog Trait**: live and offline backends behind the same interface
//! - **Never-Failing Browse**: list queries collapse upstream failures into empty pages
//! - **Response Caching**: per-client, time-bounded, keyed by endpoint
//! - **Rate Limiting**: a fixed throttle plus linear backoff on HTTP 429
//! - **Fluent Builder Pattern**: chain browse criteria and fetch
//! - **Total Accessors**: every optional field resolves to a display value
//! - **Deterministic Synthesis**: the same chapter always has the same pages
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use yomu::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> yomu::Result<()> {
//!     let library = Library::jikan();
//!
//!     let results = library
//!         .browse_with()
//!         .title("vinland saga")
//!         .limit(5)
//!         .fetch()
//!         .await;
//!
//!     for series in &results.items {
//!         println!(
//!             "{} by {} ({})",
//!             accessors::title(&series.title, "en"),
//!             accessors::author(series),
//!             series.status,
//!         );
//!     }
//!
//!     if let Some(first) = results.items.first() {
//!         let chapters = library.chapters(&first.id, ChapterQuery::default()).await;
//!         println!("{} chapters", chapters.total);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Offline Use
//!
//! ```rust
//! use yomu::prelude::*;
//!
//! # async fn example() {
//! let library = Library::fixture();
//! let home = library.home().await;
//! assert_eq!(home.trending.items.len(), 10);
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`source`]: the [`Catalog`] trait and the [`Library`] façade
//! - [`sources`]: the Jikan and fixture backends
//! - [`search`]: the fluent browse builder
//! - [`net`]: transport, response cache, throttle and retry
//! - [`query`]: filter → upstream endpoint translation
//! - [`registry`]: genre id ↔ tag slug table
//! - [`synth`]: synthetic chapters and pages
//! - [`accessors`]: total field accessors
//! - [`types`]: the data model
//! - [`config`]: client configuration
//! - [`error`]: error handling

pub mod accessors;
pub mod config;
pub mod error;
pub mod net;
pub mod query;
pub mod registry;
pub mod search;
pub mod source;
pub mod sources;
pub mod synth;
pub mod types;

/// Prelude module for convenient imports.
///
/// ```rust
/// use yomu::prelude::*;
///
/// // Library, Catalog, BrowseBuilder, the model types, the filter builder
/// // and the accessors module are now in scope.
/// let filter = SeriesFilter::from("berserk");
/// assert_eq!(filter.title.as_deref(), Some("berserk"));
/// ```
pub mod prelude {
    pub use crate::{
        accessors,
        config::{ClientConfig, ClientConfigBuilder, SynthMode},
        search::BrowseBuilder,
        source::{Backend, Catalog, HomeFeed, Library},
        types::{
            Chapter, ChapterQuery, CoverSize, Listing, LocalizedText, Page, PageSet, Relationship,
            RelationshipKind, Series, SeriesFilter, SeriesFilterBuilder, SeriesStatus, Sort,
            SortDirection, SortKey, Tag,
        },
    };
}

// Re-export main types at crate root for direct access
pub use error::{Error, Result};
pub use search::BrowseBuilder;
pub use source::{Backend, Catalog, HomeFeed, Library};
pub use types::{Chapter, ChapterQuery, Listing, PageSet, Series, SeriesFilter, Tag};
