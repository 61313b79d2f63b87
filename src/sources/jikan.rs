use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    accessors,
    config::ClientConfig,
    error::{Error, Result},
    net::{HttpClient, ReqwestTransport, Transport, json},
    query::{self, GENRES_ENDPOINT},
    registry::GenreRegistry,
    source::Catalog,
    synth,
    types::{
        Chapter, ChapterQuery, CoverSize, Listing, LocalizedText, PageSet, Relationship,
        RelationshipKind, Series, SeriesFilter, Tag,
    },
};

/// Jikan manga record, only the fields the typed model needs.
///
/// Everything else is kept verbatim in [`Series::native`].
#[derive(Debug, Deserialize)]
struct JikanManga {
    mal_id: u64,
    title: Option<String>,
    title_english: Option<String>,
    title_japanese: Option<String>,
    synopsis: Option<String>,
    status: Option<String>,
    published: Option<JikanPublished>,
    genres: Option<Vec<JikanNamed>>,
    themes: Option<Vec<JikanNamed>>,
    demographics: Option<Vec<JikanNamed>>,
    authors: Option<Vec<JikanNamed>>,
    images: Option<JikanImages>,
}

#[derive(Debug, Deserialize)]
struct JikanPublished {
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
}

/// Genre, theme, demographic or author reference.
#[derive(Debug, Deserialize)]
struct JikanNamed {
    mal_id: Option<u32>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JikanImages {
    jpg: Option<JikanImageSet>,
}

#[derive(Debug, Deserialize)]
struct JikanImageSet {
    image_url: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl JikanManga {
    fn into_series(self, raw: &Value, registry: &GenreRegistry, now: DateTime<Utc>) -> Series {
        let mal_id = self.mal_id;
        let fallback_title = non_blank(self.title);

        let mut title = LocalizedText::new();
        if let Some(en) = non_blank(self.title_english).or_else(|| fallback_title.clone()) {
            title.insert("en", en);
        }
        if let Some(jp) = non_blank(self.title_japanese).or_else(|| fallback_title.clone()) {
            title.insert("jp", jp);
        }
        if title.is_empty() {
            title.insert("en", accessors::UNKNOWN_TITLE);
        }

        let description = LocalizedText::new().with(
            "en",
            non_blank(self.synopsis).unwrap_or_else(|| accessors::NO_DESCRIPTION.to_string()),
        );

        let (from, to) = self
            .published
            .map(|p| (p.from, p.to))
            .unwrap_or((None, None));

        let tags = self
            .genres
            .into_iter()
            .chain(self.themes)
            .chain(self.demographics)
            .flatten()
            .filter_map(|genre| {
                let name = non_blank(genre.name)?;
                let id = match genre.mal_id {
                    Some(mal_id) => registry.tag_id(mal_id, &name),
                    None => crate::registry::slugify(&name),
                };
                Some(Tag {
                    id,
                    name: LocalizedText::new().with("en", name),
                })
            })
            .collect();

        let author = self
            .authors
            .and_then(|authors| authors.into_iter().next())
            .and_then(|author| non_blank(author.name))
            .unwrap_or_else(|| accessors::UNKNOWN_AUTHOR.to_string());

        let cover = self
            .images
            .and_then(|images| images.jpg)
            .and_then(|jpg| jpg.image_url)
            .unwrap_or_default();

        Series {
            id: format!("manga-{}", mal_id),
            title,
            description,
            status: query::status_from_upstream(self.status.as_deref().unwrap_or_default()),
            year: from.map(|d| d.year()),
            created_at: from.unwrap_or(now),
            updated_at: to.unwrap_or(now),
            tags,
            relationships: vec![
                Relationship {
                    id: format!("author-{}", mal_id),
                    kind: RelationshipKind::Author,
                    name: Some(author),
                    file_name: None,
                },
                Relationship {
                    id: format!("cover-{}", mal_id),
                    kind: RelationshipKind::CoverArt,
                    name: None,
                    file_name: Some(cover),
                },
            ],
            native: Some(raw.clone()),
        }
    }
}

/// Maps one raw upstream record into a [`Series`].
pub fn map_record(raw: &Value, registry: &GenreRegistry, now: DateTime<Utc>) -> Result<Series> {
    let manga = JikanManga::deserialize(raw)?;
    Ok(manga.into_series(raw, registry, now))
}

/// Catalog backed by the public Jikan v4 API (MyAnimeList data).
///
/// Series metadata is live. Chapters and pages are synthesized, since Jikan
/// has no chapter-level data; a series' published chapter count, when known,
/// anchors the synthetic run.
///
/// # Features
///
/// - Title, status and genre filtering translated to Jikan's query vocabulary
/// - Per-client response cache (5 minutes by default)
/// - One request per second, linear backoff on 429
/// - Genre list with a built-in fallback when the upstream is unavailable
/// - Covers resolved from any cached record before falling back to placeholders
///
/// # Examples
///
/// ```rust,no_run
/// use yomu::prelude::*;
/// use yomu::sources::JikanCatalog;
///
/// # async fn example() -> yomu::Result<()> {
/// let catalog = JikanCatalog::new();
///
/// let filter = SeriesFilterBuilder::default()
///     .title("berserk")
///     .limit(5u32)
///     .build()
///     .unwrap();
/// let results = catalog.list_series(&filter).await?;
///
/// if let Some(series) = results.items.first() {
///     let chapters = catalog.list_chapters(&series.id, ChapterQuery::default()).await?;
///     println!("{} chapters", chapters.total);
/// }
/// # Ok(())
/// # }
/// ```
pub struct JikanCatalog {
    client: HttpClient,
    registry: GenreRegistry,
}

impl JikanCatalog {
    /// Default configuration over the shared HTTP client.
    pub fn new() -> Self {
        Self::with_transport(ClientConfig::default(), Arc::new(ReqwestTransport::shared()))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_client(HttpClient::new(config)?))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self::from_client(HttpClient::with_transport(config, transport))
    }

    fn from_client(client: HttpClient) -> Self {
        Self {
            client,
            registry: GenreRegistry::default(),
        }
    }

    /// Replaces the built-in genre table.
    pub fn with_registry(mut self, registry: GenreRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn http(&self) -> &HttpClient {
        &self.client
    }

    pub fn registry(&self) -> &GenreRegistry {
        &self.registry
    }

    fn cached_cover(&self, series_id: &str, size: CoverSize) -> Option<String> {
        let mal_id = query::parse_series_id(series_id)?;
        let record = self
            .client
            .cache()
            .find_record(|r| r.get("mal_id").and_then(Value::as_u64) == Some(mal_id))?;
        accessors::native_cover(&record, size)
    }
}

impl Default for JikanCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Catalog for JikanCatalog {
    fn id(&self) -> &'static str {
        "jikan"
    }

    fn name(&self) -> &'static str {
        "Jikan (MyAnimeList)"
    }

    async fn list_series(&self, filter: &SeriesFilter) -> Result<Listing<Series>> {
        let query = query::build_search(filter, &self.registry);
        let payload = self.client.get_value(&query.endpoint).await?;

        let records = payload
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::parse("search response has no data array"))?;

        let now = Utc::now();
        let items: Vec<Series> = records
            .iter()
            .filter_map(|raw| match map_record(raw, &self.registry, now) {
                Ok(series) => Some(series),
                Err(e) => {
                    warn!("skipping unreadable record: {}", e);
                    None
                }
            })
            .collect();

        let total = json::extract_u64(&payload, "pagination.items.total")
            .and_then(|t| u32::try_from(t).ok())
            .unwrap_or(items.len() as u32);

        debug!("{} -> {} of {}", query.endpoint, items.len(), total);
        Ok(Listing::new(items, total))
    }

    async fn get_series(&self, id: &str) -> Result<Series> {
        let mal_id = query::parse_series_id(id)
            .ok_or_else(|| Error::not_found(format!("Series with ID '{}'", id)))?;

        let payload = match self.client.get_value(&query::series_endpoint(mal_id)).await {
            Err(Error::Upstream { status: 404 }) => {
                return Err(Error::not_found(format!("Series with ID '{}'", id)));
            }
            other => other?,
        };

        let raw = payload
            .get("data")
            .filter(|d| d.is_object())
            .ok_or_else(|| Error::parse(format!("series {} response has no data", mal_id)))?;
        map_record(raw, &self.registry, Utc::now())
    }

    async fn list_chapters(
        &self,
        series_id: &str,
        query: ChapterQuery,
    ) -> Result<Listing<Chapter>> {
        let series = self.get_series(series_id).await?;
        let known = accessors::chapter_count(&series).and_then(|c| u32::try_from(c).ok());

        Ok(synth::chapters(
            &series.id,
            known,
            &query,
            self.client.config().synth_mode,
            Utc::now(),
        ))
    }

    async fn get_pages(&self, chapter_id: &str) -> Result<PageSet> {
        Ok(synth::pages(chapter_id, self.client.config().synth_mode))
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        let payload = match self.client.get_value(GENRES_ENDPOINT).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!("genre list unavailable, using built-in table: {}", e);
                return Ok(self.registry.tags());
            }
        };

        let tags: Vec<Tag> = json::extract_array(&payload, "data")
            .iter()
            .filter_map(|genre| {
                let name = json::extract_str(genre, "name")?;
                let mal_id = json::extract_u64(genre, "mal_id")
                    .and_then(|id| u32::try_from(id).ok());
                let id = match mal_id {
                    Some(mal_id) => self.registry.tag_id(mal_id, name),
                    None => crate::registry::slugify(name),
                };
                Some(Tag {
                    id,
                    name: LocalizedText::new().with("en", name),
                })
            })
            .collect();

        if tags.is_empty() {
            warn!("genre list was empty, using built-in table");
            return Ok(self.registry.tags());
        }
        Ok(tags)
    }

    fn cover_url(&self, series_id: &str, file_name: Option<&str>, size: CoverSize) -> String {
        self.cached_cover(series_id, size)
            .unwrap_or_else(|| accessors::cover_url_from(series_id, file_name, size))
    }
}
