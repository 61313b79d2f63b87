//! Synthetic chapters and pages.
//!
//! The metadata upstream has no chapter-level data, so the reader is fed a
//! fabricated run of chapters and placeholder page images. None of this is
//! real content.
//!
//! Randomness is seeded from a stable hash of the series id (chapters) or
//! chapter id (pages) under [`SynthMode::Seeded`], so two fetches of the same
//! chapter agree on its page count. [`SynthMode::Random`] draws fresh numbers
//! every time.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SynthMode;
use crate::query::effective_limit;
use crate::types::{Chapter, ChapterQuery, Listing, Page, PageSet, SortDirection};

/// Longest chapter run ever produced.
pub const MAX_CHAPTERS: u32 = 20;

pub const PAGE_WIDTH: u32 = 800;
pub const PAGE_HEIGHT: u32 = 1200;

/// FNV-1a, stable across platforms and compiler versions.
pub fn stable_seed(id: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    id.bytes().fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}

/// The generator for `id` under `mode`.
pub fn rng_for(id: &str, mode: SynthMode) -> StdRng {
    match mode {
        SynthMode::Seeded => StdRng::seed_from_u64(stable_seed(id)),
        SynthMode::Random => StdRng::from_entropy(),
    }
}

/// Newest-first run of chapters ending at the series' chapter count.
///
/// An unknown (or zero) count is replaced by a random one in `10..60`. At most
/// [`MAX_CHAPTERS`] entries are produced, numbered downward by one from the
/// count, each published one week before the previous.
pub fn chapter_run<R: Rng>(
    series_id: &str,
    known_count: Option<u32>,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Chapter> {
    let count = known_count
        .filter(|&c| c > 0)
        .unwrap_or_else(|| rng.gen_range(10..60));
    let length = count.min(MAX_CHAPTERS);

    (0..length)
        .map(|i| {
            let number = count - i;
            Chapter {
                id: format!("chapter-{}-{}", series_id, number),
                series_id: series_id.to_string(),
                number: number.to_string(),
                title: Some(format!("Chapter {}", number)),
                volume: Some((number / 10 + 1).to_string()),
                pages: rng.gen_range(15..40),
                published_at: now - Duration::weeks(i64::from(i)),
                language: "en".to_string(),
                group: Some("Official Translation".to_string()),
            }
        })
        .collect()
}

/// Orders and windows a chapter run. `total` is the full run length.
pub fn paginate_chapters(mut chapters: Vec<Chapter>, query: &ChapterQuery) -> Listing<Chapter> {
    if query.direction == SortDirection::Asc {
        chapters.reverse();
    }

    let total = chapters.len() as u32;
    let offset = (query.offset.unwrap_or(0) as usize).min(chapters.len());
    let limit = effective_limit(query.limit) as usize;

    let items = chapters.into_iter().skip(offset).take(limit).collect();
    Listing::new(items, total)
}

/// Synthesizes, orders and windows the chapter list for a series.
pub fn chapters(
    series_id: &str,
    known_count: Option<u32>,
    query: &ChapterQuery,
    mode: SynthMode,
    now: DateTime<Utc>,
) -> Listing<Chapter> {
    let mut rng = rng_for(series_id, mode);
    paginate_chapters(chapter_run(series_id, known_count, now, &mut rng), query)
}

/// Placeholder pages for a chapter: `10..30` of them.
pub fn pages(chapter_id: &str, mode: SynthMode) -> PageSet {
    let mut rng = rng_for(chapter_id, mode);
    let count: u32 = rng.gen_range(10..30);

    PageSet {
        chapter_id: chapter_id.to_string(),
        pages: (0..count)
            .map(|index| Page {
                url: format!(
                    "https://picsum.photos/{}/{}?random={}-{}",
                    PAGE_WIDTH,
                    PAGE_HEIGHT,
                    urlencoding::encode(chapter_id),
                    index
                ),
                width: PAGE_WIDTH,
                height: PAGE_HEIGHT,
            })
            .collect(),
    }
}
