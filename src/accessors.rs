//! Total field accessors over the data model.
//!
//! Nothing here fails. Each function resolves a locale-ambiguous or optional
//! field to one display value, reading the native upstream payload first and
//! the typed model second, and ending at a fixed default.
//!
//! # Examples
//!
//! ```rust
//! use yomu::accessors;
//! use yomu::types::LocalizedText;
//!
//! let title = LocalizedText::new().with("jp", "ベルセルク");
//! assert_eq!(accessors::title(&title, "en"), "ベルセルク");
//! assert_eq!(accessors::title(&LocalizedText::new(), "en"), "Unknown Title");
//! ```

use serde_json::Value;

use crate::net::json;
use crate::types::{CoverSize, LocalizedText, RelationshipKind, Series};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Requested language, then `en`, then the first entry, then `default`.
/// Empty strings count as missing.
pub fn localized<'a>(text: &'a LocalizedText, lang: &str, default: &'a str) -> &'a str {
    let present = |s: &&str| !s.trim().is_empty();
    text.get(lang)
        .filter(present)
        .or_else(|| text.get("en").filter(present))
        .or_else(|| text.iter().map(|(_, t)| t).find(present))
        .unwrap_or(default)
}

pub fn title<'a>(text: &'a LocalizedText, lang: &str) -> &'a str {
    localized(text, lang, UNKNOWN_TITLE)
}

pub fn description<'a>(text: &'a LocalizedText, lang: &str) -> &'a str {
    localized(text, lang, NO_DESCRIPTION)
}

fn native(series: &Series) -> Option<&Value> {
    series.native.as_ref()
}

/// Positive numbers only; the upstream uses `0`/`null` for "not rated".
fn positive_f64(series: &Series, path: &str) -> Option<f64> {
    native(series)
        .and_then(|n| json::extract_f64(n, path))
        .filter(|v| *v > 0.0)
}

fn positive_u64(series: &Series, path: &str) -> Option<u64> {
    native(series)
        .and_then(|n| json::extract_u64(n, path))
        .filter(|v| *v > 0)
}

pub fn rating(series: &Series) -> Option<f64> {
    positive_f64(series, "score")
}

pub fn member_count(series: &Series) -> Option<u64> {
    positive_u64(series, "members")
}

pub fn chapter_count(series: &Series) -> Option<u64> {
    positive_u64(series, "chapters")
}

pub fn volume_count(series: &Series) -> Option<u64> {
    positive_u64(series, "volumes")
}

pub fn rank(series: &Series) -> Option<u64> {
    positive_u64(series, "rank")
}

pub fn popularity(series: &Series) -> Option<u64> {
    positive_u64(series, "popularity")
}

/// Every author name the native payload lists.
pub fn authors(series: &Series) -> Vec<String> {
    native(series)
        .map(|n| {
            json::extract_array(n, "authors")
                .iter()
                .filter_map(|a| json::extract_str(a, "name"))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Native synonyms plus the Japanese title.
pub fn alternate_titles(series: &Series) -> Vec<String> {
    let Some(native) = native(series) else {
        return Vec::new();
    };

    let mut titles: Vec<String> = json::extract_array(native, "title_synonyms")
        .iter()
        .filter_map(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .collect();

    if let Some(japanese) = json::extract_str(native, "title_japanese") {
        if !titles.iter().any(|t| t == japanese) {
            titles.push(japanese.to_string());
        }
    }
    titles
}

/// First native author, then the author relationship, then a default.
pub fn author(series: &Series) -> &str {
    native(series)
        .and_then(|n| json::extract_str(n, "authors.0.name"))
        .or_else(|| {
            series
                .relationship(RelationshipKind::Author)
                .and_then(|rel| rel.name.as_deref())
                .filter(|name| !name.trim().is_empty())
        })
        .unwrap_or(UNKNOWN_AUTHOR)
}

/// Native cover image, then the cover-art relationship's file name.
pub fn cover_art(series: &Series) -> Option<&str> {
    native(series)
        .and_then(|n| json::extract_str(n, "images.jpg.image_url"))
        .or_else(|| {
            series
                .relationship(RelationshipKind::CoverArt)
                .and_then(|rel| rel.file_name.as_deref())
                .filter(|name| !name.trim().is_empty())
        })
}

/// Picks the image variant for `size` from a native record's `images.jpg`.
pub fn native_cover(record: &Value, size: CoverSize) -> Option<String> {
    let preferred = match size {
        CoverSize::Small => "images.jpg.small_image_url",
        CoverSize::Medium => "images.jpg.image_url",
        CoverSize::Original => "images.jpg.large_image_url",
    };
    json::extract_str(record, preferred)
        .or_else(|| json::extract_str(record, "images.jpg.image_url"))
        .map(str::to_string)
}

/// Deterministic placeholder cover keyed by series id and size class.
///
/// ```rust
/// use yomu::accessors::placeholder_cover;
/// use yomu::types::CoverSize;
///
/// assert_eq!(
///     placeholder_cover("manga-2", CoverSize::Small),
///     "https://picsum.photos/256/341?random=2"
/// );
/// ```
pub fn placeholder_cover(series_id: &str, size: CoverSize) -> String {
    let seed = series_id.strip_prefix("manga-").unwrap_or(series_id);
    format!(
        "https://picsum.photos/{}?random={}",
        size.dimensions(),
        urlencoding::encode(seed)
    )
}

/// Cover resolution without a cached record: the file name if one is given,
/// else the placeholder.
pub fn cover_url_from(series_id: &str, file_name: Option<&str>, size: CoverSize) -> String {
    file_name
        .filter(|f| !f.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| placeholder_cover(series_id, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Relationship, SeriesStatus};
    use chrono::Utc;
    use serde_json::json;

    fn series(native: Option<Value>, relationships: Vec<Relationship>) -> Series {
        Series {
            id: "manga-2".to_string(),
            title: LocalizedText::new().with("en", "Berserk"),
            description: LocalizedText::new().with("en", "Guts."),
            status: SeriesStatus::Ongoing,
            year: Some(1989),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            tags: vec![],
            relationships,
            native,
        }
    }

    fn author_rel(name: &str) -> Relationship {
        Relationship {
            id: "author-2".to_string(),
            kind: RelationshipKind::Author,
            name: Some(name.to_string()),
            file_name: None,
        }
    }

    #[test]
    fn test_title_fallback_chain() {
        let text = LocalizedText::new().with("jp", "X");
        assert_eq!(title(&text, "en"), "X");

        let text = LocalizedText::new().with("jp", "X").with("en", "Y");
        assert_eq!(title(&text, "fr"), "Y");
        assert_eq!(title(&text, "jp"), "X");

        assert_eq!(title(&LocalizedText::new(), "en"), UNKNOWN_TITLE);
        assert_eq!(description(&LocalizedText::new(), "en"), NO_DESCRIPTION);
    }

    #[test]
    fn test_blank_entries_are_skipped() {
        let text = LocalizedText::new().with("en", "").with("jp", "X");
        assert_eq!(title(&text, "en"), "X");
    }

    #[test]
    fn test_native_counts() {
        let s = series(
            Some(json!({
                "score": 9.47,
                "members": 700000,
                "chapters": null,
                "volumes": 0,
                "rank": 1
            })),
            vec![],
        );
        assert_eq!(rating(&s), Some(9.47));
        assert_eq!(member_count(&s), Some(700000));
        assert_eq!(chapter_count(&s), None);
        assert_eq!(volume_count(&s), None);
        assert_eq!(rank(&s), Some(1));
        assert_eq!(popularity(&s), None);

        assert_eq!(rating(&series(None, vec![])), None);
    }

    #[test]
    fn test_author_chain() {
        let native = json!({"authors": [{"name": "Miura, Kentarou"}, {"name": "Studio Gaga"}]});
        let s = series(Some(native), vec![author_rel("Someone Else")]);
        assert_eq!(author(&s), "Miura, Kentarou");
        assert_eq!(authors(&s), vec!["Miura, Kentarou", "Studio Gaga"]);

        let s = series(Some(json!({"authors": []})), vec![author_rel("Oda Eiichiro")]);
        assert_eq!(author(&s), "Oda Eiichiro");

        let s = series(None, vec![]);
        assert_eq!(author(&s), UNKNOWN_AUTHOR);
        assert!(authors(&s).is_empty());
    }

    #[test]
    fn test_cover_art_chain() {
        let s = series(
            Some(json!({"images": {"jpg": {"image_url": "https://cdn/x.jpg"}}})),
            vec![],
        );
        assert_eq!(cover_art(&s), Some("https://cdn/x.jpg"));

        let rel = Relationship {
            id: "cover-2".to_string(),
            kind: RelationshipKind::CoverArt,
            name: None,
            file_name: Some("berserk.jpg".to_string()),
        };
        assert_eq!(cover_art(&series(None, vec![rel])), Some("berserk.jpg"));
        assert_eq!(cover_art(&series(None, vec![])), None);
    }

    #[test]
    fn test_alternate_titles() {
        let s = series(
            Some(json!({
                "title_synonyms": ["Berserk: The Prototype", ""],
                "title_japanese": "ベルセルク"
            })),
            vec![],
        );
        assert_eq!(alternate_titles(&s), vec!["Berserk: The Prototype", "ベルセルク"]);
    }

    #[test]
    fn test_native_cover_sizes() {
        let record = json!({"images": {"jpg": {
            "image_url": "https://cdn/m.jpg",
            "small_image_url": "https://cdn/s.jpg",
            "large_image_url": null
        }}});
        assert_eq!(native_cover(&record, CoverSize::Small).as_deref(), Some("https://cdn/s.jpg"));
        assert_eq!(native_cover(&record, CoverSize::Medium).as_deref(), Some("https://cdn/m.jpg"));
        assert_eq!(
            native_cover(&record, CoverSize::Original).as_deref(),
            Some("https://cdn/m.jpg")
        );
        assert_eq!(native_cover(&json!({}), CoverSize::Original), None);
    }

    #[test]
    fn test_cover_url_without_cache() {
        assert_eq!(cover_url_from("manga-7", Some("naruto.jpg"), CoverSize::Small), "naruto.jpg");
        assert_eq!(
            cover_url_from("manga-7", Some(""), CoverSize::Original),
            "https://picsum.photos/600/800?random=7"
        );
        assert_eq!(
            cover_url_from("manga-7", None, CoverSize::Medium),
            "https://picsum.photos/512/683?random=7"
        );
    }
}
