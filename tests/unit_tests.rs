use chrono::{TimeZone, Utc};
use serde_json::json;
use yomu::prelude::*;
use yomu::query::{build_search, page_for, status_from_upstream, status_to_upstream};
use yomu::registry::GenreRegistry;
use yomu::synth;

fn series_with(native: Option<serde_json::Value>) -> Series {
    Series {
        id: "manga-1".to_string(),
        title: LocalizedText::new().with("jp", "進撃の巨人"),
        description: LocalizedText::new(),
        status: SeriesStatus::Completed,
        year: Some(2009),
        created_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2023, 4, 9, 0, 0, 0).unwrap(),
        tags: vec![Tag {
            id: "action".to_string(),
            name: LocalizedText::new().with("en", "Action"),
        }],
        relationships: vec![Relationship {
            id: "author-1".to_string(),
            kind: RelationshipKind::Author,
            name: Some("Hajime Isayama".to_string()),
            file_name: None,
        }],
        native,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_filter_builder() {
        let filter = SeriesFilterBuilder::default()
            .title("test manga")
            .limit(10u32)
            .include_tags(vec!["action".to_string(), "adventure".to_string()])
            .sort(Sort::new(SortKey::UpdatedAt, SortDirection::Desc))
            .build()
            .unwrap();

        assert_eq!(filter.title.as_deref(), Some("test manga"));
        assert_eq!(filter.limit, Some(10));
        assert_eq!(filter.offset, None);
        assert_eq!(filter.include_tags.len(), 2);
        assert!(filter.exclude_tags.is_empty());
        assert!(matches!(filter.sort, Some(Sort { key: SortKey::UpdatedAt, .. })));
    }

    #[test]
    fn test_series_accessors_without_native() {
        let series = series_with(None);

        assert_eq!(accessors::title(&series.title, "en"), "進撃の巨人");
        assert_eq!(accessors::description(&series.description, "en"), "No description available.");
        assert_eq!(accessors::author(&series), "Hajime Isayama");
        assert_eq!(accessors::rating(&series), None);
        assert_eq!(accessors::cover_art(&series), None);
        assert!(series.has_tag("action"));
    }

    #[test]
    fn test_series_accessors_with_native() {
        let series = series_with(Some(json!({
            "score": 8.55,
            "members": 0,
            "chapters": 141,
            "volumes": 34,
            "authors": [{"name": "Isayama, Hajime"}],
            "images": {"jpg": {"image_url": "https://cdn.example/aot.jpg"}}
        })));

        assert_eq!(accessors::rating(&series), Some(8.55));
        assert_eq!(accessors::member_count(&series), None);
        assert_eq!(accessors::chapter_count(&series), Some(141));
        assert_eq!(accessors::volume_count(&series), Some(34));
        assert_eq!(accessors::author(&series), "Isayama, Hajime");
        assert_eq!(accessors::cover_art(&series), Some("https://cdn.example/aot.jpg"));
    }

    #[test]
    fn test_series_json_shape() {
        let series = series_with(None);
        let value = serde_json::to_value(&series).unwrap();

        assert_eq!(value["status"], "completed");
        assert_eq!(value["relationships"][0]["kind"], "author");
        assert!(value.get("native").is_none());

        let back: Series = serde_json::from_value(value).unwrap();
        assert_eq!(back.title.first(), Some(("jp", "進撃の巨人")));
    }

    #[test]
    fn test_pagination_first_record_index() {
        let cases = [(0, 20, 1), (20, 20, 2), (45, 20, 3), (9, 10, 1), (10, 10, 2)];
        for (offset, limit, page) in cases {
            assert_eq!(page_for(offset, limit), page);
            assert!((page - 1) * limit <= offset);
        }
    }

    #[test]
    fn test_status_round_trip() {
        for status in SeriesStatus::ALL {
            if let Some(value) = status_to_upstream(status) {
                assert_eq!(status_from_upstream(value), status);
            }
        }
        assert_eq!(status_from_upstream("Discontinued"), SeriesStatus::Cancelled);
    }

    #[test]
    fn test_unknown_sort_key_uses_default() {
        let filter = SeriesFilterBuilder::default()
            .sort(Sort::parse("hotness", "asc"))
            .build()
            .unwrap();
        let query = build_search(&filter, &GenreRegistry::default());
        assert!(query.endpoint.ends_with("order_by=popularity&sort=desc"));
    }

    #[test]
    fn test_cover_size_parsing() {
        assert_eq!("256".parse::<CoverSize>().unwrap(), CoverSize::Small);
        assert_eq!("original".parse::<CoverSize>().unwrap(), CoverSize::Original);
        assert!("1024".parse::<CoverSize>().is_err());
    }

    #[test]
    fn test_synthetic_chapters_descend() {
        let listing = synth::chapters(
            "manga-1",
            None,
            &ChapterQuery::default(),
            SynthMode::Random,
            Utc::now(),
        );

        assert!(listing.items.len() <= 20);
        let numbers: Vec<u32> = listing.items.iter().map(|c| c.number.parse().unwrap()).collect();
        assert!(numbers.windows(2).all(|w| w[0] == w[1] + 1));
        assert!(listing.items.iter().all(|c| c.series_id == "manga-1" && c.language == "en"));
    }
}
