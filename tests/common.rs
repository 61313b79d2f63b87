//! Common test utilities and constants
//!
//! Shared functionality used across all test modules: a routed in-memory
//! transport, canned Jikan payloads, and a mock upstream server.
// Common test utilities and constants - all must be public

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use yomu::config::{ClientConfig, ClientConfigBuilder};
use yomu::net::{RawResponse, Transport};

#[allow(dead_code)]
pub const TEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Config with no throttle and a tiny backoff, for tests on a real clock.
///
/// The shorter timeout also gives every client its own connection pool, so
/// no pooled connection outlives the test runtime that opened it.
#[allow(dead_code)]
pub fn fast_config(base_url: &str) -> ClientConfig {
    ClientConfigBuilder::default()
        .base_url(base_url)
        .request_delay(Duration::ZERO)
        .backoff_step(Duration::from_millis(10))
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}

/// A Jikan manga record with the fields the mapper reads.
#[allow(dead_code)]
pub fn manga_record(mal_id: u64, title: &str, chapters: Option<u64>) -> Value {
    json!({
        "mal_id": mal_id,
        "title": title,
        "title_english": title,
        "title_japanese": format!("{} (jp)", title),
        "title_synonyms": [],
        "synopsis": format!("Synopsis of {}.", title),
        "status": "Publishing",
        "published": {"from": "2012-09-24T00:00:00+00:00", "to": null},
        "chapters": chapters,
        "volumes": null,
        "score": 8.5,
        "members": 120000,
        "rank": 40,
        "popularity": 25,
        "genres": [{"mal_id": 1, "name": "Action"}, {"mal_id": 10, "name": "Fantasy"}],
        "themes": [{"mal_id": 58, "name": "Gore"}],
        "demographics": [{"mal_id": 27, "name": "Shounen"}],
        "authors": [{"mal_id": 1, "name": "Author Name"}],
        "images": {"jpg": {
            "image_url": format!("https://cdn.example/{}.jpg", mal_id),
            "small_image_url": format!("https://cdn.example/{}t.jpg", mal_id),
            "large_image_url": format!("https://cdn.example/{}l.jpg", mal_id)
        }}
    })
}

/// A `/manga?...` search envelope.
#[allow(dead_code)]
pub fn search_page(records: Vec<Value>, total: u64) -> Value {
    json!({
        "pagination": {
            "last_visible_page": 1,
            "has_next_page": false,
            "items": {"count": records.len(), "total": total, "per_page": 20}
        },
        "data": records
    })
}

/// A `/genres/manga` envelope.
#[allow(dead_code)]
pub fn genres_page() -> Value {
    json!({"data": [
        {"mal_id": 1, "name": "Action", "count": 14000},
        {"mal_id": 36, "name": "Slice of Life", "count": 5000},
        {"mal_id": 46, "name": "Award Winning", "count": 200}
    ]})
}

/// In-memory transport answering by URL substring.
///
/// Each route holds a queue of responses; the last one repeats once the
/// queue is down to it. Unrouted URLs get a 404.
#[allow(dead_code)]
#[derive(Default)]
pub struct Routes {
    routes: Mutex<Vec<(String, VecDeque<RawResponse>)>>,
    calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl Routes {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues `status`/`body` for URLs containing `pattern`.
    pub fn respond(
        self: &Arc<Self>,
        pattern: &str,
        status: u16,
        body: impl Into<String>,
    ) -> Arc<Self> {
        let response = RawResponse::new(status, body.into());
        {
            let mut routes = self.routes.lock();
            match routes.iter_mut().find(|(p, _)| p == pattern) {
                Some((_, queue)) => queue.push_back(response),
                None => routes.push((pattern.to_string(), VecDeque::from([response]))),
            }
        }
        Arc::clone(self)
    }

    pub fn json(self: &Arc<Self>, pattern: &str, body: &Value) -> Arc<Self> {
        self.respond(pattern, 200, body.to_string())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl Transport for Routes {
    async fn get(&self, url: &str) -> yomu::Result<RawResponse> {
        self.calls.lock().push(url.to_string());

        let mut routes = self.routes.lock();
        let response = routes
            .iter_mut()
            .find(|(pattern, _)| url.contains(pattern.as_str()))
            .and_then(|(_, queue)| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            })
            .unwrap_or_else(|| RawResponse::new(404, r#"{"status": 404}"#));
        Ok(response)
    }
}
