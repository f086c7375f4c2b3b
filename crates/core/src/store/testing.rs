//! In-memory store double for exercising the cache pipeline.
//!
//! `FakeStore` serves scripted collections with real cursor pagination and
//! counts every query, so tests can assert how many pages a build issued.
//! Each query crosses a suspension point, which is what lets concurrent
//! callers actually interleave under the cooperative test runtime.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;

use super::{DocumentPage, DocumentStore, PageCursor, RawDocument};
use crate::Error;

#[derive(Default)]
pub struct FakeStore {
    collections: HashMap<String, Vec<RawDocument>>,
    queries: AtomicUsize,
    // Inclusive window of failing query ordinals; 0/0 means disabled.
    fail_start: AtomicUsize,
    fail_end: AtomicUsize,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, name: &str, docs: Vec<RawDocument>) -> Self {
        self.collections.insert(name.to_string(), docs);
        self
    }

    /// Total queries issued across all collections and callers.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Make the next `n` queries fail with a store error.
    pub fn fail_next(&self, n: usize) {
        let now = self.queries();
        self.fail_start.store(now + 1, Ordering::SeqCst);
        self.fail_end.store(now + n, Ordering::SeqCst);
    }

    /// Make only the `k`-th query from now fail (1-based).
    pub fn fail_nth(&self, k: usize) {
        let now = self.queries();
        self.fail_start.store(now + k, Ordering::SeqCst);
        self.fail_end.store(now + k, Ordering::SeqCst);
    }

    /// A well-formed video document.
    pub fn video(slug: &str) -> RawDocument {
        RawDocument {
            name: format!("videos/{slug}"),
            fields: json!({
                "slug": slug,
                "title": format!("Video {slug}"),
                "thumbnails": {"medium": {"url": format!("https://img.example.com/{slug}.jpg")}},
                "durationSeconds": 90,
                "publishedAt": "2021-01-01T00:00:00Z",
                "externalId": format!("yt-{slug}"),
            }),
        }
    }

    /// A well-formed playlist document.
    pub fn playlist(slug: &str) -> RawDocument {
        RawDocument {
            name: format!("playlists/{slug}"),
            fields: json!({"slug": slug, "title": format!("Playlist {slug}")}),
        }
    }
}

#[async_trait]
impl DocumentStore for FakeStore {
    async fn query_page(
        &self, collection: &str, limit: usize, after: Option<&PageCursor>,
    ) -> Result<DocumentPage, Error> {
        let ordinal = self.queries.fetch_add(1, Ordering::SeqCst) + 1;

        // Suspension point, as every real store query has.
        tokio::task::yield_now().await;

        let fail_start = self.fail_start.load(Ordering::SeqCst);
        let fail_end = self.fail_end.load(Ordering::SeqCst);
        if fail_start != 0 && ordinal >= fail_start && ordinal <= fail_end {
            return Err(Error::StoreQuery { collection: collection.to_string(), reason: "injected failure".into() });
        }

        let docs = self.collections.get(collection).map(Vec::as_slice).unwrap_or_default();
        let start = match after {
            Some(cursor) => docs
                .iter()
                .position(|doc| doc.name == cursor.token())
                .map(|index| index + 1)
                .unwrap_or(docs.len()),
            None => 0,
        };

        let page: Vec<RawDocument> = docs[start..].iter().take(limit).cloned().collect();
        let next = page.last().map(|doc| PageCursor::new(doc.name.clone()));

        Ok(DocumentPage { docs: page, next })
    }
}
