//! Document store capability interface.
//!
//! The cache builder only needs cursor-paginated, ordered retrieval from
//! named collections; any store satisfying `DocumentStore` qualifies. The
//! HTTP-backed implementation lives in the client crate, and tests inject
//! an in-memory double.

pub mod timestamp;

#[cfg(test)]
pub mod testing;

pub use timestamp::DocTimestamp;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Opaque continuation token for cursor pagination.
///
/// Produced by a store implementation from the last document of a page and
/// handed back verbatim to resume strictly after it. Nothing outside the
/// implementation interprets the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

/// One decoded document from the store.
///
/// `name` is the store's stable resource identifier; `fields` is the decoded
/// field tree. Collection-specific structure is only interpreted at
/// projection time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub name: String,
    pub fields: serde_json::Value,
}

impl RawDocument {
    /// The document's stable slug, if it carries one.
    ///
    /// Every tracked collection keys its routes off the top-level `slug`
    /// string field.
    pub fn slug(&self) -> Option<&str> {
        self.fields.get("slug").and_then(|value| value.as_str())
    }
}

/// One page of an ordered collection scan.
#[derive(Debug, Clone)]
pub struct DocumentPage {
    /// Documents in the store's natural order, at most the requested limit.
    pub docs: Vec<RawDocument>,
    /// Continuation cursor positioned after the last returned document.
    pub next: Option<PageCursor>,
}

/// Cursor-paginated, ordered access to named document collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one bounded page of `collection`, resuming after `after`.
    async fn query_page(
        &self, collection: &str, limit: usize, after: Option<&PageCursor>,
    ) -> Result<DocumentPage, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slug_present() {
        let doc = RawDocument { name: "videos/a".into(), fields: json!({"slug": "intro", "title": "Intro"}) };
        assert_eq!(doc.slug(), Some("intro"));
    }

    #[test]
    fn test_slug_missing() {
        let doc = RawDocument { name: "videos/a".into(), fields: json!({"title": "Intro"}) };
        assert_eq!(doc.slug(), None);
    }

    #[test]
    fn test_slug_wrong_type() {
        let doc = RawDocument { name: "videos/a".into(), fields: json!({"slug": 7}) };
        assert_eq!(doc.slug(), None);
    }
}
