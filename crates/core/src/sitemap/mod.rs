//! Sitemap and route-list projections over the route cache.
//!
//! Both projections are computed on demand from the populated cache and
//! never persisted. The sitemap always leads with the fixed site-root
//! entry; after it, entries follow the cache's iteration order (the cache
//! itself is unordered).
//!
//! A document that fails to deserialize into the projection shape is
//! skipped and logged rather than aborting the whole sitemap: by the time
//! projection runs the fetch is known complete, so one bad record must not
//! cost the rest of the output.

pub mod structured;
pub mod video;
pub mod xml;

use serde::Serialize;

use crate::Error;
use crate::routes::{CollectionKind, RouteMap};
use crate::store::RawDocument;

pub use video::VideoDoc;

/// Change frequency advertised for the site root.
const ROOT_CHANGEFREQ: &str = "daily";

/// Priority for video detail pages.
const VIDEO_PRIORITY: f32 = 1.0;

/// Priority for category listing pages.
const CATEGORY_PRIORITY: f32 = 0.1;

/// Projection settings for media and player URLs.
#[derive(Debug, Clone)]
pub struct SitemapConfig {
    /// Base URL of the host serving directly hosted video files. When
    /// unset, no content locations are emitted.
    pub media_base_url: Option<String>,
    /// Prefix the external id is appended to for player URLs.
    pub player_base_url: String,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self { media_base_url: None, player_base_url: "https://www.youtube.com/watch?v=".into() }
    }
}

/// One sitemap record, serializable to the video sitemap schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    /// Site-relative URL path.
    pub url: String,

    /// Video extension records; empty for non-video pages.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub video: Vec<VideoRecord>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub changefreq: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
}

/// Video extension fields for one sitemap URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoRecord {
    pub thumbnail_loc: String,
    pub title: String,
    pub description: String,

    /// Direct URL of the hosted video file. Takes precedence over
    /// `player_loc` when the item has a hosted file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_loc: Option<String>,

    /// External player URL, used when no hosted file exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_loc: Option<String>,

    /// Duration in seconds.
    pub duration: u64,

    /// RFC 3339 publication instant.
    pub publication_date: String,
}

impl SitemapEntry {
    /// The fixed site-root entry that leads every sitemap.
    pub fn root() -> Self {
        Self {
            url: "/".into(),
            video: Vec::new(),
            changefreq: Some(ROOT_CHANGEFREQ.into()),
            priority: None,
            lastmod: None,
        }
    }
}

/// Every pre-render route path, site root first.
pub fn route_list(cache: &RouteMap) -> Vec<String> {
    let mut routes = Vec::with_capacity(cache.len() + 1);
    routes.push("/".to_string());
    routes.extend(cache.keys().cloned());
    routes
}

/// Project the cache into sitemap entries, root entry first.
pub fn sitemap_entries(cache: &RouteMap, config: &SitemapConfig) -> Vec<SitemapEntry> {
    let mut entries = Vec::with_capacity(cache.len() + 1);
    entries.push(SitemapEntry::root());

    for (route, doc) in cache {
        match project_route(route, doc, config) {
            Ok(entry) => entries.push(entry),
            Err(err) => tracing::warn!(route = %route, error = %err, "skipping document in sitemap"),
        }
    }

    entries
}

fn project_route(route: &str, doc: &RawDocument, config: &SitemapConfig) -> Result<SitemapEntry, Error> {
    match CollectionKind::for_route(route) {
        Some(CollectionKind::Videos) => video::project_video(route, doc, config),
        Some(CollectionKind::Playlists) => Ok(SitemapEntry {
            url: route.to_string(),
            video: Vec::new(),
            changefreq: None,
            priority: Some(CATEGORY_PRIORITY),
            lastmod: None,
        }),
        None => Err(Error::MalformedDocument {
            route: route.to_string(),
            reason: "route key has no tracked collection prefix".into(),
        }),
    }
}
