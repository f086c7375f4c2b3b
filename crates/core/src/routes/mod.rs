//! Process-scoped route cache with single-flight population.
//!
//! The cache maps derived route keys (`/video/{slug}`, `/category/{slug}`)
//! to their source documents, built by exhaustively paginating every
//! tracked collection. Population is expensive, so it runs at most once per
//! process lifetime no matter how many concurrent callers ask for it:
//!
//! - **Empty**: no build has succeeded yet. The first caller becomes the
//!   builder; everyone else queues behind the build permit.
//! - **Building**: the permit is held while one fan-out runs. Queued
//!   callers suspend on the permit, never start a second build.
//! - **Ready**: the populated map is shared via `Arc` and served from
//!   memory for the rest of the process. No TTL, no refresh.
//!
//! A failed build releases the permit with the cache still empty, so the
//! next caller retries from scratch. Failures are never cached.

pub mod downloader;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::Error;
use crate::sitemap::{self, SitemapConfig, SitemapEntry};
use crate::store::{DocumentStore, RawDocument};

/// Tracked source collections and their route prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Videos,
    Playlists,
}

impl CollectionKind {
    /// Every collection the cache tracks.
    pub const ALL: [CollectionKind; 2] = [CollectionKind::Videos, CollectionKind::Playlists];

    /// Name of the backing store collection.
    pub fn collection(self) -> &'static str {
        match self {
            Self::Videos => "videos",
            Self::Playlists => "playlists",
        }
    }

    /// URL path prefix for route keys derived from this collection.
    pub fn route_prefix(self) -> &'static str {
        match self {
            Self::Videos => "/video/",
            Self::Playlists => "/category/",
        }
    }

    /// Resolve a route key back to the collection it was derived from.
    pub fn for_route(route: &str) -> Option<CollectionKind> {
        Self::ALL.into_iter().find(|kind| route.starts_with(kind.route_prefix()))
    }

    /// Derive the route key for a document slug.
    pub fn route_key(self, slug: &str) -> String {
        format!("{}{slug}", self.route_prefix())
    }
}

/// The populated cache: route key to source document.
pub type RouteMap = HashMap<String, RawDocument>;

/// Lazily-populated route cache shared by all sitemap and route-list
/// callers of one process.
///
/// The `Mutex` is the build permit: it is held for the full duration of
/// exactly one fan-out, and afterwards only long enough to clone the
/// shared `Arc`. The map is never mutated after publication.
pub struct RouteCache {
    store: Arc<dyn DocumentStore>,
    page_size: usize,
    state: Mutex<Option<Arc<RouteMap>>>,
}

impl RouteCache {
    pub fn new(store: Arc<dyn DocumentStore>, page_size: usize) -> Self {
        Self { store, page_size, state: Mutex::new(None) }
    }

    /// Return the populated cache, building it on first use.
    ///
    /// Concurrent callers during a build all resolve to the same map once
    /// the in-flight build completes. On build failure the error goes to
    /// the caller that owned the attempt; the cache stays empty and the
    /// next caller triggers a fresh build.
    pub async fn entries(&self) -> Result<Arc<RouteMap>, Error> {
        let mut slot = self.state.lock().await;
        if let Some(map) = slot.as_ref() {
            return Ok(Arc::clone(map));
        }

        let map = Arc::new(self.build().await?);
        *slot = Some(Arc::clone(&map));
        Ok(map)
    }

    /// Every pre-render route path, site root first.
    pub async fn route_list(&self) -> Result<Vec<String>, Error> {
        Ok(sitemap::route_list(&*self.entries().await?))
    }

    /// Sitemap projection of the cache.
    pub async fn sitemap_entries(&self, config: &SitemapConfig) -> Result<Vec<SitemapEntry>, Error> {
        Ok(sitemap::sitemap_entries(&*self.entries().await?, config))
    }

    /// Fan out one pagination chain per tracked collection and merge.
    ///
    /// All chains must succeed; the first failure discards every partial
    /// result by never publishing the map.
    async fn build(&self) -> Result<RouteMap, Error> {
        tracing::info!(collections = CollectionKind::ALL.len(), "building route cache");

        let chains = CollectionKind::ALL
            .map(|kind| downloader::download_collection(self.store.as_ref(), kind, self.page_size));
        let per_collection = futures_util::future::try_join_all(chains)
            .await
            .map_err(|e| Error::Build(Box::new(e)))?;

        let mut map = RouteMap::new();
        for entries in per_collection {
            for (route, doc) in entries {
                map.insert(route, doc);
            }
        }

        tracing::info!(routes = map.len(), "route cache ready");
        Ok(map)
    }
}
