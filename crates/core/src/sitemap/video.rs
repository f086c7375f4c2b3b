//! Typed projection of cached video documents.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

use super::{SitemapConfig, SitemapEntry, VIDEO_PRIORITY, VideoRecord};
use crate::Error;
use crate::store::{DocTimestamp, RawDocument};

/// Characters kept verbatim when percent-encoding a hosted filename
/// (the unreserved set plus the marks browsers leave alone).
const FILENAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// The fields a video document must carry to appear in the sitemap.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDoc {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description_trimmed: Option<String>,
    pub thumbnails: Thumbnails,
    pub duration_seconds: u64,
    pub published_at: DocTimestamp,
    #[serde(default)]
    pub hosted_filename: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub modified_date: Option<DocTimestamp>,
}

#[derive(Debug, Deserialize)]
pub struct Thumbnails {
    pub medium: Thumbnail,
    /// Any further sizes, keyed by size name.
    #[serde(flatten)]
    pub other: BTreeMap<String, Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

impl VideoDoc {
    /// Deserialize the projection shape out of a raw document.
    pub fn from_raw(route: &str, doc: &RawDocument) -> Result<Self, Error> {
        serde_json::from_value(doc.fields.clone())
            .map_err(|e| Error::MalformedDocument { route: route.to_string(), reason: e.to_string() })
    }

    /// Curated description when present and non-empty, else the raw title.
    pub fn description(&self) -> &str {
        match self.description_trimmed.as_deref() {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => &self.title,
        }
    }

    /// Direct content URL, when the item has a hosted file and a media
    /// host is configured.
    pub fn content_url(&self, config: &SitemapConfig) -> Option<String> {
        let base = config.media_base_url.as_deref()?;
        let filename = self.hosted_filename.as_deref()?;
        Some(format!("{}/{}", base.trim_end_matches('/'), utf8_percent_encode(filename, FILENAME_ENCODE_SET)))
    }

    /// External player URL for the item's external id.
    pub fn player_url(&self, config: &SitemapConfig) -> Option<String> {
        self.external_id.as_deref().map(|id| format!("{}{id}", config.player_base_url))
    }
}

/// Project one cached video document into a rich sitemap entry.
///
/// A hosted file wins over the external player; an item with neither is
/// malformed, since the record would advertise nothing playable.
pub(super) fn project_video(route: &str, doc: &RawDocument, config: &SitemapConfig) -> Result<SitemapEntry, Error> {
    let video = VideoDoc::from_raw(route, doc)?;

    let publication_date = video.published_at.to_rfc3339().map_err(|e| Error::MalformedDocument {
        route: route.to_string(),
        reason: e.to_string(),
    })?;
    let lastmod = match &video.modified_date {
        Some(ts) => Some(ts.to_rfc3339().map_err(|e| Error::MalformedDocument {
            route: route.to_string(),
            reason: e.to_string(),
        })?),
        None => None,
    };

    let content_loc = video.content_url(config);
    let player_loc = if content_loc.is_some() { None } else { video.player_url(config) };
    if content_loc.is_none() && player_loc.is_none() {
        return Err(Error::MalformedDocument {
            route: route.to_string(),
            reason: "no hosted file or external id to point at".into(),
        });
    }

    Ok(SitemapEntry {
        url: route.to_string(),
        video: vec![VideoRecord {
            thumbnail_loc: video.thumbnails.medium.url.clone(),
            title: video.title.clone(),
            description: video.description().to_string(),
            content_loc,
            player_loc,
            duration: video.duration_seconds,
            publication_date,
        }],
        changefreq: None,
        priority: Some(VIDEO_PRIORITY),
        lastmod,
    })
}
