//! schema.org structured data for video pages.
//!
//! Reference:
//! https://developers.google.com/search/docs/appearance/structured-data/video

use serde_json::{Value, json};

use super::SitemapConfig;
use super::video::VideoDoc;
use crate::Error;
use crate::store::RawDocument;

/// Render the JSON-LD `VideoObject` for one cached video document.
///
/// Follows the same hosted-file precedence as the sitemap projection: a
/// hosted file becomes `contentUrl`, otherwise the external player becomes
/// `embedUrl`.
pub fn video_structured_data(route: &str, doc: &RawDocument, config: &SitemapConfig) -> Result<Value, Error> {
    let video = VideoDoc::from_raw(route, doc)?;

    let mut thumbnails = vec![video.thumbnails.medium.url.clone()];
    thumbnails.extend(video.thumbnails.other.values().map(|thumb| thumb.url.clone()));

    let upload_date = video.published_at.to_rfc3339().map_err(|e| Error::MalformedDocument {
        route: route.to_string(),
        reason: e.to_string(),
    })?;

    let mut object = json!({
        "@context": "https://schema.org",
        "@type": "VideoObject",
        "name": video.title,
        "description": video.description(),
        "thumbnailUrl": thumbnails,
        "uploadDate": upload_date,
        "duration": format!("PT{}S", video.duration_seconds),
    });

    if let Some(url) = video.content_url(config) {
        object["contentUrl"] = Value::String(url);
    } else if let Some(url) = video.player_url(config) {
        object["embedUrl"] = Value::String(url);
    }

    Ok(object)
}
