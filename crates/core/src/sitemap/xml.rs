//! Sitemap XML rendering with the video extension.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"
//!         xmlns:video="http://www.google.com/schemas/sitemap-video/1.1">
//!   <url>
//!     <loc>https://example.com/video/intro</loc>
//!     <priority>1.0</priority>
//!     <video:video>
//!       <video:thumbnail_loc>https://img/intro.jpg</video:thumbnail_loc>
//!       ...
//!     </video:video>
//!   </url>
//! </urlset>
//! ```

use std::borrow::Cow;
use std::fmt::Write;

use super::SitemapEntry;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const VIDEO_NS: &str = "http://www.google.com/schemas/sitemap-video/1.1";

/// Render entries into a sitemap `urlset` document.
///
/// Relative entry URLs are joined onto `base_url`. Text content is
/// stripped of characters forbidden by XML 1.0 and escaped.
pub fn render(entries: &[SitemapEntry], base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let mut xml = String::with_capacity(entries.len() * 256 + 256);

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(xml, "<urlset xmlns=\"{SITEMAP_NS}\" xmlns:video=\"{VIDEO_NS}\">");

    for entry in entries {
        xml.push_str("  <url>\n");
        push_tag(&mut xml, "    ", "loc", &format!("{base}{}", entry.url));
        if let Some(lastmod) = &entry.lastmod {
            push_tag(&mut xml, "    ", "lastmod", lastmod);
        }
        if let Some(changefreq) = &entry.changefreq {
            push_tag(&mut xml, "    ", "changefreq", changefreq);
        }
        if let Some(priority) = entry.priority {
            push_tag(&mut xml, "    ", "priority", &format!("{priority:.1}"));
        }
        for record in &entry.video {
            xml.push_str("    <video:video>\n");
            push_tag(&mut xml, "      ", "video:thumbnail_loc", &record.thumbnail_loc);
            push_tag(&mut xml, "      ", "video:title", &record.title);
            push_tag(&mut xml, "      ", "video:description", &record.description);
            if let Some(content_loc) = &record.content_loc {
                push_tag(&mut xml, "      ", "video:content_loc", content_loc);
            }
            if let Some(player_loc) = &record.player_loc {
                push_tag(&mut xml, "      ", "video:player_loc", player_loc);
            }
            push_tag(&mut xml, "      ", "video:duration", &record.duration.to_string());
            push_tag(&mut xml, "      ", "video:publication_date", &record.publication_date);
            xml.push_str("    </video:video>\n");
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

fn push_tag(xml: &mut String, indent: &str, tag: &str, text: &str) {
    xml.push_str(indent);
    xml.push('<');
    xml.push_str(tag);
    xml.push('>');
    xml.push_str(&escape_xml(&strip_invalid_xml(text)));
    xml.push_str("</");
    xml.push_str(tag);
    xml.push_str(">\n");
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    // Fast path: check if escaping is needed
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}

/// Remove characters forbidden or discouraged by XML 1.0, plus the
/// replacement character U+FFFD.
fn strip_invalid_xml(s: &str) -> Cow<'_, str> {
    if s.chars().all(is_clean_xml_char) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(s.chars().filter(|&c| is_clean_xml_char(c)).collect())
}

fn is_clean_xml_char(c: char) -> bool {
    let valid = matches!(c, '\t' | '\n' | '\r')
        || ('\u{20}'..='\u{D7FF}').contains(&c)
        || ('\u{E000}'..='\u{FFFD}').contains(&c)
        || c >= '\u{10000}';

    let cp = c as u32;
    let discouraged = matches!(cp, 0x7F..=0x84 | 0x86..=0x9F | 0xFDD0..=0xFDEF)
        || c == '\u{FFFD}'
        || (cp & 0xFFFF) >= 0xFFFE;

    valid && !discouraged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sitemap::VideoRecord;

    fn video_entry() -> SitemapEntry {
        SitemapEntry {
            url: "/video/intro".into(),
            video: vec![VideoRecord {
                thumbnail_loc: "https://img/intro.jpg".into(),
                title: "Intro & Outro".into(),
                description: "A <short> intro.".into(),
                content_loc: Some("https://media.example.com/intro.mp4".into()),
                player_loc: None,
                duration: 120,
                publication_date: "2021-01-01T00:00:00Z".into(),
            }],
            changefreq: None,
            priority: Some(1.0),
            lastmod: None,
        }
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("hello"), "hello");
        assert_eq!(escape_xml("<test>"), "&lt;test&gt;");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml(r#"say "hi""#), "say &quot;hi&quot;");
        assert_eq!(escape_xml("it's"), "it&apos;s");
    }

    #[test]
    fn test_strip_invalid_xml() {
        assert_eq!(strip_invalid_xml("clean text"), "clean text");
        assert_eq!(strip_invalid_xml("a\u{0}b\u{FFFD}c"), "abc");
        assert_eq!(strip_invalid_xml("tab\tand newline\n kept"), "tab\tand newline\n kept");
        assert_eq!(strip_invalid_xml("\u{FDD0}x"), "x");
    }

    #[test]
    fn test_render_empty() {
        let xml = render(&[], "https://example.com");

        assert!(xml.contains(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(SITEMAP_NS));
        assert!(xml.contains(VIDEO_NS));
        assert!(xml.contains("</urlset>"));
        assert!(!xml.contains("<url>"));
    }

    #[test]
    fn test_render_root_entry() {
        let xml = render(&[SitemapEntry::root()], "https://example.com/");

        assert!(xml.contains("<loc>https://example.com/</loc>"));
        assert!(xml.contains("<changefreq>daily</changefreq>"));
        assert!(!xml.contains("<priority>"));
    }

    #[test]
    fn test_render_video_entry() {
        let xml = render(&[video_entry()], "https://example.com");

        assert!(xml.contains("<loc>https://example.com/video/intro</loc>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.contains("<video:thumbnail_loc>https://img/intro.jpg</video:thumbnail_loc>"));
        assert!(xml.contains("<video:title>Intro &amp; Outro</video:title>"));
        assert!(xml.contains("<video:description>A &lt;short&gt; intro.</video:description>"));
        assert!(xml.contains("<video:content_loc>https://media.example.com/intro.mp4</video:content_loc>"));
        assert!(xml.contains("<video:duration>120</video:duration>"));
        assert!(xml.contains("<video:publication_date>2021-01-01T00:00:00Z</video:publication_date>"));
        assert!(!xml.contains("player_loc"));
    }

    #[test]
    fn test_priority_formatting() {
        let mut entry = video_entry();
        entry.video.clear();
        entry.priority = Some(0.1);

        let xml = render(&[entry], "https://example.com");
        assert!(xml.contains("<priority>0.1</priority>"));
    }
}
