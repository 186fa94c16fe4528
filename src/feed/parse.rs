// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// A link carried by a feed entry, with its declared media type
#[derive(Debug, Clone)]
pub struct MediaLink {
    pub media_type: Option<String>,
    pub href: String,
}

/// One feed entry as delivered, before enclosure resolution
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub title: String,
    pub enclosures: Vec<MediaLink>,
    pub links: Vec<MediaLink>,
}

/// A feed entry resolved to its single audio URL.
///
/// Identity is the enclosure URL, compared as an exact string — no
/// normalization, so it round-trips byte-for-byte through the state files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    pub title: String,
    pub enclosure_url: String,
}

impl FeedEntry {
    /// Resolve the entry's audio URL: first `audio/` enclosure, then the
    /// first `audio/` link. Entries without either produce no episode.
    pub fn resolve_episode(&self) -> Option<Episode> {
        let url = first_audio_href(&self.enclosures).or_else(|| first_audio_href(&self.links))?;

        Some(Episode {
            title: self.title.clone(),
            enclosure_url: url.to_string(),
        })
    }
}

fn first_audio_href(links: &[MediaLink]) -> Option<&str> {
    links
        .iter()
        .find(|link| {
            link.media_type
                .as_deref()
                .is_some_and(|t| t.starts_with("audio/"))
        })
        .map(|link| link.href.as_str())
}

/// Parse feed XML into entries, preserving delivery order (feeds
/// conventionally list newest first).
///
/// Returns the entries plus any parse warning; an unparseable feed yields
/// zero entries, not an error.
pub fn parse_feed(xml_bytes: &[u8]) -> (Vec<FeedEntry>, Option<String>) {
    let channel = match rss::Channel::read_from(xml_bytes) {
        Ok(channel) => channel,
        Err(e) => return (Vec::new(), Some(e.to_string())),
    };

    let entries = channel
        .items()
        .iter()
        .map(|item| FeedEntry {
            title: item
                .title()
                .map(String::from)
                .unwrap_or_else(|| "Unknown Episode".to_string()),
            enclosures: item
                .enclosure()
                .map(|enc| {
                    vec![MediaLink {
                        media_type: Some(enc.mime_type().to_string()).filter(|t| !t.is_empty()),
                        href: enc.url().to_string(),
                    }]
                })
                .unwrap_or_default(),
            // RSS links carry no media type; they only resolve for feeds
            // that type them (handled by resolve_episode's fallback)
            links: item
                .link()
                .map(|href| {
                    vec![MediaLink {
                        media_type: None,
                        href: href.to_string(),
                    }]
                })
                .unwrap_or_default(),
        })
        .collect();

    (entries, None)
}

/// Resolve parsed entries into episodes, dropping entries without audio
pub fn episodes_from_entries(entries: &[FeedEntry]) -> Vec<Episode> {
    entries
        .iter()
        .filter_map(FeedEntry::resolve_episode)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Podcast</title>
    <description>A test podcast for unit testing</description>
    <link>https://example.com</link>
    <item>
      <title>Episode 3</title>
      <enclosure url="https://example.com/ep3.mp3" length="1234567" type="audio/mpeg"/>
    </item>
    <item>
      <title>Episode 2</title>
      <enclosure url="https://example.com/ep2.mp3" length="7654321" type="audio/mpeg"/>
    </item>
    <item>
      <title>Show notes only</title>
      <link>https://example.com/notes</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parse_feed_preserves_delivery_order() {
        let (entries, warning) = parse_feed(SAMPLE_FEED.as_bytes());

        assert!(warning.is_none());
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].title, "Episode 3");
        assert_eq!(entries[1].title, "Episode 2");
    }

    #[test]
    fn parse_feed_extracts_enclosures() {
        let (entries, _) = parse_feed(SAMPLE_FEED.as_bytes());

        let enclosures = &entries[0].enclosures;
        assert_eq!(enclosures.len(), 1);
        assert_eq!(enclosures[0].href, "https://example.com/ep3.mp3");
        assert_eq!(enclosures[0].media_type.as_deref(), Some("audio/mpeg"));
    }

    #[test]
    fn parse_feed_reports_unparseable_input() {
        let (entries, warning) = parse_feed(b"this is not xml at all");

        assert!(entries.is_empty());
        assert!(warning.is_some());
    }

    #[test]
    fn episodes_skip_entries_without_audio() {
        let (entries, _) = parse_feed(SAMPLE_FEED.as_bytes());
        let episodes = episodes_from_entries(&entries);

        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].enclosure_url, "https://example.com/ep3.mp3");
        assert_eq!(episodes[1].enclosure_url, "https://example.com/ep2.mp3");
    }

    #[test]
    fn resolve_prefers_audio_enclosure() {
        let entry = FeedEntry {
            title: "Ep".to_string(),
            enclosures: vec![
                MediaLink {
                    media_type: Some("image/jpeg".to_string()),
                    href: "https://example.com/cover.jpg".to_string(),
                },
                MediaLink {
                    media_type: Some("audio/mpeg".to_string()),
                    href: "https://example.com/ep.mp3".to_string(),
                },
            ],
            links: vec![MediaLink {
                media_type: Some("audio/mpeg".to_string()),
                href: "https://example.com/other.mp3".to_string(),
            }],
        };

        let episode = entry.resolve_episode().unwrap();
        assert_eq!(episode.enclosure_url, "https://example.com/ep.mp3");
    }

    #[test]
    fn resolve_falls_back_to_typed_links() {
        let entry = FeedEntry {
            title: "Ep".to_string(),
            enclosures: vec![],
            links: vec![
                MediaLink {
                    media_type: Some("text/html".to_string()),
                    href: "https://example.com/notes".to_string(),
                },
                MediaLink {
                    media_type: Some("audio/ogg".to_string()),
                    href: "https://example.com/ep.ogg".to_string(),
                },
            ],
        };

        let episode = entry.resolve_episode().unwrap();
        assert_eq!(episode.enclosure_url, "https://example.com/ep.ogg");
    }

    #[test]
    fn resolve_skips_untyped_links() {
        let entry = FeedEntry {
            title: "Ep".to_string(),
            enclosures: vec![],
            links: vec![MediaLink {
                media_type: None,
                href: "https://example.com/page".to_string(),
            }],
        };

        assert!(entry.resolve_episode().is_none());
    }

    #[test]
    fn episode_identity_is_the_exact_url_string() {
        let a = Episode {
            title: "One".to_string(),
            enclosure_url: "https://example.com/EP.mp3".to_string(),
        };
        let b = Episode {
            title: "One".to_string(),
            enclosure_url: "https://example.com/ep.mp3".to_string(),
        };

        assert_ne!(a, b);
    }
}
