use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::{constants::VIDEO_PLACEHOLDER_THUMBNAIL, entities::media::MediaType};

static YOUTUBE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{6,20}$").expect("valid regex"));
static NUMERIC_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid regex"));
static DAILYMOTION_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+").expect("valid regex"));

/// A known video host: how to pull the video id out of a URL and where its thumbnail lives.
struct Provider {
    hosts: &'static [&'static str],
    extract_id: fn(&Url) -> Option<String>,
    thumbnail: fn(&str) -> String,
}

static PROVIDERS: &[Provider] = &[
    Provider {
        hosts: &["youtube.com", "www.youtube.com", "m.youtube.com"],
        extract_id: youtube_id,
        thumbnail: |id| format!("https://img.youtube.com/vi/{}/hqdefault.jpg", id),
    },
    Provider {
        hosts: &["youtu.be"],
        extract_id: |url| first_segment(url).filter(|id| YOUTUBE_ID.is_match(id)),
        thumbnail: |id| format!("https://img.youtube.com/vi/{}/hqdefault.jpg", id),
    },
    Provider {
        hosts: &["vimeo.com", "www.vimeo.com", "player.vimeo.com"],
        extract_id: |url| {
            url.path_segments()?
                .find(|segment| NUMERIC_ID.is_match(segment))
                .map(str::to_string)
        },
        thumbnail: |id| format!("https://vumbnail.com/{}.jpg", id),
    },
    Provider {
        hosts: &["dailymotion.com", "www.dailymotion.com"],
        extract_id: |url| {
            let mut segments = url.path_segments()?;
            match (segments.next(), segments.next()) {
                (Some("video"), Some(id)) => DAILYMOTION_ID.find(id).map(|m| m.as_str().to_string()),
                _ => None,
            }
        },
        thumbnail: |id| format!("https://www.dailymotion.com/thumbnail/video/{}", id),
    },
    Provider {
        hosts: &["dai.ly"],
        extract_id: |url| first_segment(url).filter(|id| DAILYMOTION_ID.is_match(id)),
        thumbnail: |id| format!("https://www.dailymotion.com/thumbnail/video/{}", id),
    },
];

fn first_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

fn youtube_id(url: &Url) -> Option<String> {
    let from_query = url
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned());

    let id = from_query.or_else(|| {
        let mut segments = url.path_segments()?;
        match (segments.next(), segments.next()) {
            (Some("embed" | "shorts" | "live" | "v"), Some(id)) => Some(id.to_string()),
            _ => None,
        }
    })?;

    YOUTUBE_ID.is_match(&id).then_some(id)
}

/// Thumbnail for a known video URL, or `None` when no provider matches.
pub fn video_thumbnail(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();

    PROVIDERS
        .iter()
        .filter(|provider| provider.hosts.contains(&host.as_str()))
        .find_map(|provider| (provider.extract_id)(url).map(|id| (provider.thumbnail)(&id)))
}

/// Images are their own thumbnail; videos go through the provider table, then the placeholder.
///
/// Image thumbnails keep the URL exactly as given, without `Url` normalization.
pub fn resolve_thumbnail(raw_url: &str, media_type: MediaType) -> String {
    match media_type {
        MediaType::Image => raw_url.trim().to_string(),
        MediaType::Video => Url::parse(raw_url.trim())
            .ok()
            .and_then(|url| video_thumbnail(&url))
            .unwrap_or_else(|| VIDEO_PLACEHOLDER_THUMBNAIL.to_string()),
    }
}
