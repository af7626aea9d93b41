//! YouTube URL utilities
//!
//! Recognised forms:
//! - `https://www.youtube.com/watch?v=VIDEO_ID`
//! - `https://youtu.be/VIDEO_ID`
//! - `https://www.youtube.com/embed/VIDEO_ID`
//! - `https://www.youtube.com/v/VIDEO_ID`
//! - `https://www.youtube.com/shorts/VIDEO_ID`

use regex::Regex;
use std::sync::OnceLock;

use crate::model::Category;

/// Thumbnail resolutions served by `img.youtube.com`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThumbnailQuality {
    Default,
    Medium,
    #[default]
    High,
    MaxRes,
}

impl ThumbnailQuality {
    fn file_stem(&self) -> &'static str {
        match self {
            ThumbnailQuality::Default => "default",
            ThumbnailQuality::Medium => "mqdefault",
            ThumbnailQuality::High => "hqdefault",
            ThumbnailQuality::MaxRes => "maxresdefault",
        }
    }
}

fn patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?:www\.)?youtube\.com/watch\?v=([a-zA-Z0-9_-]+)",
            r"(?:www\.)?youtube\.com/shorts/([a-zA-Z0-9_-]+)",
            r"youtu\.be/([a-zA-Z0-9_-]+)",
            r"(?:www\.)?youtube\.com/embed/([a-zA-Z0-9_-]+)",
            r"(?:www\.)?youtube\.com/v/([a-zA-Z0-9_-]+)",
        ]
        .into_iter()
        .map(|p| Regex::new(p).expect("Failed to compile YouTube URL regex"))
        .collect()
    })
}

/// Extract the video ID from a YouTube URL
pub fn extract_video_id(url: &str) -> Option<String> {
    patterns().iter().find_map(|pattern| {
        pattern
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Whether the URL is one we can extract an ID from
pub fn is_valid_url(url: &str) -> bool {
    extract_video_id(url).is_some()
}

pub fn is_shorts_url(url: &str) -> bool {
    url.contains("/shorts/")
}

/// Category implied by the URL shape
pub fn detect_category(url: &str) -> Category {
    if is_shorts_url(url) {
        Category::Tall
    } else {
        Category::Wide
    }
}

pub fn thumbnail_url(video_id: &str, quality: ThumbnailQuality) -> String {
    format!(
        "https://img.youtube.com/vi/{}/{}.jpg",
        video_id,
        quality.file_stem()
    )
}

/// Privacy-enhanced embed URL
pub fn embed_url(video_id: &str) -> String {
    format!("https://www.youtube-nocookie.com/embed/{}", video_id)
}
