//! YouTube integration: video ID extraction and caption retrieval.

mod captions;

pub use captions::{
    CaptionEntry, CaptionsClient, CaptionsError, YoutubeCaptionsClient, DEFAULT_BASE_URL,
};

use crate::error::{Result, YtMcpError};
use regex::Regex;
use std::sync::LazyLock;

/// An 11-character video ID following `v=` or a path separator.
static VIDEO_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11}).*").expect("Invalid regex"));

/// Extract the video ID from a YouTube URL.
///
/// The match is unanchored, so anything after the ID (query parameters,
/// timestamps) is ignored. The first match in the string wins.
pub fn extract_video_id(url: &str) -> Result<String> {
    VIDEO_ID_REGEX
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| YtMcpError::InvalidInput("Invalid YouTube URL".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id() {
        let urls = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/v/dQw4w9WgXcQ",
            "youtube.com/watch?v=dQw4w9WgXcQ",
        ];

        for url in urls {
            assert_eq!(extract_video_id(url).unwrap(), "dQw4w9WgXcQ", "{}", url);
        }
    }

    #[test]
    fn test_extract_video_id_with_trailing_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s&list=PL123")
                .unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=abcdef").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?feature=share&v=a-B_c1D2e3F").unwrap(),
            "a-B_c1D2e3F"
        );
    }

    #[test]
    fn test_extract_video_id_invalid() {
        for url in ["", "not a url", "dQw4w9WgXcQ", "https://youtu.be/short", "v=abc"] {
            assert!(
                matches!(extract_video_id(url), Err(YtMcpError::InvalidInput(_))),
                "{}",
                url
            );
        }
    }
}
