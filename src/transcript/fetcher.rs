//! Transcript retrieval through the configured outbound proxy.

use super::format_transcript;
use crate::config::{ProxySettings, Settings};
use crate::error::{Result, YtMcpError};
use crate::youtube::{extract_video_id, CaptionsClient, YoutubeCaptionsClient};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Fetches caption tracks and renders them as text.
pub struct TranscriptFetcher {
    proxy: ProxySettings,
    languages: Vec<String>,
    client: Arc<dyn CaptionsClient>,
}

impl TranscriptFetcher {
    /// Create a fetcher with a custom captions client.
    pub fn new(proxy: ProxySettings, languages: Vec<String>, client: Arc<dyn CaptionsClient>) -> Self {
        Self {
            proxy,
            languages,
            client,
        }
    }

    /// Create a fetcher backed by youtube.com.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.proxy.clone(),
            settings.transcript.languages.clone(),
            Arc::new(YoutubeCaptionsClient::new()),
        )
    }

    /// Extract the video ID from `url` and fetch its transcript.
    pub async fn fetch_for_url(&self, url: &str) -> Result<String> {
        let video_id = extract_video_id(url)?;
        self.fetch_transcript(&video_id).await
    }

    /// Fetch the transcript for a video ID as `[MM:SS] text` lines.
    ///
    /// Proxy credentials are checked on every call, before any request is made.
    #[instrument(skip(self))]
    pub async fn fetch_transcript(&self, video_id: &str) -> Result<String> {
        let endpoints = self.proxy.credentials()?.endpoints();

        debug!("Requesting caption track");
        let entries = self
            .client
            .fetch(video_id, &self.languages, &endpoints)
            .await
            .map_err(|e| {
                warn!("Caption fetch failed: {}", e);
                YtMcpError::TranscriptFetchFailed(e.to_string())
            })?;

        info!("Fetched {} caption entries", entries.len());
        Ok(format_transcript(&entries))
    }
}
