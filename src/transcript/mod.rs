//! Transcript module for ytmcp.
//!
//! Fetches a video's captions through the outbound proxy and formats them
//! for LLM consumption.

mod fetcher;
mod format;

pub use fetcher::TranscriptFetcher;
pub use format::{format_timestamp, format_transcript};
