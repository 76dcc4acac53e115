//! Transcript command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::transcript::TranscriptFetcher;
use anyhow::Result;

/// Fetch a transcript through the configured proxy and print it.
pub async fn run_transcript(url: &str, settings: Settings) -> Result<()> {
    let fetcher = TranscriptFetcher::from_settings(&settings);

    let spinner = Output::spinner("Fetching transcript...");
    let result = fetcher.fetch_for_url(url).await;
    spinner.finish_and_clear();

    let transcript = result?;
    if transcript.is_empty() {
        Output::warning("Transcript is empty.");
    } else {
        println!("{}", transcript);
    }
    Ok(())
}
