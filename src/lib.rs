//! ytmcp - YouTube transcript MCP server
//!
//! An MCP (Model Context Protocol) tool server that hands YouTube
//! transcripts and writing instructions to AI assistants.
//!
//! # Overview
//!
//! ytmcp exposes two tools:
//! - `fetch_video_transcript` - fetch a video's captions through an
//!   authenticated proxy and render them as `[MM:SS] text` lines
//! - `fetch_instructions` - return a Markdown instruction file from the
//!   prompts directory
//!
//! Every MCP request must carry an Auth0-issued bearer token.
//!
//! # Architecture
//!
//! - `config` - Settings file and environment overlay
//! - `youtube` - Video ID extraction and the captions client
//! - `transcript` - Proxy-gated fetching and timestamp formatting
//! - `instructions` - Instruction file loading
//! - `auth` - Bearer token verification against Auth0
//! - `mcp` - JSON-RPC dispatcher and HTTP transport
//!
//! # Example
//!
//! ```rust,no_run
//! use ytmcp::config::Settings;
//! use ytmcp::transcript::TranscriptFetcher;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let fetcher = TranscriptFetcher::from_settings(&settings);
//!
//!     let transcript = fetcher.fetch_for_url("https://youtu.be/dQw4w9WgXcQ").await?;
//!     println!("{}", transcript);
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod instructions;
pub mod mcp;
pub mod transcript;
pub mod youtube;

pub use error::{Result, YtMcpError};
