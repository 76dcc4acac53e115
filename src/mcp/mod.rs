//! MCP (Model Context Protocol) server for ytmcp.
//!
//! Exposes the transcript and instruction tools over JSON-RPC 2.0,
//! served on HTTP (SSE sessions or direct POST) behind bearer auth.

mod protocol;
mod server;
mod tools;
mod transport;

pub use server::McpServer;
pub use transport::{router, AppState, MESSAGES_PATH};
