//! MCP request dispatcher.
//!
//! Transport-agnostic: the HTTP layer hands in decoded JSON-RPC messages and
//! writes back whatever response comes out.

use super::protocol::*;
use super::tools::{get_tools, FETCH_INSTRUCTIONS, FETCH_VIDEO_TRANSCRIPT};
use crate::instructions::InstructionLoader;
use crate::transcript::TranscriptFetcher;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Protocol versions this server speaks, oldest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: [&str; 3] = ["2024-11-05", "2025-03-26", "2025-06-18"];
const LATEST_PROTOCOL_VERSION: &str = "2025-06-18";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP server exposing the transcript and instructions tools.
pub struct McpServer {
    name: String,
    instructions: String,
    fetcher: TranscriptFetcher,
    loader: InstructionLoader,
}

impl McpServer {
    /// Create a new MCP server.
    ///
    /// `instructions` is sent to clients in the `initialize` response.
    pub fn new(
        name: &str,
        instructions: String,
        fetcher: TranscriptFetcher,
        loader: InstructionLoader,
    ) -> Self {
        Self {
            name: name.to_string(),
            instructions,
            fetcher,
            loader,
        }
    }

    /// Handle one decoded JSON-RPC message.
    ///
    /// Returns `None` for notifications.
    pub async fn handle_message(&self, message: Value) -> Option<JsonRpcResponse> {
        match serde_json::from_value::<JsonRpcRequest>(message) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(JsonRpcResponse::error(
                None,
                INVALID_REQUEST,
                &format!("Invalid request: {}", e),
            )),
        }
    }

    /// Handle a single JSON-RPC request.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id,
                INVALID_REQUEST,
                "Unsupported jsonrpc version",
            ));
        }

        if request.is_notification() {
            debug!(method = %request.method, "Notification received");
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        };
        Some(response)
    }

    /// Handle initialize request.
    fn handle_initialize(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let requested = params
            .and_then(|p| serde_json::from_value::<InitializeParams>(p).ok())
            .map(|p| p.protocol_version);

        let protocol_version = match requested {
            Some(v) if SUPPORTED_PROTOCOL_VERSIONS.contains(&v.as_str()) => v,
            _ => LATEST_PROTOCOL_VERSION.to_string(),
        };
        info!(protocol_version = %protocol_version, "Client initialized");

        let result = InitializeResult {
            protocol_version,
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: self.name.clone(),
                version: SERVER_VERSION.to_string(),
            },
            instructions: Some(self.instructions.clone()).filter(|i| !i.is_empty()),
        };

        JsonRpcResponse::from_result(id, &result)
    }

    /// Handle tools/list request.
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::from_result(id, &ToolsListResult { tools: get_tools() })
    }

    /// Handle tools/call request.
    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        INVALID_PARAMS,
                        &format!("Invalid params: {}", e),
                    )
                }
            },
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        info!(tool = %params.name, "Tool call");
        let result = match params.name.as_str() {
            FETCH_VIDEO_TRANSCRIPT => self.tool_fetch_video_transcript(params.arguments).await,
            FETCH_INSTRUCTIONS => self.tool_fetch_instructions(params.arguments).await,
            _ => ToolCallResult::error(format!("Unknown tool: {}", params.name)),
        };

        JsonRpcResponse::from_result(id, &result)
    }

    /// Transcript tool.
    async fn tool_fetch_video_transcript(&self, args: Option<Value>) -> ToolCallResult {
        let Some(url) = string_arg(&args, "url") else {
            return ToolCallResult::error("Missing 'url' argument".to_string());
        };

        match self.fetcher.fetch_for_url(url).await {
            Ok(transcript) => ToolCallResult::text(transcript),
            Err(e) => tool_failure(FETCH_VIDEO_TRANSCRIPT, e),
        }
    }

    /// Instructions tool.
    async fn tool_fetch_instructions(&self, args: Option<Value>) -> ToolCallResult {
        let Some(name) = string_arg(&args, "prompt_name") else {
            return ToolCallResult::error("Missing 'prompt_name' argument".to_string());
        };

        match self.loader.load(name).await {
            Ok(text) => ToolCallResult::text(text),
            Err(e) => tool_failure(FETCH_INSTRUCTIONS, e),
        }
    }
}

fn string_arg<'a>(args: &'a Option<Value>, key: &str) -> Option<&'a str> {
    args.as_ref()?.get(key)?.as_str()
}

fn tool_failure(tool: &str, error: crate::YtMcpError) -> ToolCallResult {
    warn!(tool, "Tool failed: {}", error);
    ToolCallResult::error(format!("Error executing tool {}: {}", tool, error))
}
