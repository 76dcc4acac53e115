//! MCP tool definitions for ytmcp.

use super::protocol::Tool;
use crate::instructions::AVAILABLE_PROMPTS;
use serde_json::json;

pub const FETCH_VIDEO_TRANSCRIPT: &str = "fetch_video_transcript";
pub const FETCH_INSTRUCTIONS: &str = "fetch_instructions";

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: FETCH_VIDEO_TRANSCRIPT.to_string(),
            description: "Extract transcript with timestamps from a YouTube video URL and format it \
                for LLM consumption. Returns one entry per line in the format \"[MM:SS] Text\"."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "YouTube video URL"
                    }
                },
                "required": ["url"]
            }),
        },
        Tool {
            name: FETCH_INSTRUCTIONS.to_string(),
            description: format!(
                "Fetch instructions for a given prompt name from the prompts/ directory. \
                 Available prompts: {}.",
                AVAILABLE_PROMPTS.join(", ")
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "prompt_name": {
                        "type": "string",
                        "description": "Name of the prompt to fetch instructions for"
                    }
                },
                "required": ["prompt_name"]
            }),
        },
    ]
}
